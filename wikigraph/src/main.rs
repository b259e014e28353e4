use colored::Colorize;
use tracing_subscriber::EnvFilter;
use wikigraph::commands::command_argument_builder;
use wikigraph::print_banner;

mod handlers;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("wikigraph=info,wikigraph_core=info,wikigraph_fetch=info,tower_http=info")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    init_tracing();

    let result = match chosen_command.subcommand() {
        Some(("serve", primary_command)) => handlers::handle_serve(primary_command).await,
        Some(("explore", primary_command)) => handlers::handle_explore(primary_command).await,
        Some(("search", primary_command)) => handlers::handle_search(primary_command).await,
        Some(("init", primary_command)) => handlers::handle_init(primary_command),
        Some(("snapshots", primary_command)) => match primary_command.subcommand() {
            Some(("list", secondary_command)) => handlers::handle_snapshots_list(secondary_command),
            Some(("delete", secondary_command)) => {
                handlers::handle_snapshots_delete(secondary_command)
            }
            _ => unreachable!("clap should ensure we don't get here"),
        },
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
