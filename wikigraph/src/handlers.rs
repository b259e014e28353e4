use anyhow::Context;
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use wikigraph::server::{self, AppState};
use wikigraph::{
    Config, generate_graph_report, generate_search_report, generate_snapshot_report,
};
use wikigraph_core::Explorer;
use wikigraph_core::data::{Database, SnapshotStore};
use wikigraph_fetch::WikipediaClient;

fn build_explorer(config: &Config) -> anyhow::Result<Explorer> {
    let client = WikipediaClient::with_timeout(&config.api_url, config.timeout_secs)
        .context("Failed to create API client")?;
    Ok(Explorer::new(Arc::new(client))
        .with_max_neighbors(config.max_neighbors)
        .with_concurrency(config.concurrency))
}

fn open_database(config: &Config) -> anyhow::Result<Database> {
    let path = config.database_path()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Database::new(&path).with_context(|| format!("Failed to open database {}", path.display()))
}

// Snapshot reads and deletes never create a store.
fn open_existing_database(config: &Config) -> anyhow::Result<Database> {
    let path = config.existing_database_path()?;
    Database::new(&path).with_context(|| format!("Failed to open database {}", path.display()))
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    pb
}

pub async fn handle_serve(args: &ArgMatches) -> anyhow::Result<()> {
    let config = Config::from_matches(args);

    // Fail before binding anything if the store is not configured.
    let store = open_database(&config)?;
    let explorer = build_explorer(&config)?;

    info!(
        "Serving with max_neighbors={} api_url={}",
        config.max_neighbors, config.api_url
    );

    let state = AppState {
        explorer: Arc::new(explorer),
        store: Arc::new(store),
    };
    server::serve(state, config.bind, &config.allowed_origins).await
}

pub async fn handle_explore(args: &ArgMatches) -> anyhow::Result<()> {
    let config = Config::from_matches(args);
    let title = args
        .get_one::<String>("TITLE")
        .context("A seed title is required")?;
    let depth = args.get_one::<u32>("depth").copied().unwrap_or(1);
    let as_json = args.get_flag("json");

    let explorer = build_explorer(&config)?;

    let pb = (!as_json).then(|| spinner(format!("Exploring {}...", title)));
    let result = explorer.explore(title, depth).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let graph = result?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&graph)?);
    } else {
        print!("{}", generate_graph_report(&graph));
    }
    Ok(())
}

pub async fn handle_search(args: &ArgMatches) -> anyhow::Result<()> {
    let config = Config::from_matches(args);
    let term = args
        .get_one::<String>("TERM")
        .context("A search term is required")?;

    let explorer = build_explorer(&config)?;
    let results = explorer.client().search_articles(term).await?;
    print!("{}", generate_search_report(&results));
    Ok(())
}

pub fn handle_init(args: &ArgMatches) -> anyhow::Result<()> {
    let config = Config::from_matches(args);
    let path = config.database_path()?;
    let force = args.get_flag("force");

    if Database::exists(&path) {
        if !force {
            println!(
                "{} Database already exists: {} (use --force to recreate)",
                "→".yellow().bold(),
                path.display().to_string().bright_white()
            );
            return Ok(());
        }
        Database::drop(&path)
            .with_context(|| format!("Failed to delete {}", path.display()))?;
        println!("{} Existing database removed", "✓".green().bold());
    }

    open_database(&config)?;
    println!(
        "{} Database initialized: {}",
        "✓".green().bold(),
        path.display().to_string().bright_white()
    );
    Ok(())
}

pub fn handle_snapshots_list(args: &ArgMatches) -> anyhow::Result<()> {
    let config = Config::from_matches(args);
    let db = open_existing_database(&config)?;
    let explorations = db.list()?;
    print!("{}", generate_snapshot_report(&explorations));
    Ok(())
}

pub fn handle_snapshots_delete(args: &ArgMatches) -> anyhow::Result<()> {
    let config = Config::from_matches(args);
    let id = args
        .get_one::<String>("ID")
        .context("An exploration id is required")?;
    let db = open_existing_database(&config)?;

    if db.delete(id)? {
        println!("{} Deleted exploration {}", "✓".green().bold(), id);
        Ok(())
    } else {
        anyhow::bail!("Exploration not found: {}", id)
    }
}
