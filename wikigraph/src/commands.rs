use crate::CLAP_STYLING;
use clap::{ArgAction, arg, command};
use std::net::SocketAddr;
use std::path::PathBuf;
use wikigraph_fetch::DEFAULT_API_URL;

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost", "http://localhost:5173"];

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("wikigraph")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("wikigraph")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(--"database" <PATH>)
                .required(false)
                .global(true)
                .env("WIKIGRAPH_DATABASE")
                .help("Location of the snapshot database")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            arg!(--"max-neighbors" <N>)
                .required(false)
                .global(true)
                .env("MAX_NEIGHBORS")
                .help("Maximum number of linked articles looked up per exploration")
                .default_value("15")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(-c --"concurrency" <N>)
                .required(false)
                .global(true)
                .env("WIKIGRAPH_CONCURRENCY")
                .help("Maximum linked-article lookups in flight per exploration")
                .default_value("4")
                .value_parser(clap::builder::RangedU64ValueParser::<usize>::new().range(1..)),
        )
        .arg(
            arg!(--"api-url" <URL>)
                .required(false)
                .global(true)
                .env("WIKIPEDIA_API_URL")
                .help("MediaWiki action API endpoint")
                .default_value(DEFAULT_API_URL),
        )
        .arg(
            arg!(--"timeout" <SECS>)
                .required(false)
                .global(true)
                .env("WIKIGRAPH_TIMEOUT")
                .help("Timeout in seconds for each request to the API")
                .default_value("10")
                .value_parser(clap::value_parser!(u64)),
        )
        .subcommand_required(false)
        .subcommand(
            command!("serve")
                .about("Serves the exploration and snapshot HTTP API")
                .arg(
                    arg!(-b --"bind" <ADDR>)
                        .required(false)
                        .env("WIKIGRAPH_BIND")
                        .help("Address to listen on")
                        .default_value(DEFAULT_BIND)
                        .value_parser(clap::value_parser!(SocketAddr)),
                )
                .arg(
                    arg!(--"allow-origin" <ORIGIN>)
                        .required(false)
                        .env("WIKIGRAPH_ALLOWED_ORIGINS")
                        .help("Origin allowed to call the API (repeatable)")
                        .action(ArgAction::Append)
                        .value_delimiter(',')
                        .default_values(DEFAULT_ALLOWED_ORIGINS),
                ),
        )
        .subcommand(
            command!("explore")
                .about("Explores an article and prints its scored link graph")
                .arg(arg!(<TITLE>).required(true).help("Title of the seed article"))
                .arg(
                    arg!(-d --"depth" <DEPTH>)
                        .required(false)
                        .help("Traversal depth (only 1 is supported)")
                        .default_value("1")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(arg!(--"json" "Print the graph as JSON").required(false)),
        )
        .subcommand(
            command!("search")
                .about("Searches article titles")
                .arg(arg!(<TERM>).required(true).help("Search term")),
        )
        .subcommand(
            command!("init")
                .about("Initializes the snapshot database")
                .arg(
                    arg!(-f --"force")
                        .help("Deletes any existing database at the configured location first")
                        .required(false),
                ),
        )
        .subcommand(
            command!("snapshots")
                .about("Manage saved explorations")
                .subcommand_required(true)
                .subcommand(command!("list").about("Lists saved explorations"))
                .subcommand(
                    command!("delete")
                        .about("Deletes a saved exploration")
                        .arg(arg!(<ID>).required(true).help("Exploration id")),
                ),
        )
}
