pub mod commands;
pub mod config;
pub mod render;
pub mod server;

pub use config::{Config, ConfigError};
pub use render::{
    generate_graph_report, generate_search_report, generate_snapshot_report, print_banner,
};
pub use server::{AppState, create_router};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
