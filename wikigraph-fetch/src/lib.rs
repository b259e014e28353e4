pub mod cache;
pub mod client;
pub mod error;
pub mod links;

pub use cache::TtlCache;
pub use client::{WikipediaClient, DEFAULT_API_URL, SUMMARY_TTL};
pub use error::FetchError;
pub use links::extract_links;
