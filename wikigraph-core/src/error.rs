use thiserror::Error;
use wikigraph_fetch::FetchError;

#[derive(Error, Debug)]
pub enum ExploreError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Only depth={supported} is currently supported, got depth={requested}.")]
    UnsupportedDepth { requested: u32, supported: u32 },
}

pub type Result<T> = std::result::Result<T, ExploreError>;
