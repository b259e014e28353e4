use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    /// The provider could not be reached or answered with a transport-level failure.
    #[error("Error connecting to Wikipedia API: {0}")]
    ServiceUnavailable(String),

    /// The article does not exist or its payload could not be used.
    #[error("{0}")]
    NotFound(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::ServiceUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
