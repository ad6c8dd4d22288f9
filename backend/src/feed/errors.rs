use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("feed returned no data: {0}")]
    NoData(String),

    #[error("malformed payload: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for FeedError {
    fn from(e: serde_json::Error) -> Self {
        FeedError::Parse(e.to_string())
    }
}

impl FeedError {
    /// Transport-level failure (as opposed to a well-formed but useless payload).
    pub fn is_network(&self) -> bool {
        matches!(self, FeedError::Http(_) | FeedError::Timeout(_))
    }
}
