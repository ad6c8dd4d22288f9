use thiserror::Error;

use crate::alerts::store::StoreError;
use crate::feed::FeedError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("price feed failed: {0}")]
    Feed(#[from] FeedError),

    #[error("alert persistence failed: {0}")]
    Store(#[from] StoreError),
}
