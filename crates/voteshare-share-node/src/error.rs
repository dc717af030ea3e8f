use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("unknown transaction")]
    UnknownTx,

    #[error("transaction already aborted")]
    Conflict,

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<rocksdb::Error> for ShareError {
    fn from(e: rocksdb::Error) -> Self {
        ShareError::Storage(e.to_string())
    }
}

impl warp::reject::Reject for ShareError {}
