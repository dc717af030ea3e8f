use thiserror::Error;
use voteshare_core::ErrorKind;

#[derive(Debug, Error)]
pub enum CastError {
    #[error("unknown election")]
    UnknownElection,

    #[error("unknown candidate")]
    UnknownCandidate,

    #[error("unknown voter")]
    UnknownVoter,

    #[error("election not open")]
    ElectionNotOpen,

    #[error("already voted")]
    AlreadyVoted,

    #[error("share node unreachable or rejected the request: {0}")]
    Gateway(String),

    #[error("local finalization failed: {0}")]
    Internal(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl CastError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CastError::UnknownElection | CastError::UnknownCandidate | CastError::UnknownVoter => ErrorKind::NotFound,
            CastError::ElectionNotOpen => ErrorKind::Precondition,
            CastError::AlreadyVoted => ErrorKind::Conflict,
            CastError::Gateway(_) => ErrorKind::Gateway,
            CastError::Internal(_) | CastError::Storage(_) => ErrorKind::Internal,
        }
    }
}

impl From<rocksdb::Error> for CastError {
    fn from(e: rocksdb::Error) -> Self {
        CastError::Storage(e.to_string())
    }
}

impl warp::reject::Reject for CastError {}

#[derive(Debug, Error)]
pub enum TallyError {
    #[error("unknown election")]
    UnknownElection,

    #[error("modulus mismatch between share nodes")]
    ModulusMismatch,

    #[error("share node unreachable: {0}")]
    Gateway(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl TallyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TallyError::UnknownElection => ErrorKind::NotFound,
            TallyError::ModulusMismatch => ErrorKind::Internal,
            TallyError::Gateway(_) => ErrorKind::Gateway,
            TallyError::Storage(_) => ErrorKind::Internal,
        }
    }
}

impl From<rocksdb::Error> for TallyError {
    fn from(e: rocksdb::Error) -> Self {
        TallyError::Storage(e.to_string())
    }
}

impl warp::reject::Reject for TallyError {}
