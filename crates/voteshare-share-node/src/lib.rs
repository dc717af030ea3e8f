pub mod error;
pub mod http;
pub mod service;
pub mod store;
pub mod types;

pub use error::ShareError;
pub use service::ShareNodeService;
pub use store::ShareStore;
pub use types::{ShareTotalRow, ShareTransaction, SnapshotResponse, TxStatus};
