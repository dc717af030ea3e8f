pub mod client;
pub mod error;
pub mod filter;
pub mod signing;

pub use client::SignedClient;
pub use error::TransportError;
pub use signing::{canonicalize, canonicalize_body, empty_canonical_body, sign, verify, FRESHNESS_WINDOW_SECS};
