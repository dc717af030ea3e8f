pub mod election;
pub mod error;
pub mod fingerprint_buffer;
pub mod ids;
pub mod registry;
pub mod share;

pub use election::{Candidate, Election, ElectionStatus, Voter};
pub use error::ErrorKind;
pub use fingerprint_buffer::FingerprintBuffer;
pub use ids::{CandidateId, ElectionId, VoterId};
pub use registry::{ElectionRegistry, InMemoryRegistry, VoterRegistry};
