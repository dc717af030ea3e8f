use serde::{Deserialize, Serialize};
use voteshare_core::{CandidateId, ElectionId, VoterId};

/// At-most-once witness for a cast ballot (spec §3). Unique on
/// `(election_id, voter_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRecord {
    pub election_id: ElectionId,
    pub voter_id: VoterId,
}

pub fn vote_record_key(election_id: ElectionId, voter_id: VoterId) -> String {
    format!("{}:{}", election_id.0, voter_id.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    Success,
    Aborted,
}

/// Retains both raw shares (spec §3) so an operator can diagnose or
/// manually replay a commit that hung on one node (spec §9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub tx_root: String,
    pub election_id: ElectionId,
    pub candidate_id: CandidateId,
    pub voter_id: VoterId,
    pub delta_a: u64,
    pub delta_b: u64,
    pub outcome: AuditOutcome,
}

/// One node's view of a candidate's accumulated share, as returned by
/// `GET /internal/share/snapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareTotalRow {
    pub election_id: ElectionId,
    pub candidate_id: CandidateId,
    pub share: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub node_id: String,
    pub modulus: u64,
    pub shares: Vec<ShareTotalRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateTally {
    pub party_id: i64,
    pub total_votes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TallyResponse {
    pub vote_id: i64,
    pub tally: Vec<CandidateTally>,
    pub modulus: u64,
    pub nodes: NodePair,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodePair {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
}
