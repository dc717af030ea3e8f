use serde::{Deserialize, Serialize};
use voteshare_core::{CandidateId, ElectionId};

/// Closed enumeration for `ShareTransaction.status` (spec §3, §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Prepared,
    Committed,
    Aborted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareTransaction {
    pub tx_id: String,
    pub election_id: ElectionId,
    pub candidate_id: CandidateId,
    pub delta: u64,
    pub status: TxStatus,
}

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

pub fn total_key(election_id: ElectionId, candidate_id: CandidateId) -> String {
    format!("{}:{}", election_id.0, candidate_id.0)
}
