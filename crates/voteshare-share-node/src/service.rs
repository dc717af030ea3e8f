//! Share-node domain operations: the thin layer between the wire types in
//! `http.rs` and the persistent state machine in `store.rs`. Grounded in
//! `bleep-state::cross_shard_2pc`'s `TwoPhaseCommitCoordinator` method
//! shapes (`prepare`/`commit`/`abort` each taking a tx id and returning a
//! `Result`).

use crate::error::ShareError;
use crate::store::ShareStore;
use crate::types::{ShareTotalRow, ShareTransaction, SnapshotResponse, TxStatus};
use tracing::{info, warn};
use voteshare_core::share::P;
use voteshare_core::{CandidateId, ElectionId};

pub struct ShareNodeService {
    node_id: String,
    store: ShareStore,
}

impl ShareNodeService {
    pub fn new(node_id: String, store: ShareStore) -> Self {
        Self { node_id, store }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn prepare(
        &self,
        tx_id: String,
        election_id: ElectionId,
        candidate_id: CandidateId,
        delta: u64,
    ) -> Result<(), ShareError> {
        let delta = delta % P;
        let tx = ShareTransaction { tx_id: tx_id.clone(), election_id, candidate_id, delta, status: TxStatus::Prepared };
        self.store.prepare(tx)?;
        info!(tx_id = %tx_id, %election_id, %candidate_id, "prepare accepted");
        Ok(())
    }

    pub fn commit(&self, tx_id: &str) -> Result<(), ShareError> {
        self.store.commit(tx_id)?;
        info!(tx_id, "commit accepted");
        Ok(())
    }

    pub fn abort(&self, tx_id: &str) -> Result<(), ShareError> {
        self.store.abort(tx_id)?;
        warn!(tx_id, "abort accepted");
        Ok(())
    }

    pub fn snapshot(&self) -> Result<SnapshotResponse, ShareError> {
        let shares: Vec<ShareTotalRow> = self.store.all_totals()?;
        Ok(SnapshotResponse { node_id: self.node_id.clone(), modulus: P, shares })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> (ShareNodeService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = ShareStore::open(dir.path()).unwrap();
        (ShareNodeService::new("A".into(), store), dir)
    }

    #[test]
    fn prepare_then_commit_updates_snapshot() {
        let (svc, _dir) = service();
        svc.prepare("tx-A".into(), ElectionId(7), CandidateId(3), 42).unwrap();
        svc.commit("tx-A").unwrap();

        let snap = svc.snapshot().unwrap();
        assert_eq!(snap.node_id, "A");
        assert_eq!(snap.modulus, P);
        assert_eq!(snap.shares.len(), 1);
        assert_eq!(snap.shares[0].share, 42);
    }

    #[test]
    fn delta_is_reduced_mod_p_on_prepare() {
        let (svc, _dir) = service();
        svc.prepare("tx-A".into(), ElectionId(1), CandidateId(1), P + 5).unwrap();
        svc.commit("tx-A").unwrap();
        assert_eq!(svc.snapshot().unwrap().shares[0].share, 5);
    }

    #[test]
    fn abort_after_prepare_leaves_no_total() {
        let (svc, _dir) = service();
        svc.prepare("tx-A".into(), ElectionId(1), CandidateId(1), 9).unwrap();
        svc.abort("tx-A").unwrap();
        assert!(svc.snapshot().unwrap().shares.is_empty());
    }
}
