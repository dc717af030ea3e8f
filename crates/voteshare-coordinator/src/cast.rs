//! Ballot-cast 2PC driver (spec §4.3). Grounded in
//! `bleep-state::cross_shard_2pc::TwoPhaseCommitCoordinator`'s
//! prepare-both/commit-both/abort-on-failure shape, generalized from N
//! shards to exactly two share nodes and from its own transaction ledger
//! to this crate's `VoteRecord`/`AuditEntry` pair.

use crate::client::ShareNodeClient;
use crate::error::CastError;
use crate::locks::VoterLocks;
use crate::store::CoordinatorStore;
use crate::types::{AuditEntry, AuditOutcome, VoteRecord};
use rand::rngs::OsRng;
use std::sync::Arc;
use tracing::{error, info, warn};
use voteshare_core::share::split_one;
use voteshare_core::{CandidateId, ElectionId, ElectionRegistry, VoterRegistry};

pub struct CastOutcome {
    pub tx_root: String,
}

pub struct Coordinator {
    pub election_registry: Arc<dyn ElectionRegistry>,
    pub voter_registry: Arc<dyn VoterRegistry>,
    pub node_a: Box<dyn ShareNodeClient>,
    pub node_b: Box<dyn ShareNodeClient>,
    pub store: CoordinatorStore,
    pub locks: VoterLocks,
}

impl Coordinator {
    pub async fn cast(
        &self,
        fingerprint: &str,
        election_id: ElectionId,
        candidate_id: CandidateId,
    ) -> Result<CastOutcome, CastError> {
        // Preconditions (spec §4.3 step 1), no external effects yet.
        let election = self.election_registry.get_election(election_id).await.ok_or(CastError::UnknownElection)?;
        if !election.is_open_now(chrono::Utc::now()) {
            return Err(CastError::ElectionNotOpen);
        }

        let candidate = self
            .election_registry
            .get_candidate(election_id, candidate_id)
            .await
            .ok_or(CastError::UnknownCandidate)?;
        if !candidate.active {
            return Err(CastError::UnknownCandidate);
        }

        let voter_id = self.voter_registry.resolve(fingerprint).await.ok_or(CastError::UnknownVoter)?;

        // Hold the per-voter lock from before the pre-check through local
        // finalization, closing the race spec §9 flags as open.
        let _guard = self.locks.acquire(election_id, voter_id).await;

        if self.store.has_voted(election_id, voter_id)? {
            return Err(CastError::AlreadyVoted);
        }

        // Share generation (spec §4.3 step 2).
        let mut rng = OsRng;
        let (delta_a, delta_b) = split_one(&mut rng);

        // TxId minting (spec §4.3 step 3).
        let tx_root = hex::encode(rand::random::<[u8; 16]>());
        let tx_a = format!("{tx_root}-A");
        let tx_b = format!("{tx_root}-B");

        // Phase 1 — prepare (spec §4.3 step 4).
        let prepare_a = self.node_a.prepare(&tx_a, election_id, candidate_id, delta_a).await;
        let prepare_b_ok =
            prepare_a.is_ok() && self.node_b.prepare(&tx_b, election_id, candidate_id, delta_b).await.is_ok();

        if prepare_a.is_err() || !prepare_b_ok {
            warn!(tx_root, "prepare failed on at least one node, issuing best-effort abort");
            self.best_effort_abort(&tx_a, &tx_b).await;
            return Err(CastError::Gateway("prepare failed".into()));
        }

        // Phase 2 — commit (spec §4.3 step 5).
        let commit_a = self.node_a.commit(&tx_a).await;
        if commit_a.is_err() {
            warn!(tx_root, "commit failed on node A, issuing best-effort abort");
            self.best_effort_abort(&tx_a, &tx_b).await;
            return Err(CastError::Gateway("commit failed".into()));
        }

        let commit_b = self.node_b.commit(&tx_b).await;
        if commit_b.is_err() {
            // A has committed, B has not: the asymmetric failure spec
            // §4.3 step 5 calls out explicitly. No automated recovery;
            // the audit entry below retains both shares for a manual
            // replay of commit(tx_b) against node B.
            error!(tx_root, "commit succeeded on A but failed on B, recording inconsistent state to audit");
            let _ = self.store.record_audit_only(AuditEntry {
                tx_root: tx_root.clone(),
                election_id,
                candidate_id,
                voter_id,
                delta_a,
                delta_b,
                outcome: AuditOutcome::Aborted,
            });
            self.best_effort_abort(&tx_a, &tx_b).await;
            return Err(CastError::Gateway("commit failed on node B after node A committed".into()));
        }

        // Local finalization (spec §4.3 step 6).
        let record = VoteRecord { election_id, voter_id };
        let entry = AuditEntry {
            tx_root: tx_root.clone(),
            election_id,
            candidate_id,
            voter_id,
            delta_a,
            delta_b,
            outcome: AuditOutcome::Success,
        };

        match self.store.finalize(record, entry) {
            Ok(()) => {
                info!(tx_root, %election_id, %candidate_id, "cast committed");
                Ok(CastOutcome { tx_root })
            }
            Err(CastError::AlreadyVoted) => {
                // A concurrent cast won the race despite the pre-check and
                // the per-voter lock (shouldn't happen while the lock is
                // held for the whole operation, but the store check is
                // kept as the authoritative guard regardless).
                warn!(tx_root, "local finalization lost the uniqueness race after committing shares");
                self.best_effort_abort(&tx_a, &tx_b).await;
                Err(CastError::AlreadyVoted)
            }
            Err(e) => Err(e),
        }
    }

    async fn best_effort_abort(&self, tx_a: &str, tx_b: &str) {
        if let Err(e) = self.node_a.abort(tx_a).await {
            warn!(error = %e, tx_a, "best-effort abort against node A failed, ignoring");
        }
        if let Err(e) = self.node_b.abort(tx_b).await {
            warn!(error = %e, tx_b, "best-effort abort against node B failed, ignoring");
        }
    }
}
