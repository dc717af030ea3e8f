//! Per-`(election, voter)` advisory locking, closing the pre-check/
//! `VoteRecord` race described in spec §9: two concurrent casts for the
//! same voter must not both pass the eligibility pre-check and reach 2PC.
//! This is the implemented side of SPEC_FULL.md's open-question decision
//! (mitigation (a): lock before phase 1, hold through local finalization).

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use voteshare_core::{ElectionId, VoterId};

#[derive(Default)]
pub struct VoterLocks {
    locks: Mutex<HashMap<(i64, i64), Arc<AsyncMutex<()>>>>,
}

impl VoterLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a guard that must be held from before the eligibility
    /// pre-check through local finalization (spec §9, mitigation a).
    pub async fn acquire(&self, election_id: ElectionId, voter_id: VoterId) -> tokio::sync::OwnedMutexGuard<()> {
        let entry = {
            let mut locks = self.locks.lock();
            locks.entry((election_id.0, voter_id.0)).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
        };
        entry.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn concurrent_acquires_for_same_voter_are_serialized() {
        let locks = VoterLocks::new();
        let g1 = locks.acquire(ElectionId(1), VoterId(1)).await;
        let locks2 = Arc::new(locks);
        let locks3 = locks2.clone();
        let handle = tokio::spawn(async move {
            let _g2 = locks3.acquire(ElectionId(1), VoterId(1)).await;
        });
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!handle.is_finished());
        drop(g1);
        handle.await.unwrap();
    }
}
