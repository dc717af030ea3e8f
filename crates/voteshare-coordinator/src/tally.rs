//! Tally reconstruction (spec §4.4): fetch both nodes' snapshots, verify
//! they agree on the modulus, and sum shares per candidate modulo `p`.

use crate::client::{ShareNodeClient, SnapshotResponse};
use crate::error::TallyError;
use crate::types::{CandidateTally, NodePair, TallyResponse};
use std::collections::BTreeMap;
use voteshare_core::share::{add_mod, P};
use voteshare_core::{ElectionId, ElectionRegistry};

pub async fn tally(
    election_registry: &dyn ElectionRegistry,
    node_a: &dyn ShareNodeClient,
    node_b: &dyn ShareNodeClient,
    election_id: ElectionId,
) -> Result<TallyResponse, TallyError> {
    election_registry.get_election(election_id).await.ok_or(TallyError::UnknownElection)?;

    let snapshot_a =
        node_a.snapshot().await.map_err(|e| TallyError::Gateway(format!("node A: {e}")))?;
    let snapshot_b =
        node_b.snapshot().await.map_err(|e| TallyError::Gateway(format!("node B: {e}")))?;

    if snapshot_a.modulus != P || snapshot_b.modulus != P || snapshot_a.modulus != snapshot_b.modulus {
        return Err(TallyError::ModulusMismatch);
    }

    let map_a = filter_by_election(&snapshot_a, election_id);
    let map_b = filter_by_election(&snapshot_b, election_id);

    let mut candidate_ids: Vec<i64> = map_a.keys().chain(map_b.keys()).copied().collect();
    candidate_ids.sort_unstable();
    candidate_ids.dedup();

    let tally = candidate_ids
        .into_iter()
        .map(|candidate_id| {
            let share_a = map_a.get(&candidate_id).copied().unwrap_or(0);
            let share_b = map_b.get(&candidate_id).copied().unwrap_or(0);
            CandidateTally { party_id: candidate_id, total_votes: add_mod(share_a, share_b) }
        })
        .collect();

    Ok(TallyResponse {
        vote_id: election_id.0,
        tally,
        modulus: P,
        nodes: NodePair { a: snapshot_a.node_id, b: snapshot_b.node_id },
    })
}

fn filter_by_election(snapshot: &SnapshotResponse, election_id: ElectionId) -> BTreeMap<i64, u64> {
    snapshot
        .shares
        .iter()
        .filter(|row| row.election_id == election_id)
        .map(|row| (row.candidate_id.0, row.share))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::{Behavior, MockShareNode};
    use voteshare_core::{CandidateId, Election, ElectionStatus, InMemoryRegistry};

    async fn registry_with_election(election_id: ElectionId) -> InMemoryRegistry {
        let registry = InMemoryRegistry::default();
        registry.add_election(Election { id: election_id, status: ElectionStatus::Open, start: None, end: None });
        registry
    }

    #[tokio::test]
    async fn tally_sums_shares_across_both_nodes() {
        let registry = registry_with_election(ElectionId(7)).await;
        let node_a = MockShareNode::new("A", Behavior::Ok);
        let node_b = MockShareNode::new("B", Behavior::Ok);

        node_a.prepare("t1", ElectionId(7), CandidateId(3), 5).await.unwrap();
        node_a.commit("t1").await.unwrap();
        node_b.prepare("t2", ElectionId(7), CandidateId(3), 7).await.unwrap();
        node_b.commit("t2").await.unwrap();

        let result = tally(&registry, &node_a, &node_b, ElectionId(7)).await.unwrap();
        assert_eq!(result.tally.len(), 1);
        assert_eq!(result.tally[0].party_id, 3);
        assert_eq!(result.tally[0].total_votes, 12);
        assert_eq!(result.modulus, P);
    }

    #[tokio::test]
    async fn tally_with_no_commits_is_empty() {
        let registry = registry_with_election(ElectionId(7)).await;
        let node_a = MockShareNode::new("A", Behavior::Ok);
        let node_b = MockShareNode::new("B", Behavior::Ok);

        let result = tally(&registry, &node_a, &node_b, ElectionId(7)).await.unwrap();
        assert!(result.tally.is_empty());
    }

    #[tokio::test]
    async fn unknown_election_is_rejected() {
        let registry = registry_with_election(ElectionId(7)).await;
        let node_a = MockShareNode::new("A", Behavior::Ok);
        let node_b = MockShareNode::new("B", Behavior::Ok);

        let err = tally(&registry, &node_a, &node_b, ElectionId(404)).await.unwrap_err();
        assert!(matches!(err, TallyError::UnknownElection));
    }
}
