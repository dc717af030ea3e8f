//! Contracts for the external collaborators named in spec §1: voter
//! registry CRUD, election/candidate CRUD, and admin auth are explicitly
//! out of scope. The core only needs the narrow read contract spelled out
//! there, expressed as traits so a real implementation (backed by
//! whatever relational store the registry CRUD service owns) can be
//! dropped in without touching `cast`/`tally`.

use crate::election::{Candidate, Election};
use crate::ids::{CandidateId, ElectionId, VoterId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

#[async_trait]
pub trait VoterRegistry: Send + Sync {
    /// Resolve an opaque fingerprint to a stable voter id, or `None` if
    /// the fingerprint is unknown (spec §1(a)).
    async fn resolve(&self, fingerprint: &str) -> Option<VoterId>;
}

#[async_trait]
pub trait ElectionRegistry: Send + Sync {
    async fn get_election(&self, election_id: ElectionId) -> Option<Election>;
    async fn get_candidate(&self, election_id: ElectionId, candidate_id: CandidateId) -> Option<Candidate>;
}

/// In-memory stand-in for the out-of-scope registry service. Good enough
/// for tests and for a standalone deployment; a production deployment
/// swaps this for an adapter over the real registry's read API.
#[derive(Default)]
pub struct InMemoryRegistry {
    voters: RwLock<HashMap<String, VoterId>>,
    elections: RwLock<HashMap<ElectionId, Election>>,
    candidates: RwLock<HashMap<(ElectionId, CandidateId), Candidate>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_voter(&self, fingerprint: impl Into<String>, voter_id: VoterId) {
        self.voters.write().unwrap().insert(fingerprint.into(), voter_id);
    }

    pub fn add_election(&self, election: Election) {
        self.elections.write().unwrap().insert(election.id, election);
    }

    pub fn add_candidate(&self, candidate: Candidate) {
        self.candidates
            .write()
            .unwrap()
            .insert((candidate.election_id, candidate.id), candidate);
    }
}

#[async_trait]
impl VoterRegistry for InMemoryRegistry {
    async fn resolve(&self, fingerprint: &str) -> Option<VoterId> {
        self.voters.read().unwrap().get(fingerprint).copied()
    }
}

#[async_trait]
impl ElectionRegistry for InMemoryRegistry {
    async fn get_election(&self, election_id: ElectionId) -> Option<Election> {
        self.elections.read().unwrap().get(&election_id).cloned()
    }

    async fn get_candidate(&self, election_id: ElectionId, candidate_id: CandidateId) -> Option<Candidate> {
        self.candidates
            .read()
            .unwrap()
            .get(&(election_id, candidate_id))
            .cloned()
    }
}
