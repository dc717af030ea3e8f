//! The coordinator's view of a share node: a narrow async trait plus an
//! HTTP implementation over `voteshare_transport::SignedClient`. Grounded
//! in `bleep-state::cross_shard_2pc`'s `CoordinatorManager`, which talks to
//! remote shards through a trait object rather than a concrete client type.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use voteshare_core::{CandidateId, ElectionId};
use voteshare_transport::{SignedClient, TransportError};

#[derive(Debug, Serialize)]
struct PrepareRequest {
    tx_id: String,
    vote_id: i64,
    party_id: i64,
    delta: u64,
}

#[derive(Debug, Serialize)]
struct TxIdRequest {
    tx_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShareTotalRow {
    pub election_id: ElectionId,
    pub candidate_id: CandidateId,
    pub share: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotResponse {
    pub node_id: String,
    pub modulus: u64,
    pub shares: Vec<ShareTotalRow>,
}

#[derive(Debug, Deserialize)]
struct Ack {
    #[allow(dead_code)]
    status: String,
}

#[async_trait]
pub trait ShareNodeClient: Send + Sync {
    async fn prepare(
        &self,
        tx_id: &str,
        election_id: ElectionId,
        candidate_id: CandidateId,
        delta: u64,
    ) -> Result<(), TransportError>;

    async fn commit(&self, tx_id: &str) -> Result<(), TransportError>;

    async fn abort(&self, tx_id: &str) -> Result<(), TransportError>;

    async fn snapshot(&self) -> Result<SnapshotResponse, TransportError>;
}

pub struct HttpShareNodeClient {
    base_url: String,
    client: SignedClient,
}

impl HttpShareNodeClient {
    pub fn new(base_url: String, key: Vec<u8>, timeout: Duration) -> Self {
        Self { base_url, client: SignedClient::new(key, timeout) }
    }
}

#[async_trait]
impl ShareNodeClient for HttpShareNodeClient {
    async fn prepare(
        &self,
        tx_id: &str,
        election_id: ElectionId,
        candidate_id: CandidateId,
        delta: u64,
    ) -> Result<(), TransportError> {
        let url = format!("{}/internal/share/prepare", self.base_url);
        let body = PrepareRequest {
            tx_id: tx_id.to_string(),
            vote_id: election_id.0,
            party_id: candidate_id.0,
            delta,
        };
        let _: Ack = self.client.post_json(&url, &body).await?;
        Ok(())
    }

    async fn commit(&self, tx_id: &str) -> Result<(), TransportError> {
        let url = format!("{}/internal/share/commit", self.base_url);
        let _: Ack = self.client.post_json(&url, &TxIdRequest { tx_id: tx_id.to_string() }).await?;
        Ok(())
    }

    async fn abort(&self, tx_id: &str) -> Result<(), TransportError> {
        let url = format!("{}/internal/share/abort", self.base_url);
        let _: Ack = self.client.post_json(&url, &TxIdRequest { tx_id: tx_id.to_string() }).await?;
        Ok(())
    }

    async fn snapshot(&self) -> Result<SnapshotResponse, TransportError> {
        let url = format!("{}/internal/share/snapshot", self.base_url);
        self.client.get_json(&url).await
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub enum Behavior {
        Ok,
        FailPrepare,
        FailCommit,
    }

    /// In-memory stand-in for a share node used by coordinator unit tests,
    /// grounded in the same idea as `bleep-state::cross_shard_2pc`'s test
    /// module, which exercises the coordinator against fake shard handles
    /// rather than real network peers.
    pub struct MockShareNode {
        pub node_id: String,
        pub behavior: Behavior,
        totals: Mutex<HashMap<(i64, i64), u64>>,
        prepared: Mutex<HashMap<String, (ElectionId, CandidateId, u64)>>,
        abort_calls: Mutex<u32>,
    }

    impl MockShareNode {
        pub fn new(node_id: &str, behavior: Behavior) -> Self {
            Self {
                node_id: node_id.to_string(),
                behavior,
                totals: Mutex::new(HashMap::new()),
                prepared: Mutex::new(HashMap::new()),
                abort_calls: Mutex::new(0),
            }
        }

        pub fn abort_calls(&self) -> u32 {
            *self.abort_calls.lock()
        }
    }

    #[async_trait]
    impl ShareNodeClient for MockShareNode {
        async fn prepare(
            &self,
            tx_id: &str,
            election_id: ElectionId,
            candidate_id: CandidateId,
            delta: u64,
        ) -> Result<(), TransportError> {
            if self.behavior == Behavior::FailPrepare {
                return Err(TransportError::UpstreamStatus(500));
            }
            self.prepared.lock().insert(tx_id.to_string(), (election_id, candidate_id, delta));
            Ok(())
        }

        async fn commit(&self, tx_id: &str) -> Result<(), TransportError> {
            if self.behavior == Behavior::FailCommit {
                return Err(TransportError::UpstreamStatus(500));
            }
            if let Some((election_id, candidate_id, delta)) = self.prepared.lock().get(tx_id).copied() {
                let mut totals = self.totals.lock();
                let entry = totals.entry((election_id.0, candidate_id.0)).or_insert(0);
                *entry = voteshare_core::share::add_mod(*entry, delta);
            }
            Ok(())
        }

        async fn abort(&self, tx_id: &str) -> Result<(), TransportError> {
            *self.abort_calls.lock() += 1;
            self.prepared.lock().remove(tx_id);
            Ok(())
        }

        async fn snapshot(&self) -> Result<SnapshotResponse, TransportError> {
            let shares = self
                .totals
                .lock()
                .iter()
                .map(|(&(e, c), &share)| ShareTotalRow { election_id: ElectionId(e), candidate_id: CandidateId(c), share })
                .collect();
            Ok(SnapshotResponse { node_id: self.node_id.clone(), modulus: voteshare_core::share::P, shares })
        }
    }

    /// Lets a test keep an `Arc<MockShareNode>` handle for assertions
    /// (e.g. `abort_calls()`) while also handing a trait-object view of
    /// the same node to the `Coordinator`.
    #[async_trait]
    impl ShareNodeClient for std::sync::Arc<MockShareNode> {
        async fn prepare(
            &self,
            tx_id: &str,
            election_id: ElectionId,
            candidate_id: CandidateId,
            delta: u64,
        ) -> Result<(), TransportError> {
            (**self).prepare(tx_id, election_id, candidate_id, delta).await
        }

        async fn commit(&self, tx_id: &str) -> Result<(), TransportError> {
            (**self).commit(tx_id).await
        }

        async fn abort(&self, tx_id: &str) -> Result<(), TransportError> {
            (**self).abort(tx_id).await
        }

        async fn snapshot(&self) -> Result<SnapshotResponse, TransportError> {
            (**self).snapshot().await
        }
    }
}
