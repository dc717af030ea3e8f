//! Coordinator-local persistence: `vote_records` (uniqueness witness) and
//! `audit` (retained shares for post-hoc diagnosis). Same rocksdb idiom as
//! the share node's store, grounded in `bleep-state::sharding`.

use crate::error::CastError;
use crate::types::{vote_record_key, AuditEntry, VoteRecord};
use rocksdb::{ColumnFamilyDescriptor, Options, DB};
use std::path::Path;
use voteshare_core::{ElectionId, VoterId};

const CF_VOTE_RECORDS: &str = "vote_records";
const CF_AUDIT: &str = "audit";

pub struct CoordinatorStore {
    db: DB,
}

impl CoordinatorStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CastError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs = vec![
            ColumnFamilyDescriptor::new(CF_VOTE_RECORDS, Options::default()),
            ColumnFamilyDescriptor::new(CF_AUDIT, Options::default()),
        ];
        let db = DB::open_cf_descriptors(&opts, path, cfs)?;
        Ok(Self { db })
    }

    fn cf_vote_records(&self) -> &rocksdb::ColumnFamily {
        self.db.cf_handle(CF_VOTE_RECORDS).expect("column family opened at startup")
    }

    fn cf_audit(&self) -> &rocksdb::ColumnFamily {
        self.db.cf_handle(CF_AUDIT).expect("column family opened at startup")
    }

    pub fn has_voted(&self, election_id: ElectionId, voter_id: VoterId) -> Result<bool, CastError> {
        let key = vote_record_key(election_id, voter_id);
        Ok(self.db.get_cf(self.cf_vote_records(), key.as_bytes())?.is_some())
    }

    /// Inserts the `VoteRecord` and the `AuditEntry` atomically (spec §4.3
    /// step 6). Returns `CastError::AlreadyVoted` if a record already
    /// exists for this `(election, voter)` — the losing side of the race
    /// described in spec §9, detected here rather than left silent.
    pub fn finalize(&self, record: VoteRecord, entry: AuditEntry) -> Result<(), CastError> {
        let record_key = vote_record_key(record.election_id, record.voter_id);
        if self.db.get_cf(self.cf_vote_records(), record_key.as_bytes())?.is_some() {
            return Err(CastError::AlreadyVoted);
        }

        let record_bytes = serde_json::to_vec(&record).map_err(|e| CastError::Internal(e.to_string()))?;
        let entry_bytes = serde_json::to_vec(&entry).map_err(|e| CastError::Internal(e.to_string()))?;

        let mut batch = rocksdb::WriteBatch::default();
        batch.put_cf(self.cf_vote_records(), record_key.as_bytes(), record_bytes);
        batch.put_cf(self.cf_audit(), entry.tx_root.as_bytes(), entry_bytes);
        self.db.write(batch)?;
        Ok(())
    }

    pub fn record_audit_only(&self, entry: AuditEntry) -> Result<(), CastError> {
        let bytes = serde_json::to_vec(&entry).map_err(|e| CastError::Internal(e.to_string()))?;
        self.db.put_cf(self.cf_audit(), entry.tx_root.as_bytes(), bytes)?;
        Ok(())
    }

    pub fn audit_entries_for(
        &self,
        election_id: ElectionId,
    ) -> Result<Vec<AuditEntry>, CastError> {
        let mut entries = Vec::new();
        let iter = self.db.iterator_cf(self.cf_audit(), rocksdb::IteratorMode::Start);
        for item in iter {
            let (_key, value) = item?;
            let entry: AuditEntry = serde_json::from_slice(&value).map_err(|e| CastError::Internal(e.to_string()))?;
            if entry.election_id == election_id {
                entries.push(entry);
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voteshare_core::CandidateId;

    fn store() -> (CoordinatorStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        (CoordinatorStore::open(dir.path()).unwrap(), dir)
    }

    fn entry(tx_root: &str) -> AuditEntry {
        AuditEntry {
            tx_root: tx_root.to_string(),
            election_id: ElectionId(7),
            candidate_id: CandidateId(3),
            voter_id: VoterId(11),
            delta_a: 5,
            delta_b: voteshare_core::share::sub_mod(1, 5),
            outcome: crate::types::AuditOutcome::Success,
        }
    }

    #[test]
    fn first_finalize_succeeds_second_is_already_voted() {
        let (store, _dir) = store();
        let record = VoteRecord { election_id: ElectionId(7), voter_id: VoterId(11) };
        store.finalize(record.clone(), entry("tx1")).unwrap();
        assert!(store.has_voted(ElectionId(7), VoterId(11)).unwrap());
        let err = store.finalize(record, entry("tx2")).unwrap_err();
        assert!(matches!(err, CastError::AlreadyVoted));
    }

    #[test]
    fn audit_entries_filter_by_election() {
        let (store, _dir) = store();
        store.record_audit_only(entry("tx1")).unwrap();
        let entries = store.audit_entries_for(ElectionId(7)).unwrap();
        assert_eq!(entries.len(), 1);
        let none = store.audit_entries_for(ElectionId(99)).unwrap();
        assert!(none.is_empty());
    }
}
