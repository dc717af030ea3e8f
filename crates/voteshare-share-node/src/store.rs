//! Embedded KV persistence for `ShareTransaction` and `ShareTotal`,
//! grounded in `bleep-state::sharding`'s `rocksdb::DB` usage (JSON-encoded
//! rows, string keys, `db.put`/`db.get`). One column family per table
//! named in spec §6.

use crate::error::ShareError;
use crate::types::{total_key, ShareTotalRow, ShareTransaction, TxStatus};
use parking_lot::Mutex;
use rocksdb::{ColumnFamilyDescriptor, Options, DB};
use std::path::Path;
use voteshare_core::share::add_mod;
use voteshare_core::{CandidateId, ElectionId};

const CF_TRANSACTIONS: &str = "share_transactions";
const CF_TOTALS: &str = "share_totals";

pub struct ShareStore {
    db: DB,
    /// Serializes the read-modify-write of a commit so two concurrent
    /// commits against the same `(election, candidate)` can't lose an
    /// update (spec §5: "implementations may use [locking] to tighten the
    /// share-total update on commit").
    commit_lock: Mutex<()>,
}

impl ShareStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ShareError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs = vec![
            ColumnFamilyDescriptor::new(CF_TRANSACTIONS, Options::default()),
            ColumnFamilyDescriptor::new(CF_TOTALS, Options::default()),
        ];
        let db = DB::open_cf_descriptors(&opts, path, cfs)?;
        Ok(Self { db, commit_lock: Mutex::new(()) })
    }

    fn cf_transactions(&self) -> &rocksdb::ColumnFamily {
        self.db.cf_handle(CF_TRANSACTIONS).expect("column family opened at startup")
    }

    fn cf_totals(&self) -> &rocksdb::ColumnFamily {
        self.db.cf_handle(CF_TOTALS).expect("column family opened at startup")
    }

    pub fn get_transaction(&self, tx_id: &str) -> Result<Option<ShareTransaction>, ShareError> {
        match self.db.get_cf(self.cf_transactions(), tx_id.as_bytes())? {
            Some(bytes) => {
                let tx: ShareTransaction =
                    serde_json::from_slice(&bytes).map_err(|e| ShareError::Storage(e.to_string()))?;
                Ok(Some(tx))
            }
            None => Ok(None),
        }
    }

    fn put_transaction(&self, tx: &ShareTransaction) -> Result<(), ShareError> {
        let bytes = serde_json::to_vec(tx).map_err(|e| ShareError::Storage(e.to_string()))?;
        self.db.put_cf(self.cf_transactions(), tx.tx_id.as_bytes(), bytes)?;
        Ok(())
    }

    pub fn get_total(&self, election_id: ElectionId, candidate_id: CandidateId) -> Result<u64, ShareError> {
        let key = total_key(election_id, candidate_id);
        match self.db.get_cf(self.cf_totals(), key.as_bytes())? {
            Some(bytes) => {
                let row: ShareTotalRow =
                    serde_json::from_slice(&bytes).map_err(|e| ShareError::Storage(e.to_string()))?;
                Ok(row.share)
            }
            None => Ok(0),
        }
    }

    pub fn all_totals(&self) -> Result<Vec<ShareTotalRow>, ShareError> {
        let mut rows = Vec::new();
        let iter = self.db.iterator_cf(self.cf_totals(), rocksdb::IteratorMode::Start);
        for item in iter {
            let (_key, value) = item?;
            let row: ShareTotalRow =
                serde_json::from_slice(&value).map_err(|e| ShareError::Storage(e.to_string()))?;
            rows.push(row);
        }
        Ok(rows)
    }

    /// `prepare`: idempotent insert, per spec §4.2.
    pub fn prepare(&self, tx: ShareTransaction) -> Result<(), ShareError> {
        if let Some(existing) = self.get_transaction(&tx.tx_id)? {
            return match existing.status {
                TxStatus::Prepared | TxStatus::Committed => Ok(()),
                TxStatus::Aborted => Err(ShareError::Conflict),
            };
        }
        self.put_transaction(&tx)
    }

    /// `commit`: idempotent state transition plus the atomic total update,
    /// per spec §4.2. The transaction row and the total row are written
    /// together in one `WriteBatch` so a crash between them is impossible.
    pub fn commit(&self, tx_id: &str) -> Result<(), ShareError> {
        let _guard = self.commit_lock.lock();

        let tx = self.get_transaction(tx_id)?.ok_or(ShareError::UnknownTx)?;
        match tx.status {
            TxStatus::Committed => return Ok(()),
            TxStatus::Aborted => return Err(ShareError::Conflict),
            TxStatus::Prepared => {}
        }

        let current_total = self.get_total(tx.election_id, tx.candidate_id)?;
        let new_total = add_mod(current_total, tx.delta);
        let total_row = ShareTotalRow { election_id: tx.election_id, candidate_id: tx.candidate_id, share: new_total };
        let committed_tx = ShareTransaction { status: TxStatus::Committed, ..tx.clone() };

        let total_bytes = serde_json::to_vec(&total_row).map_err(|e| ShareError::Storage(e.to_string()))?;
        let tx_bytes = serde_json::to_vec(&committed_tx).map_err(|e| ShareError::Storage(e.to_string()))?;

        let mut batch = rocksdb::WriteBatch::default();
        batch.put_cf(self.cf_totals(), total_key(tx.election_id, tx.candidate_id).as_bytes(), total_bytes);
        batch.put_cf(self.cf_transactions(), tx_id.as_bytes(), tx_bytes);
        self.db.write(batch)?;

        Ok(())
    }

    /// `abort`: only `prepared -> aborted`; a no-op everywhere else,
    /// including on an already-`committed` row (spec §4.2, §9).
    pub fn abort(&self, tx_id: &str) -> Result<(), ShareError> {
        let tx = match self.get_transaction(tx_id)? {
            Some(tx) => tx,
            None => return Ok(()),
        };
        match tx.status {
            TxStatus::Prepared => {
                let aborted = ShareTransaction { status: TxStatus::Aborted, ..tx };
                self.put_transaction(&aborted)
            }
            TxStatus::Committed | TxStatus::Aborted => Ok(()),
        }
    }
}
