//! The fingerprint capture buffer, modeled per spec §9 as a dedicated
//! component rather than a free global variable: a single mutex-guarded
//! slot with last-write-wins semantics and a monotonic `updated_at`.
//!
//! Grounded in `examples/original_source/e-vote-backend/fingerprint.py`,
//! which holds exactly this (an un-locked global dict written by a
//! scanning device and read by the frontend). This component is not part
//! of ballot casting — `cast` takes the fingerprint directly in its
//! request body (spec §6) — it stands in for the out-of-scope capture
//! device's own narrow contract.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FingerprintSlot {
    pub fingerprint: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct FingerprintBuffer {
    slot: RwLock<Option<FingerprintSlot>>,
}

impl FingerprintBuffer {
    pub fn new() -> Self {
        Self { slot: RwLock::new(None) }
    }

    pub fn set(&self, fingerprint: impl Into<String>) {
        let mut guard = self.slot.write();
        *guard = Some(FingerprintSlot {
            fingerprint: fingerprint.into(),
            updated_at: Utc::now(),
        });
        debug!("fingerprint buffer slot overwritten");
    }

    pub fn get(&self) -> Option<FingerprintSlot> {
        self.slot.read().clone()
    }

    pub fn clear(&self) {
        *self.slot.write() = None;
        debug!("fingerprint buffer slot cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let buf = FingerprintBuffer::new();
        assert!(buf.get().is_none());
    }

    #[test]
    fn last_write_wins() {
        let buf = FingerprintBuffer::new();
        buf.set("fp-1");
        buf.set("fp-2");
        assert_eq!(buf.get().unwrap().fingerprint, "fp-2");
    }

    #[test]
    fn clear_empties_the_slot() {
        let buf = FingerprintBuffer::new();
        buf.set("fp-1");
        buf.clear();
        assert!(buf.get().is_none());
    }
}
