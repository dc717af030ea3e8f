use crate::ids::{CandidateId, ElectionId, VoterId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed enumeration for election lifecycle, per spec §9 ("tagged state
/// instead of string-valued status columns"): unknown values are rejected
/// at the serde boundary rather than silently stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElectionStatus {
    Draft,
    Open,
    Closed,
    Archived,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Election {
    pub id: ElectionId,
    pub status: ElectionStatus,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl Election {
    /// Election is open-ended on a bound that isn't set.
    pub fn is_open_now(&self, now: DateTime<Utc>) -> bool {
        if self.status != ElectionStatus::Open {
            return false;
        }
        if let Some(start) = self.start {
            if now < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if now > end {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub election_id: ElectionId,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voter {
    pub id: VoterId,
    pub fingerprint: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn election(status: ElectionStatus, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Election {
        Election { id: ElectionId(1), status, start, end }
    }

    #[test]
    fn closed_election_is_never_open() {
        let e = election(ElectionStatus::Closed, None, None);
        assert!(!e.is_open_now(Utc::now()));
    }

    #[test]
    fn open_ended_bounds_are_always_in_window() {
        let e = election(ElectionStatus::Open, None, None);
        assert!(e.is_open_now(Utc::now()));
    }

    #[test]
    fn before_start_is_not_open() {
        let now = Utc::now();
        let e = election(ElectionStatus::Open, Some(now + Duration::hours(1)), None);
        assert!(!e.is_open_now(now));
    }

    #[test]
    fn after_end_is_not_open() {
        let now = Utc::now();
        let e = election(ElectionStatus::Open, None, Some(now - Duration::hours(1)));
        assert!(!e.is_open_now(now));
    }

    #[test]
    fn within_window_is_open() {
        let now = Utc::now();
        let e = election(ElectionStatus::Open, Some(now - Duration::hours(1)), Some(now + Duration::hours(1)));
        assert!(e.is_open_now(now));
    }
}
