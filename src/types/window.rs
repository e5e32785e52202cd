//! A candidate 5-minute publication window and the true-UTC interval its
//! records are expected to cover.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use std::fmt;

/// Length of one published window.
pub const WINDOW_LENGTH_MINUTES: i64 = 5;

/// Half-open UTC interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format("%Y-%m-%dT%H:%M:%SZ"),
            self.end.format("%Y-%m-%dT%H:%M:%SZ")
        )
    }
}

/// A hypothesised publication boundary.
///
/// `local` is the Slovak wall-clock time used to name the file; `records` is
/// the true-UTC range the file's records should fall into once corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowCandidate {
    local: NaiveDateTime,
    utc_offset: Duration,
    records: TimeRange,
}

impl WindowCandidate {
    /// Builds a candidate from an already aligned local boundary and the UTC
    /// offset that was in force when it was chosen.
    pub(crate) fn from_aligned(local: NaiveDateTime, utc_offset: Duration) -> Self {
        let end = (local - utc_offset).and_utc();
        let start = end - Duration::minutes(WINDOW_LENGTH_MINUTES);
        Self {
            local,
            utc_offset,
            records: TimeRange { start, end },
        }
    }

    pub fn local(&self) -> NaiveDateTime {
        self.local
    }

    pub fn utc_offset(&self) -> Duration {
        self.utc_offset
    }

    pub fn utc_offset_seconds(&self) -> i32 {
        self.utc_offset.num_seconds() as i32
    }

    /// The boundary expressed in true UTC.
    pub fn boundary_utc(&self) -> DateTime<Utc> {
        self.records.end
    }

    pub fn records(&self) -> TimeRange {
        self.records
    }

    /// Day folder of the source tree, e.g. `20250916`.
    pub fn date_path(&self) -> String {
        self.local.format("%Y%m%d").to_string()
    }

    /// Time part of the file name, e.g. `2025-09-16 18-35-00`.
    pub fn file_stamp(&self) -> String {
        self.local.format("%Y-%m-%d %H-%M-%S").to_string()
    }
}

impl fmt::Display for WindowCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (UTC{:+}h, records {})",
            self.local.format("%Y-%m-%d %H:%M"),
            self.utc_offset.num_hours(),
            self.records
        )
    }
}
