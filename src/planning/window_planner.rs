//! Produces the newest-first list of 5-minute files worth asking the source for.

use crate::planning::clock::{align_to_five_minutes, local_offset, utc_to_local};
use crate::types::window::{WindowCandidate, WINDOW_LENGTH_MINUTES};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Default number of candidates, about 40 minutes of coverage.
pub const DEFAULT_DEPTH: usize = 8;

/// Plans `depth` candidate windows ending at the current local 5-minute
/// boundary, newest first.
///
/// The UTC offset is decided once, for `now`, and applied to every candidate.
pub fn plan_windows(now: DateTime<Utc>, depth: usize) -> Vec<WindowCandidate> {
    let offset = local_offset(now);
    let newest = align_to_five_minutes(utc_to_local(now));
    (0..depth)
        .map(|step| {
            let local = newest - Duration::minutes(WINDOW_LENGTH_MINUTES * step as i64);
            WindowCandidate::from_aligned(local, offset)
        })
        .collect()
}

impl WindowCandidate {
    /// A candidate for an explicit Slovak wall-clock time, aligned down to its
    /// 5-minute boundary.
    ///
    /// The offset is chosen by applying the summer-time rule to the instant
    /// `local` would be under standard time, which only matters inside the
    /// repeated hour at the end of October.
    pub fn at_local(local: NaiveDateTime) -> Self {
        let aligned = align_to_five_minutes(local);
        let offset = local_offset((aligned - Duration::hours(1)).and_utc());
        WindowCandidate::from_aligned(aligned, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn test_summer_boundary() {
        let now = Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap();
        let windows = plan_windows(now, DEFAULT_DEPTH);
        assert_eq!(windows[0].local().format("%H:%M").to_string(), "14:00");
        assert_eq!(windows[0].utc_offset_seconds(), 7200);
        assert_eq!(windows[0].boundary_utc(), now);
    }

    #[test]
    fn test_winter_boundary() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let windows = plan_windows(now, DEFAULT_DEPTH);
        assert_eq!(windows[0].local().format("%H:%M").to_string(), "13:00");
        assert_eq!(windows[0].utc_offset_seconds(), 3600);
    }

    #[test]
    fn test_cascade_steps_back_five_minutes() {
        let now = Utc.with_ymd_and_hms(2025, 9, 16, 16, 38, 12).unwrap();
        let windows = plan_windows(now, DEFAULT_DEPTH);
        assert_eq!(windows.len(), 8);
        let stamps: Vec<String> = windows.iter().map(|w| w.file_stamp()).collect();
        assert_eq!(stamps[0], "2025-09-16 18-35-00");
        assert_eq!(stamps[1], "2025-09-16 18-30-00");
        assert_eq!(stamps[7], "2025-09-16 18-00-00");
        for pair in windows.windows(2) {
            assert_eq!(pair[0].local() - pair[1].local(), Duration::minutes(5));
        }
    }

    #[test]
    fn test_cascade_crosses_midnight() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 23, 7, 0).unwrap();
        let windows = plan_windows(now, 4);
        // 00:05 local on the 2nd, then back into the 1st.
        assert_eq!(windows[0].date_path(), "20250102");
        assert_eq!(windows[1].date_path(), "20250102");
        assert_eq!(windows[2].date_path(), "20250101");
        assert_eq!(windows[2].file_stamp(), "2025-01-01 23-55-00");
    }

    #[test]
    fn test_zero_depth_plans_nothing() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        assert!(plan_windows(now, 0).is_empty());
    }

    #[test]
    fn test_at_local_aligns_and_picks_offset() {
        let summer = NaiveDate::from_ymd_opt(2025, 9, 16)
            .unwrap()
            .and_hms_opt(18, 37, 0)
            .unwrap();
        let candidate = WindowCandidate::at_local(summer);
        assert_eq!(candidate.file_stamp(), "2025-09-16 18-35-00");
        assert_eq!(
            candidate.boundary_utc(),
            Utc.with_ymd_and_hms(2025, 9, 16, 16, 35, 0).unwrap()
        );

        let winter = NaiveDate::from_ymd_opt(2025, 12, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        assert_eq!(WindowCandidate::at_local(winter).utc_offset_seconds(), 3600);
    }
}
