//! Slovak wall-clock rules and the repair of the source's mislabelled
//! timestamps.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc, Weekday};

/// Offset of the source's "UTC" label from true UTC.
const SOURCE_LABEL_SKEW_HOURS: i64 = 1;

const CET_HOURS: i64 = 1;
const CEST_HOURS: i64 = 2;

fn last_sunday(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let mut day = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?;
    while day.weekday() != Weekday::Sun {
        day = day.pred_opt()?;
    }
    Some(day)
}

fn transition_utc(year: i32, month: u32) -> Option<DateTime<Utc>> {
    Some(last_sunday(year, month)?.and_hms_opt(1, 0, 0)?.and_utc())
}

/// Whether `instant` falls in EU summer time: from the last Sunday of March
/// 01:00 UTC up to, not including, the last Sunday of October 01:00 UTC.
pub fn is_eu_summer_time(instant: DateTime<Utc>) -> bool {
    let year = instant.year();
    match (transition_utc(year, 3), transition_utc(year, 10)) {
        (Some(start), Some(end)) => start <= instant && instant < end,
        _ => false,
    }
}

/// Slovak local offset at `instant`: CEST (+2 h) in summer, CET (+1 h) otherwise.
pub fn local_offset(instant: DateTime<Utc>) -> Duration {
    if is_eu_summer_time(instant) {
        Duration::hours(CEST_HOURS)
    } else {
        Duration::hours(CET_HOURS)
    }
}

pub fn utc_to_local(instant: DateTime<Utc>) -> NaiveDateTime {
    instant.naive_utc() + local_offset(instant)
}

/// Rounds a wall-clock time down to its 5-minute boundary.
pub fn align_to_five_minutes(time: NaiveDateTime) -> NaiveDateTime {
    use chrono::Timelike;
    let past_boundary = Duration::seconds(i64::from((time.minute() % 5) * 60 + time.second()))
        + Duration::nanoseconds(i64::from(time.nanosecond()));
    time - past_boundary
}

const SOURCE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

fn parse_source_wall_clock(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    let raw = raw.trim_end_matches(|c| c == 'Z' || c == 'z');
    SOURCE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Converts a source `minuta` value into true UTC.
///
/// The source labels its record times as UTC although they are UTC+1, so the
/// wall-clock part is taken as-is and one hour is subtracted. Any explicit
/// offset suffix is ignored for the same reason.
///
/// Returns `None` when the string is not a recognisable timestamp.
pub fn correct_source_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let labelled = parse_source_wall_clock(raw)?;
    Some((labelled - Duration::hours(SOURCE_LABEL_SKEW_HOURS)).and_utc())
}
