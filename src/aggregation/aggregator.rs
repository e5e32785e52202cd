use crate::aggregation::derived::derive;
use crate::aggregation::error::AggregateError;
use crate::aggregation::reducers::{self, reduce, vector_average};
use crate::planning::clock::correct_source_timestamp;
use crate::types::field::{Field, Reduction};
use crate::types::minute_record::{MinuteRecord, SourcePayload};
use crate::types::snapshot::{AggregatedSnapshot, FieldValues};
use crate::types::window::{TimeRange, WINDOW_LENGTH_MINUTES};
use chrono::{DateTime, Duration, DurationRound, Utc};
use log::{debug, info, warn};
use std::collections::BTreeMap;

/// One station's records keyed by corrected minute. Inserting a repeated
/// minute replaces the earlier record, so the later occurrence wins.
type StationMinutes<'a> = BTreeMap<DateTime<Utc>, &'a MinuteRecord>;

fn insert_record<'a>(minutes: &mut StationMinutes<'a>, record: &'a MinuteRecord) {
    match correct_source_timestamp(&record.timestamp) {
        Some(at) => {
            if minutes.insert(at, record).is_some() {
                debug!(
                    "Duplicate minute {} for station {}, keeping the later record",
                    at, record.station_id
                );
            }
        }
        None => debug!(
            "Skipping record of station {} with timestamp '{}'",
            record.station_id, record.timestamp
        ),
    }
}

/// Narrows a station's minutes to the expected window. Without a range, or
/// when nothing falls inside it, the latest 5-minute bucket is used.
fn select_window<'a>(
    station_id: &str,
    minutes: &StationMinutes<'a>,
    range: Option<TimeRange>,
) -> Vec<(DateTime<Utc>, &'a MinuteRecord)> {
    if let Some(range) = range {
        let inside: Vec<_> = minutes
            .range(range.start..range.end)
            .map(|(at, record)| (*at, *record))
            .collect();
        if !inside.is_empty() {
            return inside;
        }
        warn!(
            "Station {} has no records in {}, falling back to its latest 5-minute bucket",
            station_id, range
        );
    }

    let Some(latest) = minutes.keys().next_back().copied() else {
        return Vec::new();
    };
    let bucket_start = latest
        .duration_trunc(Duration::minutes(WINDOW_LENGTH_MINUTES))
        .unwrap_or(latest);
    minutes
        .range(bucket_start..)
        .map(|(at, record)| (*at, *record))
        .collect()
}

fn is_complete(window: &[(DateTime<Utc>, &MinuteRecord)]) -> bool {
    window.len() == WINDOW_LENGTH_MINUTES as usize
        && window
            .windows(2)
            .all(|pair| pair[1].0 - pair[0].0 <= Duration::minutes(1))
}

fn reduce_window(station_id: &str, window: &[(DateTime<Utc>, &MinuteRecord)]) -> Option<AggregatedSnapshot> {
    let observed_at = window.last()?.0;
    let column = |field: Field| -> Vec<Option<f64>> {
        window.iter().map(|(_, record)| record.get(field)).collect()
    };

    let mut values = FieldValues::default();
    for field in Field::ALL {
        match field.reduction() {
            Reduction::VectorAverage(pair) => {
                if field != pair.speed_field() {
                    continue;
                }
                let wind = vector_average(&column(pair.speed_field()), &column(pair.direction_field()));
                values.set(pair.speed_field(), wind.map(|w| w.speed));
                values.set(pair.direction_field(), wind.map(|w| w.direction));
            }
            reduction => values.set(field, reduce(reduction, &column(field))),
        }
    }

    let temperatures = column(Field::AirTemperature);
    let complete = is_complete(window);
    if !complete {
        warn!(
            "Incomplete window for station {}: {} of {} minutes up to {}",
            station_id,
            window.len(),
            WINDOW_LENGTH_MINUTES,
            observed_at
        );
    }

    Some(AggregatedSnapshot {
        station_id: station_id.to_string(),
        observed_at,
        record_count: window.len(),
        complete,
        derived: derive(&values),
        temperature_min: reducers::min(&temperatures),
        temperature_max: reducers::max(&temperatures),
        gust_max: reducers::max(&column(Field::WindSpeedMax)),
        values,
    })
}

/// Reduces one station's minutes in `payload` to a single snapshot.
///
/// `range` is the true-UTC interval the payload's window should cover,
/// usually [`WindowCandidate::records`](crate::WindowCandidate::records).
/// Fewer than five minutes still give a snapshot, flagged as incomplete.
///
/// # Errors
///
/// Returns [`AggregateError::NoDataForStation`] if the payload holds no
/// record for the station.
pub fn aggregate(
    payload: &SourcePayload,
    station_id: &str,
    range: Option<TimeRange>,
) -> Result<AggregatedSnapshot, AggregateError> {
    let mut minutes = StationMinutes::new();
    for record in payload.data.iter().filter(|r| r.station_id == station_id) {
        insert_record(&mut minutes, record);
    }

    let window = select_window(station_id, &minutes, range);
    let snapshot =
        reduce_window(station_id, &window).ok_or_else(|| AggregateError::NoDataForStation {
            station: station_id.to_string(),
        })?;
    debug!(
        "Aggregated {} minutes for station {} (complete: {})",
        snapshot.record_count, station_id, snapshot.complete
    );
    Ok(snapshot)
}

/// Aggregates every station in `payload`, ordered by station id.
pub fn aggregate_all(payload: &SourcePayload, range: Option<TimeRange>) -> Vec<AggregatedSnapshot> {
    let mut stations: BTreeMap<&str, StationMinutes> = BTreeMap::new();
    for record in payload.data.iter().filter(|r| !r.station_id.is_empty()) {
        insert_record(stations.entry(record.station_id.as_str()).or_default(), record);
    }

    let snapshots: Vec<AggregatedSnapshot> = stations
        .iter()
        .filter_map(|(station_id, minutes)| {
            reduce_window(station_id, &select_window(station_id, minutes, range))
        })
        .collect();
    let complete = snapshots.iter().filter(|s| s.complete).count();
    info!(
        "Aggregated {} stations ({} complete windows)",
        snapshots.len(),
        complete
    );
    snapshots
}
