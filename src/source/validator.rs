use crate::planning::clock::correct_source_timestamp;
use crate::source::error::ValidationError;
use crate::types::minute_record::SourcePayload;
use log::{debug, warn};

/// Smallest absolute difference between declared and actual record counts
/// that is reported.
const MIN_COUNT_SLACK: u64 = 5;

/// Decodes a downloaded body and checks that it is structurally usable.
///
/// A payload is rejected when it is not JSON, lacks the `data` array, or has
/// a record without station id or with an unparseable timestamp. A
/// `statistics.records_count` that disagrees with the actual count by more
/// than 10% is only logged. An empty `data` array is accepted.
pub fn validate_payload(body: &[u8], url: &str) -> Result<SourcePayload, ValidationError> {
    let payload: SourcePayload =
        serde_json::from_slice(body).map_err(|e| ValidationError::Decode {
            url: url.to_string(),
            source: e,
        })?;

    for (index, record) in payload.data.iter().enumerate() {
        if record.station_id.trim().is_empty() {
            return Err(ValidationError::MissingStationId {
                url: url.to_string(),
                index,
            });
        }
        if correct_source_timestamp(&record.timestamp).is_none() {
            return Err(ValidationError::BadTimestamp {
                url: url.to_string(),
                index,
                timestamp: record.timestamp.clone(),
            });
        }
    }

    if let Some(declared) = payload.statistics.and_then(|s| s.records_count) {
        let actual = payload.data.len() as u64;
        let slack = (declared / 10).max(MIN_COUNT_SLACK);
        if declared.abs_diff(actual) > slack {
            warn!(
                "{} declares {} records but contains {}",
                url, declared, actual
            );
        }
    }

    if payload.data.is_empty() {
        debug!("{} contains no records", url);
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_well_formed_payload() {
        let body = br#"{
            "id": "x",
            "statistics": {"stations_count": 1, "records_count": 2},
            "data": [
                {"ind_kli": "11816", "minuta": "2025-09-16T17:30:00", "t": 12.5},
                {"ind_kli": 11816, "minuta": "2025-09-16T17:31:00", "t": 12.6}
            ]
        }"#;
        let payload = validate_payload(body, "u").unwrap();
        assert_eq!(payload.data.len(), 2);
        assert_eq!(payload.station_ids(), vec!["11816"]);
    }

    #[test]
    fn test_accepts_empty_data() {
        let payload = validate_payload(br#"{"data": []}"#, "u").unwrap();
        assert!(payload.data.is_empty());
    }

    #[test]
    fn test_rejects_missing_data_array() {
        let err = validate_payload(br#"{"id": "x"}"#, "u").unwrap_err();
        assert!(matches!(err, ValidationError::Decode { .. }));

        let err = validate_payload(br#"{"data": null}"#, "u").unwrap_err();
        assert!(matches!(err, ValidationError::Decode { .. }));
    }

    #[test]
    fn test_rejects_non_json() {
        let err = validate_payload(b"<html>502</html>", "u").unwrap_err();
        assert!(matches!(err, ValidationError::Decode { .. }));
    }

    #[test]
    fn test_rejects_record_without_station() {
        let body = br#"{"data": [
            {"ind_kli": "11816", "minuta": "2025-09-16T17:30:00"},
            {"minuta": "2025-09-16T17:31:00"}
        ]}"#;
        let err = validate_payload(body, "u").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::MissingStationId { index: 1, .. }
        ));
    }

    #[test]
    fn test_rejects_bad_timestamp() {
        let body = br#"{"data": [{"ind_kli": "11816", "minuta": "yesterday"}]}"#;
        let err = validate_payload(body, "u").unwrap_err();
        assert!(matches!(err, ValidationError::BadTimestamp { index: 0, .. }));
    }

    #[test]
    fn test_count_mismatch_is_not_fatal() {
        let body = br#"{
            "statistics": {"records_count": 500},
            "data": [{"ind_kli": "11816", "minuta": "2025-09-16T17:30:00"}]
        }"#;
        assert!(validate_payload(body, "u").is_ok());
    }
}
