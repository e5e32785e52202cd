use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("Station id '{0}' is not numeric and cannot be used as a report id")]
    NonNumericStationId(String),
}
