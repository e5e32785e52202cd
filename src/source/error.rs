use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("No usable payload among {candidates} candidate windows ({urls_tried} URLs tried): {reason}")]
    DataUnavailable {
        candidates: usize,
        urls_tried: usize,
        reason: String,
    },

    #[error("Network failure on all {urls_tried} URLs tried, last error: {last_error}")]
    Network { urls_tried: usize, last_error: String },

    #[error("Invalid locator configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
}

/// A payload that was served successfully but cannot be trusted.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Failed to decode payload from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record {index} in {url} has no station id")]
    MissingStationId { url: String, index: usize },

    #[error("Record {index} in {url} has an unparseable timestamp '{timestamp}'")]
    BadTimestamp {
        url: String,
        index: usize,
        timestamp: String,
    },
}

/// Failure of a single HTTP exchange, before any status code is known.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Request to {0} timed out")]
    Timeout(String),

    #[error("Network request failed for {url}: {message}")]
    Connection { url: String, message: String },
}
