use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Station '{0}' is not in the station directory")]
    StationNotFound(String),

    #[error("Failed to parse station directory JSON")]
    DirectoryDecode(#[from] serde_json::Error),
}
