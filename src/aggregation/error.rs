use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("No records for station '{station}' in this window, the station may be offline")]
    NoDataForStation { station: String },
}
