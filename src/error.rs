use crate::aggregation::error::AggregateError;
use crate::mapping::error::MapError;
use crate::source::error::LocateError;
use crate::stations::error::LookupError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShmuError {
    #[error(transparent)]
    Locate(#[from] LocateError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("No station within {radius} km of ({lat}, {lon})")]
    NoStationWithinRadius { radius: f64, lat: f64, lon: f64 },
}
