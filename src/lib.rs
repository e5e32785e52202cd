mod aggregation;
mod error;
mod mapping;
mod planning;
mod shmu_now;
mod source;
mod stations;
mod types;

pub use error::ShmuError;
pub use shmu_now::*;

pub use planning::clock::{correct_source_timestamp, is_eu_summer_time, local_offset};
pub use planning::window_planner::{plan_windows, DEFAULT_DEPTH};

pub use source::config::LocatorConfig;
pub use source::error::{LocateError, TransportError, ValidationError};
pub use source::locator::{LocatedPayload, SourceLocator};
pub use source::transport::{HttpTransport, Transport, TransportResponse};
pub use source::validator::validate_payload;

pub use aggregation::aggregator::{aggregate, aggregate_all};
pub use aggregation::derived::{absolute_humidity, dew_point, feels_like, vapour_pressure};
pub use aggregation::error::AggregateError;
pub use aggregation::reducers::{vector_average, WindVector};

pub use mapping::config::MapperConfig;
pub use mapping::error::MapError;
pub use mapping::mapper::{clouds_from_radiation, map_snapshot, sea_level_pressure};

pub use stations::directory::{StationDirectory, StationLookup};
pub use stations::error::LookupError;

pub use types::condition::{Condition, ConditionTable};
pub use types::field::{Field, Reduction, WindPair};
pub use types::minute_record::{MinuteRecord, SourcePayload, Statistics};
pub use types::snapshot::{AggregatedSnapshot, DerivedQuantities, FieldValues};
pub use types::station::StationMetadata;
pub use types::weather_report::*;
pub use types::window::{TimeRange, WindowCandidate, WINDOW_LENGTH_MINUTES};
