use crate::types::condition::ConditionTable;
use bon::Builder;

pub const DEFAULT_COUNTRY: &str = "SK";

/// Global radiation (W/m²) taken as a clear sky when estimating cloud cover.
pub const DEFAULT_CLEAR_SKY_REFERENCE: f64 = 1000.0;

/// Settings of [`map_snapshot`](crate::mapping::mapper::map_snapshot).
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct MapperConfig {
    #[builder(default = DEFAULT_COUNTRY.to_string())]
    pub country: String,
    /// Precipitation counts as snow at or below this air temperature, °C.
    #[builder(default = 0.0)]
    pub snow_threshold_c: f64,
    #[builder(default = DEFAULT_CLEAR_SKY_REFERENCE)]
    pub clear_sky_reference: f64,
    #[builder(default)]
    pub conditions: ConditionTable,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
