//! The OpenWeatherMap-compatible "current weather" document produced for one
//! station. Field names and numeric types follow the OpenWeatherMap API;
//! absent values are omitted instead of serialised as `null`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub coord: Coord,
    pub weather: Vec<WeatherEntry>,
    pub base: String,
    pub main: MainBlock,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub visibility: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub wind: Option<WindBlock>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub clouds: Option<CloudsBlock>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rain: Option<PrecipitationBlock>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub snow: Option<PrecipitationBlock>,
    /// Unix seconds of the latest observed minute, true UTC.
    pub dt: i64,
    pub sys: SysBlock,
    /// Offset of Slovak local time from UTC in seconds.
    pub timezone: i32,
    pub id: u64,
    pub name: String,
    pub cod: u16,
    pub timestamps: Timestamps,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherEntry {
    pub id: u16,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MainBlock {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub temp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub feels_like: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub temp_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub temp_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pressure: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub humidity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sea_level: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub grnd_level: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindBlock {
    pub speed: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub deg: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudsBlock {
    pub all: u8,
}

/// Rain or snow totals. `5m` is the window sum. `1h_estimated` is that sum
/// scaled to an hour; it is kept apart from a measured `1h` total.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PrecipitationBlock {
    #[serde(rename = "5m", skip_serializing_if = "Option::is_none", default)]
    pub five_minutes: Option<f64>,
    #[serde(rename = "1h_estimated", skip_serializing_if = "Option::is_none", default)]
    pub one_hour_estimated: Option<f64>,
    /// Snow depth on the ground, cm. Only used in the snow block.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub depth: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SysBlock {
    #[serde(rename = "type")]
    pub kind: u8,
    pub id: u64,
    pub country: String,
}

/// Human-readable forms of `dt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    pub utc: String,
    pub local: String,
}
