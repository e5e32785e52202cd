//! Turns an aggregated window into an OpenWeatherMap "current weather"
//! document.

use crate::mapping::config::MapperConfig;
use crate::mapping::error::MapError;
use crate::types::condition::{Condition, ConditionTable};
use crate::types::field::Field;
use crate::types::snapshot::AggregatedSnapshot;
use crate::types::station::StationMetadata;
use crate::types::weather_report::{
    CloudsBlock, Coord, MainBlock, PrecipitationBlock, SysBlock, Timestamps, WeatherEntry,
    WeatherReport, WindBlock,
};
use chrono::Duration;

const MAX_VISIBILITY_M: f64 = 10_000.0;
const DAYLIGHT_MIN_RADIATION: f64 = 1.0;
const WINDOWS_PER_HOUR: f64 = 12.0;
const SUMMER_OFFSET_SECONDS: i32 = 2 * 3600;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Station pressure reduced to sea level with the hypsometric approximation.
pub fn sea_level_pressure(station_hpa: f64, temperature_c: f64, elevation_m: f64) -> f64 {
    let lapse = 0.0065 * elevation_m;
    station_hpa * (1.0 - lapse / (temperature_c + lapse + 273.15)).powf(-5.257)
}

/// Cloud cover bucket from the ratio of measured to clear-sky radiation.
pub fn clouds_from_radiation(radiation: f64, clear_sky_reference: f64) -> u8 {
    let ratio = radiation / clear_sky_reference;
    if ratio > 0.8 {
        0
    } else if ratio > 0.6 {
        25
    } else if ratio > 0.4 {
        50
    } else if ratio > 0.2 {
        75
    } else {
        100
    }
}

fn build_main(snapshot: &AggregatedSnapshot, elevation: f64) -> MainBlock {
    let temperature = snapshot.value(Field::AirTemperature);
    let pressure = snapshot.value(Field::Pressure);
    let sea_level = match (pressure, temperature) {
        (Some(p), Some(t)) => Some(sea_level_pressure(p, t, elevation)),
        (Some(p), None) => Some(p),
        _ => None,
    };
    MainBlock {
        temp: temperature.map(round1),
        feels_like: snapshot.derived.feels_like.map(round1),
        temp_min: snapshot.temperature_min.map(round1),
        temp_max: snapshot.temperature_max.map(round1),
        pressure: pressure.map(|p| p.round() as i64),
        humidity: snapshot
            .value(Field::RelativeHumidity)
            .map(|h| h.round() as i64),
        sea_level: sea_level.map(|p| p.round() as i64),
        grnd_level: pressure.map(|p| p.round() as i64),
    }
}

fn build_wind(snapshot: &AggregatedSnapshot) -> Option<WindBlock> {
    let speed = snapshot.value(Field::WindSpeed)?;
    Some(WindBlock {
        speed: round1(speed),
        deg: snapshot
            .value(Field::WindDirection)
            .map(|d| (d.round() as i64).rem_euclid(360)),
        gust: snapshot.gust_max.filter(|&g| g > speed).map(round1),
    })
}

fn build_precipitation(
    snapshot: &AggregatedSnapshot,
    snow_threshold_c: f64,
) -> (Option<PrecipitationBlock>, Option<PrecipitationBlock>) {
    let total = snapshot
        .value(Field::Precipitation)
        .filter(|&mm| mm > 0.0)
        .map(|mm| PrecipitationBlock {
            five_minutes: Some(round1(mm)),
            one_hour_estimated: Some(round1(mm * WINDOWS_PER_HOUR)),
            depth: None,
        });
    let depth = snapshot.value(Field::SnowDepth).filter(|&cm| cm > 0.0);
    let is_snow = snapshot
        .value(Field::AirTemperature)
        .is_some_and(|t| t <= snow_threshold_c);

    let (rain, snowfall) = if is_snow { (None, total) } else { (total, None) };
    let snow = match (snowfall, depth) {
        (None, None) => None,
        (snowfall, depth) => Some(PrecipitationBlock {
            depth: depth.map(round1),
            ..snowfall.unwrap_or_default()
        }),
    };
    (rain, snow)
}

fn weather_entry(condition: &Condition, daylight: bool) -> WeatherEntry {
    WeatherEntry {
        id: condition.id,
        main: condition.main.to_string(),
        description: condition.description.to_string(),
        icon: condition.icon(daylight),
    }
}

/// Builds the report for one station.
///
/// `utc_offset_seconds` is the Slovak offset that was in force for the
/// window, as decided when planning it.
///
/// # Errors
///
/// Returns [`MapError::NonNumericStationId`] if the station id cannot be
/// used as a numeric report id.
pub fn map_snapshot(
    snapshot: &AggregatedSnapshot,
    station: &StationMetadata,
    config: &MapperConfig,
    utc_offset_seconds: i32,
) -> Result<WeatherReport, MapError> {
    let id: u64 = station
        .id
        .trim()
        .parse()
        .map_err(|_| MapError::NonNumericStationId(station.id.clone()))?;

    let radiation = snapshot.value(Field::GlobalRadiation);
    let daylight = radiation.map_or(true, |r| r >= DAYLIGHT_MIN_RADIATION);
    let coded = snapshot
        .condition_code()
        .and_then(|code| config.conditions.get(code));
    let clouds = coded
        .and_then(|c| c.clouds)
        .or_else(|| radiation.map(|r| clouds_from_radiation(r, config.clear_sky_reference)));
    let weather: Vec<WeatherEntry> = match (coded, clouds) {
        (Some(condition), _) => vec![weather_entry(condition, daylight)],
        (None, Some(cover)) => vec![weather_entry(
            &ConditionTable::from_cloud_cover(cover),
            daylight,
        )],
        (None, None) => Vec::new(),
    };

    let (rain, snow) = build_precipitation(snapshot, config.snow_threshold_c);
    let local = snapshot.observed_at.naive_utc() + Duration::seconds(i64::from(utc_offset_seconds));
    let zone = if utc_offset_seconds == SUMMER_OFFSET_SECONDS {
        "CEST"
    } else {
        "CET"
    };

    Ok(WeatherReport {
        coord: Coord {
            lon: station.longitude,
            lat: station.latitude,
        },
        weather,
        base: "stations".to_string(),
        main: build_main(snapshot, f64::from(station.elevation)),
        visibility: snapshot
            .value(Field::Visibility)
            .map(|v| v.clamp(0.0, MAX_VISIBILITY_M).round() as u32),
        wind: build_wind(snapshot),
        clouds: clouds.map(|all| CloudsBlock { all }),
        rain,
        snow,
        dt: snapshot.observed_at.timestamp(),
        sys: SysBlock {
            kind: 2,
            id,
            country: config.country.clone(),
        },
        timezone: utc_offset_seconds,
        id,
        name: station.name.clone(),
        cod: 200,
        timestamps: Timestamps {
            utc: snapshot
                .observed_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
            local: format!("{} {}", local.format("%Y-%m-%d %H:%M:%S"), zone),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::snapshot::{DerivedQuantities, FieldValues};
    use chrono::{TimeZone, Utc};
    use serde_json::Value;

    fn station() -> StationMetadata {
        StationMetadata {
            id: "11816".to_string(),
            name: "Bratislava - letisko".to_string(),
            latitude: 48.17027778,
            longitude: 17.2075,
            elevation: 133,
        }
    }

    fn snapshot(fields: &[(Field, f64)]) -> AggregatedSnapshot {
        let mut values = FieldValues::default();
        for &(field, value) in fields {
            values.set(field, Some(value));
        }
        AggregatedSnapshot {
            station_id: "11816".to_string(),
            observed_at: Utc.with_ymd_and_hms(2025, 9, 16, 16, 34, 0).unwrap(),
            record_count: 5,
            complete: true,
            values,
            derived: DerivedQuantities::default(),
            temperature_min: None,
            temperature_max: None,
            gust_max: None,
        }
    }

    #[test]
    fn test_full_report() {
        let mut snap = snapshot(&[
            (Field::AirTemperature, 10.46),
            (Field::Pressure, 1001.6),
            (Field::RelativeHumidity, 81.4),
            (Field::Visibility, 25_000.0),
            (Field::WindSpeed, 3.04),
            (Field::WindDirection, 359.7),
            (Field::Precipitation, 0.8),
            (Field::GlobalRadiation, 350.0),
            (Field::ConditionCode, 10.0),
        ]);
        snap.temperature_min = Some(10.0);
        snap.temperature_max = Some(10.5);
        snap.gust_max = Some(5.56);
        snap.derived.feels_like = Some(8.93);

        let report = map_snapshot(&snap, &station(), &MapperConfig::default(), 7200).unwrap();
        assert_eq!(report.id, 11816);
        assert_eq!(report.main.temp, Some(10.5));
        assert_eq!(report.main.feels_like, Some(8.9));
        assert_eq!(report.main.temp_min, Some(10.0));
        assert_eq!(report.main.pressure, Some(1002));
        assert_eq!(report.main.grnd_level, Some(1002));
        assert_eq!(report.main.sea_level, Some(1018));
        assert_eq!(report.main.humidity, Some(81));
        assert_eq!(report.visibility, Some(10_000));
        let wind = report.wind.unwrap();
        assert_eq!(wind.speed, 3.0);
        assert_eq!(wind.deg, Some(0));
        assert_eq!(wind.gust, Some(5.6));
        assert_eq!(report.weather[0].id, 500);
        assert_eq!(report.weather[0].icon, "10d");
        assert_eq!(report.clouds.unwrap().all, 100);
        let rain = report.rain.unwrap();
        assert_eq!(rain.five_minutes, Some(0.8));
        assert_eq!(rain.one_hour_estimated, Some(9.6));
        assert!(report.snow.is_none());
        assert_eq!(report.dt, 1758040440);
        assert_eq!(report.timezone, 7200);
        assert_eq!(report.timestamps.utc, "2025-09-16 16:34:00 UTC");
        assert_eq!(report.timestamps.local, "2025-09-16 18:34:00 CEST");
    }

    #[test]
    fn test_serialized_shape() {
        let snap = snapshot(&[(Field::AirTemperature, -2.0), (Field::Precipitation, 0.3)]);
        let report = map_snapshot(&snap, &station(), &MapperConfig::default(), 3600).unwrap();
        let json: Value = serde_json::to_value(&report).unwrap();

        assert_eq!(json["sys"]["type"], 2);
        assert_eq!(json["sys"]["country"], "SK");
        assert!(json["sys"].get("sunrise").is_none());
        assert_eq!(json["snow"]["5m"], 0.3);
        assert_eq!(json["snow"]["1h_estimated"], 3.6);
        assert!(json["snow"].get("1h").is_none());
        assert_eq!(json["base"], "stations");
        assert_eq!(json["cod"], 200);
        assert!(json.get("rain").is_none());
        assert!(json.get("wind").is_none());
        assert!(json.get("clouds").is_none());
        assert!(json.get("visibility").is_none());
        assert!(json["main"].get("pressure").is_none());
        assert_eq!(json["weather"], Value::Array(vec![]));
        assert!(json["timestamps"]["local"].as_str().unwrap().ends_with("CET"));
    }

    #[test]
    fn test_gust_only_when_above_speed() {
        let mut snap = snapshot(&[(Field::WindSpeed, 4.0)]);
        snap.gust_max = Some(3.5);
        let report = map_snapshot(&snap, &station(), &MapperConfig::default(), 3600).unwrap();
        assert_eq!(report.wind.unwrap().gust, None);
        assert_eq!(report.wind.unwrap().deg, None);
    }

    #[test]
    fn test_clouds_from_radiation_without_code() {
        let snap = snapshot(&[(Field::GlobalRadiation, 850.0)]);
        let report = map_snapshot(&snap, &station(), &MapperConfig::default(), 7200).unwrap();
        assert_eq!(report.clouds.unwrap().all, 0);
        assert_eq!(report.weather[0].id, 800);
        assert_eq!(report.weather[0].icon, "01d");

        let snap = snapshot(&[(Field::GlobalRadiation, 0.0)]);
        let report = map_snapshot(&snap, &station(), &MapperConfig::default(), 7200).unwrap();
        assert_eq!(report.clouds.unwrap().all, 100);
        assert_eq!(report.weather[0].icon, "04n");
    }

    #[test]
    fn test_radiation_buckets() {
        assert_eq!(clouds_from_radiation(801.0, 1000.0), 0);
        assert_eq!(clouds_from_radiation(700.0, 1000.0), 25);
        assert_eq!(clouds_from_radiation(500.0, 1000.0), 50);
        assert_eq!(clouds_from_radiation(300.0, 1000.0), 75);
        assert_eq!(clouds_from_radiation(200.0, 1000.0), 100);
        assert_eq!(clouds_from_radiation(450.0, 500.0), 0);
    }

    #[test]
    fn test_snow_depth_without_snowfall() {
        let snap = snapshot(&[(Field::AirTemperature, 3.0), (Field::SnowDepth, 12.0)]);
        let report = map_snapshot(&snap, &station(), &MapperConfig::default(), 3600).unwrap();
        let snow = report.snow.unwrap();
        assert_eq!(snow.depth, Some(12.0));
        assert_eq!(snow.five_minutes, None);
        assert!(report.rain.is_none());
    }

    #[test]
    fn test_custom_snow_threshold() {
        let snap = snapshot(&[(Field::AirTemperature, 1.0), (Field::Precipitation, 0.2)]);
        let config = MapperConfig::builder().snow_threshold_c(1.5).build();
        let report = map_snapshot(&snap, &station(), &config, 3600).unwrap();
        assert!(report.rain.is_none());
        assert_eq!(report.snow.unwrap().five_minutes, Some(0.2));
    }

    #[test]
    fn test_non_numeric_station_id() {
        let mut meta = station();
        meta.id = "BA-01".to_string();
        let err = map_snapshot(&snapshot(&[]), &meta, &MapperConfig::default(), 3600).unwrap_err();
        assert!(matches!(err, MapError::NonNumericStationId(id) if id == "BA-01"));
    }

    #[test]
    fn test_sea_level_grows_with_elevation() {
        let at_sea = sea_level_pressure(1013.0, 15.0, 0.0);
        assert!((at_sea - 1013.0).abs() < 1e-9);
        let lomnicky = sea_level_pressure(750.0, -5.0, 2635.0);
        assert!(lomnicky > 1000.0 && lomnicky < 1100.0, "{lomnicky}");
    }
}
