//! Physical quantities derived from the aggregated temperature, humidity and
//! wind of a window.

use crate::types::field::Field;
use crate::types::snapshot::{DerivedQuantities, FieldValues};

// Magnus coefficients over water.
const MAGNUS_A: f64 = 17.27;
const MAGNUS_B: f64 = 237.7;
const SATURATION_PRESSURE_AT_ZERO_HPA: f64 = 6.112;

const WIND_CHILL_MAX_TEMP_C: f64 = 10.0;
const WIND_CHILL_MIN_SPEED_MS: f64 = 1.3;
const HEAT_INDEX_MIN_TEMP_C: f64 = 27.0;

/// Apparent temperature. Wind chill applies at or below 10 °C with more than
/// 1.3 m/s of wind, the simple heat index at or above 27 °C when humidity is
/// known. Otherwise the air temperature is returned unchanged.
pub fn feels_like(temperature: f64, humidity: Option<f64>, wind_speed_ms: Option<f64>) -> f64 {
    match (wind_speed_ms, humidity) {
        (Some(v), _) if temperature <= WIND_CHILL_MAX_TEMP_C && v > WIND_CHILL_MIN_SPEED_MS => {
            let v_kmh_pow = (v * 3.6).powf(0.16);
            13.12 + 0.6215 * temperature - 11.37 * v_kmh_pow + 0.3965 * temperature * v_kmh_pow
        }
        (_, Some(rh)) if temperature >= HEAT_INDEX_MIN_TEMP_C => temperature + 0.5 * (rh - 40.0),
        _ => temperature,
    }
}

fn usable_humidity(humidity: f64) -> Option<f64> {
    (humidity > 0.0).then_some(humidity)
}

fn magnus_exponent(temperature: f64) -> f64 {
    MAGNUS_A * temperature / (MAGNUS_B + temperature)
}

pub fn dew_point(temperature: f64, humidity: f64) -> Option<f64> {
    let rh = usable_humidity(humidity)?;
    let gamma = magnus_exponent(temperature) + (rh / 100.0).ln();
    Some(MAGNUS_B * gamma / (MAGNUS_A - gamma))
}

/// Actual vapour pressure in hPa.
pub fn vapour_pressure(temperature: f64, humidity: f64) -> Option<f64> {
    let rh = usable_humidity(humidity)?;
    Some(SATURATION_PRESSURE_AT_ZERO_HPA * magnus_exponent(temperature).exp() * rh / 100.0)
}

/// Absolute humidity in g/m³.
pub fn absolute_humidity(temperature: f64, humidity: f64) -> Option<f64> {
    let e = vapour_pressure(temperature, humidity)?;
    Some(216.7 * e / (273.15 + temperature))
}

pub fn derive(values: &FieldValues) -> DerivedQuantities {
    let Some(t) = values.get(Field::AirTemperature) else {
        return DerivedQuantities::default();
    };
    let rh = values.get(Field::RelativeHumidity);
    DerivedQuantities {
        feels_like: Some(feels_like(t, rh, values.get(Field::WindSpeed))),
        dew_point: rh.and_then(|rh| dew_point(t, rh)),
        vapour_pressure: rh.and_then(|rh| vapour_pressure(t, rh)),
        absolute_humidity: rh.and_then(|rh| absolute_humidity(t, rh)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feels_like_wind_chill() {
        // 0 °C at 5 m/s (18 km/h).
        let chill = feels_like(0.0, Some(80.0), Some(5.0));
        assert!((chill - (-4.94)).abs() < 0.05, "{chill}");
        // Light wind leaves the temperature alone.
        assert_eq!(feels_like(0.0, None, Some(1.0)), 0.0);
    }

    #[test]
    fn test_feels_like_heat() {
        assert_eq!(feels_like(30.0, Some(60.0), Some(3.0)), 40.0);
        assert_eq!(feels_like(30.0, None, None), 30.0);
        assert_eq!(feels_like(20.0, Some(60.0), Some(8.0)), 20.0);
    }

    #[test]
    fn test_dew_point_equals_temperature_when_saturated() {
        let td = dew_point(15.0, 100.0).unwrap();
        assert!((td - 15.0).abs() < 1e-9);
        let td = dew_point(20.0, 50.0).unwrap();
        assert!((td - 9.26).abs() < 0.05, "{td}");
        assert_eq!(dew_point(20.0, 0.0), None);
    }

    #[test]
    fn test_vapour_pressure_and_absolute_humidity() {
        let e = vapour_pressure(20.0, 100.0).unwrap();
        assert!((e - 23.35).abs() < 0.05, "{e}");
        let rho = absolute_humidity(20.0, 100.0).unwrap();
        assert!((rho - 17.3).abs() < 0.1, "{rho}");
    }

    #[test]
    fn test_derive_needs_temperature() {
        let mut values = FieldValues::default();
        values.set(Field::RelativeHumidity, Some(60.0));
        assert_eq!(derive(&values), DerivedQuantities::default());

        values.set(Field::AirTemperature, Some(12.0));
        let derived = derive(&values);
        assert_eq!(derived.feels_like, Some(12.0));
        assert!(derived.dew_point.unwrap() < 12.0);
    }
}
