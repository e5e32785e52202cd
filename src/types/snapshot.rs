use crate::types::field::Field;
use chrono::{DateTime, Utc};
use std::ops::Index;

/// One optional value per [`Field`], indexed by the field itself.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldValues([Option<f64>; Field::COUNT]);

impl FieldValues {
    pub fn get(&self, field: Field) -> Option<f64> {
        self.0[field.index()]
    }

    pub fn set(&mut self, field: Field, value: Option<f64>) {
        self.0[field.index()] = value;
    }

    /// Fields that carry a value, in [`Field::ALL`] order.
    pub fn present(&self) -> impl Iterator<Item = (Field, f64)> + '_ {
        Field::ALL
            .iter()
            .filter_map(move |&field| self.get(field).map(|v| (field, v)))
    }
}

impl Index<Field> for FieldValues {
    type Output = Option<f64>;

    fn index(&self, field: Field) -> &Self::Output {
        &self.0[field.index()]
    }
}

/// Physical quantities computed from the aggregated temperature, humidity and
/// wind rather than reduced minute by minute.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivedQuantities {
    /// Apparent temperature, °C.
    pub feels_like: Option<f64>,
    /// Dew point, °C.
    pub dew_point: Option<f64>,
    /// Actual vapour pressure, hPa.
    pub vapour_pressure: Option<f64>,
    /// Absolute humidity, g/m³.
    pub absolute_humidity: Option<f64>,
}

/// One station reduced over one 5-minute window of one payload.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedSnapshot {
    pub station_id: String,
    /// Corrected (true UTC) time of the latest minute used.
    pub observed_at: DateTime<Utc>,
    /// Number of distinct minutes the snapshot was built from.
    pub record_count: usize,
    /// `true` when exactly five consecutive minutes were available.
    pub complete: bool,
    pub values: FieldValues,
    pub derived: DerivedQuantities,
    /// Lowest per-minute air temperature in the window.
    pub temperature_min: Option<f64>,
    /// Highest per-minute air temperature in the window.
    pub temperature_max: Option<f64>,
    /// Highest per-minute gust (`vie_max_rych`) in the window.
    pub gust_max: Option<f64>,
}

impl AggregatedSnapshot {
    pub fn value(&self, field: Field) -> Option<f64> {
        self.values.get(field)
    }

    /// The present-weather code, if the window carried one.
    pub fn condition_code(&self) -> Option<i64> {
        self.value(Field::ConditionCode).map(|c| c.round() as i64)
    }
}
