//! Maps SHMU present-weather codes (`stav_poc`) onto OpenWeatherMap condition
//! ids, descriptions and icons.
//!
//! The mapping is not defined by the source, so it is a plain lookup table
//! that callers can replace or extend through [`ConditionTable::insert`].

use std::collections::HashMap;

/// One OpenWeatherMap-style condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// OpenWeatherMap condition id, e.g. 500 for light rain.
    pub id: u16,
    /// Condition group, e.g. "Rain".
    pub main: &'static str,
    pub description: &'static str,
    /// Icon without the day/night suffix, e.g. "10".
    pub icon_base: &'static str,
    /// Cloud cover implied by this condition, if it implies one.
    pub clouds: Option<u8>,
}

impl Condition {
    pub const fn new(
        id: u16,
        main: &'static str,
        description: &'static str,
        icon_base: &'static str,
        clouds: Option<u8>,
    ) -> Self {
        Self {
            id,
            main,
            description,
            icon_base,
            clouds,
        }
    }

    /// Icon code with its `d`/`n` suffix.
    pub fn icon(&self, daylight: bool) -> String {
        format!("{}{}", self.icon_base, if daylight { 'd' } else { 'n' })
    }
}

const CLEAR: Condition = Condition::new(800, "Clear", "clear sky", "01", Some(0));
const FEW_CLOUDS: Condition = Condition::new(801, "Clouds", "few clouds", "02", Some(20));
const SCATTERED_CLOUDS: Condition =
    Condition::new(802, "Clouds", "scattered clouds", "03", Some(40));
const BROKEN_CLOUDS: Condition = Condition::new(803, "Clouds", "broken clouds", "04", Some(75));
const OVERCAST: Condition = Condition::new(804, "Clouds", "overcast clouds", "04", Some(100));

/// Code → condition lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionTable {
    entries: HashMap<i64, Condition>,
}

impl ConditionTable {
    /// An empty table; every lookup falls back to the cloud heuristic.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, code: i64, condition: Condition) -> Option<Condition> {
        self.entries.insert(code, condition)
    }

    pub fn get(&self, code: i64) -> Option<&Condition> {
        self.entries.get(&code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Condition used when no code is available but cloud cover is known.
    pub fn from_cloud_cover(clouds: u8) -> Condition {
        match clouds {
            0..=24 => CLEAR,
            25..=74 => BROKEN_CLOUDS,
            _ => OVERCAST,
        }
    }
}

impl Default for ConditionTable {
    fn default() -> Self {
        let entries = [
            (0, CLEAR),
            (1, FEW_CLOUDS),
            (2, SCATTERED_CLOUDS),
            (3, BROKEN_CLOUDS),
            (4, OVERCAST),
            (5, Condition::new(701, "Mist", "mist", "50", None)),
            (6, Condition::new(741, "Fog", "fog", "50", None)),
            (7, Condition::new(741, "Fog", "thick fog", "50", None)),
            (10, Condition::new(500, "Rain", "light rain", "10", Some(100))),
            (11, Condition::new(501, "Rain", "moderate rain", "10", Some(100))),
            (12, Condition::new(502, "Rain", "heavy rain", "10", Some(100))),
            (13, Condition::new(511, "Rain", "freezing rain", "13", Some(100))),
            (20, Condition::new(600, "Snow", "light snow", "13", Some(100))),
            (21, Condition::new(601, "Snow", "snow", "13", Some(100))),
            (22, Condition::new(602, "Snow", "heavy snow", "13", Some(100))),
            (23, Condition::new(611, "Snow", "sleet", "13", Some(100))),
            (
                30,
                Condition::new(200, "Thunderstorm", "thunderstorm with light rain", "11", Some(100)),
            ),
            (
                31,
                Condition::new(201, "Thunderstorm", "thunderstorm with rain", "11", Some(100)),
            ),
            (
                32,
                Condition::new(202, "Thunderstorm", "thunderstorm with heavy rain", "11", Some(100)),
            ),
            (40, Condition::new(781, "Tornado", "tornado", "50", None)),
            (41, Condition::new(771, "Squall", "squalls", "50", None)),
        ];
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}
