//! Serde model of the SHMU "aws1min" document: a 5-minute file holding one
//! record per station per minute.

use crate::types::field::Field;
use serde::{Deserialize, Deserializer, Serialize};

/// A decoded 5-minute source document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcePayload {
    /// Opaque document identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Human-readable dataset label, e.g. "Automatic stations".
    #[serde(default)]
    pub dataset: Option<String>,
    /// Declared record interval, e.g. "1 minute".
    #[serde(default)]
    pub interval: Option<String>,
    /// Declared publication frequency, e.g. "5 minute".
    #[serde(default)]
    pub frequency: Option<String>,
    /// Declared counts, used only as a sanity check.
    #[serde(default)]
    pub statistics: Option<Statistics>,
    /// The per-minute records, in no particular order.
    pub data: Vec<MinuteRecord>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(default)]
    pub stations_count: Option<u64>,
    #[serde(default)]
    pub records_count: Option<u64>,
}

impl SourcePayload {
    /// Distinct station ids present in the payload, sorted.
    pub fn station_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .data
            .iter()
            .filter(|r| !r.station_id.is_empty())
            .map(|r| r.station_id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    pub fn contains_station(&self, station_id: &str) -> bool {
        self.data.iter().any(|r| r.station_id == station_id)
    }
}

/// One station's readings for one minute.
///
/// `minuta` is labelled UTC by the source but is really UTC+1; use
/// [`crate::correct_source_timestamp`] before interpreting it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MinuteRecord {
    #[serde(rename = "ind_kli", deserialize_with = "station_id_from_any", default)]
    pub station_id: String,
    #[serde(rename = "minuta", default)]
    pub timestamp: String,

    #[serde(default)]
    pub t: Option<f64>,
    #[serde(default)]
    pub tprz: Option<f64>,
    #[serde(default)]
    pub tlak: Option<f64>,
    #[serde(default)]
    pub vlh_rel: Option<f64>,
    #[serde(default)]
    pub dohl: Option<f64>,
    #[serde(default)]
    pub sneh_pokr: Option<f64>,
    #[serde(default)]
    pub t_pod5: Option<f64>,
    #[serde(default)]
    pub t_pod10: Option<f64>,
    #[serde(default)]
    pub t_pod20: Option<f64>,
    #[serde(default)]
    pub t_pod50: Option<f64>,
    #[serde(default)]
    pub t_pod100: Option<f64>,
    #[serde(default)]
    pub vlh_pod10: Option<f64>,
    #[serde(default)]
    pub vlh_pod20: Option<f64>,
    #[serde(default)]
    pub vlh_pod50: Option<f64>,
    #[serde(default)]
    pub el_vod_pod10: Option<f64>,
    #[serde(default)]
    pub el_vod_pod20: Option<f64>,
    #[serde(default)]
    pub el_vod_pod50: Option<f64>,
    #[serde(default)]
    pub zra_uhrn: Option<f64>,
    #[serde(default)]
    pub zra_trv: Option<f64>,
    #[serde(default)]
    pub sln_trv: Option<f64>,
    #[serde(default)]
    pub zglo: Option<f64>,
    #[serde(default)]
    pub zgama: Option<f64>,
    #[serde(default)]
    pub vie_pr_rych: Option<f64>,
    #[serde(default)]
    pub vie_vp_rych: Option<f64>,
    #[serde(default)]
    pub vie_min_rych: Option<f64>,
    #[serde(default)]
    pub vie_max_rych: Option<f64>,
    #[serde(default)]
    pub vie_pr_smer: Option<f64>,
    #[serde(default)]
    pub vie_vp_smer: Option<f64>,
    #[serde(default)]
    pub vie_smer_min: Option<f64>,
    #[serde(default)]
    pub vie_smer_max: Option<f64>,
    #[serde(default)]
    pub stav_poc: Option<f64>,
}

impl MinuteRecord {
    /// Reads a measured field. Non-finite values are treated as missing.
    pub fn get(&self, field: Field) -> Option<f64> {
        let value = match field {
            Field::AirTemperature => self.t,
            Field::GroundTemperature => self.tprz,
            Field::Pressure => self.tlak,
            Field::RelativeHumidity => self.vlh_rel,
            Field::Visibility => self.dohl,
            Field::SnowDepth => self.sneh_pokr,
            Field::SoilTemperature5cm => self.t_pod5,
            Field::SoilTemperature10cm => self.t_pod10,
            Field::SoilTemperature20cm => self.t_pod20,
            Field::SoilTemperature50cm => self.t_pod50,
            Field::SoilTemperature100cm => self.t_pod100,
            Field::SoilMoisture10cm => self.vlh_pod10,
            Field::SoilMoisture20cm => self.vlh_pod20,
            Field::SoilMoisture50cm => self.vlh_pod50,
            Field::SoilConductivity10cm => self.el_vod_pod10,
            Field::SoilConductivity20cm => self.el_vod_pod20,
            Field::SoilConductivity50cm => self.el_vod_pod50,
            Field::Precipitation => self.zra_uhrn,
            Field::PrecipitationDuration => self.zra_trv,
            Field::SunshineDuration => self.sln_trv,
            Field::GlobalRadiation => self.zglo,
            Field::GammaRadiation => self.zgama,
            Field::WindSpeed => self.vie_pr_rych,
            Field::VectorWindSpeed => self.vie_vp_rych,
            Field::WindSpeedMin => self.vie_min_rych,
            Field::WindSpeedMax => self.vie_max_rych,
            Field::WindDirection => self.vie_pr_smer,
            Field::VectorWindDirection => self.vie_vp_smer,
            Field::WindDirectionAtMin => self.vie_smer_min,
            Field::WindDirectionAtMax => self.vie_smer_max,
            Field::ConditionCode => self.stav_poc,
        };
        value.filter(|v| v.is_finite())
    }
}

// The source sends `ind_kli` as a string in some files and as a number in others.
#[derive(Deserialize)]
#[serde(untagged)]
enum StationIdRepr {
    Text(String),
    Integer(u64),
    Float(f64),
}

fn station_id_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<StationIdRepr>::deserialize(deserializer)?;
    Ok(match repr {
        Some(StationIdRepr::Text(s)) => s.trim().to_string(),
        Some(StationIdRepr::Integer(n)) => n.to_string(),
        Some(StationIdRepr::Float(f)) if f.fract() == 0.0 && f >= 0.0 => format!("{}", f as u64),
        Some(StationIdRepr::Float(f)) => f.to_string(),
        None => String::new(),
    })
}
