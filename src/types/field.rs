//! Defines the measured quantities carried by an SHMU one-minute record and the
//! reduction each one uses when five minutes are folded into a single value.

use std::fmt;

/// How a field's five one-minute readings are reduced to one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reduction {
    /// Value from the chronologically last minute that has one.
    Last,
    /// Sum over the minutes that have a value. Missing minutes count as zero.
    Sum,
    /// Arithmetic mean over the minutes that have a value.
    Mean,
    /// Smallest value in the window.
    Min,
    /// Largest value in the window.
    Max,
    /// Cartesian average of a speed/direction pair. The pair is named by the
    /// [`WindPair`] the field belongs to.
    VectorAverage(WindPair),
    /// Most frequent value, ties going to the most recent minute.
    ModeOrLast,
}

/// The two speed/direction pairs the source reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindPair {
    /// `vie_pr_rych` / `vie_pr_smer`: mean wind over the minute.
    Mean,
    /// `vie_vp_rych` / `vie_vp_smer`: the station's own vector-mean wind.
    Vector,
}

impl WindPair {
    pub fn speed_field(self) -> Field {
        match self {
            WindPair::Mean => Field::WindSpeed,
            WindPair::Vector => Field::VectorWindSpeed,
        }
    }

    pub fn direction_field(self) -> Field {
        match self {
            WindPair::Mean => Field::WindDirection,
            WindPair::Vector => Field::VectorWindDirection,
        }
    }
}

/// A measured quantity of an SHMU automatic-station record.
///
/// The discriminant doubles as the index into [`crate::FieldValues`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// `t`: air temperature, °C.
    AirTemperature,
    /// `tprz`: ground-surface temperature, °C.
    GroundTemperature,
    /// `tlak`: station pressure, hPa.
    Pressure,
    /// `vlh_rel`: relative humidity, %.
    RelativeHumidity,
    /// `dohl`: visibility, m.
    Visibility,
    /// `sneh_pokr`: snow depth, cm.
    SnowDepth,
    SoilTemperature5cm,
    SoilTemperature10cm,
    SoilTemperature20cm,
    SoilTemperature50cm,
    SoilTemperature100cm,
    SoilMoisture10cm,
    SoilMoisture20cm,
    SoilMoisture50cm,
    SoilConductivity10cm,
    SoilConductivity20cm,
    SoilConductivity50cm,
    /// `zra_uhrn`: precipitation amount, mm.
    Precipitation,
    /// `zra_trv`: precipitation duration, s.
    PrecipitationDuration,
    /// `sln_trv`: sunshine duration, s.
    SunshineDuration,
    /// `zglo`: global radiation, W/m².
    GlobalRadiation,
    /// `zgama`: gamma dose rate, nSv/h.
    GammaRadiation,
    /// `vie_pr_rych`: mean wind speed, m/s.
    WindSpeed,
    /// `vie_vp_rych`: vector wind speed, m/s.
    VectorWindSpeed,
    /// `vie_min_rych`: minimum wind speed, m/s.
    WindSpeedMin,
    /// `vie_max_rych`: maximum wind speed (gust), m/s.
    WindSpeedMax,
    /// `vie_pr_smer`: mean wind direction, degrees the wind blows from.
    WindDirection,
    /// `vie_vp_smer`: vector wind direction, degrees.
    VectorWindDirection,
    /// `vie_smer_min`: direction at minimum speed.
    WindDirectionAtMin,
    /// `vie_smer_max`: direction at maximum speed.
    WindDirectionAtMax,
    /// `stav_poc`: present-weather code.
    ConditionCode,
}

impl Field {
    pub const COUNT: usize = 31;

    pub const ALL: [Field; Field::COUNT] = [
        Field::AirTemperature,
        Field::GroundTemperature,
        Field::Pressure,
        Field::RelativeHumidity,
        Field::Visibility,
        Field::SnowDepth,
        Field::SoilTemperature5cm,
        Field::SoilTemperature10cm,
        Field::SoilTemperature20cm,
        Field::SoilTemperature50cm,
        Field::SoilTemperature100cm,
        Field::SoilMoisture10cm,
        Field::SoilMoisture20cm,
        Field::SoilMoisture50cm,
        Field::SoilConductivity10cm,
        Field::SoilConductivity20cm,
        Field::SoilConductivity50cm,
        Field::Precipitation,
        Field::PrecipitationDuration,
        Field::SunshineDuration,
        Field::GlobalRadiation,
        Field::GammaRadiation,
        Field::WindSpeed,
        Field::VectorWindSpeed,
        Field::WindSpeedMin,
        Field::WindSpeedMax,
        Field::WindDirection,
        Field::VectorWindDirection,
        Field::WindDirectionAtMin,
        Field::WindDirectionAtMax,
        Field::ConditionCode,
    ];

    /// Position of this field in [`Field::ALL`] and in [`crate::FieldValues`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The JSON key the source uses for this field.
    pub fn key(self) -> &'static str {
        match self {
            Field::AirTemperature => "t",
            Field::GroundTemperature => "tprz",
            Field::Pressure => "tlak",
            Field::RelativeHumidity => "vlh_rel",
            Field::Visibility => "dohl",
            Field::SnowDepth => "sneh_pokr",
            Field::SoilTemperature5cm => "t_pod5",
            Field::SoilTemperature10cm => "t_pod10",
            Field::SoilTemperature20cm => "t_pod20",
            Field::SoilTemperature50cm => "t_pod50",
            Field::SoilTemperature100cm => "t_pod100",
            Field::SoilMoisture10cm => "vlh_pod10",
            Field::SoilMoisture20cm => "vlh_pod20",
            Field::SoilMoisture50cm => "vlh_pod50",
            Field::SoilConductivity10cm => "el_vod_pod10",
            Field::SoilConductivity20cm => "el_vod_pod20",
            Field::SoilConductivity50cm => "el_vod_pod50",
            Field::Precipitation => "zra_uhrn",
            Field::PrecipitationDuration => "zra_trv",
            Field::SunshineDuration => "sln_trv",
            Field::GlobalRadiation => "zglo",
            Field::GammaRadiation => "zgama",
            Field::WindSpeed => "vie_pr_rych",
            Field::VectorWindSpeed => "vie_vp_rych",
            Field::WindSpeedMin => "vie_min_rych",
            Field::WindSpeedMax => "vie_max_rych",
            Field::WindDirection => "vie_pr_smer",
            Field::VectorWindDirection => "vie_vp_smer",
            Field::WindDirectionAtMin => "vie_smer_min",
            Field::WindDirectionAtMax => "vie_smer_max",
            Field::ConditionCode => "stav_poc",
        }
    }

    /// The fixed reduction for this field. Adding a variant without extending
    /// this match fails to compile.
    pub fn reduction(self) -> Reduction {
        match self {
            Field::AirTemperature
            | Field::GroundTemperature
            | Field::Pressure
            | Field::RelativeHumidity
            | Field::Visibility
            | Field::SnowDepth
            | Field::SoilTemperature5cm
            | Field::SoilTemperature10cm
            | Field::SoilTemperature20cm
            | Field::SoilTemperature50cm
            | Field::SoilTemperature100cm
            | Field::SoilMoisture10cm
            | Field::SoilMoisture20cm
            | Field::SoilMoisture50cm
            | Field::SoilConductivity10cm
            | Field::SoilConductivity20cm
            | Field::SoilConductivity50cm
            | Field::WindDirectionAtMin
            | Field::WindDirectionAtMax => Reduction::Last,
            Field::Precipitation | Field::PrecipitationDuration | Field::SunshineDuration => {
                Reduction::Sum
            }
            Field::GlobalRadiation | Field::GammaRadiation => Reduction::Mean,
            Field::WindSpeedMin => Reduction::Min,
            Field::WindSpeedMax => Reduction::Max,
            Field::WindSpeed | Field::WindDirection => Reduction::VectorAverage(WindPair::Mean),
            Field::VectorWindSpeed | Field::VectorWindDirection => {
                Reduction::VectorAverage(WindPair::Vector)
            }
            Field::ConditionCode => Reduction::ModeOrLast,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_is_in_discriminant_order() {
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), i, "{} out of place", field);
        }
    }

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<_> = Field::ALL.iter().map(|f| f.key()).collect();
        assert_eq!(keys.len(), Field::COUNT);
    }

    #[test]
    fn test_wind_pairs_point_back_at_their_fields() {
        for pair in [WindPair::Mean, WindPair::Vector] {
            assert_eq!(pair.speed_field().reduction(), Reduction::VectorAverage(pair));
            assert_eq!(
                pair.direction_field().reduction(),
                Reduction::VectorAverage(pair)
            );
        }
    }

    #[test]
    fn test_accumulating_fields_sum() {
        assert_eq!(Field::Precipitation.reduction(), Reduction::Sum);
        assert_eq!(Field::SunshineDuration.reduction(), Reduction::Sum);
        assert_eq!(Field::AirTemperature.reduction(), Reduction::Last);
        assert_eq!(Field::ConditionCode.reduction(), Reduction::ModeOrLast);
    }
}
