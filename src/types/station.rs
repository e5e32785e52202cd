//! Station metadata consumed by the mapper, plus the `rstar` plumbing that
//! lets the bundled directory answer nearest-station queries.

use rstar::{PointDistance, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

/// Static description of an SHMU automatic weather station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationMetadata {
    /// SHMU climatological station number (`ind_kli`), e.g. "11816".
    pub id: String,
    /// Display name, e.g. "Bratislava - letisko".
    pub name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Elevation above sea level in metres.
    pub elevation: i32,
}

/// Treats a station as a degenerate bounding box at its location.
impl RTreeObject for StationMetadata {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.latitude, self.longitude])
    }
}

/// Squared planar distance in degrees, only used to order R-tree candidates.
/// Real distances are computed with haversine afterwards.
impl PointDistance for StationMetadata {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.latitude - point[0];
        let dy = self.longitude - point[1];
        dx * dx + dy * dy
    }
}
