use crate::stations::error::LookupError;
use crate::types::station::StationMetadata;
use haversine::{distance, Location as HaversineLocation, Units};
use ordered_float::OrderedFloat;
use rstar::RTree;
use std::collections::BTreeMap;

const BUNDLED_STATIONS: &str = include_str!("../../data/stations.json");

/// Resolves a station id to its metadata.
pub trait StationLookup {
    fn lookup(&self, station_id: &str) -> Result<StationMetadata, LookupError>;
}

/// In-memory directory of SHMU automatic stations.
///
/// Lookups by id go through a sorted map; nearest-station queries go through
/// an R-tree and are then ranked by haversine distance.
#[derive(Debug, Clone)]
pub struct StationDirectory {
    by_id: BTreeMap<String, StationMetadata>,
    rtree: RTree<StationMetadata>,
}

impl StationDirectory {
    /// The station list shipped with the crate.
    pub fn bundled() -> Result<Self, LookupError> {
        Self::from_json(BUNDLED_STATIONS)
    }

    /// Parses a JSON array of `{id, name, latitude, longitude, elevation}`.
    pub fn from_json(json: &str) -> Result<Self, LookupError> {
        let stations: Vec<StationMetadata> = serde_json::from_str(json)?;
        Ok(Self::from_stations(stations))
    }

    pub fn from_stations(stations: Vec<StationMetadata>) -> Self {
        let by_id: BTreeMap<String, StationMetadata> = stations
            .into_iter()
            .map(|station| (station.id.clone(), station))
            .collect();
        let rtree = RTree::bulk_load(by_id.values().cloned().collect());
        Self { by_id, rtree }
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn get(&self, station_id: &str) -> Option<&StationMetadata> {
        self.by_id.get(station_id.trim())
    }

    /// All stations, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &StationMetadata> {
        self.by_id.values()
    }

    /// Stations whose name contains `query`, ignoring case and Slovak
    /// diacritics, so "piestany" finds "Piešťany".
    pub fn search(&self, query: &str) -> Vec<&StationMetadata> {
        let needle = fold_name(query.trim());
        if needle.is_empty() {
            return Vec::new();
        }
        self.iter()
            .filter(|station| fold_name(&station.name).contains(&needle))
            .collect()
    }

    /// Up to `n_results` stations within `max_distance_km`, closest first.
    pub fn nearest(
        &self,
        latitude: f64,
        longitude: f64,
        n_results: usize,
        max_distance_km: f64,
    ) -> Vec<(StationMetadata, f64)> {
        if n_results == 0 {
            return vec![];
        }

        // Planar degree distance only approximates the great-circle order,
        // so look at a few more candidates than requested.
        let candidate_limit = (n_results * 2).max(20);
        let mut stations_with_dist: Vec<(StationMetadata, f64)> = self
            .rtree
            .nearest_neighbor_iter(&[latitude, longitude])
            .take(candidate_limit)
            .filter_map(|station| {
                let dist_km = distance(
                    HaversineLocation {
                        latitude,
                        longitude,
                    },
                    HaversineLocation {
                        latitude: station.latitude,
                        longitude: station.longitude,
                    },
                    Units::Kilometers,
                );
                (dist_km <= max_distance_km).then(|| (station.clone(), dist_km))
            })
            .collect();

        stations_with_dist.sort_by_key(|(_, dist)| OrderedFloat(*dist));
        stations_with_dist.truncate(n_results);
        stations_with_dist
    }
}

impl StationLookup for StationDirectory {
    fn lookup(&self, station_id: &str) -> Result<StationMetadata, LookupError> {
        self.get(station_id)
            .cloned()
            .ok_or_else(|| LookupError::StationNotFound(station_id.to_string()))
    }
}

fn fold_name(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'ä' => 'a',
            'č' => 'c',
            'ď' => 'd',
            'é' | 'ě' => 'e',
            'í' => 'i',
            'ĺ' | 'ľ' => 'l',
            'ň' => 'n',
            'ó' | 'ô' | 'ö' => 'o',
            'ŕ' | 'ř' => 'r',
            'š' => 's',
            'ť' => 't',
            'ú' | 'ů' | 'ü' => 'u',
            'ý' => 'y',
            'ž' => 'z',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_directory_loads() {
        let directory = StationDirectory::bundled().unwrap();
        assert!(directory.len() > 100);
        let airport = directory.lookup("11816").unwrap();
        assert_eq!(airport.name, "Bratislava - letisko");
        assert_eq!(airport.elevation, 133);
    }

    #[test]
    fn test_unknown_station_is_not_found() {
        let directory = StationDirectory::bundled().unwrap();
        let err = directory.lookup("00000").unwrap_err();
        assert!(matches!(err, LookupError::StationNotFound(id) if id == "00000"));
    }

    #[test]
    fn test_search_ignores_diacritics() {
        let directory = StationDirectory::bundled().unwrap();
        let hits = directory.search("PIESTANY");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "11826");
        assert!(directory.search("  ").is_empty());
    }

    #[test]
    fn test_nearest_to_bratislava_airport() {
        let directory = StationDirectory::bundled().unwrap();
        let nearest = directory.nearest(48.17, 17.21, 3, 50.0);
        assert_eq!(nearest.len(), 3);
        assert_eq!(nearest[0].0.id, "11816");
        assert!(nearest[0].1 < 1.0);
        assert!(nearest.windows(2).all(|w| w[0].1 <= w[1].1));
        assert!(directory.nearest(48.17, 17.21, 0, 50.0).is_empty());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            StationDirectory::from_json("{"),
            Err(LookupError::DirectoryDecode(_))
        ));
    }
}
