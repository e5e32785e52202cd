//! The main entry point: fetches the newest SHMU 5-minute file and turns it
//! into OpenWeatherMap-style reports for one station or the whole network.

use crate::aggregation::aggregator::{aggregate, aggregate_all};
use crate::error::ShmuError;
use crate::mapping::config::MapperConfig;
use crate::mapping::mapper::map_snapshot;
use crate::source::config::LocatorConfig;
use crate::source::locator::{LocatedPayload, SourceLocator};
use crate::source::transport::{HttpTransport, Transport};
use crate::stations::directory::{StationDirectory, StationLookup};
use crate::types::snapshot::AggregatedSnapshot;
use crate::types::weather_report::WeatherReport;
use crate::types::window::WindowCandidate;
use bon::bon;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::{info, warn};

/// A geographical coordinate: latitude first, then longitude, in degrees.
///
/// ```
/// use shmu_now::LatLon;
///
/// let bratislava = LatLon(48.1486, 17.1077);
/// assert_eq!(bratislava.0, 48.1486);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// The report for one station plus what it was built from.
#[derive(Debug, Clone)]
pub struct CurrentWeather {
    pub report: WeatherReport,
    pub snapshot: AggregatedSnapshot,
    /// The publication window the data came from.
    pub window: WindowCandidate,
    pub source_url: String,
}

/// A station that was present in the payload but could not be reported.
#[derive(Debug)]
pub struct StationFailure {
    pub station_id: String,
    pub error: ShmuError,
}

/// Reports for every station of one payload.
#[derive(Debug)]
pub struct NetworkWeather {
    pub window: WindowCandidate,
    pub source_url: String,
    /// Ordered by station id.
    pub reports: Vec<CurrentWeather>,
    pub failures: Vec<StationFailure>,
}

/// Client for the SHMU "now" dataset.
///
/// ```no_run
/// # use shmu_now::{ShmuNow, ShmuError};
/// # #[tokio::main]
/// # async fn main() -> Result<(), ShmuError> {
/// let client = ShmuNow::new()?;
/// let weather = client.current_weather().station("11816").call().await?;
/// println!("{} °C", weather.report.main.temp.unwrap_or_default());
/// # Ok(())
/// # }
/// ```
pub struct ShmuNow<T: Transport = HttpTransport> {
    locator: SourceLocator<T>,
    directory: StationDirectory,
    mapper: MapperConfig,
}

impl ShmuNow<HttpTransport> {
    /// A client with default settings and the bundled station directory.
    pub fn new() -> Result<Self, ShmuError> {
        Self::with_config(LocatorConfig::default(), MapperConfig::default())
    }

    pub fn with_config(locator: LocatorConfig, mapper: MapperConfig) -> Result<Self, ShmuError> {
        Ok(Self::from_parts(
            SourceLocator::new(locator)?,
            StationDirectory::bundled()?,
            mapper,
        ))
    }
}

#[bon]
impl<T: Transport> ShmuNow<T> {
    pub fn from_parts(
        locator: SourceLocator<T>,
        directory: StationDirectory,
        mapper: MapperConfig,
    ) -> Self {
        Self {
            locator,
            directory,
            mapper,
        }
    }

    pub fn stations(&self) -> &StationDirectory {
        &self.directory
    }

    pub fn locator(&self) -> &SourceLocator<T> {
        &self.locator
    }

    fn report(
        &self,
        station_id: &str,
        snapshot: AggregatedSnapshot,
        located: &LocatedPayload,
    ) -> Result<CurrentWeather, ShmuError> {
        let metadata = self.directory.lookup(station_id)?;
        let report = map_snapshot(
            &snapshot,
            &metadata,
            &self.mapper,
            located.candidate.utc_offset_seconds(),
        )?;
        Ok(CurrentWeather {
            report,
            snapshot,
            window: located.candidate,
            source_url: located.url.clone(),
        })
    }

    /// Current weather at one station.
    ///
    /// Candidate files that do not mention the station are skipped, so a
    /// station that reports late is taken from an older window rather than
    /// missed.
    ///
    /// # Arguments
    ///
    /// * `.station(&str)`: **Required.** SHMU station number, e.g. "11816".
    /// * `.at(DateTime<Utc>)`: Optional. Reference instant, defaults to now.
    ///
    /// # Errors
    ///
    /// [`ShmuError::Lookup`] if the station is unknown, checked before any
    /// request is made. [`ShmuError::Locate`] if no window containing the
    /// station could be fetched.
    #[builder]
    pub async fn current_weather(
        &self,
        station: &str,
        at: Option<DateTime<Utc>>,
    ) -> Result<CurrentWeather, ShmuError> {
        let station = station.trim();
        self.directory.lookup(station)?;

        let located = self
            .locator
            .locate_matching(at.unwrap_or_else(Utc::now), |payload| {
                payload.contains_station(station)
            })
            .await?;
        let snapshot = aggregate(&located.payload, station, Some(located.candidate.records()))?;
        self.report(station, snapshot, &located)
    }

    /// Current weather at the station closest to `location` that has data.
    ///
    /// Stations within `max_distance_km` (default 50) are tried nearest
    /// first, at most `station_limit` (default 3) of them.
    #[builder]
    pub async fn current_weather_near(
        &self,
        location: LatLon,
        max_distance_km: Option<f64>,
        station_limit: Option<usize>,
        at: Option<DateTime<Utc>>,
    ) -> Result<CurrentWeather, ShmuError> {
        let max_distance_km = max_distance_km.unwrap_or(50.0);
        let station_limit = station_limit.unwrap_or(3);
        let candidates =
            self.directory
                .nearest(location.0, location.1, station_limit, max_distance_km);
        if candidates.is_empty() {
            return Err(ShmuError::NoStationWithinRadius {
                radius: max_distance_km,
                lat: location.0,
                lon: location.1,
            });
        }

        let at = at.unwrap_or_else(Utc::now);
        let mut last_error = None;
        for (station, distance_km) in candidates {
            match self
                .current_weather()
                .station(&station.id)
                .at(at)
                .call()
                .await
            {
                Ok(weather) => {
                    info!(
                        "Using station {} ({}) {:.1} km from {:?}",
                        station.id, station.name, distance_km, location
                    );
                    return Ok(weather);
                }
                Err(e) => {
                    warn!("No current data from station {}: {}", station.id, e);
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or(ShmuError::NoStationWithinRadius {
            radius: max_distance_km,
            lat: location.0,
            lon: location.1,
        }))
    }

    /// Reports for every station in the newest published file.
    ///
    /// A station that cannot be reported, e.g. because it is missing from
    /// the directory, ends up in [`NetworkWeather::failures`] instead of
    /// failing the call.
    #[builder]
    pub async fn current_weather_all(
        &self,
        at: Option<DateTime<Utc>>,
    ) -> Result<NetworkWeather, ShmuError> {
        let located = self.locator.locate(at.unwrap_or_else(Utc::now)).await?;
        Ok(self.network_weather(located))
    }

    /// The raw payload of one explicit window, named by its Slovak local
    /// time. Times off the 5-minute grid are rounded down.
    #[builder]
    pub async fn window_at(&self, local: NaiveDateTime) -> Result<LocatedPayload, ShmuError> {
        let candidate = WindowCandidate::at_local(local);
        Ok(self.locator.locate_window(candidate).await?)
    }

    /// Weather at one station for one explicit window.
    ///
    /// # Errors
    ///
    /// [`ShmuError::Aggregate`] if the window holds no data for the station.
    #[builder]
    pub async fn weather_at(
        &self,
        station: &str,
        local: NaiveDateTime,
    ) -> Result<CurrentWeather, ShmuError> {
        let station = station.trim();
        self.directory.lookup(station)?;
        let located = self.window_at().local(local).call().await?;
        let snapshot = aggregate(&located.payload, station, Some(located.candidate.records()))?;
        self.report(station, snapshot, &located)
    }

    fn network_weather(&self, located: LocatedPayload) -> NetworkWeather {
        let snapshots = aggregate_all(&located.payload, Some(located.candidate.records()));
        let mut reports = Vec::with_capacity(snapshots.len());
        let mut failures = Vec::new();
        for snapshot in snapshots {
            let station_id = snapshot.station_id.clone();
            match self.report(&station_id, snapshot, &located) {
                Ok(weather) => reports.push(weather),
                Err(error) => {
                    warn!("Skipping station {}: {}", station_id, error);
                    failures.push(StationFailure { station_id, error });
                }
            }
        }
        info!(
            "Built {} reports from {} ({} stations skipped)",
            reports.len(),
            located.url,
            failures.len()
        );
        NetworkWeather {
            window: located.candidate,
            source_url: located.url,
            reports,
            failures,
        }
    }
}
