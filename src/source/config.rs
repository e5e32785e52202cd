use crate::planning::window_planner::DEFAULT_DEPTH;
use crate::source::error::LocateError;
use bon::Builder;
use reqwest::Url;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://opendata.shmu.sk/meteorology/climate/now/data";
pub const DEFAULT_FILE_PREFIX: &str = "aws1min - ";
pub const DEFAULT_USER_AGENT: &str = concat!("shmu_now/", env!("CARGO_PKG_VERSION"));

fn default_suffixes() -> Vec<String> {
    vec!["264".to_string(), "263".to_string()]
}

/// Tuning for [`SourceLocator`](crate::source::locator::SourceLocator).
///
/// Every field has a default, so `LocatorConfig::builder().build()` (or
/// [`LocatorConfig::default`]) gives a working configuration against the
/// public SHMU open-data portal.
///
/// ```
/// use shmu_now::LocatorConfig;
/// use std::time::Duration;
///
/// let config = LocatorConfig::builder()
///     .max_retries(1)
///     .deadline(Duration::from_secs(20))
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct LocatorConfig {
    /// Root of the dataset; the date directory is appended to it.
    #[builder(default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    /// Text before the timestamp in every file name.
    #[builder(default = DEFAULT_FILE_PREFIX.to_string())]
    pub file_prefix: String,
    /// File name variants, tried in this order unless a previous success
    /// promoted one of them.
    #[builder(default = default_suffixes())]
    pub suffixes: Vec<String>,
    /// Upper bound for a single HTTP attempt.
    #[builder(default = Duration::from_secs(10))]
    pub attempt_timeout: Duration,
    /// Retries of a transiently failing URL after its first attempt.
    #[builder(default = 2)]
    pub max_retries: u32,
    #[builder(default = Duration::from_millis(500))]
    pub backoff_base: Duration,
    #[builder(default = 2.0)]
    pub backoff_multiplier: f64,
    #[builder(default = Duration::from_secs(8))]
    pub backoff_cap: Duration,
    /// How many windows back from the newest one to look.
    #[builder(default = DEFAULT_DEPTH)]
    pub depth: usize,
    /// Budget for a whole locate call, retries and fallbacks included.
    #[builder(default = Duration::from_secs(60))]
    pub deadline: Duration,
    #[builder(default = DEFAULT_USER_AGENT.to_string())]
    pub user_agent: String,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl LocatorConfig {
    /// Checks the configuration and returns the parsed base URL.
    pub fn validate(&self) -> Result<Url, LocateError> {
        let base = Url::parse(&self.base_url).map_err(|e| {
            LocateError::InvalidConfig(format!("base_url '{}': {}", self.base_url, e))
        })?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(LocateError::InvalidConfig(format!(
                "base_url '{}' must be an http(s) URL",
                self.base_url
            )));
        }
        if self.suffixes.len() < 2 {
            return Err(LocateError::InvalidConfig(format!(
                "at least two file name suffixes are required, got {}",
                self.suffixes.len()
            )));
        }
        if self.suffixes.iter().any(|s| s.trim().is_empty()) {
            return Err(LocateError::InvalidConfig(
                "file name suffixes must not be empty".to_string(),
            ));
        }
        if self.attempt_timeout.is_zero() {
            return Err(LocateError::InvalidConfig(
                "attempt_timeout must be positive".to_string(),
            ));
        }
        if self.attempt_timeout >= self.deadline {
            return Err(LocateError::InvalidConfig(format!(
                "attempt_timeout ({:?}) must be shorter than deadline ({:?})",
                self.attempt_timeout, self.deadline
            )));
        }
        if self.depth == 0 {
            return Err(LocateError::InvalidConfig(
                "depth must be at least 1".to_string(),
            ));
        }
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(LocateError::InvalidConfig(format!(
                "backoff_multiplier must be a finite number >= 1, got {}",
                self.backoff_multiplier
            )));
        }
        Ok(base)
    }

    /// Delay before retry number `retry` (0 for the first retry), capped at
    /// [`backoff_cap`](Self::backoff_cap).
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let secs = self.backoff_base.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        if !secs.is_finite() || secs >= self.backoff_cap.as_secs_f64() {
            self.backoff_cap
        } else {
            Duration::from_secs_f64(secs.max(0.0))
        }
    }
}
