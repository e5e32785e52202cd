//! Finds the newest published 5-minute file.
//!
//! The file for a window appears on the server with some delay and under one
//! of several name variants, so the locator walks back through the planned
//! windows. All variants of a window are settled before an older window is
//! touched, which keeps the newest available data ahead of older data even
//! though variants are probed concurrently.

use crate::planning::window_planner::plan_windows;
use crate::source::cascade::{order_suffixes, source_url, SourceUrl, UrlCascade};
use crate::source::config::LocatorConfig;
use crate::source::error::{LocateError, TransportError, ValidationError};
use crate::source::transport::{HttpTransport, Transport};
use crate::source::validator::validate_payload;
use crate::types::minute_record::SourcePayload;
use crate::types::window::WindowCandidate;
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use log::{debug, info, warn};
use reqwest::{StatusCode, Url};
use tokio::sync::RwLock;
use tokio::time::{sleep, timeout, Instant};

/// A validated payload together with where it came from.
#[derive(Debug, Clone)]
pub struct LocatedPayload {
    pub payload: SourcePayload,
    pub candidate: WindowCandidate,
    pub suffix: String,
    pub url: String,
}

/// Why a single URL did not yield a payload.
#[derive(Debug)]
enum UrlFailure {
    /// 404: the file does not exist (yet).
    NotPublished,
    /// Connection error, timeout or 5xx, after all retries.
    Transient(String),
    /// Any other non-success status.
    Fatal(StatusCode),
    Invalid(ValidationError),
    /// Valid, but the caller's acceptance check said no.
    Rejected,
    /// Tried, but the overall deadline ended its attempts early.
    CutOff(String),
    /// Never tried because the deadline had already passed.
    DeadlineExceeded,
}

#[derive(Debug, Default)]
struct CascadeTally {
    urls_tried: usize,
    not_published: usize,
    transient: usize,
    fatal: usize,
    invalid: usize,
    rejected: usize,
    deadline_exceeded: bool,
    last_transient: Option<String>,
}

impl CascadeTally {
    fn record(&mut self, failure: UrlFailure) {
        if !matches!(failure, UrlFailure::DeadlineExceeded) {
            self.urls_tried += 1;
        }
        match failure {
            UrlFailure::NotPublished => self.not_published += 1,
            UrlFailure::Transient(message) => {
                self.transient += 1;
                self.last_transient = Some(message);
            }
            UrlFailure::Fatal(status) => {
                debug!("Counting status {} as fatal", status);
                self.fatal += 1;
            }
            UrlFailure::Invalid(e) => {
                debug!("Counting invalid payload: {}", e);
                self.invalid += 1;
            }
            UrlFailure::Rejected => self.rejected += 1,
            UrlFailure::CutOff(message) => {
                self.transient += 1;
                self.last_transient = Some(message);
                self.deadline_exceeded = true;
            }
            UrlFailure::DeadlineExceeded => self.deadline_exceeded = true,
        }
    }

    fn into_error(self, candidates: usize, deadline: std::time::Duration) -> LocateError {
        if self.deadline_exceeded {
            return LocateError::DataUnavailable {
                candidates,
                urls_tried: self.urls_tried,
                reason: format!("deadline of {:?} elapsed", deadline),
            };
        }
        let reached_server = self.not_published + self.fatal + self.invalid + self.rejected;
        if self.transient > 0 && reached_server == 0 {
            return LocateError::Network {
                urls_tried: self.urls_tried,
                last_error: self.last_transient.unwrap_or_default(),
            };
        }
        LocateError::DataUnavailable {
            candidates,
            urls_tried: self.urls_tried,
            reason: format!(
                "{} not published, {} rejected by status, {} invalid, {} without the requested data, {} network failures",
                self.not_published, self.fatal, self.invalid, self.rejected, self.transient
            ),
        }
    }
}

pub struct SourceLocator<T: Transport = HttpTransport> {
    config: LocatorConfig,
    base_url: Url,
    transport: T,
    suffix_hint: RwLock<Option<String>>,
}

impl SourceLocator<HttpTransport> {
    /// Creates a locator talking to the configured server over HTTP.
    pub fn new(config: LocatorConfig) -> Result<Self, LocateError> {
        let transport = HttpTransport::new(&config.user_agent)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> SourceLocator<T> {
    pub fn with_transport(config: LocatorConfig, transport: T) -> Result<Self, LocateError> {
        let base_url = config.validate()?;
        Ok(Self {
            config,
            base_url,
            transport,
            suffix_hint: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// The suffix of the last successful fetch, tried first next time.
    pub async fn suffix_hint(&self) -> Option<String> {
        self.suffix_hint.read().await.clone()
    }

    /// URL of one candidate window under one file name variant.
    pub fn source_url(&self, candidate: &WindowCandidate, suffix: &str) -> String {
        source_url(&self.base_url, &self.config.file_prefix, candidate, suffix)
    }

    /// Returns the newest valid payload published at or before `now`.
    pub async fn locate(&self, now: DateTime<Utc>) -> Result<LocatedPayload, LocateError> {
        self.locate_matching(now, |_| true).await
    }

    /// Like [`locate`](Self::locate), but a valid payload is only accepted if
    /// `accept` returns `true` for it. Rejected payloads make the cascade
    /// continue with older windows.
    pub async fn locate_matching<F>(
        &self,
        now: DateTime<Utc>,
        accept: F,
    ) -> Result<LocatedPayload, LocateError>
    where
        F: Fn(&SourcePayload) -> bool + Sync,
    {
        let candidates = plan_windows(now, self.config.depth);
        self.run_cascade(&candidates, &accept).await
    }

    /// Fetches exactly one window, trying each file name variant.
    pub async fn locate_window(
        &self,
        candidate: WindowCandidate,
    ) -> Result<LocatedPayload, LocateError> {
        self.run_cascade(&[candidate], &|_: &SourcePayload| true)
            .await
    }

    async fn run_cascade(
        &self,
        candidates: &[WindowCandidate],
        accept: &(dyn Fn(&SourcePayload) -> bool + Sync),
    ) -> Result<LocatedPayload, LocateError> {
        let deadline = Instant::now() + self.config.deadline;
        let hint = self.suffix_hint().await;
        let suffixes = order_suffixes(&self.config.suffixes, hint.as_deref());
        let mut cascade =
            UrlCascade::new(&self.base_url, &self.config.file_prefix, candidates, suffixes)
                .peekable();
        let mut tally = CascadeTally::default();

        while let Some(first) = cascade.next() {
            let mut batch = vec![first];
            while let Some(next) = cascade.next_if(|u| u.candidate_index == batch[0].candidate_index)
            {
                batch.push(next);
            }

            if Instant::now() >= deadline {
                tally.record(UrlFailure::DeadlineExceeded);
                break;
            }

            debug!("Probing window {}", batch[0].candidate);
            if let Some(found) = self
                .probe_window(batch, hint.as_deref(), deadline, accept, &mut tally)
                .await
            {
                info!(
                    "Located window {} at {} ({} records)",
                    found.candidate,
                    found.url,
                    found.payload.data.len()
                );
                *self.suffix_hint.write().await = Some(found.suffix.clone());
                return Ok(found);
            }
        }

        let error = tally.into_error(candidates.len(), self.config.deadline);
        warn!("Giving up: {}", error);
        Err(error)
    }

    /// Tries every variant of one window. The hinted variant, when present,
    /// goes alone first; the remaining variants run concurrently and the
    /// earliest variant in order wins if several succeed.
    async fn probe_window(
        &self,
        mut batch: Vec<SourceUrl>,
        hint: Option<&str>,
        deadline: Instant,
        accept: &(dyn Fn(&SourcePayload) -> bool + Sync),
        tally: &mut CascadeTally,
    ) -> Option<LocatedPayload> {
        if hint.is_some() && batch.first().map(|u| u.suffix.as_str()) == hint {
            let hinted = batch.remove(0);
            match self.fetch_url(&hinted.url, deadline, accept).await {
                Ok(payload) => return Some(Self::located(hinted, payload)),
                Err(failure) => tally.record(failure),
            }
        }

        let results = join_all(
            batch
                .iter()
                .map(|source| self.fetch_url(&source.url, deadline, accept)),
        )
        .await;

        let mut found = None;
        for (source, result) in batch.into_iter().zip(results) {
            match result {
                Ok(payload) if found.is_none() => found = Some(Self::located(source, payload)),
                Ok(_) => tally.urls_tried += 1,
                Err(failure) => tally.record(failure),
            }
        }
        found
    }

    fn located(source: SourceUrl, payload: SourcePayload) -> LocatedPayload {
        LocatedPayload {
            payload,
            candidate: source.candidate,
            suffix: source.suffix,
            url: source.url,
        }
    }

    /// Fetches and validates one URL, retrying transient failures with
    /// capped exponential backoff within the overall deadline.
    async fn fetch_url(
        &self,
        url: &str,
        deadline: Instant,
        accept: &(dyn Fn(&SourcePayload) -> bool + Sync),
    ) -> Result<SourcePayload, UrlFailure> {
        let mut retry = 0u32;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(UrlFailure::DeadlineExceeded);
            }
            let attempt_timeout = self.config.attempt_timeout.min(remaining);

            let outcome = match timeout(attempt_timeout, self.transport.get(url, attempt_timeout)).await
            {
                Ok(outcome) => outcome,
                Err(_) => Err(TransportError::Timeout(url.to_string())),
            };

            let failure = match outcome {
                Ok(response) if response.status.is_success() => {
                    return match validate_payload(&response.body, url) {
                        Ok(payload) if accept(&payload) => Ok(payload),
                        Ok(_) => {
                            debug!("{} does not contain the requested data", url);
                            Err(UrlFailure::Rejected)
                        }
                        Err(e) => {
                            warn!("Discarding invalid payload: {}", e);
                            Err(UrlFailure::Invalid(e))
                        }
                    };
                }
                Ok(response) if response.status == StatusCode::NOT_FOUND => {
                    debug!("{} is not published", url);
                    return Err(UrlFailure::NotPublished);
                }
                Ok(response) if response.status.is_server_error() => {
                    format!("{} answered {}", url, response.status)
                }
                Ok(response) => {
                    warn!("{} answered {}", url, response.status);
                    return Err(UrlFailure::Fatal(response.status));
                }
                Err(e) => e.to_string(),
            };

            if Instant::now() >= deadline {
                warn!("{} (deadline reached)", failure);
                return Err(UrlFailure::CutOff(failure));
            }
            if retry >= self.config.max_retries {
                warn!("{} (no retries left)", failure);
                return Err(UrlFailure::Transient(failure));
            }
            let delay = self.config.backoff_delay(retry);
            if Instant::now() + delay >= deadline {
                warn!("{} (deadline too close to retry)", failure);
                return Err(UrlFailure::CutOff(failure));
            }
            retry += 1;
            warn!("{}, retry {} in {:?}", failure, retry, delay);
            sleep(delay).await;
        }
    }
}
