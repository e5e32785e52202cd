//! The HTTP seam of the locator. Production code goes through
//! [`HttpTransport`]; tests plug in a scripted implementation.

use crate::source::error::{LocateError, TransportError};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;

/// Status and body of one completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    /// Empty unless the status was a success.
    pub body: Vec<u8>,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a GET for `url`, giving up after `timeout`.
    async fn get(&self, url: &str, timeout: Duration) -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn get(&self, url: &str, timeout: Duration) -> Result<TransportResponse, TransportError> {
        (**self).get(url, timeout).await
    }
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str) -> Result<Self, LocateError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .build()
            .map_err(LocateError::ClientBuild)?;
        Ok(Self { client })
    }
}

fn classify(url: &str, e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout(url.to_string())
    } else {
        TransportError::Connection {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            debug!("{} answered {}", url, status);
            return Ok(TransportResponse {
                status,
                body: Vec::new(),
            });
        }

        let body = response.bytes().await.map_err(|e| classify(url, e))?;
        debug!("Downloaded {} bytes from {}", body.len(), url);
        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}
