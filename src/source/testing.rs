//! In-memory [`Transport`] for tests.

use crate::source::error::TransportError;
use crate::source::transport::{Transport, TransportResponse};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16),
    Json(String),
    ConnectionError,
    /// Never answers within any sane timeout.
    Hang,
    /// Waits the given milliseconds, then gives the inner reply.
    Delayed(u64, Box<Reply>),
}

/// Serves scripted replies per URL; unscripted URLs answer 404. The last
/// reply in a script repeats forever.
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<String>>,
    finished: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn script(&self, url: &str, replies: Vec<Reply>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(url.to_string(), replies.into());
    }

    /// URLs in the order requests started.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// URLs in the order requests completed.
    pub fn finished(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls().iter().filter(|c| *c == url).count()
    }

    fn next_reply(&self, url: &str) -> Reply {
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or(Reply::Status(404)),
            None => Reply::Status(404),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str, _timeout: Duration) -> Result<TransportResponse, TransportError> {
        self.calls.lock().unwrap().push(url.to_string());
        let mut reply = self.next_reply(url);
        while let Reply::Delayed(ms, inner) = reply {
            sleep(Duration::from_millis(ms)).await;
            reply = *inner;
        }
        let result = match reply {
            Reply::Status(code) => Ok(TransportResponse {
                status: StatusCode::from_u16(code).unwrap(),
                body: Vec::new(),
            }),
            Reply::Json(body) => Ok(TransportResponse {
                status: StatusCode::OK,
                body: body.into_bytes(),
            }),
            Reply::ConnectionError => Err(TransportError::Connection {
                url: url.to_string(),
                message: "connection refused".to_string(),
            }),
            Reply::Hang => {
                sleep(Duration::from_secs(3600)).await;
                Err(TransportError::Timeout(url.to_string()))
            }
            Reply::Delayed(..) => unreachable!(),
        };
        self.finished.lock().unwrap().push(url.to_string());
        result
    }
}
