//! Access logging
//!
//! Every handled request produces an [`AccessEvent`]. Events always go to
//! `tracing`; when an access-log path is configured they are also appended
//! to that file as JSON lines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Request kind, derived from the route
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Data read (GET/HEAD on a data endpoint)
    Read,
    /// Record mutation (POST)
    Mutation,
    /// Static page, health probe, or unmatched path
    Other,
}

/// One handled request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessEvent {
    pub timestamp: DateTime<Utc>,
    pub event_type: EventType,
    pub method: String,
    pub path: String,
    pub status: u16,
    /// Response body size in bytes
    pub bytes: u64,
    pub duration_ms: u64,
    /// Peer address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
}

impl AccessEvent {
    pub fn new(method: &str, path: &str, status: u16) -> Self {
        let event_type = match method {
            "POST" => EventType::Mutation,
            "GET" | "HEAD" if path.starts_with("/get") => EventType::Read,
            _ => EventType::Other,
        };
        Self {
            timestamp: Utc::now(),
            event_type,
            method: method.to_string(),
            path: path.to_string(),
            status,
            bytes: 0,
            duration_ms: 0,
            remote: None,
        }
    }

    pub fn with_bytes(mut self, bytes: u64) -> Self {
        self.bytes = bytes;
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_remote(mut self, remote: String) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Convert to JSONL line
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Access logger that mirrors events to an optional JSONL file
#[derive(Clone, Default)]
pub struct AccessLogger {
    inner: Arc<Mutex<Option<BufWriter<File>>>>,
}

impl AccessLogger {
    /// Logger that only emits tracing events
    pub fn new() -> Self {
        Self::default()
    }

    /// Start appending events to `path`
    pub async fn init_file(&self, path: PathBuf) -> std::io::Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        let mut inner = self.inner.lock().await;
        *inner = Some(BufWriter::new(file));

        info!("Access logging initialized to {}", path.display());
        Ok(())
    }

    pub async fn log(&self, event: AccessEvent) {
        info!(
            method = %event.method,
            path = %event.path,
            status = event.status,
            bytes = event.bytes,
            duration_ms = event.duration_ms,
            remote = event.remote.as_deref().unwrap_or("-"),
            "request"
        );

        let mut inner = self.inner.lock().await;
        let Some(ref mut writer) = *inner else {
            return;
        };

        let line = match event.to_jsonl() {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to serialize access event: {}", e);
                return;
            }
        };
        if let Err(e) = writeln!(writer, "{}", line) {
            error!("Failed to write access event: {}", e);
        }
        if let Err(e) = writer.flush() {
            error!("Failed to flush access log: {}", e);
        }
    }
}
