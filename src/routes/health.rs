//! Health check endpoint
//!
//! `/health` is a liveness probe: it returns 200 whenever the process is
//! serving, along with the current size of the collection.

use serde::Serialize;

use super::shape::ApiResponse;
use crate::store::RecordStore;

/// Health response payload
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall health status (true if service is running)
    pub healthy: bool,
    /// Service version
    pub version: &'static str,
    /// Number of records currently held
    pub records: usize,
    /// Current timestamp
    pub timestamp: String,
}

pub async fn health_check(store: &RecordStore) -> ApiResponse {
    let response = HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION"),
        records: store.len().await,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    ApiResponse::ok(&response)
}
