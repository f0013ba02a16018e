//! Error types for the Pokedex service
//!
//! `PokedexError` covers process-level failures: configuration, seed loading
//! and binding the listener. Per-request client errors live in [`ApiError`] and are always
//! turned into a JSON response, never propagated.

use hyper::StatusCode;

/// Main error type for Pokedex operations
#[derive(Debug, thiserror::Error)]
pub enum PokedexError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Seed error: {0}")]
    Seed(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<std::io::Error> for PokedexError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PokedexError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Client-facing request errors
///
/// Each variant maps to a status code and a `{message, id}` payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Missing required query parameter 'id'")]
    MissingParam,

    #[error("Invalid query parameter")]
    InvalidParam,

    #[error("Missing one or more required attributes: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Malformed attribute: {0}")]
    MalformedField(&'static str),

    #[error("The requested page was not found")]
    NotFound,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Machine-readable tag carried in the payload's `id` field
    pub fn tag(&self) -> &'static str {
        match self {
            Self::NotFound => "notFound",
            _ => "badRequest",
        }
    }
}

/// Result type alias for Pokedex operations
pub type Result<T> = std::result::Result<T, PokedexError>;
