//! Response shaping
//!
//! Handlers produce an [`Outcome`]; [`shape`] turns it into a status code and
//! payload. Shaping has no side effects, so every response the service can
//! send is testable without a socket.

use hyper::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};

use crate::store::{Evolution, Record, Upsert};
use crate::types::ApiError;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Single-field read endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Name,
    Image,
    Type,
    Weaknesses,
    Height,
    Weight,
}

impl Projection {
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/getName" => Some(Self::Name),
            "/getImage" => Some(Self::Image),
            "/getType" => Some(Self::Type),
            "/getWeaknesses" => Some(Self::Weaknesses),
            "/getHeight" => Some(Self::Height),
            "/getWeight" => Some(Self::Weight),
            _ => None,
        }
    }

    pub fn project(self, record: &Record) -> Value {
        match self {
            Self::Name => json!(record.name),
            Self::Image => json!(record.image),
            Self::Type => json!(record.types),
            Self::Weaknesses => json!(record.weaknesses),
            Self::Height => json!(record.height),
            Self::Weight => json!(record.weight),
        }
    }
}

/// Which side of the evolution chain was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chain {
    Next,
    Previous,
}

impl Chain {
    fn of(self, record: &Record) -> Option<&Vec<Evolution>> {
        match self {
            Self::Next => record.next_evolution.as_ref(),
            Self::Previous => record.prev_evolution.as_ref(),
        }
    }

    fn none_message(self) -> &'static str {
        match self {
            Self::Next => "Specified pokemon does not have any evolutions",
            Self::Previous => "Specified pokemon does not have any previous evolutions",
        }
    }
}

/// Result of handling one request
#[derive(Debug, Clone)]
pub enum Outcome {
    Record(Record),
    Collection(Vec<Record>),
    Field(Projection, Record),
    Evolution(Chain, Record),
    Upserted(Upsert),
    Updated,
    Failed(ApiError),
}

impl From<ApiError> for Outcome {
    fn from(err: ApiError) -> Self {
        Outcome::Failed(err)
    }
}

/// Response payload
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Static(&'static str),
}

/// Transport-independent response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub payload: Payload,
}

impl ApiResponse {
    pub fn json(status: StatusCode, value: Value) -> Self {
        Self {
            status,
            content_type: JSON_CONTENT_TYPE,
            payload: Payload::Json(value),
        }
    }

    pub fn ok<T: Serialize>(value: &T) -> Self {
        Self::json(StatusCode::OK, serde_json::to_value(value).unwrap_or(Value::Null))
    }

    /// `{message, id}` body shared by errors and plain acknowledgements
    pub fn message(status: StatusCode, message: &str, id: &str) -> Self {
        Self::json(status, json!({ "message": message, "id": id }))
    }

    pub fn error(err: &ApiError) -> Self {
        Self::message(err.status_code(), &err.to_string(), err.tag())
    }

    pub fn static_page(content_type: &'static str, body: &'static str) -> Self {
        Self {
            status: StatusCode::OK,
            content_type,
            payload: Payload::Static(body),
        }
    }

    /// Serialized payload; empty for 204
    pub fn body_bytes(&self) -> Vec<u8> {
        if self.status == StatusCode::NO_CONTENT {
            return Vec::new();
        }
        match &self.payload {
            Payload::Json(value) => serde_json::to_vec(value).unwrap_or_default(),
            Payload::Static(body) => body.as_bytes().to_vec(),
        }
    }

    /// JSON payload, if any
    pub fn json_body(&self) -> Option<&Value> {
        match &self.payload {
            Payload::Json(value) => Some(value),
            Payload::Static(_) => None,
        }
    }
}

/// Map an outcome to its response
pub fn shape(outcome: Outcome) -> ApiResponse {
    match outcome {
        Outcome::Record(record) => ApiResponse::ok(&record),
        Outcome::Collection(records) => ApiResponse::ok(&records),
        Outcome::Field(projection, record) => {
            ApiResponse::json(StatusCode::OK, projection.project(&record))
        }
        Outcome::Evolution(chain, record) => match chain.of(&record) {
            Some(evolutions) if !evolutions.is_empty() => ApiResponse::ok(evolutions),
            _ => ApiResponse::message(StatusCode::OK, chain.none_message(), "success"),
        },
        Outcome::Upserted(Upsert::Created) => ApiResponse::message(
            StatusCode::CREATED,
            "Successfully added new pokemon",
            "success",
        ),
        Outcome::Upserted(Upsert::Updated) | Outcome::Updated => {
            ApiResponse::json(StatusCode::NO_CONTENT, json!({}))
        }
        Outcome::Failed(err) => ApiResponse::error(&err),
    }
}

/// 404 for anything the routing table does not know
pub fn not_found() -> ApiResponse {
    ApiResponse::error(&ApiError::NotFound)
}
