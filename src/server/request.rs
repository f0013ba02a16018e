//! Request normalization
//!
//! Turns the transport's view of a request (method, path, raw query string,
//! content type, body bytes) into [`ApiRequest`]. JSON and form-encoded
//! bodies both decode to the same field map.

use bytes::Bytes;
use hyper::Method;
use serde_json::Value;

use crate::resolve::QueryParams;
use crate::types::ApiError;
use crate::validation::FieldMap;

/// Normalized request consumed by the routing table
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: QueryParams,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
            content_type: None,
            body: Bytes::new(),
        }
    }

    /// Build from a path that may carry a `?query` suffix
    pub fn from_uri(method: Method, uri: &str) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (uri, None),
        };
        let mut req = Self::new(method, path);
        req.query = parse_query(query);
        req
    }

    pub fn with_json(mut self, value: &Value) -> Self {
        self.content_type = Some("application/json".to_string());
        self.body = Bytes::from(value.to_string());
        self
    }

    pub fn with_form(mut self, encoded: &str) -> Self {
        self.content_type = Some("application/x-www-form-urlencoded".to_string());
        self.body = Bytes::from(encoded.to_string());
        self
    }

    pub fn with_body(mut self, content_type: &str, body: impl Into<Bytes>) -> Self {
        self.content_type = Some(content_type.to_string());
        self.body = body.into();
        self
    }

    /// Decode the body into a field map
    pub fn fields(&self) -> Result<FieldMap, ApiError> {
        decode_body(self.content_type.as_deref(), &self.body)
    }
}

/// Decode a query string; the last occurrence of a repeated key wins
pub fn parse_query(query: Option<&str>) -> QueryParams {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return QueryParams::new();
    };
    serde_urlencoded::from_str::<Vec<(String, String)>>(query)
        .map(|pairs| pairs.into_iter().collect())
        .unwrap_or_default()
}

/// Decode a request body according to its content type
///
/// Anything that is not JSON is treated as form-encoded. An empty body is an
/// empty field map.
pub fn decode_body(content_type: Option<&str>, body: &[u8]) -> Result<FieldMap, ApiError> {
    let is_json = content_type
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with("application/json"))
        .unwrap_or(false);

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(FieldMap::new());
    }

    if is_json {
        decode_json(body)
    } else {
        decode_form(body)
    }
}

fn decode_json(body: &[u8]) -> Result<FieldMap, ApiError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::MalformedBody(
            "expected a JSON object".to_string(),
        )),
        Err(e) => Err(ApiError::MalformedBody(e.to_string())),
    }
}

/// Repeated keys collect into a list (`type=Grass&type=Poison`)
fn decode_form(body: &[u8]) -> Result<FieldMap, ApiError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
        .map_err(|e| ApiError::MalformedBody(e.to_string()))?;

    let mut map = FieldMap::new();
    for (key, value) in pairs {
        let key = key.strip_suffix("[]").map(str::to_string).unwrap_or(key);
        match map.get_mut(&key) {
            Some(Value::Array(items)) => items.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
            None => {
                map.insert(key, Value::String(value));
            }
        }
    }
    Ok(map)
}
