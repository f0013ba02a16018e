//! HTTP transport
//!
//! - `http`: hyper accept loop and response encoding
//! - `request`: query and body normalization into `ApiRequest`

pub mod http;
pub mod request;

pub use http::{run, AppState};
pub use request::ApiRequest;
