//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling. Each request is
//! normalized into an `ApiRequest`, routed, and the resulting `ApiResponse`
//! is written with an exact Content-Length. 204 responses and HEAD requests
//! carry no body bytes.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use super::request::{parse_query, ApiRequest};
use crate::config::Args;
use crate::logging::{AccessEvent, AccessLogger};
use crate::routes::{self, ApiResponse};
use crate::store::RecordStore;
use crate::types::{ApiError, PokedexError};

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// The record collection, shared by every handler
    pub store: Arc<RecordStore>,
    /// Per-request access log
    pub access_log: AccessLogger,
}

impl AppState {
    pub fn new(args: Args, store: RecordStore) -> Self {
        Self {
            args,
            store: Arc::new(store),
            access_log: AccessLogger::new(),
        }
    }

    /// Open the configured access-log file, if any
    pub async fn init_access_log(&self) -> Result<(), PokedexError> {
        if let Some(ref path) = self.args.access_log {
            self.access_log.init_file(path.clone()).await?;
        }
        Ok(())
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<(), PokedexError> {
    let addr = state.args.listen_addr();
    let listener = TcpListener::bind(addr).await?;

    info!(
        "Pokedex listening on {} ({} records)",
        addr,
        state.store.len().await
    );

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(io, service)
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Normalize, route, and encode one request
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let mut api_req = ApiRequest::new(method.clone(), path.clone());
    api_req.query = parse_query(req.uri().query());
    api_req.content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let api_resp = match req.collect().await {
        Ok(collected) => {
            api_req.body = collected.to_bytes();
            routes::dispatch(&state.store, &api_req).await
        }
        Err(e) => {
            warn!("Request body error from {}: {}", addr, e);
            ApiResponse::error(&ApiError::MalformedBody(
                "failed to read request body".to_string(),
            ))
        }
    };

    let response = encode_response(&api_resp, method == Method::HEAD);

    let bytes = if method == Method::HEAD {
        0
    } else {
        api_resp.body_bytes().len() as u64
    };
    state
        .access_log
        .log(
            AccessEvent::new(method.as_str(), &path, api_resp.status.as_u16())
                .with_bytes(bytes)
                .with_duration(started.elapsed().as_millis() as u64)
                .with_remote(addr.to_string()),
        )
        .await;

    Ok(response)
}

/// Build the wire response
///
/// Content-Length is the byte length of the serialized payload; HEAD keeps
/// the header but sends no bytes, 204 sends neither.
pub fn encode_response(api_resp: &ApiResponse, head_only: bool) -> Response<Full<Bytes>> {
    let body = api_resp.body_bytes();
    let mut builder = Response::builder()
        .status(api_resp.status)
        .header(CONTENT_TYPE, api_resp.content_type)
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, "*");

    if api_resp.status != StatusCode::NO_CONTENT {
        builder = builder.header(CONTENT_LENGTH, body.len());
    }

    let body = if head_only { Bytes::new() } else { Bytes::from(body) };

    builder.body(Full::new(body)).unwrap_or_else(|_| {
        Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .body(Full::new(Bytes::from(r#"{"message":"Internal error","id":"internalError"}"#)))
            .unwrap()
    })
}
