//! HTTP routes for the Pokedex
//!
//! [`dispatch`] is the routing table. It takes a normalized [`ApiRequest`]
//! and returns an [`ApiResponse`] without touching the network, so the
//! transport in `server::http` only converts to and from hyper types.

pub mod health;
pub mod pages;
pub mod pokemon;
pub mod shape;

use hyper::Method;
use tracing::debug;

use crate::server::request::ApiRequest;
use crate::store::RecordStore;
use crate::validation::Mutation;

pub use health::health_check;
pub use shape::{not_found, shape, ApiResponse, Chain, Outcome, Payload, Projection};

/// Route a request to its handler
///
/// GET routes also answer HEAD; the transport drops the body. Any other
/// method/path pair is a 404.
pub async fn dispatch(store: &RecordStore, req: &ApiRequest) -> ApiResponse {
    let is_read = req.method == Method::GET || req.method == Method::HEAD;
    let path = req.path.as_str();

    if is_read {
        if let Some(page) = pages::page(path) {
            return page;
        }
    }

    let outcome = if is_read {
        match path {
            "/health" => return health_check(store).await,
            "/getPokemon" => pokemon::get_pokemon(store, &req.query).await,
            "/getAllPokemon" => pokemon::get_all_pokemon(store).await,
            "/getEvolution" => pokemon::get_evolution(store, &req.query, Chain::Next).await,
            "/getPrevEvolution" => {
                pokemon::get_evolution(store, &req.query, Chain::Previous).await
            }
            _ => match Projection::from_path(path) {
                Some(projection) => pokemon::get_field(store, &req.query, projection).await,
                None => return not_found(),
            },
        }
    } else if req.method == Method::POST {
        let Some(op) = Mutation::from_path(path) else {
            return not_found();
        };
        match req.fields() {
            Ok(body) => pokemon::mutate(store, op, &body).await,
            Err(err) => {
                debug!(path, error = %err, "Rejected request body");
                Outcome::Failed(err)
            }
        }
    } else {
        return not_found();
    };

    shape(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let store = RecordStore::new();
        let resp = dispatch(&store, &ApiRequest::new(Method::GET, "/nope")).await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wrong_method_is_404() {
        let store = RecordStore::new();
        let resp = dispatch(&store, &ApiRequest::new(Method::POST, "/getPokemon")).await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND);

        let resp = dispatch(&store, &ApiRequest::new(Method::DELETE, "/addPokemon")).await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_head_is_routed_like_get() {
        let store = RecordStore::new();
        let resp = dispatch(&store, &ApiRequest::new(Method::HEAD, "/getAllPokemon")).await;
        assert_eq!(resp.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_static_pages() {
        let store = RecordStore::new();
        let resp = dispatch(&store, &ApiRequest::new(Method::GET, "/docs")).await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.content_type, "text/html");
    }
}
