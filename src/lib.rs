//! Pokedex - in-memory creature catalog over HTTP
//!
//! Serves JSON reads and partial updates over a seeded collection of
//! creature records keyed by numeric id.
//!
//! ## Layers
//!
//! - **Store**: the shared record collection with insert / upsert / update
//! - **Validation**: required-field checks and typed patches for mutations
//! - **Resolve**: `id` query parameter to record
//! - **Routes**: routing table and response shaping
//! - **Server**: hyper transport and request normalization

pub mod config;
pub mod logging;
pub mod resolve;
pub mod routes;
pub mod server;
pub mod store;
pub mod types;
pub mod validation;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{ApiError, PokedexError, Result};
