//! Shared types

pub mod error;

pub use error::{ApiError, PokedexError, Result};
