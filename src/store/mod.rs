//! Record storage
//!
//! - `record`: the creature record, its `type` list and partial-update patch
//! - `collection`: the shared in-memory collection
//! - `seed`: startup population from JSON

pub mod collection;
pub mod record;
pub mod seed;

pub use collection::{RecordStore, StoreError, Upsert};
pub use record::{Evolution, Record, RecordPatch, TypeList, TypeShape};
pub use seed::{load_seed, parse_seed};
