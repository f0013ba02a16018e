//! Pokedex data endpoints
//!
//! ## Reads (GET, `?id=`)
//!
//! - `/getPokemon` - full record
//! - `/getAllPokemon` - whole collection
//! - `/getName`, `/getImage`, `/getType`, `/getWeaknesses`, `/getHeight`,
//!   `/getWeight` - one field
//! - `/getEvolution`, `/getPrevEvolution` - evolution chain
//!
//! ## Mutations (POST, JSON or form body)
//!
//! - `/addPokemon` - create, or overwrite an existing record's fields
//! - `/updateName`, `/updateImage`, `/updateType`, `/updateHeight`,
//!   `/updateWeight` - change one field of an existing record
//! - `/addType` - append a type to an existing record

use tracing::{debug, info};

use super::shape::{Chain, Outcome, Projection};
use crate::resolve::{QueryParams, Resolver};
use crate::store::{RecordStore, StoreError};
use crate::types::ApiError;
use crate::validation::{self, FieldMap, Mutation};

pub async fn get_pokemon(store: &RecordStore, query: &QueryParams) -> Outcome {
    match Resolver::new(store).record(query).await {
        Ok(record) => Outcome::Record(record),
        Err(err) => err.into(),
    }
}

pub async fn get_all_pokemon(store: &RecordStore) -> Outcome {
    Outcome::Collection(store.list_all().await)
}

pub async fn get_field(store: &RecordStore, query: &QueryParams, projection: Projection) -> Outcome {
    match Resolver::new(store).record(query).await {
        Ok(record) => Outcome::Field(projection, record),
        Err(err) => err.into(),
    }
}

pub async fn get_evolution(store: &RecordStore, query: &QueryParams, chain: Chain) -> Outcome {
    match Resolver::new(store).record(query).await {
        Ok(record) => Outcome::Evolution(chain, record),
        Err(err) => err.into(),
    }
}

/// Route a mutation to its handler
pub async fn mutate(store: &RecordStore, op: Mutation, body: &FieldMap) -> Outcome {
    let result = match op {
        Mutation::AddPokemon => add_pokemon(store, body).await,
        Mutation::AddType => add_type(store, body).await,
        _ => update_field(store, op, body).await,
    };
    result.unwrap_or_else(Outcome::Failed)
}

/// Create a record, or overwrite every supplied field of an existing one
async fn add_pokemon(store: &RecordStore, body: &FieldMap) -> Result<Outcome, ApiError> {
    let (id, patch) = validation::validated(Mutation::AddPokemon, body)?;
    let upsert = store.upsert_fields(id, patch).await.map_err(store_error)?;
    info!(id, outcome = ?upsert, "addPokemon");
    Ok(Outcome::Upserted(upsert))
}

async fn add_type(store: &RecordStore, body: &FieldMap) -> Result<Outcome, ApiError> {
    let (id, patch) = validation::validated(Mutation::AddType, body)?;
    let types = patch.types.ok_or_else(|| ApiError::MissingFields(vec!["type"]))?;
    debug!(id, types = ?types.as_slice(), "addType");
    store.append_type(id, types).await.map_err(store_error)?;
    Ok(Outcome::Updated)
}

async fn update_field(store: &RecordStore, op: Mutation, body: &FieldMap) -> Result<Outcome, ApiError> {
    let (id, patch) = validation::validated(op, body)?;
    store.update_fields(id, patch).await.map_err(store_error)?;
    info!(id, path = op.path(), "Record updated");
    Ok(Outcome::Updated)
}

fn store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::UnknownId(_) | StoreError::Conflict(_) => ApiError::InvalidParam,
        StoreError::Incomplete(missing) => ApiError::MissingFields(missing),
    }
}
