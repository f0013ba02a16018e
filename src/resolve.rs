//! Query resolution
//!
//! Every single-record endpoint identifies its record with the `id` query
//! parameter. A missing parameter and one that does not name an existing
//! record are distinct outcomes; non-numeric and unknown ids look the same
//! to the caller.

use std::collections::HashMap;

use crate::store::{Record, RecordStore};
use crate::types::ApiError;

/// Decoded query string
pub type QueryParams = HashMap<String, String>;

/// Name of the identifying query parameter
pub const ID_PARAM: &str = "id";

/// Identifier known to name an existing record at resolution time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedId(pub u32);

/// Parse a positive record id
pub fn parse_id(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|id| *id > 0)
}

/// Resolves request parameters against a store
pub struct Resolver<'a> {
    store: &'a RecordStore,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Map the `id` parameter to an existing record id
    pub async fn resolve_identifier(&self, params: &QueryParams) -> Result<ParsedId, ApiError> {
        let raw = match params.get(ID_PARAM) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Err(ApiError::MissingParam),
        };
        let id = parse_id(raw).ok_or(ApiError::InvalidParam)?;
        if self.store.contains(id).await {
            Ok(ParsedId(id))
        } else {
            Err(ApiError::InvalidParam)
        }
    }

    pub async fn resolve_record(&self, id: ParsedId) -> Option<Record> {
        self.store.find_by_id(id.0).await
    }

    /// Resolve straight to the record
    pub async fn record(&self, params: &QueryParams) -> Result<Record, ApiError> {
        let id = self.resolve_identifier(params).await?;
        self.resolve_record(id).await.ok_or(ApiError::InvalidParam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{RecordPatch, TypeList};

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn seeded() -> RecordStore {
        let record = RecordPatch::default()
            .with_num("001")
            .with_name("Bulbasaur")
            .with_image("001.png")
            .with_types(TypeList::single("Grass"))
            .with_height("0.71 m")
            .with_weight("6.9 kg")
            .with_weaknesses(vec![])
            .into_record(1)
            .unwrap();
        RecordStore::with_records(vec![record])
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("25"), Some(25));
        assert_eq!(parse_id(" 7 "), Some(7));
        assert_eq!(parse_id("0"), None);
        assert_eq!(parse_id("-1"), None);
        assert_eq!(parse_id("12abc"), None);
        assert_eq!(parse_id("pikachu"), None);
    }

    #[tokio::test]
    async fn test_empty_store_missing_and_invalid() {
        let store = RecordStore::new();
        let resolver = Resolver::new(&store);

        assert_eq!(
            resolver.resolve_identifier(&params(&[])).await,
            Err(ApiError::MissingParam)
        );
        assert_eq!(
            resolver.resolve_identifier(&params(&[("id", "9999")])).await,
            Err(ApiError::InvalidParam)
        );
    }

    #[tokio::test]
    async fn test_empty_param_counts_as_missing() {
        let store = seeded();
        let resolver = Resolver::new(&store);
        assert_eq!(
            resolver.resolve_identifier(&params(&[("id", "")])).await,
            Err(ApiError::MissingParam)
        );
    }

    #[tokio::test]
    async fn test_non_numeric_same_as_unknown() {
        let store = seeded();
        let resolver = Resolver::new(&store);
        assert_eq!(
            resolver.resolve_identifier(&params(&[("id", "abc")])).await,
            Err(ApiError::InvalidParam)
        );
        assert_eq!(
            resolver.resolve_identifier(&params(&[("id", "2")])).await,
            Err(ApiError::InvalidParam)
        );
    }

    #[tokio::test]
    async fn test_resolves_existing_record() {
        let store = seeded();
        let resolver = Resolver::new(&store);
        let id = resolver
            .resolve_identifier(&params(&[("id", "1")]))
            .await
            .unwrap();
        assert_eq!(id, ParsedId(1));
        let record = resolver.resolve_record(id).await.unwrap();
        assert_eq!(record.name, "Bulbasaur");
    }

    #[tokio::test]
    async fn test_num_param_is_not_an_identifier() {
        let store = seeded();
        let resolver = Resolver::new(&store);
        assert_eq!(
            resolver.record(&params(&[("num", "1")])).await.unwrap_err(),
            ApiError::MissingParam
        );
    }
}
