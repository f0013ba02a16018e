//! Seed data loading
//!
//! The collection is populated once at startup, either from the bundled
//! `data/pokedex.json` or from a file named on the command line. Seed files
//! may be a bare array of records or an object with a `pokemon` array.

use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use super::record::{dedup_weaknesses, Record};
use crate::types::{PokedexError, Result};

/// Seed bundled into the binary
pub const BUNDLED_SEED: &str = include_str!("../../data/pokedex.json");

/// Parse seed JSON, rejecting zero and duplicate ids
///
/// Records are decoded one at a time so a bad entry is reported by its
/// position and name.
pub fn parse_seed(json: &str) -> Result<Vec<Record>> {
    let entries = match serde_json::from_str::<Value>(json)? {
        Value::Array(entries) => entries,
        Value::Object(mut doc) => match doc.remove("pokemon") {
            Some(Value::Array(entries)) => entries,
            _ => {
                return Err(PokedexError::Seed(
                    "expected an array or an object with a 'pokemon' array".to_string(),
                ))
            }
        },
        _ => {
            return Err(PokedexError::Seed(
                "expected an array or an object with a 'pokemon' array".to_string(),
            ))
        }
    };

    let mut seen = HashSet::with_capacity(entries.len());
    let mut out = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let label = entry
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>")
            .to_string();
        let mut record: Record = serde_json::from_value(entry).map_err(|e| {
            PokedexError::Seed(format!("record {} ('{}'): {}", index, label, e))
        })?;
        if record.id == 0 {
            return Err(PokedexError::Seed(format!(
                "record '{}' has id 0; ids must be positive",
                record.name
            )));
        }
        if !seen.insert(record.id) {
            return Err(PokedexError::Seed(format!("duplicate id {}", record.id)));
        }
        record.weaknesses = dedup_weaknesses(record.weaknesses);
        out.push(record);
    }
    Ok(out)
}

/// Load seed records from `path`, or the bundled seed when `None`
pub fn load_seed(path: Option<&Path>) -> Result<Vec<Record>> {
    let records = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|e| {
                PokedexError::Seed(format!("failed to read {}: {}", path.display(), e))
            })?;
            let records = parse_seed(&json)?;
            info!(path = %path.display(), count = records.len(), "Loaded seed file");
            records
        }
        None => {
            let records = parse_seed(BUNDLED_SEED)?;
            info!(count = records.len(), "Loaded bundled seed");
            records
        }
    };
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_bundled_seed_parses() {
        let records = parse_seed(BUNDLED_SEED).unwrap();
        assert!(!records.is_empty());
        assert_eq!(records[0].id, 1);
        assert_eq!(records[0].name, "Bulbasaur");
    }

    #[test]
    fn test_wrapped_seed_document() {
        let json = r#"{"pokemon": [{"id": 1, "num": "001", "name": "Bulbasaur",
            "img": "001.png", "type": ["Grass", "Poison"], "height": "0.71 m",
            "weight": "6.9 kg", "weaknesses": ["Fire"], "candy": "Bulbasaur Candy"}]}"#;
        let records = parse_seed(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].types.len(), 2);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[
            {"id": 1, "num": "001", "name": "A", "img": "a", "type": "Grass",
             "height": "1", "weight": "1", "weaknesses": []},
            {"id": 1, "num": "001", "name": "B", "img": "b", "type": "Fire",
             "height": "1", "weight": "1", "weaknesses": []}
        ]"#;
        let err = parse_seed(json).unwrap_err();
        assert!(err.to_string().contains("duplicate id 1"));
    }

    #[test]
    fn test_bad_record_is_named() {
        let json = r#"[
            {"id": 1, "num": "001", "name": "Bulbasaur", "img": "a", "type": "Grass",
             "height": "1", "weight": "1", "weaknesses": []},
            {"id": 2, "num": "002", "name": "Ivysaur", "img": "b", "type": [],
             "height": "1", "weight": "1", "weaknesses": []}
        ]"#;
        let err = parse_seed(json).unwrap_err();
        assert!(matches!(err, PokedexError::Seed(_)));
        assert!(err.to_string().contains("record 1 ('Ivysaur')"));
    }

    #[test]
    fn test_invalid_json_is_json_error() {
        let err = parse_seed("[{").unwrap_err();
        assert!(matches!(err, PokedexError::Json(_)));

        let err = parse_seed(r#"{"records": []}"#).unwrap_err();
        assert!(matches!(err, PokedexError::Seed(_)));
    }

    #[test]
    fn test_load_seed_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": 150, "num": "150", "name": "Mewtwo", "img": "150.png",
                "type": "Psychic", "height": "2.01 m", "weight": "122.0 kg",
                "weaknesses": ["Bug", "Ghost", "Bug", "Dark"]}}]"#
        )
        .unwrap();

        let records = load_seed(Some(file.path())).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].weaknesses, vec!["Bug", "Ghost", "Dark"]);
    }

    #[test]
    fn test_load_seed_missing_file() {
        let err = load_seed(Some(Path::new("/nonexistent/pokedex.json"))).unwrap_err();
        assert!(matches!(err, PokedexError::Seed(_)));
    }
}
