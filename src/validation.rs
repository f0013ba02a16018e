//! Field validation for mutation requests
//!
//! Bodies arrive as a JSON object map regardless of their wire encoding.
//! Validation only checks presence: a field is missing when it is absent,
//! `null`, an empty string, or an empty `type` list. Values such as `"0"` or
//! `0` count as present. Once the required set is there the body is turned
//! into a typed [`RecordPatch`] carrying only the fields the operation may set.

use serde_json::{Map, Value};

use crate::resolve::parse_id;
use crate::store::{RecordPatch, TypeList};
use crate::types::ApiError;

/// Decoded request body
pub type FieldMap = Map<String, Value>;

/// Accepted alternative spellings for body fields
const ALIASES: &[(&str, &str)] = &[("image", "img")];

/// Mutation endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutation {
    AddPokemon,
    UpdateName,
    UpdateImage,
    AddType,
    UpdateType,
    UpdateHeight,
    UpdateWeight,
}

impl Mutation {
    pub const ALL: [Mutation; 7] = [
        Mutation::AddPokemon,
        Mutation::UpdateName,
        Mutation::UpdateImage,
        Mutation::AddType,
        Mutation::UpdateType,
        Mutation::UpdateHeight,
        Mutation::UpdateWeight,
    ];

    /// Route path of this mutation
    pub fn path(self) -> &'static str {
        match self {
            Mutation::AddPokemon => "/addPokemon",
            Mutation::UpdateName => "/updateName",
            Mutation::UpdateImage => "/updateImage",
            Mutation::AddType => "/addType",
            Mutation::UpdateType => "/updateType",
            Mutation::UpdateHeight => "/updateHeight",
            Mutation::UpdateWeight => "/updateWeight",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.path() == path)
    }

    /// Body fields that must be present, in message order
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Mutation::AddPokemon => &[
                "id",
                "num",
                "name",
                "image",
                "type",
                "height",
                "weight",
                "weaknesses",
            ],
            Mutation::UpdateName => &["id", "name"],
            Mutation::UpdateImage => &["id", "image"],
            Mutation::AddType | Mutation::UpdateType => &["id", "type"],
            Mutation::UpdateHeight => &["id", "height"],
            Mutation::UpdateWeight => &["id", "weight"],
        }
    }
}

/// Look up a body field by its canonical name or an accepted alias
fn lookup<'a>(body: &'a FieldMap, field: &str) -> Option<&'a Value> {
    body.get(field).or_else(|| {
        ALIASES
            .iter()
            .find(|(canonical, _)| *canonical == field)
            .and_then(|(_, alias)| body.get(*alias))
    })
}

/// Whether `field` carries a usable value
pub fn is_present(body: &FieldMap, field: &str) -> bool {
    match lookup(body, field) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) if field == "type" => !items.is_empty(),
        Some(_) => true,
    }
}

/// Check the required-field set of `op`
pub fn validate(op: Mutation, body: &FieldMap) -> Result<(), ApiError> {
    let missing: Vec<&'static str> = op
        .required_fields()
        .iter()
        .copied()
        .filter(|field| !is_present(body, field))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::MissingFields(missing))
    }
}

fn scalar_string(value: &Value, field: &'static str) -> Result<String, ApiError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(ApiError::MalformedField(field)),
    }
}

fn string_field(body: &FieldMap, field: &'static str) -> Result<Option<String>, ApiError> {
    if !is_present(body, field) {
        return Ok(None);
    }
    match lookup(body, field) {
        Some(value) => scalar_string(value, field).map(Some),
        None => Ok(None),
    }
}

fn list_field(body: &FieldMap, field: &'static str) -> Result<Option<Vec<String>>, ApiError> {
    if !is_present(body, field) {
        return Ok(None);
    }
    match lookup(body, field) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| scalar_string(item, field))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(value) => scalar_string(value, field).map(|s| Some(vec![s])),
        None => Ok(None),
    }
}

/// Parse the body's `id`; an unusable id reads as an invalid identifier
pub fn body_id(body: &FieldMap) -> Result<u32, ApiError> {
    match lookup(body, "id") {
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .filter(|v| *v > 0)
            .ok_or(ApiError::InvalidParam),
        Some(Value::String(s)) => parse_id(s).ok_or(ApiError::InvalidParam),
        Some(Value::Null) | None => Err(ApiError::MissingFields(vec!["id"])),
        Some(_) => Err(ApiError::InvalidParam),
    }
}

/// Build the patch for `op` from an already-validated body
///
/// Only the fields `op` is allowed to change are read; anything else in the
/// body is ignored.
pub fn build_patch(op: Mutation, body: &FieldMap) -> Result<RecordPatch, ApiError> {
    let mut patch = RecordPatch::default();
    for field in op.required_fields() {
        match *field {
            "num" => patch.num = string_field(body, "num")?,
            "name" => patch.name = string_field(body, "name")?,
            "image" => patch.image = string_field(body, "image")?,
            "height" => patch.height = string_field(body, "height")?,
            "weight" => patch.weight = string_field(body, "weight")?,
            "weaknesses" => patch.weaknesses = list_field(body, "weaknesses")?,
            "type" => {
                patch.types = match list_field(body, "type")? {
                    Some(values) => Some(
                        TypeList::new(values).ok_or(ApiError::MalformedField("type"))?,
                    ),
                    None => None,
                };
            }
            _ => {}
        }
    }
    Ok(patch)
}

/// Validate presence, then parse id and patch
pub fn validated(op: Mutation, body: &FieldMap) -> Result<(u32, RecordPatch), ApiError> {
    validate(op, body)?;
    let id = body_id(body)?;
    let patch = build_patch(op, body)?;
    Ok((id, patch))
}
