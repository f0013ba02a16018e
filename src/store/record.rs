//! Record types
//!
//! The wire format follows the seed data (`img`, `type`, `next_evolution`),
//! with the longer spellings (`image`, `nextEvolution`) accepted on input.

use serde::{Deserialize, Serialize};

/// Wire shape of the `type` field: a bare string or a list of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeShape {
    Single(String),
    Multiple(Vec<String>),
}

/// Ordered, non-empty list of category strings
///
/// A one-element list serializes back to a bare string so records keep the
/// shape they were seeded with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TypeShape", into = "TypeShape")]
pub struct TypeList(Vec<String>);

impl TypeList {
    pub fn single(value: impl Into<String>) -> Self {
        Self(vec![value.into()])
    }

    /// Build from a list, keeping the first occurrence of each type
    ///
    /// `None` when the list is empty or holds a blank entry.
    pub fn new(values: Vec<String>) -> Option<Self> {
        if values.is_empty() || values.iter().any(|v| v.trim().is_empty()) {
            return None;
        }
        let mut list = Vec::with_capacity(values.len());
        for value in values {
            if !list.contains(&value) {
                list.push(value);
            }
        }
        Some(Self(list))
    }

    /// Append a type, returning false if it is blank or already present
    pub fn push(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.trim().is_empty() || self.0.contains(&value) {
            return false;
        }
        self.0.push(value);
        true
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<TypeShape> for TypeList {
    type Error = &'static str;

    fn try_from(shape: TypeShape) -> Result<Self, Self::Error> {
        match shape {
            TypeShape::Single(value) => Self::new(vec![value]).ok_or("type must not be blank"),
            TypeShape::Multiple(values) => {
                Self::new(values).ok_or("type list must be non-empty with no blank entries")
            }
        }
    }
}

impl From<TypeList> for TypeShape {
    fn from(list: TypeList) -> Self {
        let mut values = list.0;
        if values.len() == 1 {
            TypeShape::Single(values.remove(0))
        } else {
            TypeShape::Multiple(values)
        }
    }
}

/// One step in an evolution chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evolution {
    #[serde(alias = "id")]
    pub num: String,
    pub name: String,
}

/// A single creature entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: u32,
    pub num: String,
    pub name: String,
    #[serde(rename = "img", alias = "image")]
    pub image: String,
    #[serde(rename = "type")]
    pub types: TypeList,
    pub height: String,
    pub weight: String,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(
        rename = "next_evolution",
        alias = "nextEvolution",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub next_evolution: Option<Vec<Evolution>>,
    #[serde(
        rename = "prev_evolution",
        alias = "prevEvolution",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub prev_evolution: Option<Vec<Evolution>>,
}

/// Remove repeated weaknesses, keeping the first occurrence of each
pub fn dedup_weaknesses(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// Partial update: each `Some` field is written, each `None` left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub num: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub types: Option<TypeList>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub weaknesses: Option<Vec<String>>,
}

impl RecordPatch {
    pub fn with_num(mut self, num: impl Into<String>) -> Self {
        self.num = Some(num.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_types(mut self, types: TypeList) -> Self {
        self.types = Some(types);
        self
    }

    pub fn with_height(mut self, height: impl Into<String>) -> Self {
        self.height = Some(height.into());
        self
    }

    pub fn with_weight(mut self, weight: impl Into<String>) -> Self {
        self.weight = Some(weight.into());
        self
    }

    pub fn with_weaknesses(mut self, weaknesses: Vec<String>) -> Self {
        self.weaknesses = Some(weaknesses);
        self
    }

    /// Fields a patch must carry to create a record from scratch
    pub fn missing_for_create(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.num.is_none() {
            missing.push("num");
        }
        if self.name.is_none() {
            missing.push("name");
        }
        if self.image.is_none() {
            missing.push("image");
        }
        if self.types.is_none() {
            missing.push("type");
        }
        if self.height.is_none() {
            missing.push("height");
        }
        if self.weight.is_none() {
            missing.push("weight");
        }
        if self.weaknesses.is_none() {
            missing.push("weaknesses");
        }
        missing
    }

    /// Build a fresh record, or report the creation fields that are unset
    pub fn into_record(self, id: u32) -> Result<Record, Vec<&'static str>> {
        let missing = self.missing_for_create();
        match self {
            RecordPatch {
                num: Some(num),
                name: Some(name),
                image: Some(image),
                types: Some(types),
                height: Some(height),
                weight: Some(weight),
                weaknesses: Some(weaknesses),
            } => Ok(Record {
                id,
                num,
                name,
                image,
                types,
                height,
                weight,
                weaknesses: dedup_weaknesses(weaknesses),
                next_evolution: None,
                prev_evolution: None,
            }),
            _ => Err(missing),
        }
    }

    /// Overwrite the fields this patch sets
    pub fn apply(self, record: &mut Record) {
        if let Some(num) = self.num {
            record.num = num;
        }
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(image) = self.image {
            record.image = image;
        }
        if let Some(types) = self.types {
            record.types = types;
        }
        if let Some(height) = self.height {
            record.height = height;
        }
        if let Some(weight) = self.weight {
            record.weight = weight;
        }
        if let Some(weaknesses) = self.weaknesses {
            record.weaknesses = dedup_weaknesses(weaknesses);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bulbasaur() -> Record {
        Record {
            id: 1,
            num: "001".to_string(),
            name: "Bulbasaur".to_string(),
            image: "http://www.serebii.net/pokemongo/pokemon/001.png".to_string(),
            types: TypeList::single("Grass"),
            height: "0.71 m".to_string(),
            weight: "6.9 kg".to_string(),
            weaknesses: vec!["Fire".to_string(), "Ice".to_string()],
            next_evolution: Some(vec![Evolution {
                num: "002".to_string(),
                name: "Ivysaur".to_string(),
            }]),
            prev_evolution: None,
        }
    }

    #[test]
    fn test_single_type_serializes_as_scalar() {
        let value = serde_json::to_value(bulbasaur()).unwrap();
        assert_eq!(value["type"], json!("Grass"));
        assert_eq!(value["img"], json!("http://www.serebii.net/pokemongo/pokemon/001.png"));
        assert!(value.get("prev_evolution").is_none());
    }

    #[test]
    fn test_multiple_types_serialize_as_list() {
        let mut record = bulbasaur();
        assert!(record.types.push("Poison"));
        let value = serde_json::to_value(record).unwrap();
        assert_eq!(value["type"], json!(["Grass", "Poison"]));
    }

    #[test]
    fn test_type_list_rejects_empty_list() {
        let parsed: Result<TypeList, _> = serde_json::from_value(json!([]));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_type_push_is_idempotent() {
        let mut types = TypeList::single("Grass");
        assert!(types.push("Poison"));
        assert!(!types.push("Poison"));
        assert!(!types.push(" "));
        assert_eq!(types.as_slice(), ["Grass", "Poison"]);
    }

    #[test]
    fn test_type_list_dedups_and_rejects_blanks() {
        let types = TypeList::new(vec!["Grass".into(), "Poison".into(), "Grass".into()]).unwrap();
        assert_eq!(types.as_slice(), ["Grass", "Poison"]);

        assert!(TypeList::new(vec!["Grass".into(), "".into()]).is_none());
        let parsed: Result<TypeList, _> = serde_json::from_value(json!(""));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_record_accepts_long_field_names() {
        let record: Record = serde_json::from_value(json!({
            "id": 7,
            "num": "007",
            "name": "Squirtle",
            "image": "squirtle.png",
            "type": ["Water"],
            "height": "0.51 m",
            "weight": "9.0 kg",
            "weaknesses": ["Electric", "Grass"],
            "nextEvolution": [{"id": "008", "name": "Wartortle"}]
        }))
        .unwrap();
        assert_eq!(record.image, "squirtle.png");
        assert_eq!(record.types.as_slice(), ["Water"]);
        assert_eq!(record.next_evolution.unwrap()[0].num, "008");
    }

    #[test]
    fn test_patch_only_touches_set_fields() {
        let mut record = bulbasaur();
        RecordPatch::default().with_height("0").apply(&mut record);
        assert_eq!(record.height, "0");
        assert_eq!(record.weight, "6.9 kg");
        assert_eq!(record.name, "Bulbasaur");
    }

    #[test]
    fn test_patch_dedups_weaknesses() {
        let mut record = bulbasaur();
        RecordPatch::default()
            .with_weaknesses(vec!["Fire".into(), "Ice".into(), "Fire".into()])
            .apply(&mut record);
        assert_eq!(record.weaknesses, vec!["Fire", "Ice"]);
    }

    #[test]
    fn test_into_record_reports_missing() {
        let err = RecordPatch::default()
            .with_name("Mew")
            .into_record(151)
            .unwrap_err();
        assert!(err.contains(&"num"));
        assert!(!err.contains(&"name"));
    }
}
