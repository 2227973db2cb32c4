// mongoseed-core/src/store/schema.rs
//! Collection validators for the in-memory store

use std::collections::HashMap;
use std::str::FromStr;

use bson::{Bson, Document};
use serde_json::Value;

use crate::error::{Result, SeedError};

/// BSON type names accepted in a `bsonType` property
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BsonKind {
    String,
    Int,
    Long,
    Double,
    /// Any of int, long, double
    Number,
    Bool,
    Object,
    Array,
    Date,
    BinData,
    ObjectId,
    Null,
}

impl FromStr for BsonKind {
    type Err = SeedError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "string" => Ok(Self::String),
            "int" => Ok(Self::Int),
            "long" => Ok(Self::Long),
            "double" => Ok(Self::Double),
            "number" => Ok(Self::Number),
            "bool" => Ok(Self::Bool),
            "object" => Ok(Self::Object),
            "array" => Ok(Self::Array),
            "date" => Ok(Self::Date),
            "binData" => Ok(Self::BinData),
            "objectId" => Ok(Self::ObjectId),
            "null" => Ok(Self::Null),
            other => Err(SeedError::Config(format!("Unsupported bsonType '{}'", other))),
        }
    }
}

impl BsonKind {
    pub fn matches(&self, value: &Bson) -> bool {
        match self {
            BsonKind::String => matches!(value, Bson::String(_)),
            BsonKind::Int => matches!(value, Bson::Int32(_)),
            BsonKind::Long => matches!(value, Bson::Int64(_)),
            BsonKind::Double => matches!(value, Bson::Double(_)),
            BsonKind::Number => matches!(value, Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_)),
            BsonKind::Bool => matches!(value, Bson::Boolean(_)),
            BsonKind::Object => matches!(value, Bson::Document(_)),
            BsonKind::Array => matches!(value, Bson::Array(_)),
            BsonKind::Date => matches!(value, Bson::DateTime(_)),
            BsonKind::BinData => matches!(value, Bson::Binary(_)),
            BsonKind::ObjectId => matches!(value, Bson::ObjectId(_)),
            BsonKind::Null => matches!(value, Bson::Null),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BsonKind::String => "string",
            BsonKind::Int => "int",
            BsonKind::Long => "long",
            BsonKind::Double => "double",
            BsonKind::Number => "number",
            BsonKind::Bool => "bool",
            BsonKind::Object => "object",
            BsonKind::Array => "array",
            BsonKind::Date => "date",
            BsonKind::BinData => "binData",
            BsonKind::ObjectId => "objectId",
            BsonKind::Null => "null",
        }
    }
}

/// Collection validator: required fields plus one BSON type per property
///
/// Parsed from the `$jsonSchema` subset
/// `{ "required": [..], "properties": { "<field>": { "bsonType": ".." } } }`.
#[derive(Clone, Debug, Default)]
pub struct CollectionSchema {
    required: Vec<String>,
    properties: HashMap<String, BsonKind>,
}

impl CollectionSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(mut self, field: impl Into<String>) -> Self {
        self.required.push(field.into());
        self
    }

    pub fn property(mut self, field: impl Into<String>, kind: BsonKind) -> Self {
        self.properties.insert(field.into(), kind);
        self
    }

    pub fn from_json(schema: &Value) -> Result<Self> {
        let obj = schema
            .as_object()
            .ok_or_else(|| SeedError::Config("Schema must be a JSON object".to_string()))?;

        let mut parsed = CollectionSchema::new();

        if let Some(required_value) = obj.get("required") {
            let arr = required_value.as_array().ok_or_else(|| {
                SeedError::Config("required must be an array of field names".to_string())
            })?;
            for entry in arr {
                let field = entry
                    .as_str()
                    .ok_or_else(|| SeedError::Config("required entries must be strings".to_string()))?;
                parsed.required.push(field.to_string());
            }
        }

        if let Some(props) = obj.get("properties") {
            let props_obj = props
                .as_object()
                .ok_or_else(|| SeedError::Config("properties must be an object".to_string()))?;
            for (field, property) in props_obj {
                let Some(type_value) = property.get("bsonType") else {
                    continue;
                };
                let type_str = type_value.as_str().ok_or_else(|| {
                    SeedError::Config(format!("Property '{}' bsonType must be a string", field))
                })?;
                let kind: BsonKind = type_str.parse().map_err(|_| {
                    SeedError::Config(format!(
                        "Unsupported bsonType '{}' for field '{}'",
                        type_str, field
                    ))
                })?;
                parsed.properties.insert(field.clone(), kind);
            }
        }

        Ok(parsed)
    }

    pub fn validate(&self, document: &Document) -> Result<()> {
        for field in &self.required {
            if !document.contains_key(field) {
                return Err(SeedError::Validation(format!(
                    "Missing required field '{}'",
                    field
                )));
            }
        }

        for (field, kind) in &self.properties {
            if let Some(value) = document.get(field) {
                if !kind.matches(value) {
                    return Err(SeedError::Validation(format!(
                        "Field '{}' expected bsonType {}",
                        field,
                        kind.as_str()
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use serde_json::json;

    #[test]
    fn test_parse_json_schema_subset() {
        let schema = CollectionSchema::from_json(&json!({
            "required": ["nome", "idade"],
            "properties": {
                "nome": { "bsonType": "string" },
                "idade": { "bsonType": "int" },
                "notes": { "description": "ignored, no bsonType" }
            }
        }))
        .unwrap();

        assert!(schema.validate(&doc! { "nome": "Maria", "idade": 24 }).is_ok());
        assert!(schema.validate(&doc! { "nome": "Maria" }).is_err());
        assert!(schema.validate(&doc! { "nome": "Maria", "idade": "24" }).is_err());
    }

    #[test]
    fn test_rejects_unknown_bson_type() {
        let err = CollectionSchema::from_json(&json!({
            "properties": { "x": { "bsonType": "decimal256" } }
        }))
        .unwrap_err();
        assert!(matches!(err, SeedError::Config(_)));
    }

    #[test]
    fn test_bson_kind_names_round_trip() {
        for name in ["string", "int", "double", "number", "binData", "objectId", "null"] {
            let kind: BsonKind = name.parse().unwrap();
            assert_eq!(kind.as_str(), name);
        }
        assert!("Int".parse::<BsonKind>().is_err());
    }

    #[test]
    fn test_validation_error_kind() {
        let schema = CollectionSchema::new().property("age", BsonKind::Number);
        let err = schema.validate(&doc! { "age": true }).unwrap_err();
        assert!(matches!(err, SeedError::Validation(_)));

        assert!(schema.validate(&doc! { "age": 3.5 }).is_ok());
        assert!(schema.validate(&doc! { "other": 1 }).is_ok());
    }
}
