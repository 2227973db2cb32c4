// mongoseed-core/src/fixtures/mod.rs
//! Fixture datasets
//!
//! - `users`: four literal records in two shapes (see [`crate::record`])
//! - `semi_structured`: seeded random documents with optional nested fields

pub mod semi_structured;
pub mod users;

use bson::Bson;
use serde_json::Value;

use crate::error::Result;
use crate::record::Record;

pub use semi_structured::SemiStructuredGenerator;
pub use users::{users, DEFAULT_COLLECTION, DEFAULT_DATABASE, EXPECTED_ORDER_LINES, USER_IDS};

/// Render records as relaxed Extended JSON (the form `mongoimport --jsonArray` reads)
pub fn to_extended_json(records: &[Record]) -> Value {
    Value::Array(
        records
            .iter()
            .map(|record| Bson::Document(record.to_document()).into_relaxed_extjson())
            .collect(),
    )
}

/// Pretty-printed Extended JSON of the `users` fixture
pub fn dump_users() -> Result<String> {
    let records = users()?;
    Ok(serde_json::to_string_pretty(&to_extended_json(&records))?)
}
