// mongoseed-core/src/store/memory.rs
//! Pure in-memory document store
//!
//! ```text
//! MemoryStore (DocumentStore implementation)
//!      ↓
//! HashMap<database, HashMap<collection, MemoryCollection>>
//! ```
//!
//! Clones share the same data, so `with_database` gives a second handle onto
//! the same "server". Enforces a unique `_id` per collection and optional
//! per-collection schema validation, mirroring what a MongoDB server would
//! reject.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use parking_lot::RwLock;
use tracing::debug;

use super::{CollectionSchema, DocumentStore, InsertManyResult};
use crate::error::{Result, SeedError};

#[derive(Debug, Default)]
struct MemoryCollection {
    documents: Vec<Document>,
    schema: Option<CollectionSchema>,
}

impl MemoryCollection {
    fn contains_id(&self, id: &Bson) -> bool {
        self.documents.iter().any(|d| d.get("_id") == Some(id))
    }
}

type MemoryDatabase = HashMap<String, MemoryCollection>;

#[derive(Clone, Debug)]
pub struct MemoryStore {
    database_name: String,
    databases: Arc<RwLock<HashMap<String, MemoryDatabase>>>,
}

impl MemoryStore {
    pub fn new(database_name: impl Into<String>) -> Self {
        MemoryStore {
            database_name: database_name.into(),
            databases: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Another handle onto the same data with a different database selected
    pub fn with_database(&self, database_name: &str) -> Self {
        MemoryStore {
            database_name: database_name.to_string(),
            databases: Arc::clone(&self.databases),
        }
    }

    /// Attach a validator; later inserts into `collection` are checked against it
    pub fn set_schema(&self, collection: &str, schema: CollectionSchema) {
        let mut databases = self.databases.write();
        databases
            .entry(self.database_name.clone())
            .or_default()
            .entry(collection.to_string())
            .or_default()
            .schema = Some(schema);
    }

    pub fn list_collections(&self) -> Vec<String> {
        let databases = self.databases.read();
        let mut names: Vec<String> = databases
            .get(&self.database_name)
            .map(|db| db.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

/// `_id` first, like the server stores it
fn with_id_first(id: Bson, document: Document) -> Document {
    let mut ordered = Document::new();
    ordered.insert("_id", id);
    for (key, value) in document {
        if key != "_id" {
            ordered.insert(key, value);
        }
    }
    ordered
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn database_name(&self) -> &str {
        &self.database_name
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<InsertManyResult> {
        if documents.is_empty() {
            return Ok(InsertManyResult::default());
        }

        let mut databases = self.databases.write();
        let coll = databases
            .entry(self.database_name.clone())
            .or_default()
            .entry(collection.to_string())
            .or_default();

        let mut inserted_ids = Vec::with_capacity(documents.len());

        for (index, document) in documents.into_iter().enumerate() {
            let id = document
                .get("_id")
                .cloned()
                .unwrap_or_else(|| Bson::ObjectId(ObjectId::new()));

            if let Some(schema) = &coll.schema {
                schema.validate(&document)?;
            }

            if coll.contains_id(&id) {
                debug!(
                    "insert_many into '{}' stopped at document {} after {} inserts",
                    collection,
                    index,
                    inserted_ids.len()
                );
                return Err(SeedError::DuplicateKey {
                    collection: collection.to_string(),
                    message: format!("E11000 duplicate key error dup key: {{ _id: {} }}", id),
                });
            }

            coll.documents.push(with_id_first(id.clone(), document));
            inserted_ids.push(id);
        }

        debug!(
            "Inserted {} documents into '{}.{}'",
            inserted_ids.len(),
            self.database_name,
            collection
        );

        Ok(InsertManyResult {
            inserted_count: inserted_ids.len(),
            inserted_ids,
        })
    }

    async fn count_documents(&self, collection: &str) -> Result<u64> {
        let databases = self.databases.read();
        Ok(databases
            .get(&self.database_name)
            .and_then(|db| db.get(collection))
            .map(|coll| coll.documents.len() as u64)
            .unwrap_or(0))
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>> {
        let databases = self.databases.read();
        Ok(databases
            .get(&self.database_name)
            .and_then(|db| db.get(collection))
            .map(|coll| coll.documents.clone())
            .unwrap_or_default())
    }

    async fn find_by_id(&self, collection: &str, id: &ObjectId) -> Result<Option<Document>> {
        let wanted = Bson::ObjectId(*id);
        let databases = self.databases.read();
        Ok(databases
            .get(&self.database_name)
            .and_then(|db| db.get(collection))
            .and_then(|coll| coll.documents.iter().find(|d| d.get("_id") == Some(&wanted)))
            .cloned())
    }

    async fn drop_collection(&self, collection: &str) -> Result<()> {
        let mut databases = self.databases.write();
        if let Some(db) = databases.get_mut(&self.database_name) {
            if db.remove(collection).is_some() {
                debug!("Dropped collection '{}.{}'", self.database_name, collection);
            }
        }
        Ok(())
    }
}
