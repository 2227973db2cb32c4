// mongoseed-core/src/store/mod.rs
//! Document store abstraction
//!
//! ```text
//! DocumentStore (trait, bound to one database)
//!      ├── MemoryStore  in-process, for tests and --dry-run
//!      └── MongoStore   official async driver (feature "mongodb")
//! ```

pub mod memory;
#[cfg(feature = "mongodb")]
pub mod mongo;
pub mod schema;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};

use crate::error::Result;

pub use memory::MemoryStore;
#[cfg(feature = "mongodb")]
pub use mongo::MongoStore;
pub use schema::{BsonKind, CollectionSchema};

/// Result of insert_many operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertManyResult {
    pub inserted_ids: Vec<Bson>,
    pub inserted_count: usize,
}

/// A document database with a selected database
///
/// `insert_many` is ordered: documents are written in sequence and the call
/// stops at the first failure. Documents written before the failure stay.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn database_name(&self) -> &str;

    /// Round-trip to the server, `SeedError::Connection` when unreachable
    async fn ping(&self) -> Result<()>;

    /// Empty input is a no-op returning an empty result
    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<InsertManyResult>;

    async fn count_documents(&self, collection: &str) -> Result<u64>;

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>>;

    async fn find_by_id(&self, collection: &str, id: &ObjectId) -> Result<Option<Document>>;

    /// Dropping a missing collection is not an error
    async fn drop_collection(&self, collection: &str) -> Result<()>;
}
