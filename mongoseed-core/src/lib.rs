// mongoseed-core/src/lib.rs
// Fixture model, document stores and the bulk loader

pub mod config;
pub mod error;
pub mod fixtures;
pub mod loader;
pub mod record;
pub mod store;

// Public exports
pub use config::{Config, ConnectionConfig, FixturesConfig};
pub use error::{Result, SeedError};
pub use fixtures::{SemiStructuredGenerator, USER_IDS};
pub use loader::{FixtureLoader, SeedReport, SemiStructuredOptions, VerifyReport};
pub use record::{Address, Blob, Order, OrderHistoryRecord, ProfileRecord, Record};
pub use store::{BsonKind, CollectionSchema, DocumentStore, InsertManyResult, MemoryStore};
#[cfg(feature = "mongodb")]
pub use store::MongoStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
