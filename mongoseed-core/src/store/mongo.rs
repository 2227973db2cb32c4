// mongoseed-core/src/store/mongo.rs
//! MongoDB backend over the official async driver

use std::time::Duration;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use tracing::{debug, info};

use super::{DocumentStore, InsertManyResult};
use crate::config::ConnectionConfig;
use crate::error::{Result, SeedError};

/// Unique index violation (E11000)
const DUPLICATE_KEY_CODE: i32 = 11000;
/// `$jsonSchema` / validator rejection
const DOCUMENT_VALIDATION_CODE: i32 = 121;

/// Write rejections that get their own error kind
#[derive(Debug, PartialEq, Eq)]
enum Rejection {
    DuplicateKey,
    Validation,
}

/// First write error code that maps to a [`Rejection`]
fn rejection(codes: &[i32]) -> Option<Rejection> {
    codes.iter().find_map(|code| match *code {
        DUPLICATE_KEY_CODE => Some(Rejection::DuplicateKey),
        DOCUMENT_VALIDATION_CODE => Some(Rejection::Validation),
        _ => None,
    })
}

/// Server codes of the write errors carried by `kind`
fn write_error_codes(kind: &ErrorKind) -> Vec<i32> {
    match kind {
        ErrorKind::InsertMany(failure) => failure
            .write_errors
            .iter()
            .flatten()
            .map(|e| e.code)
            .collect(),
        ErrorKind::Write(WriteFailure::WriteError(e)) => vec![e.code],
        _ => Vec::new(),
    }
}

/// Map a driver error onto the seeding error taxonomy
fn classify(err: mongodb::error::Error, collection: &str) -> SeedError {
    let message = err.to_string();
    match err.kind.as_ref() {
        ErrorKind::Io(_)
        | ErrorKind::ServerSelection { .. }
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::Authentication { .. } => SeedError::Connection(message),
        kind => match rejection(&write_error_codes(kind)) {
            Some(Rejection::DuplicateKey) => SeedError::DuplicateKey {
                collection: collection.to_string(),
                message,
            },
            Some(Rejection::Validation) => SeedError::Validation(message),
            None => SeedError::Database(message),
        },
    }
}

/// Client plus selected database
///
/// The driver connects lazily; call [`DocumentStore::ping`] to surface an
/// unreachable server before the first write.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    database_name: String,
}

impl MongoStore {
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let uri = config.uri();
        let mut options = ClientOptions::parse(&uri)
            .await
            .map_err(|e| SeedError::Connection(e.to_string()))?;

        options.app_name = Some(config.app_name.clone());
        options.server_selection_timeout =
            Some(Duration::from_secs(config.server_selection_timeout_secs));

        let client = Client::with_options(options).map_err(|e| classify(e, ""))?;

        info!(
            "MongoDB client ready for {}:{} (database '{}')",
            config.host, config.port, config.database
        );

        Ok(MongoStore {
            client,
            database_name: config.database.clone(),
        })
    }

    pub fn database(&self) -> Database {
        self.client.database(&self.database_name)
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database().collection::<Document>(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn database_name(&self) -> &str {
        &self.database_name
    }

    async fn ping(&self) -> Result<()> {
        self.database()
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| classify(e, ""))?;
        debug!("Ping to '{}' succeeded", self.database_name);
        Ok(())
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<InsertManyResult> {
        if documents.is_empty() {
            return Ok(InsertManyResult::default());
        }

        let result = self
            .collection(collection)
            .insert_many(documents)
            .await
            .map_err(|e| classify(e, collection))?;

        let mut indexed: Vec<(usize, Bson)> = result.inserted_ids.into_iter().collect();
        indexed.sort_by_key(|(index, _)| *index);
        let inserted_ids: Vec<Bson> = indexed.into_iter().map(|(_, id)| id).collect();

        Ok(InsertManyResult {
            inserted_count: inserted_ids.len(),
            inserted_ids,
        })
    }

    async fn count_documents(&self, collection: &str) -> Result<u64> {
        self.collection(collection)
            .count_documents(doc! {})
            .await
            .map_err(|e| classify(e, collection))
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>> {
        let mut cursor = self
            .collection(collection)
            .find(doc! {})
            .await
            .map_err(|e| classify(e, collection))?;

        let mut documents = Vec::new();
        while cursor.advance().await.map_err(|e| classify(e, collection))? {
            documents.push(
                cursor
                    .deserialize_current()
                    .map_err(|e| classify(e, collection))?,
            );
        }
        Ok(documents)
    }

    async fn find_by_id(&self, collection: &str, id: &ObjectId) -> Result<Option<Document>> {
        self.collection(collection)
            .find_one(doc! { "_id": *id })
            .await
            .map_err(|e| classify(e, collection))
    }

    async fn drop_collection(&self, collection: &str) -> Result<()> {
        self.collection(collection)
            .drop()
            .await
            .map_err(|e| classify(e, collection))?;
        debug!("Dropped collection '{}.{}'", self.database_name, collection);
        Ok(())
    }
}
