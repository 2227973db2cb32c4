// mongoseed-core/src/loader.rs
//! Fixture loader: build records, submit them in one bulk insert
//!
//! Seeding is single-shot and not idempotent. Re-running `seed` against a
//! collection that still holds the fixture fails with `SeedError::DuplicateKey`
//! and leaves the existing documents untouched; call `reset` first to start
//! over.

use bson::oid::ObjectId;
use bson::{Bson, Document};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{Result, SeedError};
use crate::fixtures::{self, SemiStructuredGenerator, EXPECTED_ORDER_LINES, USER_IDS};
use crate::record::{fields, Record};
use crate::store::DocumentStore;

/// What a seeding call wrote
#[derive(Debug, Clone, PartialEq)]
pub struct SeedReport {
    pub database: String,
    pub collection: String,
    pub inserted_count: usize,
    pub inserted_ids: Vec<Bson>,
}

/// Outcome of [`FixtureLoader::verify`]; `violations` is empty when the
/// collection holds exactly the `users` fixture
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerifyReport {
    pub document_count: usize,
    pub violations: Vec<String>,
}

impl VerifyReport {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemiStructuredOptions {
    pub count: usize,
    pub rng_seed: u64,
    pub batch_size: usize,
}

impl Default for SemiStructuredOptions {
    fn default() -> Self {
        SemiStructuredOptions {
            count: fixtures::semi_structured::DEFAULT_COUNT,
            rng_seed: 0,
            batch_size: 1000,
        }
    }
}

/// Seeds one collection of the store's selected database
pub struct FixtureLoader<S> {
    store: S,
    collection: String,
}

impl<S: DocumentStore> FixtureLoader<S> {
    pub fn new(store: S, collection: impl Into<String>) -> Self {
        FixtureLoader {
            store,
            collection: collection.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Insert the four `users` records in one bulk insert
    pub async fn seed(&self) -> Result<SeedReport> {
        let records = fixtures::users()?;
        self.seed_records(&records).await
    }

    pub async fn seed_records(&self, records: &[Record]) -> Result<SeedReport> {
        let documents: Vec<Document> = records.iter().map(Record::to_document).collect();
        debug!(
            "Submitting {} records to '{}.{}'",
            documents.len(),
            self.store.database_name(),
            self.collection
        );

        let result = self
            .store
            .insert_many(&self.collection, documents)
            .await
            .map_err(|e| {
                if e.is_duplicate_key() {
                    warn!(
                        "Collection '{}' already holds fixture ids; reset it before seeding again",
                        self.collection
                    );
                }
                e
            })?;

        info!(
            "Seeded {} documents into '{}.{}'",
            result.inserted_count,
            self.store.database_name(),
            self.collection
        );

        Ok(SeedReport {
            database: self.store.database_name().to_string(),
            collection: self.collection.clone(),
            inserted_count: result.inserted_count,
            inserted_ids: result.inserted_ids,
        })
    }

    /// Drop the target collection
    pub async fn reset(&self) -> Result<()> {
        info!(
            "Dropping '{}.{}'",
            self.store.database_name(),
            self.collection
        );
        self.store.drop_collection(&self.collection).await
    }

    /// Generate `count` semi-structured documents and insert them in batches
    pub async fn seed_semi_structured(&self, options: SemiStructuredOptions) -> Result<SeedReport> {
        if options.batch_size == 0 {
            return Err(SeedError::Config("batch_size must be at least 1".to_string()));
        }

        let mut generator = SemiStructuredGenerator::new(options.rng_seed, Utc::now());
        let mut inserted_ids = Vec::with_capacity(options.count);
        let mut remaining = options.count;

        while remaining > 0 {
            let batch = generator.take(remaining.min(options.batch_size));
            remaining -= batch.len();
            let result = self.store.insert_many(&self.collection, batch).await?;
            inserted_ids.extend(result.inserted_ids);
            debug!(
                "Inserted {}/{} semi-structured documents",
                inserted_ids.len(),
                options.count
            );
        }

        info!(
            "Seeded {} semi-structured documents into '{}.{}' (seed {})",
            inserted_ids.len(),
            self.store.database_name(),
            self.collection,
            options.rng_seed
        );

        Ok(SeedReport {
            database: self.store.database_name().to_string(),
            collection: self.collection.clone(),
            inserted_count: inserted_ids.len(),
            inserted_ids,
        })
    }

    /// Check the collection against the `users` fixture properties
    pub async fn verify(&self) -> Result<VerifyReport> {
        let documents = self.store.find_all(&self.collection).await?;
        let mut violations = Vec::new();

        if documents.len() != USER_IDS.len() {
            violations.push(format!(
                "expected {} documents, found {}",
                USER_IDS.len(),
                documents.len()
            ));
        }

        for hex in USER_IDS {
            let id = ObjectId::parse_str(hex)?;
            let occurrences = documents
                .iter()
                .filter(|d| d.get_object_id(fields::ID).ok() == Some(id))
                .count();
            if occurrences != 1 {
                violations.push(format!("id {} appears {} times", hex, occurrences));
            }
        }

        for document in &documents {
            let label = document
                .get(fields::ID)
                .map(|id| id.to_string())
                .unwrap_or_else(|| "<no _id>".to_string());

            if !document.is_null(fields::NULLABLE) {
                violations.push(format!("{}: {} is not null", label, fields::NULLABLE));
            }
            if document.get_bool(fields::IS_VERIFIED).is_err() {
                violations.push(format!("{}: {} is not a boolean", label, fields::IS_VERIFIED));
            }

            let has_orders = document.contains_key(fields::ORDER_HISTORY);
            let has_profile = document.contains_key(fields::HOBBIES) || document.contains_key(fields::ADDRESS);
            match (has_profile, has_orders) {
                (true, true) => violations.push(format!("{}: mixes profile and order history", label)),
                (false, true) => check_order_history(document, &label, &mut violations),
                _ => check_profile(document, &label, &mut violations),
            }
        }

        if violations.is_empty() {
            info!("'{}' matches the users fixture", self.collection);
        } else {
            warn!(
                "'{}' has {} fixture violations",
                self.collection,
                violations.len()
            );
        }

        Ok(VerifyReport {
            document_count: documents.len(),
            violations,
        })
    }
}

fn check_profile(document: &Document, label: &str, violations: &mut Vec<String>) {
    match document.get_array(fields::HOBBIES) {
        Ok(hobbies) if !hobbies.is_empty() && hobbies.iter().all(|h| matches!(h, Bson::String(_))) => {}
        _ => violations.push(format!(
            "{}: {} must be a non-empty list of text",
            label,
            fields::HOBBIES
        )),
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

fn check_order_history(document: &Document, label: &str, violations: &mut Vec<String>) {
    let orders = match document.get_array(fields::ORDER_HISTORY) {
        Ok(orders) => orders,
        Err(_) => {
            violations.push(format!("{}: {} is not a list", label, fields::ORDER_HISTORY));
            return;
        }
    };

    if orders.len() != EXPECTED_ORDER_LINES.len() {
        violations.push(format!(
            "{}: expected {} orders, found {}",
            label,
            EXPECTED_ORDER_LINES.len(),
            orders.len()
        ));
        return;
    }

    for (index, (order, (quantity, value))) in orders.iter().zip(EXPECTED_ORDER_LINES).enumerate() {
        let line = order.as_document();
        let found_quantity = line.and_then(|l| l.get(fields::QUANTITY)).and_then(as_number);
        let found_value = line.and_then(|l| l.get(fields::VALUE)).and_then(as_number);

        if found_quantity != Some(f64::from(quantity)) {
            violations.push(format!(
                "{}: order {} quantity {:?}, expected {}",
                label, index, found_quantity, quantity
            ));
        }
        match found_value {
            Some(v) if (v - value).abs() < 1e-9 => {}
            other => violations.push(format!(
                "{}: order {} value {:?}, expected {:.2}",
                label, index, other, value
            )),
        }
    }
}
