// Integration tests for the users fixture loader (in-memory store)
use bson::oid::ObjectId;
use bson::Bson;
use mongoseed_core::record::fields;
use mongoseed_core::{
    BsonKind, CollectionSchema, DocumentStore, FixtureLoader, MemoryStore, SeedError, USER_IDS,
};
use std::collections::HashSet;

// Helper: loader over a fresh, empty store
fn fresh_loader() -> FixtureLoader<MemoryStore> {
    FixtureLoader::new(MemoryStore::new("mydatabase"), "users")
}

#[tokio::test]
async fn test_seed_empty_collection_gives_four_documents() {
    let loader = fresh_loader();
    loader.seed().await.unwrap();

    assert_eq!(loader.store().count_documents("users").await.unwrap(), 4);
}

#[tokio::test]
async fn test_each_literal_id_exactly_once() {
    let loader = fresh_loader();
    loader.seed().await.unwrap();

    let docs = loader.store().find_all("users").await.unwrap();
    let ids: Vec<String> = docs
        .iter()
        .map(|d| d.get_object_id("_id").unwrap().to_hex())
        .collect();
    let unique: HashSet<&String> = ids.iter().collect();

    assert_eq!(ids.len(), 4);
    assert_eq!(unique.len(), 4);
    for hex in USER_IDS {
        assert!(ids.iter().any(|id| id == hex), "missing {}", hex);
    }
}

#[tokio::test]
async fn test_profile_records_properties() {
    let loader = fresh_loader();
    loader.seed().await.unwrap();

    let docs = loader.store().find_all("users").await.unwrap();
    let profiles: Vec<_> = docs
        .iter()
        .filter(|d| !d.contains_key(fields::ORDER_HISTORY))
        .collect();
    assert_eq!(profiles.len(), 3);

    for doc in profiles {
        assert!(doc.is_null(fields::NULLABLE));
        let hobbies = doc.get_array(fields::HOBBIES).unwrap();
        assert!(!hobbies.is_empty());
        assert!(hobbies.iter().all(|h| matches!(h, Bson::String(_))));
        doc.get_bool(fields::IS_VERIFIED).unwrap();
    }
}

#[tokio::test]
async fn test_order_history_record_properties() {
    let loader = fresh_loader();
    loader.seed().await.unwrap();

    let docs = loader.store().find_all("users").await.unwrap();
    let shoppers: Vec<_> = docs
        .iter()
        .filter(|d| d.contains_key(fields::ORDER_HISTORY))
        .collect();
    assert_eq!(shoppers.len(), 1);

    let orders = shoppers[0].get_array(fields::ORDER_HISTORY).unwrap();
    assert_eq!(orders.len(), 3);

    let values: Vec<f64> = orders
        .iter()
        .map(|o| o.as_document().unwrap().get_f64(fields::VALUE).unwrap())
        .collect();
    let quantities: Vec<i32> = orders
        .iter()
        .map(|o| o.as_document().unwrap().get_i32(fields::QUANTITY).unwrap())
        .collect();

    assert_eq!(values, vec![50.0, 100.0, 40.0]);
    assert_eq!(quantities, vec![2, 1, 1]);
}

#[tokio::test]
async fn test_reseed_raises_duplicate_and_keeps_originals() {
    let loader = fresh_loader();
    loader.seed().await.unwrap();

    let err = loader.seed().await.unwrap_err();
    assert!(matches!(err, SeedError::DuplicateKey { ref collection, .. } if collection == "users"));

    assert_eq!(loader.store().count_documents("users").await.unwrap(), 4);
    assert!(loader.verify().await.unwrap().is_ok());
}

#[tokio::test]
async fn test_find_maria_by_id() {
    let loader = fresh_loader();
    loader.seed().await.unwrap();

    let id = ObjectId::parse_str("507f1f77bcf86cd799439012").unwrap();
    let maria = loader
        .store()
        .find_by_id("users", &id)
        .await
        .unwrap()
        .expect("Maria should be seeded");

    assert_eq!(maria.get_str(fields::NAME).unwrap(), "Maria");
    assert_eq!(maria.get_i32(fields::AGE).unwrap(), 24);
    assert!(!maria.get_bool(fields::IS_VERIFIED).unwrap());
}

#[tokio::test]
async fn test_greeting_is_plain_text() {
    let loader = fresh_loader();
    loader.seed().await.unwrap();

    let docs = loader.store().find_all("users").await.unwrap();
    let greetings: HashSet<&str> = docs
        .iter()
        .map(|d| d.get_str(fields::GREETING).unwrap())
        .collect();
    assert_eq!(
        greetings,
        ["Hello!", "Hi!", "Hey!", "Hola!"].into_iter().collect()
    );
}

#[tokio::test]
async fn test_schema_violation_surfaces_as_validation_error() {
    let store = MemoryStore::new("mydatabase");
    store.set_schema(
        "users",
        CollectionSchema::new()
            .require(fields::NAME)
            .property(fields::AGE, BsonKind::Long),
    );
    let loader = FixtureLoader::new(store, "users");

    let err = loader.seed().await.unwrap_err();
    assert!(matches!(err, SeedError::Validation(_)));
    assert_eq!(loader.store().count_documents("users").await.unwrap(), 0);
}

#[tokio::test]
async fn test_seed_targets_selected_database_only() {
    let store = MemoryStore::new("mydatabase");
    let other = store.with_database("otherdatabase");

    FixtureLoader::new(store.clone(), "users").seed().await.unwrap();

    assert_eq!(store.count_documents("users").await.unwrap(), 4);
    assert_eq!(other.count_documents("users").await.unwrap(), 0);
}
