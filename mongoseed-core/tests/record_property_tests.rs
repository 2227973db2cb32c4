// Property tests for record construction
use bson::oid::ObjectId;
use chrono::{TimeZone, Utc};
use mongoseed_core::record::{fields, to_bson_datetime};
use mongoseed_core::{Address, Blob, ProfileRecord, Record};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_any_24_hex_chars_is_an_object_id(hex in "[0-9a-f]{24}") {
        let id = ObjectId::parse_str(&hex).unwrap();
        prop_assert_eq!(id.to_hex(), hex);
    }

    #[test]
    fn prop_wrong_length_hex_is_rejected(hex in "[0-9a-f]{1,23}") {
        prop_assert!(ObjectId::parse_str(&hex).is_err());
    }

    #[test]
    fn prop_birthday_survives_at_millisecond_precision(secs in 0i64..4_102_444_800, millis in 0u32..1000) {
        let instant = Utc.timestamp_opt(secs, millis * 1_000_000).unwrap();
        prop_assert_eq!(to_bson_datetime(&instant).timestamp_millis(), instant.timestamp_millis());
    }

    #[test]
    fn prop_profile_document_never_has_orders(
        name in "[A-Za-z]{1,12}",
        age in 0i32..120,
        hobbies in proptest::collection::vec("[a-z]{1,8}", 1..5),
    ) {
        let record = Record::Profile(ProfileRecord {
            id: ObjectId::new(),
            name: name.clone(),
            age,
            is_verified: age % 2 == 0,
            hobbies: hobbies.clone(),
            address: Address { street: "Rua X".to_string(), number: age },
            birthday: Utc::now(),
            photo: Blob::generic(name.as_bytes()),
            website: "https://example.com/".to_string(),
            greeting: "Oi!".to_string(),
            tag: "prop".to_string(),
        });
        let doc = record.to_document();

        prop_assert!(!doc.contains_key(fields::ORDER_HISTORY));
        prop_assert!(doc.is_null(fields::NULLABLE));
        prop_assert_eq!(doc.get_array(fields::HOBBIES).unwrap().len(), hobbies.len());
        prop_assert_eq!(doc.get_str(fields::NAME).unwrap(), name.as_str());
    }
}
