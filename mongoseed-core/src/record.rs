// mongoseed-core/src/record.rs
//! Typed fixture records and their BSON document form
//!
//! The `users` fixture mixes two document shapes in one collection:
//!
//! ```text
//! Record::Profile       _id, nome, idade, isVerified, hobbies, endereço, ...
//! Record::OrderHistory  _id, nome, idade, isVerified, historicoPedidos, ...
//! ```
//!
//! Both shapes carry `aniversario`, an always-null `campoNulo`, a generic binary
//! `fotoPerfil` and a plain-text greeting. A record never carries both
//! `hobbies`/`endereço` and `historicoPedidos`.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use bson::oid::ObjectId;
use bson::spec::BinarySubtype;
use bson::{Binary, Bson, Document};
use chrono::{DateTime, Utc};

use crate::error::Result;

/// Standard alphabet, padding optional, non-zero trailing bits ignored
/// (the mongo shell's `BinData(0, "...")` decoding)
const SHELL_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Persisted field names
pub mod fields {
    pub const ID: &str = "_id";
    pub const NAME: &str = "nome";
    pub const AGE: &str = "idade";
    pub const IS_VERIFIED: &str = "isVerified";
    pub const HOBBIES: &str = "hobbies";
    pub const ADDRESS: &str = "endereço";
    pub const STREET: &str = "rua";
    pub const NUMBER: &str = "numero";
    pub const BIRTHDAY: &str = "aniversario";
    pub const NULLABLE: &str = "campoNulo";
    pub const PHOTO: &str = "fotoPerfil";
    pub const WEBSITE: &str = "website";
    pub const GREETING: &str = "saudacao";
    pub const TAG: &str = "tag";
    pub const ORDER_HISTORY: &str = "historicoPedidos";
    pub const ORDER_ID: &str = "idPedido";
    pub const PRODUCT: &str = "produto";
    pub const QUANTITY: &str = "quantidade";
    pub const VALUE: &str = "valor";
}

/// Opaque bytes tagged with a BSON binary subtype
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    pub subtype: BinarySubtype,
    pub bytes: Vec<u8>,
}

impl Blob {
    /// Generic (0x00) binary blob
    pub fn generic(bytes: impl Into<Vec<u8>>) -> Self {
        Blob {
            subtype: BinarySubtype::Generic,
            bytes: bytes.into(),
        }
    }

    /// Generic blob from a base64 payload, decoded the way the mongo shell does
    pub fn from_base64(payload: &str) -> Result<Self> {
        Ok(Blob::generic(SHELL_BASE64.decode(payload)?))
    }

    pub fn to_binary(&self) -> Binary {
        Binary {
            subtype: self.subtype,
            bytes: self.bytes.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub street: String,
    pub number: i32,
}

impl Address {
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert(fields::STREET, self.street.as_str());
        doc.insert(fields::NUMBER, self.number);
        doc
    }
}

/// One line of an order history
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_id: i32,
    pub product: String,
    pub quantity: i32,
    /// Currency amount, persisted as a BSON double
    pub value: f64,
}

impl Order {
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert(fields::ORDER_ID, self.order_id);
        doc.insert(fields::PRODUCT, self.product.as_str());
        doc.insert(fields::QUANTITY, self.quantity);
        doc.insert(fields::VALUE, self.value);
        doc
    }
}

/// Profile-style user: hobbies and a postal address
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRecord {
    pub id: ObjectId,
    pub name: String,
    pub age: i32,
    pub is_verified: bool,
    pub hobbies: Vec<String>,
    pub address: Address,
    pub birthday: DateTime<Utc>,
    pub photo: Blob,
    pub website: String,
    pub greeting: String,
    pub tag: String,
}

impl ProfileRecord {
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert(fields::ID, self.id);
        doc.insert(fields::NAME, self.name.as_str());
        doc.insert(fields::AGE, self.age);
        doc.insert(fields::IS_VERIFIED, self.is_verified);
        doc.insert(fields::HOBBIES, self.hobbies.clone());
        doc.insert(fields::ADDRESS, self.address.to_document());
        doc.insert(fields::BIRTHDAY, to_bson_datetime(&self.birthday));
        doc.insert(fields::NULLABLE, Bson::Null);
        doc.insert(fields::PHOTO, self.photo.to_binary());
        doc.insert(fields::WEBSITE, self.website.as_str());
        doc.insert(fields::GREETING, self.greeting.as_str());
        doc.insert(fields::TAG, self.tag.as_str());
        doc
    }
}

/// Shopper: an order history instead of hobbies/address
#[derive(Debug, Clone, PartialEq)]
pub struct OrderHistoryRecord {
    pub id: ObjectId,
    pub name: String,
    pub age: i32,
    pub is_verified: bool,
    pub orders: Vec<Order>,
    pub birthday: DateTime<Utc>,
    pub photo: Blob,
    pub website: String,
    pub greeting: String,
    pub tag: String,
}

impl OrderHistoryRecord {
    pub fn to_document(&self) -> Document {
        let orders: Vec<Document> = self.orders.iter().map(Order::to_document).collect();

        let mut doc = Document::new();
        doc.insert(fields::ID, self.id);
        doc.insert(fields::NAME, self.name.as_str());
        doc.insert(fields::AGE, self.age);
        doc.insert(fields::IS_VERIFIED, self.is_verified);
        doc.insert(fields::ORDER_HISTORY, orders);
        doc.insert(fields::BIRTHDAY, to_bson_datetime(&self.birthday));
        doc.insert(fields::NULLABLE, Bson::Null);
        doc.insert(fields::PHOTO, self.photo.to_binary());
        doc.insert(fields::WEBSITE, self.website.as_str());
        doc.insert(fields::GREETING, self.greeting.as_str());
        doc.insert(fields::TAG, self.tag.as_str());
        doc
    }
}

/// One fixture document, in one of the two shapes
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Profile(ProfileRecord),
    OrderHistory(OrderHistoryRecord),
}

impl Record {
    pub fn id(&self) -> ObjectId {
        match self {
            Record::Profile(r) => r.id,
            Record::OrderHistory(r) => r.id,
        }
    }

    pub fn birthday(&self) -> DateTime<Utc> {
        match self {
            Record::Profile(r) => r.birthday,
            Record::OrderHistory(r) => r.birthday,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Record::Profile(r) => &r.name,
            Record::OrderHistory(r) => &r.name,
        }
    }

    pub fn to_document(&self) -> Document {
        match self {
            Record::Profile(r) => r.to_document(),
            Record::OrderHistory(r) => r.to_document(),
        }
    }
}

impl From<ProfileRecord> for Record {
    fn from(record: ProfileRecord) -> Self {
        Record::Profile(record)
    }
}

impl From<OrderHistoryRecord> for Record {
    fn from(record: OrderHistoryRecord) -> Self {
        Record::OrderHistory(record)
    }
}

/// BSON dates are millisecond precision
pub fn to_bson_datetime(instant: &DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(instant.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn birthday() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("1999-05-05T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn profile() -> ProfileRecord {
        ProfileRecord {
            id: ObjectId::parse_str("507f1f77bcf86cd799439012").unwrap(),
            name: "Maria".to_string(),
            age: 24,
            is_verified: false,
            hobbies: vec!["ler".to_string(), "escrever".to_string()],
            address: Address {
                street: "Rua B".to_string(),
                number: 456,
            },
            birthday: birthday(),
            photo: Blob::from_base64("binaryDataHere2").unwrap(),
            website: "https://www.maria.com/".to_string(),
            greeting: "Hi!".to_string(),
            tag: "writer".to_string(),
        }
    }

    #[test]
    fn test_profile_document_fields() {
        let doc = profile().to_document();

        assert_eq!(
            doc.get_object_id(fields::ID).unwrap().to_hex(),
            "507f1f77bcf86cd799439012"
        );
        assert_eq!(doc.get_str(fields::NAME).unwrap(), "Maria");
        assert_eq!(doc.get_i32(fields::AGE).unwrap(), 24);
        assert!(!doc.get_bool(fields::IS_VERIFIED).unwrap());
        assert!(doc.is_null(fields::NULLABLE));
        assert!(!doc.contains_key(fields::ORDER_HISTORY));

        let address = doc.get_document(fields::ADDRESS).unwrap();
        assert_eq!(address.get_str(fields::STREET).unwrap(), "Rua B");
        assert_eq!(address.get_i32(fields::NUMBER).unwrap(), 456);
    }

    #[test]
    fn test_id_is_first_field() {
        let doc = profile().to_document();
        assert_eq!(doc.keys().next().map(String::as_str), Some(fields::ID));
    }

    #[test]
    fn test_photo_is_generic_binary() {
        let doc = profile().to_document();
        match doc.get(fields::PHOTO) {
            Some(Bson::Binary(binary)) => {
                assert_eq!(binary.subtype, BinarySubtype::Generic);
                assert_eq!(
                    binary.bytes,
                    vec![0x6e, 0x29, 0xda, 0xaf, 0x20, 0xda, 0xb5, 0xa1, 0xde, 0xad, 0xed]
                );
            }
            other => panic!("expected binary photo, got {:?}", other),
        }
    }

    #[test]
    fn test_base64_payload_decodes_like_the_shell() {
        let unpadded = Blob::from_base64("binaryDataHere").unwrap();
        assert_eq!(
            unpadded.bytes,
            vec![0x6e, 0x29, 0xda, 0xaf, 0x20, 0xda, 0xb5, 0xa1, 0xde, 0xad]
        );
        assert_eq!(unpadded.subtype, BinarySubtype::Generic);

        let padded = Blob::from_base64("aGk=").unwrap();
        assert_eq!(padded.bytes, b"hi".to_vec());

        assert!(Blob::from_base64("not base64!").is_err());
    }

    #[test]
    fn test_birthday_is_utc_datetime() {
        let doc = profile().to_document();
        let stored = doc.get_datetime(fields::BIRTHDAY).unwrap();
        assert_eq!(stored.timestamp_millis(), birthday().timestamp_millis());
    }

    #[test]
    fn test_order_history_shape() {
        let record = OrderHistoryRecord {
            id: ObjectId::parse_str("507f1f77bcf86cd799439014").unwrap(),
            name: "Lucas".to_string(),
            age: 32,
            is_verified: false,
            orders: vec![Order {
                order_id: 1,
                product: "Livro de JavaScript".to_string(),
                quantity: 2,
                value: 50.0,
            }],
            birthday: birthday(),
            photo: Blob::from_base64("binaryDataHere4").unwrap(),
            website: "https://www.lucas.com".to_string(),
            greeting: "Hola!".to_string(),
            tag: "shopper".to_string(),
        };
        let doc = Record::from(record).to_document();

        assert!(!doc.contains_key(fields::HOBBIES));
        assert!(!doc.contains_key(fields::ADDRESS));
        let orders = doc.get_array(fields::ORDER_HISTORY).unwrap();
        assert_eq!(orders.len(), 1);
        let first = orders[0].as_document().unwrap();
        assert_eq!(first.get_f64(fields::VALUE).unwrap(), 50.0);
        assert_eq!(first.get_i32(fields::QUANTITY).unwrap(), 2);
    }

    #[test]
    fn test_record_accessors() {
        let record = Record::from(profile());
        assert_eq!(record.name(), "Maria");
        assert_eq!(record.birthday(), birthday());
        assert_eq!(record.id().to_hex(), "507f1f77bcf86cd799439012");
    }
}
