// mongoseed-core/src/fixtures/users.rs
//! The four `users` fixture records

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::record::{Address, Blob, Order, OrderHistoryRecord, ProfileRecord, Record};

pub const DEFAULT_DATABASE: &str = "mydatabase";
pub const DEFAULT_COLLECTION: &str = "users";

/// Literal identifiers, in fixture order
pub const USER_IDS: [&str; 4] = [
    "507f1f77bcf86cd799439011",
    "507f1f77bcf86cd799439012",
    "507f1f77bcf86cd799439013",
    "507f1f77bcf86cd799439014",
];

/// (quantity, value) of each order line in the shopper's history
pub const EXPECTED_ORDER_LINES: [(i32, f64); 3] = [(2, 50.0), (1, 100.0), (1, 40.0)];

fn oid(hex: &str) -> Result<ObjectId> {
    Ok(ObjectId::parse_str(hex)?)
}

fn utc(timestamp: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(timestamp)?.with_timezone(&Utc))
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn profile(
    id: &str,
    name: &str,
    age: i32,
    is_verified: bool,
    hobbies: &[&str],
    address: (&str, i32),
    birthday: &str,
    photo: &str,
    website: &str,
    greeting: &str,
    tag: &str,
) -> Result<Record> {
    Ok(Record::Profile(ProfileRecord {
        id: oid(id)?,
        name: name.to_string(),
        age,
        is_verified,
        hobbies: strings(hobbies),
        address: Address {
            street: address.0.to_string(),
            number: address.1,
        },
        birthday: utc(birthday)?,
        photo: Blob::from_base64(photo)?,
        website: website.to_string(),
        greeting: greeting.to_string(),
        tag: tag.to_string(),
    }))
}

fn order(order_id: i32, product: &str, quantity: i32, value: f64) -> Order {
    Order {
        order_id,
        product: product.to_string(),
        quantity,
        value,
    }
}

/// Build the fixture records in their literal order
pub fn users() -> Result<Vec<Record>> {
    let joao = profile(
        USER_IDS[0],
        "João",
        28,
        true,
        &["nadar", "correr"],
        ("Rua A", 123),
        "1995-01-01T00:00:00Z",
        "binaryDataHere",
        "https://www.example.com/",
        "Hello!",
        "dev",
    )?;

    let maria = profile(
        USER_IDS[1],
        "Maria",
        24,
        false,
        &["ler", "escrever"],
        ("Rua B", 456),
        "1999-05-05T00:00:00Z",
        "binaryDataHere2",
        "https://www.maria.com/",
        "Hi!",
        "writer",
    )?;

    let pedro = profile(
        USER_IDS[2],
        "Pedro",
        30,
        true,
        &["pescar", "acampar"],
        ("Rua C", 789),
        "1993-03-03T00:00:00Z",
        "binaryDataHere3",
        "https://www.pedro.com/",
        "Hey!",
        "adventurer",
    )?;

    let lucas = Record::OrderHistory(OrderHistoryRecord {
        id: oid(USER_IDS[3])?,
        name: "Lucas".to_string(),
        age: 32,
        is_verified: false,
        orders: vec![
            order(1, "Livro de JavaScript", 2, 50.00),
            order(2, "Teclado Mecânico", 1, 100.00),
            order(3, "Mouse Sem Fio", 1, 40.00),
        ],
        birthday: utc("1991-06-15T00:00:00Z")?,
        photo: Blob::from_base64("binaryDataHere4")?,
        website: "https://www.lucas.com".to_string(),
        greeting: "Hola!".to_string(),
        tag: "shopper".to_string(),
    });

    Ok(vec![joao, maria, pedro, lucas])
}
