// mongoseed-core/src/fixtures/semi_structured.rs
//! Randomized documents with optional nested fields
//!
//! Every document has the same base fields; `address`, `hobbies`, `job`,
//! `dataMatrix` and `projects` are each present with probability 1/2. The
//! generator is seeded, so the same seed and clock give the same documents.

use bson::{doc, Bson, Document};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::{Rng, SeedableRng};

pub const DEFAULT_COLLECTION: &str = "semi_estructured";
pub const DEFAULT_COUNT: usize = 10_000;

/// 2019-01-01T00:00:00Z
const CREATED_AT_START_MILLIS: i64 = 1_546_300_800_000;
const MILLIS_PER_DAY: i64 = 86_400_000;

const NAMES: [&str; 4] = ["Alice", "Bob", "Charlie", "David"];
const FRUITS: [&str; 3] = ["apple", "banana", "cherry"];
const STREETS: [&str; 3] = ["Main St", "Second Ave", "Third Blvd"];
const CITIES: [&str; 3] = ["NYC", "LA", "SF"];
const HOBBIES: [&str; 5] = ["reading", "traveling", "cooking", "hiking", "painting"];
const JOB_TITLES: [&str; 4] = ["engineer", "doctor", "teacher", "lawyer"];
const PROJECT_TITLES: [&str; 4] = ["Website", "App", "Database", "Game"];
const PROJECT_STATUSES: [&str; 3] = ["Started", "In Progress", "Completed"];

pub struct SemiStructuredGenerator {
    rng: StdRng,
    now: DateTime<Utc>,
}

impl SemiStructuredGenerator {
    /// `now` bounds `createdAt` from above and anchors project completion dates
    pub fn new(seed: u64, now: DateTime<Utc>) -> Self {
        SemiStructuredGenerator {
            rng: StdRng::seed_from_u64(seed),
            now,
        }
    }

    pub fn generate(&mut self) -> Document {
        let mut document = doc! {
            "name": self.pick(&NAMES),
            "age": self.rng.gen_range(20..=50_i32),
            "isActive": self.rng.gen_bool(0.5),
            "score": self.score(),
            "createdAt": self.created_at(),
            "mixedType": self.mixed_type(),
        };

        if self.rng.gen_bool(0.5) {
            document.insert(
                "address",
                doc! {
                    "street": self.pick(&STREETS),
                    "city": self.pick(&CITIES),
                    "zipcode": self.rng.gen_range(10_000..=99_999_i32).to_string(),
                },
            );
        }

        if self.rng.gen_bool(0.5) {
            let k = self.rng.gen_range(1..=4);
            let hobbies: Vec<String> = HOBBIES
                .choose_multiple(&mut self.rng, k)
                .map(|h| h.to_string())
                .collect();
            document.insert("hobbies", hobbies);
        }

        if self.rng.gen_bool(0.5) {
            document.insert(
                "job",
                doc! {
                    "title": self.pick(&JOB_TITLES),
                    "yearsExperience": self.rng.gen_range(1..=10_i32),
                    "salary": self.rng.gen_range(50_000..=150_000_i32),
                },
            );
        }

        if self.rng.gen_bool(0.5) {
            let size = self.rng.gen_range(1..=3);
            let matrix: Vec<Vec<i32>> = (0..size)
                .map(|_| (0..size).map(|_| self.rng.gen_range(0..=9)).collect())
                .collect();
            document.insert("dataMatrix", matrix);
        }

        if self.rng.gen_bool(0.5) {
            let count = self.rng.gen_range(1..=3);
            let projects: Vec<Document> = (0..count).map(|_| self.project()).collect();
            document.insert("projects", projects);
        }

        document
    }

    pub fn take(&mut self, count: usize) -> Vec<Document> {
        (0..count).map(|_| self.generate()).collect()
    }

    fn pick(&mut self, values: &[&'static str]) -> &'static str {
        values[self.rng.gen_range(0..values.len())]
    }

    fn score(&mut self) -> f64 {
        let raw: f64 = self.rng.gen_range(0.0..=100.0);
        (raw * 100.0).round() / 100.0
    }

    /// Whole days between 2019-01-01 and `now`
    fn created_at(&mut self) -> bson::DateTime {
        let span_days = ((self.now.timestamp_millis() - CREATED_AT_START_MILLIS) / MILLIS_PER_DAY).max(0);
        let offset = self.rng.gen_range(0..=span_days);
        bson::DateTime::from_millis(CREATED_AT_START_MILLIS + offset * MILLIS_PER_DAY)
    }

    fn mixed_type(&mut self) -> Bson {
        match self.rng.gen_range(0..3) {
            0 => Bson::Int32(self.rng.gen_range(1..=100)),
            1 => Bson::String(self.pick(&FRUITS).to_string()),
            _ => {
                let sample: Vec<i32> = index::sample(&mut self.rng, 10, 3)
                    .into_iter()
                    .map(|i| i as i32)
                    .collect();
                Bson::from(sample)
            }
        }
    }

    fn project(&mut self) -> Document {
        let days_ahead = self.rng.gen_range(0..=365);
        let completion = self.now + Duration::days(days_ahead);
        doc! {
            "title": self.pick(&PROJECT_TITLES),
            "status": self.pick(&PROJECT_STATUSES),
            "completionDate": completion.format("%Y-%m-%d").to_string(),
        }
    }
}
