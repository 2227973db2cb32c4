// mongoseed-core/src/config.rs
//! Configuration file (`mongoseed.toml`)
//!
//! ```toml
//! [connection]
//! # either a full URI ...
//! uri = "mongodb://localhost:27017/"
//! # ... or the parts it is built from
//! host = "localhost"
//! port = 27017
//! user = "myuser"
//! password = "mypassword"
//! database = "mydatabase"
//!
//! [fixtures]
//! users_collection = "users"
//! semi_structured_collection = "semi_estructured"
//! semi_structured_count = 10000
//! batch_size = 1000
//!
//! # `$jsonSchema` subset enforced by the in-memory store (`--dry-run`)
//! [validators.users]
//! required = ["nome", "idade"]
//! properties.idade = { bsonType = "int" }
//! ```
//!
//! Every key is optional. A missing file means defaults.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SeedError};
use crate::fixtures::{semi_structured, users};
use crate::store::CollectionSchema;

/// Environment variable overriding the config file path
pub const CONFIG_ENV: &str = "MONGOSEED_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "mongoseed.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Used verbatim when set; host/port/user/password are ignored then
    pub uri: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: String,
    pub server_selection_timeout_secs: u64,
    pub app_name: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            uri: None,
            host: "localhost".to_string(),
            port: 27017,
            user: None,
            password: None,
            database: users::DEFAULT_DATABASE.to_string(),
            server_selection_timeout_secs: 5,
            app_name: "mongoseed".to_string(),
        }
    }
}

impl ConnectionConfig {
    /// Connection string handed to the driver
    ///
    /// Credentials are inserted as-is; reserved URI characters in the user or
    /// password must already be percent-encoded.
    pub fn uri(&self) -> String {
        if let Some(uri) = &self.uri {
            return uri.clone();
        }
        match (&self.user, &self.password) {
            (Some(user), Some(password)) => format!(
                "mongodb://{}:{}@{}:{}/",
                user, password, self.host, self.port
            ),
            (Some(user), None) => format!("mongodb://{}@{}:{}/", user, self.host, self.port),
            _ => format!("mongodb://{}:{}/", self.host, self.port),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixturesConfig {
    pub users_collection: String,
    pub semi_structured_collection: String,
    pub semi_structured_count: usize,
    /// Documents per insert_many call for generated fixtures
    pub batch_size: usize,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        FixturesConfig {
            users_collection: users::DEFAULT_COLLECTION.to_string(),
            semi_structured_collection: semi_structured::DEFAULT_COLLECTION.to_string(),
            semi_structured_count: semi_structured::DEFAULT_COUNT,
            batch_size: 1000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub fixtures: FixturesConfig,
    /// Collection name to `$jsonSchema` document
    pub validators: HashMap<String, serde_json::Value>,
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config file {} not found, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| SeedError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.connection.database.is_empty() {
            return Err(SeedError::Config("connection.database must not be empty".to_string()));
        }
        if self.fixtures.batch_size == 0 {
            return Err(SeedError::Config("fixtures.batch_size must be at least 1".to_string()));
        }
        self.schemas()?;
        Ok(())
    }

    /// Parsed validators, sorted by collection name
    pub fn schemas(&self) -> Result<Vec<(String, CollectionSchema)>> {
        let mut schemas = Vec::with_capacity(self.validators.len());
        for (collection, schema) in &self.validators {
            let parsed = CollectionSchema::from_json(schema).map_err(|e| match e {
                SeedError::Config(message) => {
                    SeedError::Config(format!("validators.{}: {}", collection, message))
                }
                other => other,
            })?;
            schemas.push((collection.clone(), parsed));
        }
        schemas.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(schemas)
    }
}

/// `$MONGOSEED_CONFIG` if set, else `mongoseed.toml` in the working directory
pub fn default_config_path() -> PathBuf {
    std::env::var(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}
