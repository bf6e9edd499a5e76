//! Mapping configuration, loaded from TOML.
//!
//! ```toml
//! keyspace = "app"
//! insert_strategy = "not_null_fields"
//!
//! [consistency]
//! read = "QUORUM"
//! write = "ONE"
//!
//! [tables.tweet]
//! read = "LOCAL_QUORUM"
//! schema_update = true
//! ```

use crate::model::{Consistency, ConsistencyLevel, InsertStrategy};
use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::Path};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("invalid mapping config: {0}")]
    Parse(String),
}

///
/// MappingConfig
///
/// Global mapping defaults. Precedence when resolving an entity's settings is
/// table override, then record declaration, then these defaults.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MappingConfig {
    pub keyspace: Option<String>,
    pub consistency: Consistency,
    pub insert_strategy: InsertStrategy,
    pub relaxed_index_validation: bool,
    pub schema_update: bool,
    pub tables: BTreeMap<String, TableConfig>,
}

impl MappingConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;

        Self::from_toml_str(&source)
    }

    #[must_use]
    pub fn table(&self, table: &str) -> Option<&TableConfig> {
        self.tables.get(table)
    }
}

///
/// TableConfig
/// Per-table overrides; unset fields fall through.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    pub read: Option<ConsistencyLevel>,
    pub write: Option<ConsistencyLevel>,
    pub insert_strategy: Option<InsertStrategy>,
    pub schema_update: Option<bool>,
}

///
/// TESTS
///
