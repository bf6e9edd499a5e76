use crate::value::CqlType;
use serde::{Deserialize, Serialize};

///
/// TableMetadata
///
/// Live description of one table, as reported by the store and handed over
/// by the driver layer. Names are wire names.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableMetadata {
    #[serde(default)]
    pub keyspace: Option<String>,
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnMetadata>,
    #[serde(default)]
    pub partition_key: Vec<String>,
    #[serde(default)]
    pub clustering_key: Vec<String>,
}

impl TableMetadata {
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

///
/// ColumnMetadata
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ColumnMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub cql_type: CqlType,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    /// Name of the secondary index on this column, if any.
    #[serde(default)]
    pub index: Option<String>,
}
