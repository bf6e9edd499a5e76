//! Core runtime for colfam: the mapping layer between declaratively described
//! record types and a wide-column store.
//!
//! Metadata (`model`) is built once by `build::MetaBuilder`, cached in a
//! `registry::RecordRegistry`, and then shared read-only by every operation:
//! transcoding values to and from their wire form, generating CQL statement
//! fragments, and generating or validating table DDL.
//!
//! Nothing in this crate performs I/O. Generated statements and encoded
//! values are handed to an external driver layer.
#![warn(unreachable_pub)]

pub mod build;
pub mod codec;
pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod registry;
pub mod row;
pub mod schema;
pub mod statement;
pub mod tracked;
pub mod traits;
pub mod transcode;
pub mod types;
pub mod value;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::Error;

///
/// CONSTANTS
///

/// Maximum length of a table or keyspace identifier accepted by the store.
pub const MAX_TABLE_NAME_LEN: usize = 48;

///
/// Prelude
///
/// Domain vocabulary only: the types a record author or driver layer touches
/// on every call.
///

pub mod prelude {
    pub use crate::{
        build::MetaBuilder,
        config::MappingConfig,
        model::{
            ClusteringOrder, ColumnKind, ColumnMeta, Consistency, ConsistencyLevel, Event,
            InsertStrategy, RecordMeta,
        },
        registry::RecordRegistry,
        statement::CollectionChange,
        traits::{DynRecord, FieldValue, Record},
        types::{Blob, Counter, Json, TimeUuid},
        value::{CqlType, Value, ValueType},
    };
}
