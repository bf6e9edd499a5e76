//! ## Crate layout
//! - `build`: declarative descriptors and the metadata builder.
//! - `model`: record and column metadata, consistency, interceptors.
//! - `codec`, `transcode`, `row`: value conversion to and from wire form.
//! - `query`, `statement`: CQL statement fragments and whole statements.
//! - `schema`: table DDL plus live schema validation and update.
//! - `registry`: process-wide metadata cache.
//! - `tracked`: change tracking for loaded records.
//!
//! `#[derive(Record)]` and `#[derive(FieldValue)]` generate the accessor
//! tables the runtime works through; the `prelude` covers everyday use.

pub use colfam_core::{
    MAX_TABLE_NAME_LEN, build, codec, config, error, model, query, registry, row, schema,
    statement, tracked, traits, transcode, types, value,
};

pub use colfam_core::Error;

pub use colfam_derive::{FieldValue, Record};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
/// The derive macros share their names with the traits they implement.
///

pub mod prelude {
    pub use crate::{FieldValue, Record};
    pub use colfam_core::prelude::*;
}
