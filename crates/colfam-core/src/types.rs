//! Newtypes for column shapes that plain Rust types cannot express on their own.

use derive_more::{Deref, Display};
use uuid::Uuid;

///
/// Blob
/// Opaque bytes stored as a `blob` column (a bare `Vec<u8>` maps to a list).
///

#[derive(Clone, Debug, Default, Deref, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Blob(pub Vec<u8>);

impl From<Vec<u8>> for Blob {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

///
/// Counter
///
/// Distributed counter column. Counters are never transcoded or removed, only
/// incremented and decremented.
///

#[derive(Clone, Copy, Debug, Default, Deref, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Counter(pub i64);

///
/// TimeUuid
/// Version 1 (time based) uuid; accepted wherever a plain `Uuid` is declared.
///

#[derive(Clone, Copy, Debug, Default, Deref, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TimeUuid(pub Uuid);

///
/// Json
///
/// Structured value stored as a canonical JSON text column.
///

#[derive(Clone, Debug, Default, Deref, Eq, PartialEq)]
pub struct Json<T>(pub T);
