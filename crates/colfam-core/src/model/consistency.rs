use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;

///
/// ConsistencyLevel
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsistencyLevel {
    Any,
    #[default]
    One,
    Two,
    Three,
    Quorum,
    All,
    LocalQuorum,
    EachQuorum,
    LocalOne,
    Serial,
    LocalSerial,
}

impl ConsistencyLevel {
    pub const ALL_LEVELS: [Self; 11] = [
        Self::Any,
        Self::One,
        Self::Two,
        Self::Three,
        Self::Quorum,
        Self::All,
        Self::LocalQuorum,
        Self::EachQuorum,
        Self::LocalOne,
        Self::Serial,
        Self::LocalSerial,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "ANY",
            Self::One => "ONE",
            Self::Two => "TWO",
            Self::Three => "THREE",
            Self::Quorum => "QUORUM",
            Self::All => "ALL",
            Self::LocalQuorum => "LOCAL_QUORUM",
            Self::EachQuorum => "EACH_QUORUM",
            Self::LocalOne => "LOCAL_ONE",
            Self::Serial => "SERIAL",
            Self::LocalSerial => "LOCAL_SERIAL",
        }
    }
}

impl fmt::Display for ConsistencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// ConsistencyParseError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("unknown consistency level '{0}'")]
pub struct ConsistencyParseError(pub String);

impl FromStr for ConsistencyLevel {
    type Err = ConsistencyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();

        Self::ALL_LEVELS
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConsistencyParseError(s.to_string()))
    }
}

///
/// Consistency
///
/// Declared (read, write) pair for an entity or a single column.
/// Runtime and batch level overrides are resolved by the driver layer.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(default)]
pub struct Consistency {
    pub read: ConsistencyLevel,
    pub write: ConsistencyLevel,
}

impl Consistency {
    #[must_use]
    pub const fn new(read: ConsistencyLevel, write: ConsistencyLevel) -> Self {
        Self { read, write }
    }

    /// Replace either level when an override is present.
    #[must_use]
    pub fn with_overrides(
        self,
        read: Option<ConsistencyLevel>,
        write: Option<ConsistencyLevel>,
    ) -> Self {
        Self {
            read: read.unwrap_or(self.read),
            write: write.unwrap_or(self.write),
        }
    }
}
