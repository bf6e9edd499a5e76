use crate::{
    build::BuildError,
    model::ColumnMeta,
    value::{CqlType, Value, ValueType},
};
use derive_more::Deref;
use std::fmt;
use thiserror::Error as ThisError;

///
/// ValidationError
///
/// Rejection of caller supplied compound key values. Messages name the
/// entity, the 1-based position and the expected/actual type names verbatim.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ValidationError {
    #[error("at least one {segment} key component must be provided for entity '{entity}'")]
    NoComponents { segment: KeySegment, entity: String },

    #[error(
        "there should be less or equal to {declared} value(s) of partition component(s) provided for entity '{entity}'"
    )]
    TooManyPartitionComponents { declared: usize, entity: String },

    #[error(
        "there should be at most {declared} value(s) of clustering component(s) provided for entity '{entity}'"
    )]
    TooManyClusteringComponents { declared: usize, entity: String },

    #[error("the '{position}th' {segment} key should not be null")]
    NullComponent { segment: KeySegment, position: usize },

    #[error(
        "the type '{actual}' of {segment} key component '{value}' at position '{position}th' for entity '{entity}' is not valid, it should be '{expected}'"
    )]
    TypeMismatch {
        segment: KeySegment,
        entity: String,
        position: usize,
        value: String,
        actual: String,
        expected: ValueType,
    },

    #[error("at least one {segment} key component IN must be provided for entity '{entity}'")]
    NoComponentsIn { segment: KeySegment, entity: String },

    #[error("the '{position}th' {segment} key component IN should not be null")]
    NullComponentIn { segment: KeySegment, position: usize },
}

///
/// KeySegment
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum KeySegment {
    Partition,
    Clustering,
}

impl KeySegment {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Partition => "partition",
            Self::Clustering => "clustering",
        }
    }
}

impl fmt::Display for KeySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// KeyComponents
///
/// One ordered segment of a compound primary key. Component order is fixed at
/// construction and gives caller supplied values their positional meaning.
///

#[derive(Clone, Debug)]
pub struct KeyComponents {
    segment: KeySegment,
    columns: Vec<ColumnMeta>,
}

impl KeyComponents {
    #[must_use]
    pub const fn segment(&self) -> KeySegment {
        self.segment
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnMeta> {
        self.columns.iter()
    }

    #[must_use]
    pub fn last(&self) -> Option<&ColumnMeta> {
        self.columns.last()
    }

    #[must_use]
    pub fn component_names(&self) -> Vec<&str> {
        self.columns.iter().map(ColumnMeta::column_name).collect()
    }

    #[must_use]
    pub fn component_types(&self) -> Vec<&ValueType> {
        self.columns.iter().map(ColumnMeta::value_type).collect()
    }

    #[must_use]
    pub fn wire_component_names(&self) -> Vec<&str> {
        self.columns.iter().map(ColumnMeta::wire_column_name).collect()
    }

    /// Native types of the components, which differ from the declared classes
    /// whenever a codec lowers the value (a `NaiveDate` stored as `timestamp`).
    #[must_use]
    pub fn wire_component_types(&self) -> Vec<CqlType> {
        self.columns
            .iter()
            .filter_map(ColumnMeta::wire_type)
            .collect()
    }

    /// Validate positional values supplied for this segment.
    ///
    /// Trailing positions may be omitted; a supplied value is never null and
    /// must be accepted by the declared class of its component.
    pub fn validate(&self, entity: &str, values: &[Value]) -> Result<(), ValidationError> {
        if values.is_empty() {
            return Err(ValidationError::NoComponents {
                segment: self.segment,
                entity: entity.to_string(),
            });
        }

        if values.len() > self.columns.len() {
            let declared = self.columns.len();
            let entity = entity.to_string();

            return Err(match self.segment {
                KeySegment::Partition => {
                    ValidationError::TooManyPartitionComponents { declared, entity }
                }
                KeySegment::Clustering => {
                    ValidationError::TooManyClusteringComponents { declared, entity }
                }
            });
        }

        for (i, (value, column)) in values.iter().zip(&self.columns).enumerate() {
            if value.is_null() {
                return Err(ValidationError::NullComponent {
                    segment: self.segment,
                    position: i + 1,
                });
            }

            self.check_type(entity, column, value, i + 1)?;
        }

        Ok(())
    }

    /// Validate the candidate values of an `IN` restriction on the last
    /// component of this segment.
    pub fn validate_in(&self, entity: &str, candidates: &[Value]) -> Result<(), ValidationError> {
        let no_components = || ValidationError::NoComponentsIn {
            segment: self.segment,
            entity: entity.to_string(),
        };

        if candidates.is_empty() {
            return Err(no_components());
        }
        let last = self.columns.last().ok_or_else(no_components)?;

        for (i, value) in candidates.iter().enumerate() {
            if value.is_null() {
                return Err(ValidationError::NullComponentIn {
                    segment: self.segment,
                    position: i + 1,
                });
            }

            self.check_type(entity, last, value, self.columns.len())?;
        }

        Ok(())
    }

    fn check_type(
        &self,
        entity: &str,
        column: &ColumnMeta,
        value: &Value,
        position: usize,
    ) -> Result<(), ValidationError> {
        if column.value_type().accepts_value(value) {
            return Ok(());
        }

        Err(ValidationError::TypeMismatch {
            segment: self.segment,
            entity: entity.to_string(),
            position,
            value: value.to_string(),
            actual: value.type_name(),
            expected: column.value_type().clone(),
        })
    }
}

///
/// PartitionComponents
/// Partition segment of a compound key; never empty.
///

#[derive(Clone, Debug, Deref)]
pub struct PartitionComponents(KeyComponents);

impl PartitionComponents {
    pub fn new(key_type: &'static str, columns: Vec<ColumnMeta>) -> Result<Self, BuildError> {
        if columns.is_empty() {
            return Err(BuildError::EmptyPartitionKey { key_type });
        }

        Ok(Self(KeyComponents {
            segment: KeySegment::Partition,
            columns,
        }))
    }
}

///
/// ClusteringComponents
/// Clustering segment of a compound key; may be empty.
///

#[derive(Clone, Debug, Deref)]
pub struct ClusteringComponents(KeyComponents);

impl ClusteringComponents {
    #[must_use]
    pub const fn new(columns: Vec<ColumnMeta>) -> Self {
        Self(KeyComponents {
            segment: KeySegment::Clustering,
            columns,
        })
    }
}
