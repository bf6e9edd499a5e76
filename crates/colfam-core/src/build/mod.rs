//! One-time construction of `RecordMeta` and `ColumnMeta` from record
//! descriptors.

mod descriptor;

#[cfg(test)]
mod tests;

use crate::{
    MAX_TABLE_NAME_LEN,
    codec::column_codec,
    config::{MappingConfig, TableConfig},
    model::{
        ClusteringComponents, ColumnKind, ColumnMeta, CompoundKeyProperties, Consistency, Event,
        Interceptor, PartitionComponents, RecordMeta,
    },
    traits::Record,
};
use indexmap::IndexMap;
use std::{collections::HashMap, sync::Arc};
use thiserror::Error as ThisError;

// re-exports
pub use descriptor::{FieldDescriptor, FieldRole, KeyDescriptor, RecordDescriptor};

///
/// BuildError
/// Malformed declarative metadata; fatal at bootstrap.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum BuildError {
    #[error("entity '{type_name}' declares no id field")]
    MissingId { type_name: &'static str },

    #[error("entity '{type_name}' declares several id fields: '{first}' and '{second}'")]
    MultipleIds {
        type_name: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("compound key '{key_type}' declares no partition component")]
    EmptyPartitionKey { key_type: &'static str },

    #[error(
        "field '{field}' of entity '{type_name}' is a key component, declare it inside a compound key type"
    )]
    ComponentOutsideKey {
        type_name: &'static str,
        field: &'static str,
    },

    #[error(
        "field '{field}' of compound key '{key_type}' must be a partition or clustering component"
    )]
    KeyFieldRole {
        key_type: &'static str,
        field: &'static str,
    },

    #[error("embedded id field '{field}' of entity '{type_name}' has no key type")]
    MissingKeyDescriptor {
        type_name: &'static str,
        field: &'static str,
    },

    #[error("field '{field}' of entity '{type_name}' holds a compound key but is not the id")]
    EmbeddedKeyColumn {
        type_name: &'static str,
        field: &'static str,
    },

    #[error("key field '{field}' of '{owner}' cannot be a counter")]
    CounterInKey {
        owner: &'static str,
        field: &'static str,
    },

    #[error(
        "counter column '{field}' of entity '{type_name}' requires every non-key column to be a counter"
    )]
    MixedCounterColumns {
        type_name: &'static str,
        field: &'static str,
    },

    #[error("key field '{field}' of '{owner}' cannot be a {kind}")]
    CollectionInKey {
        owner: &'static str,
        field: &'static str,
        kind: ColumnKind,
    },

    #[error("static column '{field}' requires entity '{type_name}' to have clustering components")]
    StaticOnUnclustered {
        type_name: &'static str,
        field: &'static str,
    },

    #[error("{kind} column '{field}' of entity '{type_name}' cannot be indexed")]
    InvalidIndex {
        type_name: &'static str,
        field: &'static str,
        kind: ColumnKind,
    },

    #[error("invalid {what} name '{name}': {reason}")]
    InvalidName {
        what: &'static str,
        name: String,
        reason: &'static str,
    },

    #[error("column '{column}' is mapped twice on entity '{type_name}'")]
    DuplicateColumn {
        type_name: &'static str,
        column: String,
    },

    #[error("field '{field}' of '{owner}' has no codec for its declared type")]
    MissingCodec {
        owner: &'static str,
        field: &'static str,
    },
}

///
/// MetaBuilder
///
/// Turns a `RecordDescriptor` into immutable `RecordMeta`. Pure for a given
/// descriptor, configuration and interceptor list, so building the same type
/// twice yields equal metadata.
///

#[derive(Default)]
pub struct MetaBuilder<'a> {
    config: Option<&'a MappingConfig>,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl<'a> MetaBuilder<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: &'a MappingConfig) -> Self {
        Self {
            config: Some(config),
            interceptors: Vec::new(),
        }
    }

    /// Register an interceptor for the events it declares.
    #[must_use]
    pub fn interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn build<T: Record>(&self) -> Result<RecordMeta, BuildError> {
        self.build_descriptor(T::descriptor())
    }

    pub fn build_descriptor(&self, desc: RecordDescriptor) -> Result<RecordMeta, BuildError> {
        let type_name = desc.type_name;
        let global = self.config.cloned().unwrap_or_default();

        // table identity
        let table_name = desc
            .table
            .map_or_else(|| type_name.to_lowercase(), ToString::to_string);
        validate_name("table", &table_name)?;

        let keyspace = desc
            .keyspace
            .map(ToString::to_string)
            .or_else(|| global.keyspace.clone());
        if let Some(keyspace) = &keyspace {
            validate_name("keyspace", keyspace)?;
        }

        // entity settings
        let table = global.table(&table_name).cloned().unwrap_or_default();
        let consistency = resolve_consistency(&global, &desc, &table);
        let insert_strategy = table
            .insert_strategy
            .or(desc.insert_strategy)
            .unwrap_or(global.insert_strategy);
        let schema_update = table
            .schema_update
            .or(desc.schema_update)
            .unwrap_or(global.schema_update);
        let comment = desc.comment.map_or_else(
            || format!("Create table for entity \"{type_name}\""),
            ToString::to_string,
        );

        // fields
        let mut id_field: Option<&FieldDescriptor> = None;
        let mut regular = Vec::new();
        for field in &desc.fields {
            match field.role {
                FieldRole::Id | FieldRole::EmbeddedId => {
                    if let Some(first) = id_field {
                        return Err(BuildError::MultipleIds {
                            type_name,
                            first: first.field,
                            second: field.field,
                        });
                    }
                    id_field = Some(field);
                }
                FieldRole::Partition | FieldRole::Clustering => {
                    return Err(BuildError::ComponentOutsideKey {
                        type_name,
                        field: field.field,
                    });
                }
                FieldRole::Column => regular.push(field),
            }
        }

        let id_field = id_field.ok_or(BuildError::MissingId { type_name })?;
        let id = build_id(type_name, id_field, consistency)?;
        let clustered = id.structure().is_clustered();

        let mut columns = IndexMap::with_capacity(regular.len());
        for field in regular {
            let column = build_column(type_name, field, consistency)?;
            check_column(type_name, field, &column, clustered)?;
            columns.insert(field.field, column);
        }

        check_duplicates(type_name, &id, columns.values())?;

        // cached views
        let (counter_positions, regular_positions): (Vec<usize>, Vec<usize>) =
            (0..columns.len()).partition(|&i| {
                columns
                    .get_index(i)
                    .is_some_and(|(_, c)| c.kind().is_counter())
            });
        if let (Some(&first), false) = (counter_positions.first(), regular_positions.is_empty()) {
            let field = columns.get_index(first).map_or("", |(field, _)| *field);
            return Err(BuildError::MixedCounterColumns { type_name, field });
        }
        let clustered_counter = clustered && counter_positions.len() == 1;

        let interceptors = self.interceptor_map();

        tracing::debug!(
            entity = type_name,
            table = %table_name,
            columns = columns.len(),
            counters = counter_positions.len(),
            clustered,
            "built record metadata"
        );

        Ok(RecordMeta {
            type_name,
            table_name,
            keyspace,
            comment,
            id,
            columns,
            consistency,
            insert_strategy,
            schema_update,
            interceptors,
            instantiate: desc.instantiate,
            regular_positions,
            counter_positions,
            clustered_counter,
        })
    }

    fn interceptor_map(&self) -> HashMap<Event, Vec<Arc<dyn Interceptor>>> {
        let mut map: HashMap<Event, Vec<Arc<dyn Interceptor>>> = HashMap::new();

        for interceptor in &self.interceptors {
            for &event in interceptor.events() {
                map.entry(event).or_default().push(Arc::clone(interceptor));
            }
        }

        map
    }
}

// Global default, then record declaration, then table override.
fn resolve_consistency(
    global: &MappingConfig,
    desc: &RecordDescriptor,
    table: &TableConfig,
) -> Consistency {
    global
        .consistency
        .with_overrides(desc.read, desc.write)
        .with_overrides(table.read, table.write)
}

/// Check a table or keyspace identifier against the store's naming rules.
pub fn validate_name(what: &'static str, name: &str) -> Result<(), BuildError> {
    let invalid = |reason| BuildError::InvalidName {
        what,
        name: name.to_string(),
        reason,
    };

    let Some(first) = name.chars().next() else {
        return Err(invalid("must not be empty"));
    };
    if name.len() > MAX_TABLE_NAME_LEN {
        return Err(invalid("must be at most 48 characters"));
    }
    if !first.is_ascii_alphabetic() {
        return Err(invalid("must start with a letter"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid("must contain only letters, digits and underscores"));
    }

    Ok(())
}

fn build_id(
    type_name: &'static str,
    field: &FieldDescriptor,
    consistency: Consistency,
) -> Result<ColumnMeta, BuildError> {
    if field.role == FieldRole::Id {
        check_key_kind(type_name, field)?;
        return build_column(type_name, field, consistency);
    }

    let key = field.key.ok_or(BuildError::MissingKeyDescriptor {
        type_name,
        field: field.field,
    })?;
    let props = build_compound_key(key, consistency)?;

    let mut column = column_template(type_name, field, consistency);
    column.kind = ColumnKind::EmbeddedKey;
    column.compound_key = Some(Arc::new(props));

    Ok(column)
}

fn build_compound_key(
    key: KeyDescriptor,
    consistency: Consistency,
) -> Result<CompoundKeyProperties, BuildError> {
    let desc = (key.descriptor)();
    let key_type = desc.type_name;

    let mut partition = Vec::new();
    let mut clustering = Vec::new();
    for field in &desc.fields {
        let segment = match field.role {
            FieldRole::Partition => &mut partition,
            FieldRole::Clustering => &mut clustering,
            FieldRole::Id | FieldRole::EmbeddedId | FieldRole::Column => {
                return Err(BuildError::KeyFieldRole {
                    key_type,
                    field: field.field,
                });
            }
        };

        check_key_kind(key_type, field)?;
        let mut component = build_column(key_type, field, consistency)?;
        component.kind = ColumnKind::CompoundKeyComponent;
        segment.push(component);
    }

    Ok(CompoundKeyProperties::new(
        key_type,
        PartitionComponents::new(key_type, partition)?,
        ClusteringComponents::new(clustering),
        key.instantiate,
    ))
}

fn check_key_kind(owner: &'static str, field: &FieldDescriptor) -> Result<(), BuildError> {
    match field.shape.kind {
        ColumnKind::Counter => Err(BuildError::CounterInKey {
            owner,
            field: field.field,
        }),
        kind @ (ColumnKind::List | ColumnKind::Set | ColumnKind::Map) => {
            Err(BuildError::CollectionInKey {
                owner,
                field: field.field,
                kind,
            })
        }
        _ => Ok(()),
    }
}

fn check_column(
    type_name: &'static str,
    field: &FieldDescriptor,
    column: &ColumnMeta,
    clustered: bool,
) -> Result<(), BuildError> {
    let kind = column.kind();

    if kind.is_embedded_key() {
        return Err(BuildError::EmbeddedKeyColumn {
            type_name,
            field: field.field,
        });
    }
    if column.structure().is_static() && !clustered {
        return Err(BuildError::StaticOnUnclustered {
            type_name,
            field: field.field,
        });
    }
    if column.structure().is_indexed() && (kind.is_collection() || kind.is_counter()) {
        return Err(BuildError::InvalidIndex {
            type_name,
            field: field.field,
            kind,
        });
    }

    Ok(())
}

fn check_duplicates<'c>(
    type_name: &'static str,
    id: &'c ColumnMeta,
    columns: impl Iterator<Item = &'c ColumnMeta>,
) -> Result<(), BuildError> {
    let key_names = match id.compound_key() {
        Some(props) => props.all_wire_component_names(),
        None => vec![id.wire_column_name()],
    };

    let mut seen = std::collections::HashSet::new();
    for name in key_names
        .into_iter()
        .chain(columns.map(ColumnMeta::wire_column_name))
    {
        if !seen.insert(name) {
            return Err(BuildError::DuplicateColumn {
                type_name,
                column: name.to_string(),
            });
        }
    }

    Ok(())
}

fn build_column(
    owner: &'static str,
    field: &FieldDescriptor,
    consistency: Consistency,
) -> Result<ColumnMeta, BuildError> {
    let mut column = column_template(owner, field, consistency);
    let kind = column.kind;

    if !matches!(kind, ColumnKind::Counter | ColumnKind::EmbeddedKey) {
        let element = field.codec.map(|codec| codec());
        column.codec = Some(
            column_codec(kind, &column.value_type, column.key_type.as_ref(), element).ok_or(
                BuildError::MissingCodec {
                    owner,
                    field: field.field,
                },
            )?,
        );
    }

    tracing::debug!(
        owner,
        field = field.field,
        column = %column.column_name,
        kind = %kind,
        "built column metadata"
    );

    Ok(column)
}

// Column fields straight from the declaration; codec and compound key are
// filled in by the caller.
fn column_template(
    owner: &'static str,
    field: &FieldDescriptor,
    consistency: Consistency,
) -> ColumnMeta {
    let column_name = field.column_name.unwrap_or(field.field).to_string();

    ColumnMeta {
        owning_type_name: owner,
        field_name: field.field,
        wire_column_name: column_name.to_lowercase(),
        column_name,
        kind: field.shape.kind,
        value_type: field.shape.value_type.clone(),
        key_type: field.shape.key_type.clone(),
        codec: None,
        consistency: consistency.with_overrides(field.read, field.write),
        is_static: field.is_static,
        index: field.index.clone(),
        order: field.order,
        empty_collection_if_null: field.empty_collection_if_null,
        compound_key: None,
    }
}
