use crate::{
    model::RecordMeta,
    schema::{
        TableMetadata,
        ddl::{column_definition, create_index},
    },
};

///
/// SchemaUpdater
///
/// Statements that bring a live table in line with an entity that has
/// schema update enabled: missing value columns are added and missing
/// indexes created. Existing columns are never altered or dropped.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct SchemaUpdater;

impl SchemaUpdater {
    #[must_use]
    pub fn alter(meta: &RecordMeta, live: &TableMetadata) -> Vec<String> {
        if !meta.config().schema_update() {
            return Vec::new();
        }

        let table = meta.config().qualified_table_name();
        let mut statements = Vec::new();

        for column in meta.schema().value_columns() {
            let existing = live.column(column.wire_column_name());

            if existing.is_none() {
                statements.push(format!("ALTER TABLE {table} ADD {};", column_definition(column)));
            }
            if existing.is_none_or(|c| c.index.is_none())
                && let Some(index) = create_index(meta, column)
            {
                statements.push(index);
            }
        }

        for statement in &statements {
            tracing::info!(entity = meta.type_name(), %statement, "schema update");
        }

        statements
    }
}
