use crate::{
    config::MappingConfig,
    model::{ColumnMeta, RecordMeta},
    schema::{SchemaError, TableMetadata},
};

///
/// SchemaValidator
///
/// Checks a live table against declared metadata. Key columns are always
/// checked; value columns are skipped for entities with schema update
/// enabled, since `SchemaUpdater` brings those in line instead.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct SchemaValidator {
    relaxed_index_validation: bool,
}

impl SchemaValidator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            relaxed_index_validation: false,
        }
    }

    #[must_use]
    pub const fn from_config(config: &MappingConfig) -> Self {
        Self {
            relaxed_index_validation: config.relaxed_index_validation,
        }
    }

    /// Ignore index flag mismatches.
    #[must_use]
    pub const fn relaxed_index_validation(mut self, relaxed: bool) -> Self {
        self.relaxed_index_validation = relaxed;
        self
    }

    pub fn validate(&self, meta: &RecordMeta, live: &TableMetadata) -> Result<(), SchemaError> {
        let result = self.check(meta, live);

        match &result {
            Ok(()) => tracing::info!(
                entity = meta.type_name(),
                table = %live.name,
                "live schema matches entity"
            ),
            Err(err) => tracing::warn!(
                entity = meta.type_name(),
                table = %live.name,
                error = %err,
                "live schema mismatch"
            ),
        }

        result
    }

    fn check(&self, meta: &RecordMeta, live: &TableMetadata) -> Result<(), SchemaError> {
        let table = meta.config().table_name();
        if !live.name.eq_ignore_ascii_case(table) {
            return Err(SchemaError::TableMismatch {
                expected: table.to_string(),
                actual: live.name.clone(),
            });
        }

        let schema = meta.schema();
        check_key(table, "partition", &schema.partition_key(), &live.partition_key)?;
        check_key(table, "clustering", &schema.clustering_key(), &live.clustering_key)?;

        for column in schema.key_columns() {
            self.check_column(table, column, live)?;
        }

        if meta.config().schema_update() {
            tracing::debug!(
                entity = meta.type_name(),
                "schema update enabled, value columns not checked"
            );
            return Ok(());
        }

        for column in schema.value_columns() {
            self.check_column(table, column, live)?;
        }

        Ok(())
    }

    fn check_column(
        &self,
        table: &str,
        column: &ColumnMeta,
        live: &TableMetadata,
    ) -> Result<(), SchemaError> {
        let name = column.wire_column_name();
        let Some(actual) = live.column(name) else {
            return Err(SchemaError::MissingColumn {
                table: table.to_string(),
                column: name.to_string(),
            });
        };

        if let Some(expected) = column.wire_type()
            && expected != actual.cql_type
        {
            return Err(SchemaError::TypeMismatch {
                table: table.to_string(),
                column: name.to_string(),
                expected,
                actual: actual.cql_type.clone(),
            });
        }

        let expected_static = column.structure().is_static();
        if expected_static != actual.is_static {
            return Err(SchemaError::StaticMismatch {
                table: table.to_string(),
                column: name.to_string(),
                expected: expected_static,
            });
        }

        let expected_index = column.structure().is_indexed();
        if !self.relaxed_index_validation && expected_index != actual.index.is_some() {
            return Err(SchemaError::IndexMismatch {
                table: table.to_string(),
                column: name.to_string(),
                expected: expected_index,
            });
        }

        Ok(())
    }
}

fn check_key(
    table: &str,
    segment: &'static str,
    expected: &[&str],
    actual: &[String],
) -> Result<(), SchemaError> {
    let matches = expected.len() == actual.len()
        && expected
            .iter()
            .zip(actual)
            .all(|(e, a)| a.eq_ignore_ascii_case(e));

    if matches {
        Ok(())
    } else {
        Err(SchemaError::KeyMismatch {
            table: table.to_string(),
            segment,
            expected: expected.iter().map(ToString::to_string).collect(),
            actual: actual.to_vec(),
        })
    }
}
