use crate::{
    Error,
    model::{ColumnMeta, InsertStrategy, RecordMeta},
    query::{Delete, Insert, Select, Update, Using},
    statement::{CollectionChange, StatementError},
    traits::DynRecord,
    value::Value,
};

///
/// BoundStatement
/// Rendered statement plus its encoded values in bind marker order.
///

#[derive(Clone, Debug, PartialEq)]
pub struct BoundStatement {
    pub query: String,
    pub values: Vec<Value>,
}

impl RecordMeta {
    #[must_use]
    pub const fn statements(&self) -> RecordStatements<'_> {
        RecordStatements { meta: self }
    }
}

///
/// RecordStatements
/// Whole statements for one entity, addressed by primary key.
///

#[derive(Clone, Copy)]
pub struct RecordStatements<'a> {
    meta: &'a RecordMeta,
}

impl<'a> RecordStatements<'a> {
    fn table(&self) -> String {
        self.meta.config().qualified_table_name()
    }

    fn id(&self) -> &'a ColumnMeta {
        self.meta.id_meta()
    }

    /// INSERT binding the key and every non-counter column.
    #[must_use]
    pub fn insert(&self, using: Option<Using>) -> Insert {
        let insert = self
            .id()
            .statements()
            .prepare_insert_primary_key(Insert::into(self.table()), false);

        let insert = self
            .meta
            .columns_except_id_and_counters()
            .fold(insert, |insert, c| insert.value_marker(c.wire_column_name()));

        insert.using(using.unwrap_or_default())
    }

    /// INSERT for one record with its encoded values.
    ///
    /// Under `InsertStrategy::NotNullFields` null regular columns are left
    /// out of the statement entirely.
    pub fn bind_insert(
        &self,
        record: &dyn DynRecord,
        using: Option<Using>,
    ) -> Result<BoundStatement, Error> {
        let transcoding = self.meta.transcoding();
        let skip_nulls = self.meta.config().insert_strategy() == InsertStrategy::NotNullFields;

        let mut insert = self
            .id()
            .statements()
            .prepare_insert_primary_key(Insert::into(self.table()), false);
        let mut values = transcoding.encode_primary_key(record, false)?;

        for (column, value) in transcoding.encode_columns(record)? {
            if skip_nulls && value.is_null() {
                continue;
            }

            insert = insert.value_marker(column.wire_column_name());
            values.push(value);
        }

        Ok(BoundStatement {
            query: insert.using(using.unwrap_or_default()).to_string(),
            values,
        })
    }

    /// SELECT of the key and the table's value columns by primary key.
    #[must_use]
    pub fn select_by_id(&self) -> Select {
        let select = self
            .id()
            .statements()
            .prepare_select_field(Select::from(self.table()));

        let select = if self.meta.structure().is_counter_table() {
            self.meta
                .counter_columns()
                .fold(select, |s, c| c.statements().prepare_select_field(s))
        } else {
            self.meta
                .columns_except_id_and_counters()
                .fold(select, |s, c| c.statements().prepare_select_field(s))
        };

        self.id()
            .statements()
            .generate_where_clause_for_select(select, None)
    }

    /// DELETE of the whole row by primary key.
    #[must_use]
    pub fn delete_by_id(&self, using: Option<Using>) -> Delete {
        let delete = Delete::from(self.table()).using(using.unwrap_or_default());

        self.id()
            .statements()
            .generate_where_clause_for_delete(delete, None)
    }

    /// UPDATE assigning the named columns. When every column is static the
    /// row is addressed by its partition key only.
    pub fn update_columns(
        &self,
        names: &[&str],
        using: Option<Using>,
    ) -> Result<Update, StatementError> {
        let columns = self.lookup_all(names)?;

        let mut update = Update::table(self.table()).using(using.unwrap_or_default());
        for column in &columns {
            update = column.statements().prepare_update_field(update)?;
        }

        Ok(self
            .id()
            .statements()
            .generate_where_clause_for_update(update, static_target(&columns)))
    }

    /// DELETE of the named columns. Counters are rejected.
    pub fn delete_columns(&self, names: &[&str]) -> Result<Delete, StatementError> {
        let columns = self.lookup_all(names)?;

        let mut delete = Delete::from(self.table());
        for column in &columns {
            delete = column.statements().prepare_delete_field(delete)?;
        }

        Ok(self
            .id()
            .statements()
            .generate_where_clause_for_delete(delete, static_target(&columns)))
    }

    pub fn collection_update(
        &self,
        name: &str,
        change: CollectionChange,
    ) -> Result<Update, StatementError> {
        let column = self.lookup(name)?;
        let update = column
            .statements()
            .generate_collection_update(Update::table(self.table()), change)?;

        Ok(self
            .id()
            .statements()
            .generate_where_clause_for_update(update, Some(column)))
    }

    pub fn increment_counter(&self, name: &str) -> Result<Update, StatementError> {
        let column = self.lookup(name)?;
        let update = column.statements().increment(Update::table(self.table()))?;

        Ok(self
            .id()
            .statements()
            .generate_where_clause_for_update(update, None))
    }

    pub fn decrement_counter(&self, name: &str) -> Result<Update, StatementError> {
        let column = self.lookup(name)?;
        let update = column.statements().decrement(Update::table(self.table()))?;

        Ok(self
            .id()
            .statements()
            .generate_where_clause_for_update(update, None))
    }

    fn lookup(&self, name: &str) -> Result<&'a ColumnMeta, StatementError> {
        self.meta
            .column(name)
            .ok_or_else(|| StatementError::UnknownColumn {
                entity: self.meta.type_name(),
                column: name.to_string(),
            })
    }

    fn lookup_all(&self, names: &[&str]) -> Result<Vec<&'a ColumnMeta>, StatementError> {
        if names.is_empty() {
            return Err(StatementError::NoColumns {
                entity: self.meta.type_name(),
            });
        }

        names
            .iter()
            .map(|name| {
                let column = self.lookup(name)?;
                if std::ptr::eq(column, self.id()) {
                    return Err(StatementError::KeyColumn {
                        column: column.column_name().to_string(),
                    });
                }

                Ok(column)
            })
            .collect()
    }
}

// First column when every targeted column is static.
fn static_target<'c>(columns: &[&'c ColumnMeta]) -> Option<&'c ColumnMeta> {
    if columns.iter().all(|c| c.structure().is_static()) {
        columns.first().copied()
    } else {
        None
    }
}
