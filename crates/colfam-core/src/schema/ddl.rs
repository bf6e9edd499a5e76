use crate::model::{ColumnMeta, RecordMeta};
use std::fmt::Write as _;

/// `CREATE TABLE IF NOT EXISTS` for `meta`.
///
/// Key columns come first in partition-then-clustering order. A clustered key
/// adds a `CLUSTERING ORDER BY` directive with each component's declared
/// order.
#[must_use]
pub fn create_table(meta: &RecordMeta) -> String {
    let schema = meta.schema();
    let table = meta.config().qualified_table_name();

    let mut defs: Vec<String> = schema.columns().into_iter().map(column_definition).collect();
    defs.push(primary_key(&schema.partition_key(), &schema.clustering_key()));

    let mut out = format!("CREATE TABLE IF NOT EXISTS {table}({}) WITH ", defs.join(","));

    if let Some(props) = meta.id_meta().compound_key()
        && !props.clustering().is_empty()
    {
        let orders = props
            .clustering()
            .iter()
            .map(|c| format!("{} {}", c.wire_column_name(), c.structure().order()))
            .collect::<Vec<_>>();
        let _ = write!(out, "CLUSTERING ORDER BY({}) AND ", orders.join(","));
    }

    let _ = write!(out, "comment='{}';", meta.config().comment().replace('\'', "''"));
    out
}

/// `CREATE INDEX` for every indexed column, in declaration order. An index
/// without a declared name is named `{table}_{column}_idx`.
#[must_use]
pub fn create_indexes(meta: &RecordMeta) -> Vec<String> {
    meta.schema()
        .value_columns()
        .into_iter()
        .filter_map(|column| create_index(meta, column))
        .collect()
}

pub(super) fn create_index(meta: &RecordMeta, column: &ColumnMeta) -> Option<String> {
    let index = column.index()?;
    let name = index.resolved_name(meta.config().table_name(), column.wire_column_name());

    Some(format!(
        "CREATE INDEX {name} ON {}({});",
        meta.config().qualified_table_name(),
        column.wire_column_name()
    ))
}

pub(super) fn column_definition(column: &ColumnMeta) -> String {
    let mut def = column.wire_column_name().to_string();
    if let Some(cql) = column.wire_type() {
        let _ = write!(def, " {cql}");
    }
    if column.structure().is_static() {
        def.push_str(" static");
    }

    def
}

fn primary_key(partition: &[&str], clustering: &[&str]) -> String {
    let partition = if partition.len() == 1 {
        partition.join(",")
    } else {
        format!("({})", partition.join(","))
    };

    let parts: Vec<&str> = std::iter::once(partition.as_str())
        .chain(clustering.iter().copied())
        .collect();

    format!("PRIMARY KEY({})", parts.join(","))
}
