//! `BuildPost` (spec §4.4): multi-row `INSERT` from one or more JSON-style
//! records.

use std::collections::BTreeMap;

use super::validate_table_name;
use crate::dialect::Dialect;
use crate::error::{CoreError, Result};
use crate::schema::TableSchema;
use crate::value::{BoundArg, SqlValue};

/// One record to insert: column name → value. Missing columns across a
/// batch are filled with `SqlValue::Null` (spec §4.4, testable invariant 4).
pub type Record = BTreeMap<String, SqlValue>;

/// Builds a multi-row `INSERT INTO table (c1, ...) VALUES (?, ...), (?, ...)`.
/// The column list is the sorted union of every record's keys; each record
/// contributes exactly one value per union column.
pub fn build_post(
    dialect: &Dialect,
    schema: Option<&TableSchema>,
    table: &str,
    records: &[Record],
) -> Result<(String, Vec<BoundArg>)> {
    let table = validate_table_name(dialect, table)?;

    let mut all_columns: Vec<String> = records
        .iter()
        .flat_map(|r| r.keys().cloned())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    all_columns.sort();

    if let Some(schema) = schema {
        for c in &all_columns {
            if !schema.contains_key(&c.to_uppercase()) {
                return Err(CoreError::UnknownColumn {
                    table: table.clone(),
                    column: c.to_uppercase(),
                });
            }
        }
    }

    let mut sql = format!("INSERT INTO {table} (");
    sql.push_str(&all_columns.join(", "));
    sql.push_str(") VALUES ");

    let mut args = Vec::with_capacity(records.len() * all_columns.len());
    let mut ph = 0usize;

    for (ri, record) in records.iter().enumerate() {
        if ri > 0 {
            sql.push_str(", ");
        }
        sql.push('(');
        for (ci, column) in all_columns.iter().enumerate() {
            if ci > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&dialect.placeholder(ph));
            let value = record.get(column).cloned().unwrap_or(SqlValue::Null);
            args.push(dialect.wrap_arg(ph, value));
            ph += 1;
        }
        sql.push(')');
    }

    Ok((sql, args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::default_dialect;

    fn record(pairs: &[(&str, SqlValue)]) -> Record {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn union_of_columns_fills_missing_cells_with_null() {
        let dialect = default_dialect();
        let records = vec![
            record(&[("a", SqlValue::Int(1))]),
            record(&[("b", SqlValue::Int(1))]),
        ];
        let (sql, args) = build_post(&dialect, None, "my_table", &records).unwrap();
        assert_eq!(sql, "INSERT INTO my_table (a, b) VALUES (?, ?), (?, ?)");
        assert_eq!(
            args.iter().map(BoundArg::value).cloned().collect::<Vec<_>>(),
            vec![SqlValue::Int(1), SqlValue::Null, SqlValue::Null, SqlValue::Int(1)]
        );
    }

    #[test]
    fn schema_rejects_unknown_column() {
        let dialect = default_dialect();
        let mut schema = TableSchema::new();
        schema.insert(
            "A".to_string(),
            crate::schema::ColumnType {
                database_type_name: "INTEGER".into(),
                decimal_size: None,
                length: None,
            },
        );
        let records = vec![record(&[("nope", SqlValue::Int(1))])];
        let err = build_post(&dialect, Some(&schema), "my_table", &records);
        assert!(matches!(err, Err(CoreError::UnknownColumn { .. })));
    }
}
