//! `BuildPut` (spec §4.4): `UPDATE table SET ... WHERE ...`.

use super::validate_table_name;
use crate::builder::post::Record;
use crate::dialect::Dialect;
use crate::error::{CoreError, Result};
use crate::schema::TableSchema;
use crate::value::BoundArg;
use crate::where_compiler::compile_where_from;

/// Builds an `UPDATE` statement. `values` keys are sorted ascending for
/// the `SET` clause; the WHERE clause's placeholders continue numbering
/// from where `SET` left off, so numbered-placeholder dialects (postgres,
/// oracle, sqlserver) don't rebind the wrong argument (see SPEC_FULL.md
/// §4, Open Question 1 -- the original restarts the counter per clause).
pub fn build_put(
    dialect: &Dialect,
    schema: Option<&TableSchema>,
    table: &str,
    values: &Record,
    where_sexpr: &str,
) -> Result<(String, Vec<BoundArg>)> {
    let table = validate_table_name(dialect, table)?;
    let where_sexpr = where_sexpr.trim();

    let columns: Vec<&String> = values.keys().collect();

    if let Some(schema) = schema {
        for c in &columns {
            if !schema.contains_key(&c.to_uppercase()) {
                return Err(CoreError::UnknownColumn {
                    table: table.clone(),
                    column: c.to_uppercase(),
                });
            }
        }
    }

    let mut sql = format!("UPDATE {table} SET ");
    let mut args = Vec::with_capacity(columns.len());
    let mut ph = 0usize;

    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(column);
        sql.push_str(" = ");
        sql.push_str(&dialect.placeholder(ph));
        args.push(dialect.wrap_arg(ph, values[*column].clone()));
        ph += 1;
    }

    if !where_sexpr.is_empty() {
        let (fragment, where_args) = compile_where_from(where_sexpr, dialect, schema, &mut ph)?;
        sql.push_str(" WHERE ");
        sql.push_str(&fragment);
        args.extend(where_args);
    }

    Ok((sql, args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::default_dialect;
    use crate::value::SqlValue;

    fn record(pairs: &[(&str, SqlValue)]) -> Record {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn set_then_where_with_continuous_placeholders() {
        let dialect = default_dialect();
        let values = record(&[("a", SqlValue::Int(1)), ("b", SqlValue::Text("text".into()))]);
        let (sql, args) = build_put(
            &dialect,
            None,
            "my_table",
            &values,
            "(and (= .d #1) (like .e 'hoge%hoge'))",
        )
        .unwrap();
        assert_eq!(
            sql,
            "UPDATE my_table SET a = ?, b = ? WHERE (d = ?) AND (e LIKE ?)"
        );
        assert_eq!(
            args.iter().map(BoundArg::value).cloned().collect::<Vec<_>>(),
            vec![
                SqlValue::Int(1),
                SqlValue::Text("text".into()),
                SqlValue::Int(1),
                SqlValue::Text("hoge%hoge".into()),
            ]
        );
    }

    #[test]
    fn numbered_dialect_continues_placeholder_sequence_into_where() {
        let mut dialect = default_dialect();
        dialect.set_placeholder(|n| format!("${}", n + 1));
        let values = record(&[("a", SqlValue::Int(1))]);
        let (sql, _args) = build_put(&dialect, None, "t", &values, "(= .b 2)").unwrap();
        assert_eq!(sql, "UPDATE t SET a = $1 WHERE b = $2");
    }

    #[test]
    fn no_where_means_update_whole_table() {
        let dialect = default_dialect();
        let values = record(&[("a", SqlValue::Int(1))]);
        let (sql, _args) = build_put(&dialect, None, "t", &values, "").unwrap();
        assert_eq!(sql, "UPDATE t SET a = ?");
    }
}
