//! `BuildDelete` (spec §4.4): `DELETE FROM table WHERE ...`.

use super::validate_table_name;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::schema::TableSchema;
use crate::value::BoundArg;
use crate::where_compiler::compile_where;

pub fn build_delete(
    dialect: &Dialect,
    schema: Option<&TableSchema>,
    table: &str,
    where_sexpr: &str,
) -> Result<(String, Vec<BoundArg>)> {
    let table = validate_table_name(dialect, table)?;
    let where_sexpr = where_sexpr.trim();

    let mut sql = format!("DELETE FROM {table}");
    let mut args = Vec::new();

    if !where_sexpr.is_empty() {
        let (fragment, where_args) = compile_where(where_sexpr, dialect, schema)?;
        sql.push_str(" WHERE ");
        sql.push_str(&fragment);
        args = where_args;
    }

    Ok((sql, args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::default_dialect;
    use crate::value::SqlValue;

    #[test]
    fn delete_with_where_clause() {
        let dialect = default_dialect();
        let (sql, args) = build_delete(
            &dialect,
            None,
            "my_table",
            "(and (= .d #1) (like .e 'hoge%hoge'))",
        )
        .unwrap();
        assert_eq!(sql, "DELETE FROM my_table WHERE (d = ?) AND (e LIKE ?)");
        assert_eq!(args[0].value(), &SqlValue::Int(1));
        assert_eq!(args[1].value(), &SqlValue::Text("hoge%hoge".into()));
    }

    #[test]
    fn delete_without_where_clause_deletes_whole_table() {
        let dialect = default_dialect();
        let (sql, args) = build_delete(&dialect, None, "my_table", "").unwrap();
        assert_eq!(sql, "DELETE FROM my_table");
        assert!(args.is_empty());
    }
}
