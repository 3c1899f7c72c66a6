//! `BuildGet` (spec §4.4): `SELECT ... FROM ... WHERE ... ORDER BY ...`
//! with dialect-specific pagination wrapped around the whole statement.

use super::{validate_column_name, validate_order_columns, validate_table_name};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::schema::TableSchema;
use crate::value::BoundArg;
use crate::where_compiler::compile_where;

/// Builds a `SELECT` statement. `sel_cols` empty means `SELECT *`;
/// `order_cols` elements prefixed with `-` sort descending.
pub fn build_get(
    dialect: &Dialect,
    schema: Option<&TableSchema>,
    table: &str,
    sel_cols: &[String],
    where_sexpr: &str,
    order_cols: &[String],
    rows_per_page: u32,
    page: u32,
) -> Result<(String, Vec<BoundArg>)> {
    let table = validate_table_name(dialect, table)?;
    let where_sexpr = where_sexpr.trim();

    let default_star = ["*".to_string()];
    let sel_cols: &[String] = if sel_cols.is_empty() {
        &default_star
    } else {
        sel_cols
    };
    for c in sel_cols {
        validate_column_name(dialect, c, schema)?;
    }
    let select_clause = format!("SELECT {}", sel_cols.join(", "));

    let from_clause = format!("FROM {table}");

    let mut args = Vec::new();
    let where_clause = if where_sexpr.is_empty() {
        String::new()
    } else {
        let (fragment, where_args) = compile_where(where_sexpr, dialect, schema)?;
        args = where_args;
        format!("WHERE {fragment}")
    };

    let order_by_clause = if order_cols.is_empty() {
        String::new()
    } else {
        validate_order_columns(dialect, order_cols, schema)?;
        let rendered: Vec<String> = order_cols
            .iter()
            .map(|o| match o.strip_prefix('-') {
                Some(rest) => format!("{rest} DESC"),
                None => o.clone(),
            })
            .collect();
        format!("ORDER BY {}", rendered.join(", "))
    };

    let (prefix, suffix) = dialect.paginate(rows_per_page, page);

    let sql = [
        prefix.as_str(),
        select_clause.as_str(),
        from_clause.as_str(),
        where_clause.as_str(),
        order_by_clause.as_str(),
        suffix.as_str(),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(" ");

    Ok((sql, args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::default_dialect;
    use crate::value::SqlValue;

    #[test]
    fn select_star_with_no_filter_or_order() {
        let dialect = default_dialect();
        let (sql, args) = build_get(&dialect, None, "users", &[], "", &[], 0, 0).unwrap();
        assert_eq!(sql, "SELECT * FROM users");
        assert!(args.is_empty());
    }

    #[test]
    fn explicit_columns_filter_and_descending_order() {
        let dialect = default_dialect();
        let (sql, args) = build_get(
            &dialect,
            None,
            "my_table",
            &["a".into(), "b".into(), "c".into()],
            "(and (= .d #1) (like .e 'hoge%hoge'))",
            &["-a".into(), "c".into()],
            0,
            0,
        )
        .unwrap();
        assert_eq!(
            sql,
            "SELECT a, b, c FROM my_table WHERE (d = ?) AND (e LIKE ?) ORDER BY a DESC, c"
        );
        assert_eq!(args[0].value(), &SqlValue::Int(1));
        assert_eq!(args[1].value(), &SqlValue::Text("hoge%hoge".into()));
    }

    #[test]
    fn pagination_wraps_whole_statement_for_sqlite_style_dialect() {
        let dialect = default_dialect();
        let (sql, _args) = build_get(&dialect, None, "users", &[], "", &[], 10, 3).unwrap();
        assert_eq!(sql, "SELECT * FROM users LIMIT 10 OFFSET 20");
    }

    #[test]
    fn invalid_table_name_is_rejected() {
        let dialect = default_dialect();
        let err = build_get(&dialect, None, "users; DROP TABLE users", &[], "", &[], 0, 0);
        assert!(err.is_err());
    }
}
