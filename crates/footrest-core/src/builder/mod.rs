//! Statement builders (spec §4.4): `BuildGet`/`BuildPost`/`BuildPut`/`BuildDelete`.
//!
//! Modeled as free functions rather than the teacher's typestate builders
//! (`oxide-sql-core/src/builder/{select,insert,update,delete}.rs`) because
//! every shape here is fully known up front -- table, columns, filter,
//! dialect -- so there's no intermediate "incomplete statement" state worth
//! encoding in the type system. Argument handling, test style, and the
//! "one `#[cfg(test)] mod tests` per file" layout are carried over from
//! those modules.

mod delete;
mod get;
mod post;
mod put;

pub use delete::build_delete;
pub use get::build_get;
pub use post::{build_post, Record};
pub use put::build_put;

use crate::dialect::Dialect;
use crate::error::{CoreError, Result};
use crate::schema::TableSchema;

/// Trims and validates a table name against the dialect's identifier rule.
/// The table name is interpolated directly into the SQL text (it's never
/// parameterized), so this is the only thing standing between a caller and
/// injection at that position.
pub(crate) fn validate_table_name(dialect: &Dialect, table: &str) -> Result<String> {
    let table = table.trim().to_string();
    if !dialect.is_valid_name(&table) {
        return Err(CoreError::InvalidTableName(table));
    }
    Ok(table)
}

/// Validates one column-list element (`*`, or a column name that must
/// exist in `schema` when schema-checking is on). Matches the original's
/// `validateColumnName`: validation runs against a trimmed, upper-cased
/// copy of `name`, but callers still emit the original text into the SQL
/// they build -- whitespace quirks in a caller-supplied column name are
/// preserved verbatim, not silently cleaned up.
pub(crate) fn validate_column_name(
    dialect: &Dialect,
    name: &str,
    schema: Option<&TableSchema>,
) -> Result<()> {
    let upper = name.trim().to_uppercase();
    if upper == "*" {
        return Ok(());
    }
    if !dialect.is_valid_name(&upper) {
        return Err(CoreError::InvalidColumnName(name.to_string()));
    }
    if let Some(schema) = schema {
        if !schema.contains_key(&upper) {
            return Err(CoreError::UnknownColumn {
                table: String::new(),
                column: upper,
            });
        }
    }
    Ok(())
}

/// Validates an `ORDER BY` column list (each element may carry a leading
/// `-` for DESC, stripped before the name check).
pub(crate) fn validate_order_columns(
    dialect: &Dialect,
    cols: &[String],
    schema: Option<&TableSchema>,
) -> Result<()> {
    for c in cols {
        let upper = c.to_uppercase();
        let name = upper.strip_prefix('-').unwrap_or(&upper);
        if !dialect.is_valid_name(name) {
            return Err(CoreError::InvalidColumnName(c.clone()));
        }
        if let Some(schema) = schema {
            if !schema.contains_key(name) {
                return Err(CoreError::UnknownColumn {
                    table: String::new(),
                    column: name.to_string(),
                });
            }
        }
    }
    Ok(())
}
