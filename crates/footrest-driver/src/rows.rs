//! Converts `sqlx::any::AnyRow` cells into [`SqlValue`], and probes a
//! table's column metadata into a [`TableSchema`].
//!
//! `sqlx::any` trades away per-backend precision: `AnyTypeInfo` exposes a
//! `Display` impl (used here as `database_type_name`) but no portable
//! precision/scale, so probed [`ColumnType`]s always carry
//! `decimal_size: None`, `length: None`. That's enough for `conv`'s
//! type-name-based rules (`INT`/`DEC`/`BOOL`/...) but not its
//! scale-driven float/integer split; see DESIGN.md.

use footrest_core::{ColumnType, SqlValue, TableSchema};
use sqlx::any::{AnyColumn, AnyRow};
use sqlx::{Column, Row, TypeInfo};

use crate::error::Result;

/// Column names in statement order, alongside the dialect-agnostic type
/// hints a probe query (`SELECT * FROM <table> WHERE 1=0`) reports.
#[must_use]
pub fn schema_from_probe(row_columns: &[AnyColumnMeta]) -> TableSchema {
    row_columns
        .iter()
        .map(|c| {
            (
                c.name.to_uppercase(),
                ColumnType {
                    database_type_name: c.type_name.to_uppercase(),
                    decimal_size: None,
                    length: None,
                },
            )
        })
        .collect()
}

/// Plain-data snapshot of one `AnyColumn`'s name and declared type, taken
/// up front so probing doesn't need to hold a borrow into a `Vec<AnyRow>`.
pub struct AnyColumnMeta {
    pub name: String,
    pub type_name: String,
}

/// Reads column metadata off a statement's result columns. `&[AnyColumn]`
/// covers both a fetched `AnyRow` and a `Describe<Any>` from a schema
/// probe, since both expose `.columns()` returning the same slice type.
#[must_use]
pub fn columns_meta(columns: &[AnyColumn]) -> Vec<AnyColumnMeta> {
    columns
        .iter()
        .map(|c| AnyColumnMeta {
            name: c.name().to_string(),
            type_name: c.type_info().name().to_string(),
        })
        .collect()
}

/// Extracts column names, in statement order, from either an `AnyRow` or
/// a `Describe<Any>`'s `.columns()`.
#[must_use]
pub fn column_names(columns: &[AnyColumn]) -> Vec<String> {
    columns.iter().map(|c| c.name().to_string()).collect()
}

/// Decodes one row into a vector of [`SqlValue`], attempting the common
/// scalar types in order until one decodes cleanly. `AnyRow` doesn't carry
/// enough backend-specific type information to decode exactly once per
/// cell, so this tries narrowest-to-widest and falls back to text.
pub fn row_to_values(row: &AnyRow) -> Result<Vec<SqlValue>> {
    let mut values = Vec::with_capacity(row.columns().len());
    for idx in 0..row.columns().len() {
        values.push(decode_cell(row, idx)?);
    }
    Ok(values)
}

fn decode_cell(row: &AnyRow, idx: usize) -> Result<SqlValue> {
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return Ok(v.map_or(SqlValue::Null, SqlValue::Int));
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return Ok(v.map_or(SqlValue::Null, SqlValue::Float));
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(idx) {
        return Ok(v.map_or(SqlValue::Null, SqlValue::Bool));
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return Ok(v.map_or(SqlValue::Null, SqlValue::Text));
    }
    Ok(SqlValue::Null)
}
