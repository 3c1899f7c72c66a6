//! Untyped atom → bound value coercion (spec §4.3, item 4).
//!
//! Faithfully reproduces the original's `conv`, including its documented
//! quirk: a leading `-` short-circuits to integer parsing before any
//! schema-type inference runs, so a bare atom can never bind a negative
//! float (see SPEC_FULL.md §4). This is preserved on purpose, not fixed.

use crate::error::CoreError;
use crate::schema::ColumnType;
use crate::value::SqlValue;

pub fn conv(s: &str, typ: Option<&ColumnType>) -> Result<SqlValue, CoreError> {
    if let Some(rest) = s.strip_prefix('-') {
        let n: i64 = format!("-{rest}")
            .parse()
            .map_err(|_| CoreError::Conversion(format!("not an integer: {s:?}")))?;
        return Ok(SqlValue::Int(n));
    }
    if let Some(rest) = s.strip_prefix('#') {
        let n: i64 = rest
            .parse()
            .map_err(|_| CoreError::Conversion(format!("not an integer: {s:?}")))?;
        return Ok(SqlValue::Int(n));
    }

    let upper = s.to_uppercase();
    if upper == "NULL" {
        return Ok(SqlValue::Null);
    }
    if upper == "TRUE" {
        return Ok(SqlValue::Bool(true));
    }
    if upper == "FALSE" {
        return Ok(SqlValue::Bool(false));
    }

    if let Some(typ) = typ {
        if let Some((_, scale)) = typ.decimal_size {
            return if scale > 0 {
                s.parse()
                    .map(SqlValue::Float)
                    .map_err(|_| CoreError::Conversion(format!("not a float: {s:?}")))
            } else {
                s.parse()
                    .map(SqlValue::Int)
                    .map_err(|_| CoreError::Conversion(format!("not an integer: {s:?}")))
            };
        }

        if typ.length.is_some() {
            return Ok(SqlValue::Text(s.to_string()));
        }

        let name = &typ.database_type_name;
        if name.contains("INT") {
            return s
                .parse()
                .map(SqlValue::Int)
                .map_err(|_| CoreError::Conversion(format!("not an integer: {s:?}")));
        }
        if name.contains("DEC") || name.contains("NUM") || name.contains("FLOAT") || name.contains("REAL") {
            return s
                .parse()
                .map(SqlValue::Float)
                .map_err(|_| CoreError::Conversion(format!("not a float: {s:?}")));
        }
        // `BOOL` coerces to integer, not bool -- codified in spec §4.3, kept as-is.
        if name.contains("BOOL") {
            return s
                .parse()
                .map(SqlValue::Int)
                .map_err(|_| CoreError::Conversion(format!("not an integer: {s:?}")));
        }
    }

    Ok(SqlValue::Text(s.to_string()))
}
