//! Bulk Manip data shape (spec §3, §4.6): one entry in a `POST /!bulk`
//! batch.

use std::collections::BTreeMap;

use crate::builder::Record;
use crate::colcond::{compose_where, extra_condition};
use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
    Put,
    Delete,
}

impl Method {
    /// Parses the upper-cased `method` field of a Manip record.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            other => Err(CoreError::Conversion(format!(
                "unsupported bulk method: {other:?}"
            ))),
        }
    }
}

/// `{method, table, where: map<string,string>?, values: map<string,any>?}`.
#[derive(Debug, Clone)]
pub struct Manip {
    pub method: Method,
    pub table: String,
    pub r#where: Option<BTreeMap<String, String>>,
    pub values: Option<Record>,
}

/// Builds the WHERE S-expr for one Manip's `where` map, using the same
/// column-condition prefixes as HTTP query-parameter handling (spec
/// §4.6). Unlike the HTTP handlers, a Manip never has a separate explicit
/// `where` parameter to AND onto -- its whole filter comes from this map.
#[must_use]
pub fn where_sexpr_for_manip(manip: &Manip) -> Option<String> {
    let map = manip.r#where.as_ref()?;
    let extras: Vec<String> = map
        .iter()
        .map(|(col, value)| extra_condition(&col.to_uppercase(), value))
        .collect();
    compose_where(None, &extras)
}
