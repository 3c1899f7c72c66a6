//! Bound SQL values.

use serde::{Deserialize, Serialize};

/// A SQL value bound as a statement argument.
///
/// `#[serde(untagged)]` doubles as the wire format for POST/PUT record
/// bodies: a JSON request deserializes straight into `Record` (`BTreeMap<String,
/// SqlValue>`) by trying each variant's shape in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SqlValue {
    /// Textual representation used when a row is serialized back into JSON
    /// by the HTTP layer (mirrors the original's `fmt.Sprintf("%v", ...)`
    /// fallback for non-string, non-nil cells).
    #[must_use]
    pub fn to_display_string(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(n) => Some(n.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Text(s) => Some(s.clone()),
        }
    }
}

/// What a builder actually pushes onto the argument vector: most dialects
/// bind a bare value, but dialects like sqlserver wrap it as a named
/// binding (`wrap_arg`).
#[derive(Debug, Clone, PartialEq)]
pub enum BoundArg {
    Positional(SqlValue),
    Named { name: String, value: SqlValue },
}

impl BoundArg {
    #[must_use]
    pub fn value(&self) -> &SqlValue {
        match self {
            Self::Positional(v) | Self::Named { value: v, .. } => v,
        }
    }

    #[must_use]
    pub fn into_value(self) -> SqlValue {
        match self {
            Self::Positional(v) | Self::Named { value: v, .. } => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_arg_unwraps_either_shape() {
        let positional = BoundArg::Positional(SqlValue::Int(1));
        let named = BoundArg::Named {
            name: "arg0".into(),
            value: SqlValue::Int(1),
        };
        assert_eq!(positional.value(), named.value());
    }

    #[test]
    fn display_string_matches_go_fallback_formatting() {
        assert_eq!(SqlValue::Null.to_display_string(), None);
        assert_eq!(SqlValue::Bool(true).to_display_string(), Some("true".into()));
        assert_eq!(SqlValue::Int(-100).to_display_string(), Some("-100".into()));
        assert_eq!(SqlValue::Text("hi".into()).to_display_string(), Some("hi".into()));
    }
}
