//! Dialect, Operator, and the process-wide Dialect Registry (spec §3, §4.1).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use crate::error::Result;
use crate::value::{BoundArg, SqlValue};

/// Default template used when an operator is registered with no explicit
/// format: `$1 {OPERATOR} $2`.
pub const DEFAULT_OPERATOR_FORMAT: &str = "$1 {OPERATOR} $2";

/// How an operator renders its operand strings into a SQL fragment.
pub enum OperatorRender {
    /// `$1`..`$9` substituted textually into a template.
    Template(String),
    /// Variadic operators (`AND`, `OR`) need a formatter instead of a
    /// fixed-arity template.
    Custom(Box<dyn Fn(&[String]) -> Result<String> + Send + Sync>),
}

impl std::fmt::Debug for OperatorRender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Template(t) => write!(f, "Template({t:?})"),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// `{name, format, formatter?}` (spec §3).
#[derive(Debug)]
pub struct Operator {
    pub name: String,
    pub render: OperatorRender,
}

impl Operator {
    #[must_use]
    pub fn template(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            render: OperatorRender::Template(format.into()),
        }
    }

    #[must_use]
    pub fn default_template(name: &str) -> Self {
        let format = DEFAULT_OPERATOR_FORMAT.replace("{OPERATOR}", name);
        Self::template(name, format)
    }

    pub fn custom(
        name: impl Into<String>,
        f: impl Fn(&[String]) -> Result<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            render: OperatorRender::Custom(Box::new(f)),
        }
    }

    /// Applies the operator to its rendered operand strings, producing one
    /// SQL fragment. `$i` tokens in a template are replaced for `i` in
    /// `1..=9` (the spec's grammar never needs more operands than that).
    pub fn apply_format(&self, operands: &[String]) -> Result<String> {
        match &self.render {
            OperatorRender::Custom(f) => f(operands),
            OperatorRender::Template(format) => {
                let mut result = format.clone();
                for (i, operand) in operands.iter().enumerate() {
                    let token = format!("${}", i + 1);
                    result = result.replace(&token, operand);
                }
                Ok(result)
            }
        }
    }
}

type PlaceholderFn = Box<dyn Fn(usize) -> String + Send + Sync>;
type WrapArgFn = Box<dyn Fn(usize, SqlValue) -> BoundArg + Send + Sync>;
type IsValidNameFn = Box<dyn Fn(&str) -> bool + Send + Sync>;
type PaginateFn = Box<dyn Fn(u32, u32) -> (String, String) + Send + Sync>;

/// Per-backend SQL generation parameters (spec §3).
pub struct Dialect {
    pub name: String,
    operators: HashMap<String, Operator>,
    placeholder: PlaceholderFn,
    wrap_arg: WrapArgFn,
    is_valid_name: IsValidNameFn,
    paginate: PaginateFn,
}

impl std::fmt::Debug for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dialect")
            .field("name", &self.name)
            .field("operators", &self.operators.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Dialect {
    #[must_use]
    pub fn operator(&self, name: &str) -> Option<&Operator> {
        self.operators.get(&name.to_uppercase())
    }

    #[must_use]
    pub fn placeholder(&self, n: usize) -> String {
        (self.placeholder)(n)
    }

    #[must_use]
    pub fn wrap_arg(&self, n: usize, value: SqlValue) -> BoundArg {
        (self.wrap_arg)(n, value)
    }

    #[must_use]
    pub fn is_valid_name(&self, name: &str) -> bool {
        (self.is_valid_name)(name)
    }

    #[must_use]
    pub fn paginate(&self, rows_per_page: u32, page: u32) -> (String, String) {
        (self.paginate)(rows_per_page, page)
    }

    /// Registers or overwrites one operator. Used by `footrest-dialects` to
    /// build a named dialect on top of [`default_dialect`].
    pub fn set_operator(&mut self, operator: Operator) {
        self.operators.insert(operator.name.to_uppercase(), operator);
    }

    pub fn set_placeholder(&mut self, f: impl Fn(usize) -> String + Send + Sync + 'static) {
        self.placeholder = Box::new(f);
    }

    pub fn set_wrap_arg(&mut self, f: impl Fn(usize, SqlValue) -> BoundArg + Send + Sync + 'static) {
        self.wrap_arg = Box::new(f);
    }

    pub fn set_is_valid_name(&mut self, f: impl Fn(&str) -> bool + Send + Sync + 'static) {
        self.is_valid_name = Box::new(f);
    }

    pub fn set_paginate(&mut self, f: impl Fn(u32, u32) -> (String, String) + Send + Sync + 'static) {
        self.paginate = Box::new(f);
    }
}

/// Default identifier validator: letters, digits, underscore only.
#[must_use]
pub fn default_is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn default_paginate(rows_per_page: u32, page: u32) -> (String, String) {
    if rows_per_page == 0 || page == 0 {
        return (String::new(), String::new());
    }
    let offset = rows_per_page * (page - 1);
    (String::new(), format!("LIMIT {rows_per_page} OFFSET {offset}"))
}

/// Builds the default dialect: the operator table of spec §4.1, `?`
/// placeholders, identity arg wrapping, and `LIMIT .. OFFSET ..` pagination.
/// Named dialects are built by copying this and overriding fields
/// (`footrest-dialects`), matching the original's `DefaultDialect()` +
/// per-backend tweaks.
#[must_use]
pub fn default_dialect() -> Dialect {
    let mut operators = HashMap::new();
    let mut add = |name: &str| {
        operators.insert(name.to_uppercase(), Operator::default_template(name));
    };

    for op in ["==", "=", "!=", "<>", ">", "<", ">=", "<=", "!<", "!>", "LIKE", "||"] {
        add(op);
    }

    operators.insert(
        "BETWEEN".into(),
        Operator::template("BETWEEN", "$1 BETWEEN $2 AND $3"),
    );
    operators.insert("IS".into(), Operator::default_template("IS"));
    operators.insert("ISNOT".into(), Operator::template("ISNOT", "$1 IS NOT $2"));
    operators.insert("ISNULL".into(), Operator::template("ISNULL", "$1 IS NULL"));
    operators.insert(
        "ISNOTNULL".into(),
        Operator::template("ISNOTNULL", "$1 IS NOT NULL"),
    );
    operators.insert("NOT".into(), Operator::template("NOT", "NOT ($1)"));

    operators.insert(
        "AND".into(),
        Operator::custom("AND", |args| {
            let wrapped: Vec<String> = args.iter().map(|a| format!("({a})")).collect();
            Ok(wrapped.join(" AND "))
        }),
    );
    operators.insert(
        "OR".into(),
        Operator::custom("OR", |args| {
            let wrapped: Vec<String> = args.iter().map(|a| format!("({a})")).collect();
            Ok(wrapped.join(" OR "))
        }),
    );

    Dialect {
        name: String::new(),
        operators,
        placeholder: Box::new(|_n| "?".to_string()),
        wrap_arg: Box::new(|_n, v| BoundArg::Positional(v)),
        is_valid_name: Box::new(default_is_valid_name),
        paginate: Box::new(default_paginate),
    }
}

/// Process-wide named map of dialects, with a default entry under the
/// empty name (spec §3).
pub struct DialectRegistry {
    inner: Mutex<HashMap<String, Arc<Dialect>>>,
}

impl DialectRegistry {
    fn new() -> Self {
        let mut map = HashMap::new();
        map.insert(String::new(), Arc::new(default_dialect()));
        Self {
            inner: Mutex::new(map),
        }
    }

    pub fn register(&self, name: impl Into<String>, dialect: Dialect) {
        let name = name.into();
        let mut dialect = dialect;
        dialect.name = name.clone();
        self.inner
            .lock()
            .expect("dialect registry mutex poisoned")
            .insert(name, Arc::new(dialect));
    }

    /// Looks up a dialect by name, falling back to the default (empty-key)
    /// entry on a miss.
    #[must_use]
    pub fn get(&self, name: &str) -> Arc<Dialect> {
        let map = self.inner.lock().expect("dialect registry mutex poisoned");
        map.get(name)
            .or_else(|| map.get(""))
            .expect("default dialect is always registered")
            .clone()
    }
}

static REGISTRY: OnceLock<DialectRegistry> = OnceLock::new();

/// The process-wide dialect registry, lazily initialized with the default
/// dialect under the empty key (matches the original's `init()`).
#[must_use]
pub fn global_registry() -> &'static DialectRegistry {
    REGISTRY.get_or_init(DialectRegistry::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dialect_uses_question_mark_placeholders() {
        let d = default_dialect();
        assert_eq!(d.placeholder(0), "?");
        assert_eq!(d.placeholder(5), "?");
    }

    #[test]
    fn default_dialect_pagination_is_empty_when_either_arg_is_zero() {
        let d = default_dialect();
        assert_eq!(d.paginate(0, 1), (String::new(), String::new()));
        assert_eq!(d.paginate(10, 0), (String::new(), String::new()));
    }

    #[test]
    fn default_dialect_pagination_formula() {
        let d = default_dialect();
        assert_eq!(
            d.paginate(10, 3),
            (String::new(), "LIMIT 10 OFFSET 20".to_string())
        );
    }

    #[test]
    fn and_operator_wraps_each_operand_in_parens() {
        let d = default_dialect();
        let op = d.operator("AND").unwrap();
        let rendered = op
            .apply_format(&["a = 1".to_string(), "b = 2".to_string()])
            .unwrap();
        assert_eq!(rendered, "(a = 1) AND (b = 2)");
    }

    #[test]
    fn between_template_substitutes_three_operands() {
        let d = default_dialect();
        let op = d.operator("BETWEEN").unwrap();
        let rendered = op
            .apply_format(&["AGE".into(), "?".into(), "?".into()])
            .unwrap();
        assert_eq!(rendered, "AGE BETWEEN ? AND ?");
    }

    #[test]
    fn registry_falls_back_to_default_on_miss() {
        let registry = DialectRegistry::new();
        let d = registry.get("no-such-dialect");
        assert_eq!(d.placeholder(0), "?");
    }

    #[test]
    fn registry_register_is_visible_to_get() {
        let registry = DialectRegistry::new();
        let mut custom = default_dialect();
        custom.placeholder = Box::new(|n| format!("${}", n + 1));
        registry.register("postgres", custom);
        assert_eq!(registry.get("postgres").placeholder(0), "$1");
    }

    #[test]
    fn default_identifier_validator_rejects_metacharacters() {
        assert!(default_is_valid_name("users"));
        assert!(default_is_valid_name("_private_1"));
        assert!(!default_is_valid_name("users; DROP TABLE users"));
        assert!(!default_is_valid_name(""));
    }
}
