//! Compiles a parsed WHERE S-expression into a SQL fragment plus its bound
//! arguments (spec §4.3).
//!
//! Emission walks the tree depth-first. A single counter (`phnum`) is
//! threaded through the whole walk and used both to generate each
//! placeholder (`dialect.placeholder(phnum)`) and to name its bound arg
//! (`dialect.wrap_arg(phnum, value)`), so the two always agree even across
//! nested lists -- the original keeps a second, node-local counter for
//! `wrap_arg` that can drift out of sync with the placeholder text in
//! multiply-nested clauses; this keeps one counter for both (see
//! SPEC_FULL.md §4, Open Question 1).

use crate::conv::conv;
use crate::dialect::Dialect;
use crate::error::{CoreError, Result};
use crate::parser::{self, Sexpr};
use crate::schema::{ColumnType, TableSchema};
use crate::value::{BoundArg, SqlValue};

/// Parses and compiles `input` against `dialect`, returning the rendered SQL
/// fragment and its positional/named bound args in emission order.
///
/// `schema`, when given, makes column references (`.col`) validate against
/// the table's known columns and lets sibling column types drive `conv`.
pub fn compile_where(
    input: &str,
    dialect: &Dialect,
    schema: Option<&TableSchema>,
) -> Result<(String, Vec<BoundArg>)> {
    let mut phnum = 0usize;
    compile_where_from(input, dialect, schema, &mut phnum)
}

/// Like [`compile_where`], but starts placeholder numbering at `*phnum`
/// instead of 0 and leaves the counter advanced past the last placeholder
/// it used. Lets `BuildPut` continue the `SET` clause's numbering into its
/// `WHERE` clause.
pub fn compile_where_from(
    input: &str,
    dialect: &Dialect,
    schema: Option<&TableSchema>,
    phnum: &mut usize,
) -> Result<(String, Vec<BoundArg>)> {
    let ast = parser::parse(input)?;
    compile_node(&ast, dialect, schema, phnum)
}

fn compile_node(
    node: &Sexpr,
    dialect: &Dialect,
    schema: Option<&TableSchema>,
    phnum: &mut usize,
) -> Result<(String, Vec<BoundArg>)> {
    let Sexpr::List(children) = node else {
        return Err(CoreError::InvalidExpr);
    };
    let Some((head, rest)) = children.split_first() else {
        return Err(CoreError::InvalidExpr);
    };

    let operator_name = match head {
        Sexpr::Ident(name) => name.to_uppercase(),
        other => return Err(CoreError::NotAnOperator(format!("{other:?}"))),
    };
    let operator = dialect
        .operator(&operator_name)
        .ok_or_else(|| CoreError::UnknownOperator(operator_name.clone()))?;

    let mut operands = Vec::with_capacity(rest.len());
    let mut args = Vec::new();

    for (i, child) in rest.iter().enumerate() {
        match child {
            Sexpr::List(_) => {
                let (sub_sql, sub_args) = compile_node(child, dialect, schema, phnum)?;
                operands.push(sub_sql);
                args.extend(sub_args);
            }
            Sexpr::Column(name) => {
                if !dialect.is_valid_name(name) {
                    return Err(CoreError::InvalidColumnName(name.clone()));
                }
                if let Some(schema) = schema {
                    let upper = name.to_uppercase();
                    if !schema.contains_key(&upper) {
                        return Err(CoreError::UnknownColumn {
                            table: String::new(),
                            column: upper,
                        });
                    }
                }
                operands.push(name.clone());
            }
            Sexpr::Str(s) => {
                let idx = *phnum;
                operands.push(dialect.placeholder(idx));
                *phnum += 1;
                args.push(dialect.wrap_arg(idx, SqlValue::Text(s.clone())));
            }
            Sexpr::Ident(text) | Sexpr::Number(text) => {
                let hint = sibling_column_type(rest, i, schema);
                let value = conv(text, hint)?;
                let idx = *phnum;
                operands.push(dialect.placeholder(idx));
                *phnum += 1;
                args.push(dialect.wrap_arg(idx, value));
            }
        }
    }

    let sql = operator.apply_format(&operands)?;
    Ok((sql, args))
}

/// Finds the type of the first *other* operand in `siblings` that's a
/// column reference, for use as a `conv` hint. Mirrors the original's
/// "look at a sibling `.col` for its type" rule.
fn sibling_column_type<'a>(
    siblings: &[Sexpr],
    self_index: usize,
    schema: Option<&'a TableSchema>,
) -> Option<&'a ColumnType> {
    let schema = schema?;
    siblings.iter().enumerate().find_map(|(i, s)| {
        if i == self_index {
            return None;
        }
        match s {
            Sexpr::Column(name) => schema.get(&name.to_uppercase()),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::default_dialect;

    fn schema_with_age(type_name: &str) -> TableSchema {
        let mut schema = TableSchema::new();
        schema.insert(
            "AGE".to_string(),
            ColumnType {
                database_type_name: type_name.to_string(),
                decimal_size: None,
                length: None,
            },
        );
        schema
    }

    #[test]
    fn simple_comparison_binds_one_placeholder() {
        let dialect = default_dialect();
        let (sql, args) = compile_where("(= .age 30)", &dialect, None).unwrap();
        assert_eq!(sql, "age = ?");
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].value(), &SqlValue::Int(30));
    }

    #[test]
    fn and_nests_two_comparisons_and_shares_the_placeholder_counter() {
        let dialect = default_dialect();
        let (sql, args) =
            compile_where("(and (= .a 1) (= .b 2))", &dialect, None).unwrap();
        assert_eq!(sql, "(a = ?) AND (b = ?)");
        assert_eq!(args.len(), 2);
        assert_eq!(args[0].value(), &SqlValue::Int(1));
        assert_eq!(args[1].value(), &SqlValue::Int(2));
    }

    #[test]
    fn placeholder_numbering_stays_consistent_with_named_dialects() {
        let mut dialect = default_dialect();
        dialect.set_placeholder(|n| format!("${}", n + 1));
        let (sql, _args) = compile_where("(and (= .a 1) (= .b 2))", &dialect, None).unwrap();
        assert_eq!(sql, "(a = $1) AND (b = $2)");
    }

    #[test]
    fn column_is_validated_against_schema_when_present() {
        let dialect = default_dialect();
        let schema = schema_with_age("INTEGER");
        let err = compile_where("(= .nope 1)", &dialect, Some(&schema)).unwrap_err();
        assert!(matches!(err, CoreError::UnknownColumn { .. }));
    }

    #[test]
    fn sibling_column_type_drives_conv() {
        let dialect = default_dialect();
        let schema = schema_with_age("DECIMAL");
        let mut schema_with_scale = schema.clone();
        schema_with_scale.get_mut("AGE").unwrap().decimal_size = Some((5, 2));
        let (_sql, args) =
            compile_where("(= .age 3.5)", &dialect, Some(&schema_with_scale)).unwrap();
        assert_eq!(args[0].value(), &SqlValue::Float(3.5));
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let dialect = default_dialect();
        let err = compile_where("(WAT .a 1)", &dialect, None).unwrap_err();
        assert!(matches!(err, CoreError::UnknownOperator(_)));
    }

    #[test]
    fn invalid_column_name_is_rejected() {
        let dialect = default_dialect();
        let err = compile_where("(= . 1)", &dialect, None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidColumnName(_)));
    }
}
