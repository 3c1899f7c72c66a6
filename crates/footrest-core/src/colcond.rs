//! Column Condition shorthand (spec §3, §4.5): translates an inline query
//! value like `age=>=5` into an S-expression fragment `(>= .AGE 5)`, and
//! composes those fragments with an explicit `where` parameter.

/// `(prefix, operator)` pairs, checked in this order; first match wins
/// (spec §3, testable invariant 6). `%` means LIKE; no match defaults to
/// `=`.
const COLUMN_CONDITIONS: &[(&str, &str)] = &[
    (">=", ">="),
    (">", ">"),
    ("<=", "<="),
    ("<", "<"),
    ("%", "LIKE"),
    ("!", "!="),
    ("=", "="),
];

/// Strips the longest matching prefix from `value` and returns the operator
/// it maps to, along with the remaining text. Falls back to `=` with the
/// value untouched when nothing matches.
#[must_use]
pub fn match_prefix(value: &str) -> (&'static str, &str) {
    for (prefix, op) in COLUMN_CONDITIONS {
        if let Some(rest) = value.strip_prefix(prefix) {
            return (op, rest);
        }
    }
    ("=", value)
}

/// Builds one extra-where S-expr fragment for a single query value, e.g.
/// `extra_condition("AGE", ">=18")` → `"(>= .AGE 18)"`.
#[must_use]
pub fn extra_condition(column: &str, value: &str) -> String {
    let (op, rest) = match_prefix(value);
    format!("({op} .{column} {rest})")
}

/// Composes the explicit `where` parameter with the extra column
/// conditions gathered from the rest of the query string.
///
/// When there are no extra conditions, `base` passes through unchanged
/// (including `None`, meaning no WHERE at all). When there are extras but
/// no (or an empty) base where, the result is just `(AND c1 c2 ...)` --
/// the original emits `(AND  c1 c2 ...)` with an empty first operand in
/// that case, which this grammar's parser would reject as an empty atom;
/// see SPEC_FULL.md §4.
#[must_use]
pub fn compose_where(base: Option<&str>, extras: &[String]) -> Option<String> {
    if extras.is_empty() {
        return base.map(str::to_string).filter(|s| !s.is_empty());
    }
    let joined = extras.join(" ");
    match base.map(str::trim) {
        Some(b) if !b.is_empty() => Some(format!("(AND {b} {joined})")),
        _ => Some(format!("(AND {joined})")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_prefix_wins_over_equals() {
        assert_eq!(match_prefix(">=5"), (">=", "5"));
        assert_eq!(match_prefix(">5"), (">", "5"));
        assert_eq!(match_prefix("<=5"), ("<=", "5"));
        assert_eq!(match_prefix("<5"), ("<", "5"));
    }

    #[test]
    fn percent_means_like() {
        assert_eq!(match_prefix("%foo%"), ("LIKE", "foo%"));
    }

    #[test]
    fn bang_means_not_equal() {
        assert_eq!(match_prefix("!5"), ("!=", "5"));
    }

    #[test]
    fn unmatched_defaults_to_equals_with_value_untouched() {
        assert_eq!(match_prefix("5"), ("=", "5"));
    }

    #[test]
    fn extra_condition_builds_column_sexpr() {
        assert_eq!(extra_condition("AGE", ">=18"), "(>= .AGE 18)");
        assert_eq!(extra_condition("AGE", "18"), "(= .AGE 18)");
    }

    #[test]
    fn compose_where_passes_through_base_when_no_extras() {
        assert_eq!(compose_where(Some("(= .a 1)"), &[]), Some("(= .a 1)".into()));
        assert_eq!(compose_where(None, &[]), None);
    }

    #[test]
    fn compose_where_ands_extras_onto_existing_base() {
        let extras = vec!["(> .b 2)".to_string()];
        assert_eq!(
            compose_where(Some("(= .a 1)"), &extras),
            Some("(AND (= .a 1) (> .b 2))".into())
        );
    }

    #[test]
    fn compose_where_with_no_base_has_no_empty_operand() {
        let extras = vec!["(> .b 2)".to_string(), "(< .c 3)".to_string()];
        assert_eq!(
            compose_where(None, &extras),
            Some("(AND (> .b 2) (< .c 3))".into())
        );
        assert_eq!(
            compose_where(Some(""), &extras),
            Some("(AND (> .b 2) (< .c 3))".into())
        );
    }
}
