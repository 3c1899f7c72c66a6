//! Renders `Config.Format`'s templates into response bodies (spec §4.5).
//! Each template has exactly one `%` substitution point.

use footrest_core::SqlValue;

/// `Format.QueryOK` with `%` replaced by a comma-separated list of
/// row objects. Column order follows `columns`.
#[must_use]
pub fn format_query_ok(template: &str, columns: &[String], rows: &[Vec<SqlValue>]) -> String {
    let body = rows
        .iter()
        .map(|row| row_to_json_object(columns, row))
        .collect::<Vec<_>>()
        .join(", ");
    substitute(template, &body)
}

/// `Format.ExecOK` with `%` replaced by the rows-affected count.
#[must_use]
pub fn format_exec_ok(template: &str, rows_affected: u64) -> String {
    substitute(template, &rows_affected.to_string())
}

/// `Format.Error` with `%` replaced by the escaped, quoted error message.
#[must_use]
pub fn format_error(template: &str, message: &str) -> String {
    substitute(template, &format!("\"{}\"", escape(message)))
}

fn substitute(template: &str, inner: &str) -> String {
    template.replacen('%', inner, 1)
}

fn row_to_json_object(columns: &[String], row: &[SqlValue]) -> String {
    let parts: Vec<String> = columns
        .iter()
        .zip(row.iter())
        .map(|(col, value)| format!("\"{}\":{}", escape(col), render_cell(value)))
        .collect();
    format!("{{{}}}", parts.join(","))
}

/// One scalar cell: `null` for nil, an escaped/quoted string for text,
/// otherwise the value's plain textual representation (spec §4.5).
fn render_cell(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => "null".to_string(),
        SqlValue::Text(s) => format!("\"{}\"", escape(s)),
        other => other.to_display_string().unwrap_or_else(|| "null".to_string()),
    }
}

/// Backslash and double-quote escaping only, matching the original's
/// literal behavior (not full JSON string escaping of control characters).
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '\\' || c == '"' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
