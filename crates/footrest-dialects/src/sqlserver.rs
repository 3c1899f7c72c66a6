//! sqlserver: `@arg0`, `@arg1`, ... placeholders wrapped as named bindings;
//! same pagination as oracle (spec §4.1).

use footrest_core::{default_dialect, BoundArg, Dialect};

#[must_use]
pub fn sqlserver_dialect() -> Dialect {
    let mut d = default_dialect();
    d.set_placeholder(|n| format!("@arg{n}"));
    d.set_wrap_arg(|n, value| BoundArg::Named {
        name: format!("arg{n}"),
        value,
    });
    d.set_paginate(|rows_per_page, page| {
        if rows_per_page == 0 || page == 0 {
            return (String::new(), String::new());
        }
        let offset = rows_per_page * (page - 1);
        (
            String::new(),
            format!("OFFSET {offset} ROWS FETCH FIRST {rows_per_page} ROWS ONLY"),
        )
    });
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use footrest_core::SqlValue;

    #[test]
    fn sqlserver_placeholders_and_named_bindings_share_the_same_index() {
        let d = sqlserver_dialect();
        assert_eq!(d.placeholder(2), "@arg2");
        let bound = d.wrap_arg(2, SqlValue::Int(7));
        assert_eq!(
            bound,
            BoundArg::Named {
                name: "arg2".into(),
                value: SqlValue::Int(7),
            }
        );
    }
}
