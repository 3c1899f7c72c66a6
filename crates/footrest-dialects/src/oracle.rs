//! oracle: `:0`, `:1`, ... placeholders; `OFFSET .. ROWS FETCH FIRST .. ROWS ONLY`
//! pagination (spec §4.1).

use footrest_core::{default_dialect, Dialect};

#[must_use]
pub fn oracle_dialect() -> Dialect {
    let mut d = default_dialect();
    d.set_placeholder(|n| format!(":{n}"));
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

    #[test]
    fn oracle_placeholders_are_zero_indexed_colon_numbers() {
        let d = oracle_dialect();
        assert_eq!(d.placeholder(0), ":0");
        assert_eq!(d.placeholder(3), ":3");
    }

    #[test]
    fn oracle_pagination_uses_offset_fetch_first() {
        let d = oracle_dialect();
        assert_eq!(
            d.paginate(10, 3),
            (String::new(), "OFFSET 20 ROWS FETCH FIRST 10 ROWS ONLY".into())
        );
        assert_eq!(d.paginate(0, 1), (String::new(), String::new()));
    }
}
