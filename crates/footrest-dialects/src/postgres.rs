//! postgres: `$1`, `$2`, ... placeholders, default pagination (spec §4.1).

use footrest_core::{default_dialect, Dialect};

#[must_use]
pub fn postgres_dialect() -> Dialect {
    let mut d = default_dialect();
    d.set_placeholder(|n| format!("${}", n + 1));
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_placeholders_are_one_indexed_dollar_numbers() {
        let d = postgres_dialect();
        assert_eq!(d.placeholder(0), "$1");
        assert_eq!(d.placeholder(5), "$6");
    }
}
