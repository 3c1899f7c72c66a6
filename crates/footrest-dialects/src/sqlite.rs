//! sqlite: identical to the default dialect (spec §4.1).

use footrest_core::{default_dialect, Dialect};

#[must_use]
pub fn sqlite_dialect() -> Dialect {
    default_dialect()
}
