//! Per-backend [`Dialect`] constructors (spec §4.1). Each one starts from
//! [`footrest_core::default_dialect`] and overrides only the fields that
//! backend actually differs on, mirroring `oxide-sql-sqlite`'s one
//! crate-per-backend layout.

mod oracle;
mod postgres;
mod sqlite;
mod sqlserver;

pub use oracle::oracle_dialect;
pub use postgres::postgres_dialect;
pub use sqlite::sqlite_dialect;
pub use sqlserver::sqlserver_dialect;

use footrest_core::Dialect;

/// Builds and registers all four bundled dialects into the process-wide
/// registry, under the names `sqlite`, `postgres`, `oracle`, `sqlserver`.
/// The default (empty-key) entry from `footrest_core::default_dialect`
/// stays registered regardless.
pub fn register_all() {
    let registry = footrest_core::global_registry();
    registry.register("sqlite", sqlite_dialect());
    registry.register("postgres", postgres_dialect());
    registry.register("oracle", oracle_dialect());
    registry.register("sqlserver", sqlserver_dialect());
}

/// Looks up a dialect by name from the bundled set, building it fresh
/// rather than going through the global registry. Useful for callers that
/// want an isolated `Dialect` without mutating process-wide state (tests,
/// the `generate` CLI subcommand).
#[must_use]
pub fn by_name(name: &str) -> Dialect {
    match name {
        "sqlite" => sqlite_dialect(),
        "postgres" => postgres_dialect(),
        "oracle" => oracle_dialect(),
        "sqlserver" => sqlserver_dialect(),
        _ => footrest_core::default_dialect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_name_falls_back_to_default_for_unknown_names() {
        let d = by_name("does-not-exist");
        assert_eq!(d.placeholder(0), "?");
    }

    #[test]
    fn all_four_names_resolve_to_distinct_dialects() {
        assert_eq!(sqlite_dialect().placeholder(0), "?");
        assert_eq!(postgres_dialect().placeholder(0), "$1");
        assert_eq!(oracle_dialect().placeholder(0), ":0");
        assert_eq!(sqlserver_dialect().placeholder(0), "@arg0");
    }
}
