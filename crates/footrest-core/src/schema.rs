//! Schema Cache (spec §3): per-table memoized column metadata.
//!
//! The cache itself is pure data plus a mutex; the actual probing query
//! (`SELECT * FROM <table> WHERE 1=0`) is driver I/O and lives in
//! `footrest-driver`, which calls [`SchemaCache::get_or_insert_with`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Column-type metadata as surfaced by the driver's `ColumnTypes()` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnType {
    pub database_type_name: String,
    /// `(precision, scale)`, when the driver reports one.
    pub decimal_size: Option<(u8, u8)>,
    pub length: Option<i64>,
}

/// Map from upper-cased column name to its type, for one table.
pub type TableSchema = HashMap<String, ColumnType>;

/// Per-Engine mapping from upper-cased table name to [`TableSchema`].
/// Never invalidated during a process lifetime; access is serialized by a
/// mutex (spec §3, §5).
#[derive(Default)]
pub struct SchemaCache {
    inner: Mutex<HashMap<String, Arc<TableSchema>>>,
}

impl SchemaCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached schema for `table` (already upper-cased), or
    /// `None` if it hasn't been probed yet.
    #[must_use]
    pub fn get(&self, table: &str) -> Option<Arc<TableSchema>> {
        self.inner
            .lock()
            .expect("schema cache mutex poisoned")
            .get(table)
            .cloned()
    }

    /// Records the probed schema for `table`. Called once per table; later
    /// calls silently overwrite (there's no invalidation in this design,
    /// matching the original, so a second probe would only happen if the
    /// caller chooses to re-probe).
    pub fn insert(&self, table: impl Into<String>, schema: TableSchema) -> Arc<TableSchema> {
        let schema = Arc::new(schema);
        self.inner
            .lock()
            .expect("schema cache mutex poisoned")
            .insert(table.into(), schema.clone());
        schema
    }
}
