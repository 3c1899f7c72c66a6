//! `Config` (spec §3/§6): tuning parameters and response templates. Field
//! names and defaults follow `examples/original_source/cmd/footrest/config.go`
//! and `footrest.go`'s `DefaultConfig`.

use serde::{Deserialize, Serialize};

/// Response template strings, each with exactly one `%` substitution
/// point (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Format {
    pub query_ok: String,
    pub exec_ok: String,
    pub error: String,
}

impl Default for Format {
    fn default() -> Self {
        Self {
            query_ok: "{\"result\": [%]}".to_string(),
            exec_ok: "{\"result\": %}".to_string(),
            error: "{\"error\": %}".to_string(),
        }
    }
}

/// Names of the reserved query parameters (spec §6); configurable so a
/// deployer can rename them without recompiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ParamNames {
    pub select: String,
    pub r#where: String,
    pub order: String,
    pub rows: String,
    pub page: String,
}

impl Default for ParamNames {
    fn default() -> Self {
        Self {
            select: "select".to_string(),
            r#where: "where".to_string(),
            order: "order".to_string(),
            rows: "rows".to_string(),
            page: "page".to_string(),
        }
    }
}

impl ParamNames {
    #[must_use]
    pub fn is_reserved(&self, key: &str) -> bool {
        key == self.select || key == self.r#where || key == self.order || key == self.rows || key == self.page
    }
}

/// Top-level server configuration (spec §6's `Config` plus the original's
/// `db_type`/`connection`/`debug` wrapper fields, per SPEC_FULL.md §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Base path every route is mounted under.
    pub root: String,
    /// Listen address, e.g. `"127.0.0.1:12345"`.
    pub addr: String,
    /// Dialect/registry name: `sqlite`, `postgres`, `oracle`, `sqlserver`.
    pub db_type: String,
    /// `sqlx` connection string.
    pub connection: String,
    /// Whether to probe and enforce table schemas.
    pub use_schema: bool,
    /// Per-handler cancellation deadline in milliseconds; negative means
    /// no timeout (spec §5).
    pub timeout_ms: i64,
    /// Raises the tracing filter to `debug` when set.
    pub debug: bool,
    pub params: ParamNames,
    pub format: Format,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: "/".to_string(),
            addr: "127.0.0.1:12345".to_string(),
            db_type: "sqlite".to_string(),
            connection: "sqlite::memory:".to_string(),
            use_schema: true,
            timeout_ms: 30_000,
            debug: false,
            params: ParamNames::default(),
            format: Format::default(),
        }
    }
}

impl Config {
    /// Merges `self` onto `Config::default()` field-by-field is not
    /// needed: callers load JSON straight into a `Config` whose `#[serde]`
    /// defaults already are `Config::default()`'s values via
    /// `serde(default)` on the CLI's loader (see `footrest` bin's
    /// `config.rs`). This helper is for the CLI to merge a *partial*
    /// config file onto defaults when a field is simply absent from JSON.
    #[must_use]
    pub fn merged_onto_default(partial: serde_json::Value) -> serde_json::Result<Self> {
        let default_value = serde_json::to_value(Self::default())?;
        let mut merged = default_value;
        merge_json(&mut merged, partial);
        serde_json::from_value(merged)
    }
}

fn merge_json(base: &mut serde_json::Value, overlay: serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base_map), serde_json::Value::Object(overlay_map)) => {
            for (k, v) in overlay_map {
                merge_json(base_map.entry(k).or_insert(serde_json::Value::Null), v);
            }
        }
        (base_slot, overlay_value) => *base_slot = overlay_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_default_templates() {
        let cfg = Config::default();
        assert_eq!(cfg.format.query_ok, "{\"result\": [%]}");
        assert_eq!(cfg.params.select, "select");
    }

    #[test]
    fn is_reserved_matches_configured_names() {
        let params = ParamNames::default();
        assert!(params.is_reserved("where"));
        assert!(!params.is_reserved("name"));
    }

    #[test]
    fn merge_onto_default_only_overrides_given_fields() {
        let partial = serde_json::json!({ "addr": "0.0.0.0:9999", "db_type": "postgres" });
        let cfg = Config::merged_onto_default(partial).unwrap();
        assert_eq!(cfg.addr, "0.0.0.0:9999");
        assert_eq!(cfg.db_type, "postgres");
        assert_eq!(cfg.root, Config::default().root);
        assert_eq!(cfg.format, Config::default().format);
    }
}
