//! Config file load/save (spec §6, SPEC_FULL.md §6), grounded on
//! `examples/original_source/cmd/footrest/main.go`'s `loadConfig`/
//! `saveConfig`.

use std::path::Path;

use footrest_http::Config;

/// Reads `path`, parses it as partial JSON, and merges it onto
/// `Config::default()`. Matches the original's behavior of starting from
/// `defaultConfig()` and unmarshalling the file on top of it.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let data = std::fs::read_to_string(path)?;
    let partial: serde_json::Value = serde_json::from_str(&data)?;
    Ok(Config::merged_onto_default(partial)?)
}

/// Writes `config` as pretty-printed JSON to `path`.
pub fn save_config(path: &Path, config: &Config) -> anyhow::Result<()> {
    let data = serde_json::to_string_pretty(config)?;
    std::fs::write(path, data)?;
    Ok(())
}
