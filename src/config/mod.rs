/// Configuration system for sfs-report.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: hardcoded in [`schema::ReportConfig::default()`]
/// 2. **User global config**: `~/.sfs-report/config.toml`
/// 3. **Project local config**: `.sfs-report.toml` in the current working directory
/// 4. **Environment variables**: `SFS_REPORT_*` overrides (highest precedence)
///
/// Each TOML file is deserialized with `serde(default)`, so a file only
/// needs the keys it changes.
///
/// # Usage
///
/// ```rust,ignore
/// use sfs_report::config;
///
/// let cfg = config::load();
/// let analysis = Analysis::from_path(cfg.data.csv_path.as_ref(), &cfg.normalizer())?;
/// ```
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

pub use schema::ReportConfig;

const CONFIG_DIR: &str = ".sfs-report";
const PROJECT_CONFIG_FILE: &str = ".sfs-report.toml";

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars.
pub fn load() -> ReportConfig {
    let mut config = ReportConfig::default();

    // Layer 2: user global config (~/.sfs-report/config.toml)
    if let Some(global) = load_toml_file(global_config_path()) {
        config = global;
    }

    // Layer 3: project local config (.sfs-report.toml)
    if let Some(project) = load_toml_file(project_config_path()) {
        config = project;
    }

    // Layer 4: environment variable overrides
    apply_env_overrides(&mut config);

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Returns `None` if the path is `None` or the file doesn't exist. A
/// malformed file is skipped with a warning so a typo never blocks a report.
fn load_toml_file(path: Option<PathBuf>) -> Option<ReportConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring malformed config file");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.sfs-report/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join("config.toml"))
}

/// Path to the project local config: `.sfs-report.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(PROJECT_CONFIG_FILE))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `SFS_REPORT_CSV`: input CSV path
/// - `SFS_REPORT_ADDR`: dashboard listen address
/// - `SFS_REPORT_TOP_N`: default ranking size
/// - `SFS_REPORT_OPEN_BROWSER`: open the browser on `serve` (`1`/`true`/`yes`/`on`)
/// - `SFS_REPORT_LOG`: log level
fn apply_env_overrides(config: &mut ReportConfig) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

fn apply_overrides(config: &mut ReportConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("SFS_REPORT_CSV")
        && !val.is_empty()
    {
        config.data.csv_path = val;
    }
    if let Some(val) = var("SFS_REPORT_ADDR")
        && !val.is_empty()
    {
        config.dashboard.addr = val;
    }
    if let Some(val) = var("SFS_REPORT_TOP_N")
        && let Ok(n) = val.parse::<usize>()
    {
        config.dashboard.default_top_n = n;
    }
    if let Some(val) = var("SFS_REPORT_OPEN_BROWSER") {
        config.dashboard.open_browser = is_truthy(&val);
    }
    if let Some(val) = var("SFS_REPORT_LOG")
        && !val.is_empty()
    {
        config.logging.level = val;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.sfs-report/config.toml`.
///
/// Creates the directory if needed. Returns an error if the file already
/// exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.sfs-report/ directory")?;
    }

    fs::write(&path, ReportConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Reads the current global config (or defaults), updates the dotted key
/// (e.g. `dashboard.default_top_n`), and writes the result back.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&ReportConfig::default())
            .context("failed to serialize default config")?
    };

    let mut value_table: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut value_table, key, value)?;

    // Reject edits that no longer deserialize into the schema.
    let output =
        toml::to_string_pretty(&value_table).context("failed to serialize updated config")?;
    toml::from_str::<ReportConfig>(&output)
        .with_context(|| format!("invalid value for '{key}': {value}"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let Some((leaf, sections)) = parts.split_last() else {
        anyhow::bail!("empty config key");
    };

    // Navigate to the parent table
    let mut current = root;
    for &part in sections {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    // The existing value decides how the raw string is parsed
    let new_value = match table.get(*leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(toml::Value::Array(_)) => {
            let items: Vec<toml::Value> = raw_value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| toml::Value::String(s.to_string()))
                .collect();
            toml::Value::Array(items)
        }
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => anyhow::bail!("unknown config key: '{key}'"),
    };

    table.insert((*leaf).to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("yes"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("off"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn overrides_apply_known_variables() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SFS_REPORT_CSV", "/data/run.csv"),
            ("SFS_REPORT_ADDR", "0.0.0.0:8080"),
            ("SFS_REPORT_TOP_N", "40"),
            ("SFS_REPORT_OPEN_BROWSER", "0"),
            ("SFS_REPORT_LOG", "debug"),
        ]);
        let mut config = ReportConfig::default();
        apply_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.data.csv_path, "/data/run.csv");
        assert_eq!(config.dashboard.addr, "0.0.0.0:8080");
        assert_eq!(config.dashboard.default_top_n, 40);
        assert!(!config.dashboard.open_browser);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn overrides_ignore_invalid_numbers() {
        let mut config = ReportConfig::default();
        apply_overrides(&mut config, |k| {
            (k == "SFS_REPORT_TOP_N").then(|| "lots".to_string())
        });
        assert_eq!(config.dashboard.default_top_n, 15);
    }

    #[test]
    fn set_toml_value_updates_string() {
        let mut root: toml::Value = toml::from_str("[data]\ncsv_path = \"a.csv\"\n").unwrap();
        set_toml_value(&mut root, "data.csv_path", "b.csv").unwrap();
        assert_eq!(root["data"]["csv_path"].as_str(), Some("b.csv"));
    }

    #[test]
    fn set_toml_value_updates_bool() {
        let mut root: toml::Value =
            toml::from_str("[dashboard]\nopen_browser = true\n").unwrap();
        set_toml_value(&mut root, "dashboard.open_browser", "off").unwrap();
        assert_eq!(root["dashboard"]["open_browser"].as_bool(), Some(false));
    }

    #[test]
    fn set_toml_value_updates_integer() {
        let mut root: toml::Value =
            toml::from_str("[dashboard]\ndefault_top_n = 15\n").unwrap();
        set_toml_value(&mut root, "dashboard.default_top_n", "25").unwrap();
        assert_eq!(root["dashboard"]["default_top_n"].as_integer(), Some(25));
        assert!(set_toml_value(&mut root, "dashboard.default_top_n", "many").is_err());
    }

    #[test]
    fn set_toml_value_updates_float() {
        let mut root: toml::Value =
            toml::from_str("[dashboard]\ngood_pass_pct = 95.0\n").unwrap();
        set_toml_value(&mut root, "dashboard.good_pass_pct", "97.5").unwrap();
        let v = root["dashboard"]["good_pass_pct"].as_float().unwrap();
        assert!((v - 97.5).abs() < f64::EPSILON);
    }

    #[test]
    fn set_toml_value_splits_arrays() {
        let mut root: toml::Value = toml::from_str("[columns]\naudit = [\"A\"]\n").unwrap();
        set_toml_value(&mut root, "columns.audit", "CreatedBy, Owner,").unwrap();
        let audit: Vec<&str> = root["columns"]["audit"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(audit, ["CreatedBy", "Owner"]);
    }

    #[test]
    fn set_toml_value_rejects_unknown_keys() {
        let mut root: toml::Value = toml::from_str("[data]\ncsv_path = \"a\"\n").unwrap();
        assert!(set_toml_value(&mut root, "nonexistent.key", "value").is_err());
        assert!(set_toml_value(&mut root, "data.nope", "value").is_err());
    }

    #[test]
    fn show_effective_config_returns_toml() {
        let toml_str = show_effective_config().unwrap();
        let _: ReportConfig = toml::from_str(&toml_str).unwrap();
    }
}
