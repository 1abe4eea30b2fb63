/// Configuration system for fraudlens.
///
/// Layered resolution, later layers overriding earlier ones:
///
/// 1. **Built-in defaults** — hardcoded in [`schema::FraudlensConfig::default()`]
/// 2. **User global config** — `~/.fraudlens/config.toml`
/// 3. **Project local config** — `.fraudlens.toml` in the current working directory
/// 4. **Environment variables** — `FRAUDLENS_*` overrides (highest precedence)
///
/// The secret API key is expected from `FRAUDLENS_API_KEY`; `config init`
/// and `config show` never write it out.
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::FraudlensConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. This is the primary entry point for all modules that need
/// configuration.
pub fn load() -> FraudlensConfig {
    let mut config = FraudlensConfig::default();

    // Layer 2: user global config (~/.fraudlens/config.toml)
    if let Some(global) = load_toml_file(global_config_path()) {
        config = global;
    }

    // Layer 3: project local config (.fraudlens.toml)
    if let Some(project) = load_toml_file(project_config_path()) {
        config = project;
    }

    // Layer 4: environment variable overrides
    apply_env_overrides(&mut config);

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content is malformed. Since deserialization fills missing fields with
/// defaults, a loaded file stands in for the whole previous layer: only
/// keys the user explicitly set differ from the defaults.
fn load_toml_file(path: Option<PathBuf>) -> Option<FraudlensConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.fraudlens/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".fraudlens").join("config.toml"))
}

/// Path to the project local config: `.fraudlens.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".fraudlens.toml"))
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
/// - `FRAUDLENS_API_KEY` — secret API key
/// - `FRAUDLENS_API_BASE_URL` — assistant service base URL
/// - `FRAUDLENS_ASSISTANT_ID` — assistant identifier
/// - `FRAUDLENS_API_TIMEOUT_MS` — per-request timeout
/// - `FRAUDLENS_POLL_MAX_WAIT_MS` — turn wait budget
/// - `FRAUDLENS_DATA_DIR` — dataset directory
/// - `FRAUDLENS_LISTEN` — dashboard listen address
fn apply_env_overrides(config: &mut FraudlensConfig) {
    if let Ok(val) = std::env::var("FRAUDLENS_API_KEY")
        && !val.is_empty()
    {
        config.api.api_key = val;
    }
    if let Ok(val) = std::env::var("FRAUDLENS_API_BASE_URL")
        && !val.is_empty()
    {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("FRAUDLENS_ASSISTANT_ID")
        && !val.is_empty()
    {
        config.api.assistant_id = val;
    }
    if let Ok(val) = std::env::var("FRAUDLENS_API_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.api.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("FRAUDLENS_POLL_MAX_WAIT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.chat.poll_max_wait_ms = ms;
    }
    if let Ok(val) = std::env::var("FRAUDLENS_DATA_DIR")
        && !val.is_empty()
    {
        config.data.dir = val;
    }
    if let Ok(val) = std::env::var("FRAUDLENS_LISTEN")
        && !val.is_empty()
    {
        config.server.listen = val;
    }
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.fraudlens/config.toml`.
///
/// Creates the `~/.fraudlens/` directory if it doesn't exist. Returns an
/// error if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.fraudlens/ directory")?;
    }

    fs::write(&path, FraudlensConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Reads the current global config (or serialized defaults), updates the
/// key, and writes the result back. Supports dotted keys like
/// `chat.poll_max_wait_ms`.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&FraudlensConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    let output = toml::to_string_pretty(&root).context("failed to serialize config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// The new value is parsed according to the type of the existing value at
/// that key, so `"9000"` becomes an integer where an integer lives.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let (section, leaf) = key
        .rsplit_once('.')
        .context("config keys use the form section.field")?;

    let mut current = &mut *root;
    for part in section.split('.') {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table at '{section}'"))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => {
            let b: bool = raw_value
                .parse()
                .with_context(|| format!("expected bool for '{key}', got '{raw_value}'"))?;
            toml::Value::Boolean(b)
        }
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
        _ => toml::Value::String(raw_value.to_string()),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML. The API key is
/// excluded by the schema's serialization rules.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_toml_value_updates_string() {
        let toml_str = r#"
[data]
dir = "data"
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "data.dir", "/srv/fraud").unwrap();

        let table = root.as_table().unwrap();
        let data = table["data"].as_table().unwrap();
        assert_eq!(data["dir"].as_str(), Some("/srv/fraud"));
    }

    #[test]
    fn set_toml_value_updates_integer() {
        let toml_str = r#"
[chat]
poll_max_wait_ms = 120000
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "chat.poll_max_wait_ms", "9000").unwrap();

        let table = root.as_table().unwrap();
        let chat = table["chat"].as_table().unwrap();
        assert_eq!(chat["poll_max_wait_ms"].as_integer(), Some(9000));
    }

    #[test]
    fn set_toml_value_updates_float() {
        let toml_str = r#"
[chat]
poll_backoff = 1.5
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "chat.poll_backoff", "2.0").unwrap();

        let table = root.as_table().unwrap();
        let chat = table["chat"].as_table().unwrap();
        assert!((chat["poll_backoff"].as_float().unwrap() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn set_toml_value_rejects_invalid_key() {
        let toml_str = r#"
[data]
dir = "data"
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        let result = set_toml_value(&mut root, "nonexistent.key", "value");
        assert!(result.is_err());
    }

    #[test]
    fn set_toml_value_rejects_bare_key() {
        let mut root: toml::Value = toml::from_str("x = 1").unwrap();
        assert!(set_toml_value(&mut root, "x", "2").is_err());
    }
}
