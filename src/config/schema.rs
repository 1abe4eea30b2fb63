/// Configuration schema and defaults for fraudlens.
///
/// Defines the TOML-serializable structure with sections `[api]`, `[chat]`,
/// `[data]`, and `[server]`. Every field has a built-in default; users only
/// set the values they want to override. The API key is env-first
/// (`FRAUDLENS_API_KEY`) and is never written out by `config init` or
/// `config show`.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level fraudlens configuration.
///
/// Maps directly to the `~/.fraudlens/config.toml` and `.fraudlens.toml`
/// file schemas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FraudlensConfig {
    pub api: ApiConfig,
    pub chat: ChatConfig,
    pub data: DataConfig,
    pub server: ServerConfig,
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

/// Remote assistant service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the assistant service.
    pub base_url: String,
    /// Secret API key. Read from `FRAUDLENS_API_KEY` or a hand-added file
    /// entry; never serialized back to disk.
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Identifier of the provisioned assistant.
    pub assistant_id: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            assistant_id: String::new(),
            timeout_ms: 30_000,
        }
    }
}

impl ApiConfig {
    /// Whether the settings required for remote calls are present.
    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.assistant_id.is_empty()
    }
}

// ---------------------------------------------------------------------------
// [chat]
// ---------------------------------------------------------------------------

/// Conversation driver poll bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Delay before the first run status check, in milliseconds.
    pub poll_initial_ms: u64,
    /// Backoff multiplier applied between checks.
    pub poll_backoff: f64,
    /// Ceiling for the per-check interval, in milliseconds.
    pub poll_max_interval_ms: u64,
    /// Total wait budget for one turn, in milliseconds.
    pub poll_max_wait_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            poll_initial_ms: 1000,
            poll_backoff: 1.5,
            poll_max_interval_ms: 5000,
            poll_max_wait_ms: 120_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [data]
// ---------------------------------------------------------------------------

/// Dataset source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory searched for the dataset CSV file.
    pub dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: "data".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

/// Dashboard HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address for the embedded dashboard.
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:9750".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default config
// ---------------------------------------------------------------------------

impl FraudlensConfig {
    /// The annotated TOML template written by `fraudlens config init`.
    pub fn default_toml() -> &'static str {
        r#"# fraudlens configuration
# Layers: built-in defaults -> ~/.fraudlens/config.toml -> ./.fraudlens.toml
# -> FRAUDLENS_* environment variables (highest precedence).
#
# The API key is NOT stored here. Set FRAUDLENS_API_KEY in the environment.

[api]
# Base URL of the assistant service.
base_url = "https://api.openai.com/v1"
# Identifier of the provisioned assistant.
assistant_id = ""
# Per-request timeout in milliseconds.
timeout_ms = 30000

[chat]
# Delay before the first run status check (milliseconds).
poll_initial_ms = 1000
# Backoff multiplier applied between checks.
poll_backoff = 1.5
# Ceiling for the per-check interval (milliseconds).
poll_max_interval_ms = 5000
# Total wait budget for one turn (milliseconds).
poll_max_wait_ms = 120000

[data]
# Directory searched for the dataset CSV file.
dir = "data"

[server]
# Listen address for the embedded dashboard.
listen = "127.0.0.1:9750"
"#
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = FraudlensConfig::default();
        assert_eq!(config.api.base_url, "https://api.openai.com/v1");
        assert_eq!(config.chat.poll_initial_ms, 1000);
        assert_eq!(config.data.dir, "data");
        assert_eq!(config.server.listen, "127.0.0.1:9750");
        assert!(!config.api.is_complete());
    }

    #[test]
    fn default_toml_parses_to_defaults() {
        let config: FraudlensConfig = toml::from_str(FraudlensConfig::default_toml()).unwrap();
        assert_eq!(config.api.timeout_ms, 30_000);
        assert_eq!(config.chat.poll_max_wait_ms, 120_000);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: FraudlensConfig = toml::from_str(
            r#"
[chat]
poll_max_wait_ms = 9000
"#,
        )
        .unwrap();
        assert_eq!(config.chat.poll_max_wait_ms, 9000);
        assert_eq!(config.chat.poll_initial_ms, 1000);
        assert_eq!(config.data.dir, "data");
    }

    #[test]
    fn api_key_is_never_serialized() {
        let config = FraudlensConfig {
            api: ApiConfig {
                api_key: "sk-secret".to_string(),
                ..ApiConfig::default()
            },
            ..FraudlensConfig::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(!toml_str.contains("sk-secret"));
        assert!(!toml_str.contains("api_key"));
    }

    #[test]
    fn api_key_still_deserializes_from_file() {
        let config: FraudlensConfig = toml::from_str(
            r#"
[api]
api_key = "sk-from-file"
"#,
        )
        .unwrap();
        assert_eq!(config.api.api_key, "sk-from-file");
    }

    #[test]
    fn is_complete_requires_key_and_assistant() {
        let mut api = ApiConfig {
            api_key: "sk-x".to_string(),
            ..ApiConfig::default()
        };
        assert!(!api.is_complete());
        api.assistant_id = "asst_1".to_string();
        assert!(api.is_complete());
    }
}
