//! Application configuration for coursesmith.
//!
//! User config lives at `~/.coursesmith/coursesmith.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CoursesmithError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "coursesmith.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".coursesmith";

/// Shape of a plausible OpenAI-style API key: `sk-` prefix, then at least
/// ten key characters. A format check only — no round-trip call is made.
static API_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^sk-[A-Za-z0-9_-]{10,}$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Config structs (matching coursesmith.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// OpenAI-compatible API settings.
    #[serde(default)]
    pub openai: OpenAiConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default output file for generated material.
    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// Maximum characters of aggregated page text handed to the generator.
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_file: default_output_file(),
            max_prompt_chars: default_max_prompt_chars(),
        }
    }
}

fn default_output_file() -> String {
    "teaching_material.md".into()
}
fn default_max_prompt_chars() -> usize {
    5_000
}

/// `[openai]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model to use for classification and generation.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the chat-completions endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            model: default_model(),
            base_url: default_base_url(),
        }
    }
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_base_url() -> String {
    "https://api.openai.com".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.coursesmith/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CoursesmithError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.coursesmith/coursesmith.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CoursesmithError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        CoursesmithError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| CoursesmithError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| CoursesmithError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CoursesmithError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

// ---------------------------------------------------------------------------
// API key validation
// ---------------------------------------------------------------------------

/// Read the API key from the configured env var and check its format.
///
/// The key must be non-empty and look like an OpenAI-style key (`sk-` prefix,
/// minimum length). Returns the key on success.
pub fn validate_api_key(config: &AppConfig) -> Result<String> {
    let var_name = &config.openai.api_key_env;
    let key = std::env::var(var_name).unwrap_or_default();

    if key.is_empty() {
        return Err(CoursesmithError::config(format!(
            "API key not found. Set the {var_name} environment variable."
        )));
    }

    if !API_KEY_RE.is_match(&key) {
        return Err(CoursesmithError::config(format!(
            "value of {var_name} does not look like an API key (expected an sk- prefix)"
        )));
    }

    Ok(key)
}

/// Check a key string against the expected format without touching the environment.
pub fn api_key_looks_valid(key: &str) -> bool {
    API_KEY_RE.is_match(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("output_file"));
        assert!(toml_str.contains("OPENAI_API_KEY"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.max_prompt_chars, 5_000);
        assert_eq!(parsed.defaults.output_file, "teaching_material.md");
        assert_eq!(parsed.openai.model, "gpt-4o-mini");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
max_prompt_chars = 8000
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.max_prompt_chars, 8_000);
        assert_eq!(config.defaults.output_file, "teaching_material.md");
        assert_eq!(config.openai.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn api_key_format_matrix() {
        assert!(api_key_looks_valid("sk-proj-abcdefghij1234567890"));
        assert!(api_key_looks_valid("sk-abcdefghijklmnop"));
        assert!(!api_key_looks_valid(""));
        assert!(!api_key_looks_valid("sk-short"));
        assert!(!api_key_looks_valid("pk-abcdefghijklmnop"));
        assert!(!api_key_looks_valid("not a key at all"));
    }

    #[test]
    fn missing_env_var_is_config_error() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.openai.api_key_env = "COURSESMITH_TEST_NONEXISTENT_KEY_12345".into();
        let result = validate_api_key(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key not found"));
    }
}
