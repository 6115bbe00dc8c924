//! Configuration loading, validation, and management for ember.
//!
//! Loads configuration from `~/.ember/config.toml` with environment variable
//! overrides, validates it at startup, and resolves it into an immutable
//! [`Settings`] bundle. The bundle is constructed once and passed explicitly
//! into every component that needs it — there is no ambient or global lookup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.ember/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Responder provider id passed through to the reasoning executable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Model id passed through to the reasoning executable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// System prompt passed through to the reasoning executable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Display name used for the companion's side of the conversation
    #[serde(default = "default_display_name")]
    pub display_name: String,

    /// Data directory override (default: `~/.ember/data`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Responder configuration
    #[serde(default)]
    pub responder: ResponderConfig,

    /// Web search configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Named assistant profiles overlaying the base settings
    #[serde(default)]
    pub profiles: HashMap<String, ProfileConfig>,
}

fn default_display_name() -> String {
    "ember".into()
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("system_prompt", &self.system_prompt)
            .field("display_name", &self.display_name)
            .field("data_dir", &self.data_dir)
            .field("responder", &self.responder)
            .field("search", &self.search)
            .field("profiles", &self.profiles)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponderConfig {
    /// Path to the reasoning executable (default: discover `goose` on PATH)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<String>,

    /// Hard deadline for a single responder call, in seconds
    #[serde(default = "default_responder_timeout")]
    pub timeout_secs: u64,
}

fn default_responder_timeout() -> u64 {
    120
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            executable: None,
            timeout_secs: default_responder_timeout(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Brave Search subscription token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Maximum ranked results per query
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            max_results: default_max_results(),
        }
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &redact(&self.api_key))
            .field("max_results", &self.max_results)
            .finish()
    }
}

/// A named assistant profile. Every field overlays the base config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// The resolved, immutable settings bundle consumed by the session loop.
///
/// Built once at startup from [`AppConfig::resolve`]; components receive it
/// by reference or value, never through a global.
#[derive(Clone)]
pub struct Settings {
    /// Which profile produced this bundle
    pub profile: String,

    /// Responder provider id (absent = responder default)
    pub provider: Option<String>,

    /// Responder model id (absent = responder default)
    pub model: Option<String>,

    /// System prompt (absent = responder default)
    pub system_prompt: Option<String>,

    /// Name shown on the companion's side of the conversation
    pub display_name: String,

    /// Root of the persisted logs
    pub data_dir: PathBuf,

    /// Reasoning executable override
    pub responder_executable: Option<String>,

    /// Responder call deadline in seconds
    pub responder_timeout_secs: u64,

    /// Brave Search subscription token
    pub search_api_key: Option<String>,

    /// Maximum ranked results per search
    pub search_max_results: usize,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("profile", &self.profile)
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("display_name", &self.display_name)
            .field("data_dir", &self.data_dir)
            .field("responder_executable", &self.responder_executable)
            .field("responder_timeout_secs", &self.responder_timeout_secs)
            .field("search_api_key", &redact(&self.search_api_key))
            .field("search_max_results", &self.search_max_results)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.ember/config.toml).
    ///
    /// Also checks environment variables:
    /// - `EMBER_PROVIDER` / `EMBER_MODEL` override the responder parameters
    /// - `BRAVE_API_KEY` supplies the search credential when the file has none
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(provider) = std::env::var("EMBER_PROVIDER") {
            config.provider = Some(provider);
        }

        if let Ok(model) = std::env::var("EMBER_MODEL") {
            config.model = Some(model);
        }

        if config.search.api_key.is_none() {
            config.search.api_key = std::env::var("BRAVE_API_KEY").ok();
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".ember")
    }

    /// Get the data directory holding transcripts and memory logs.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("data"))
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.responder.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "responder.timeout_secs must be greater than 0".into(),
            ));
        }

        if self.search.max_results == 0 || self.search.max_results > 20 {
            return Err(ConfigError::ValidationError(
                "search.max_results must be between 1 and 20".into(),
            ));
        }

        Ok(())
    }

    /// Resolve the config plus an optional profile into a [`Settings`] bundle.
    ///
    /// Fails when the named profile does not exist in the config file.
    pub fn resolve(&self, profile: Option<&str>) -> Result<Settings, ConfigError> {
        let name = profile.unwrap_or("default");

        let overlay = match self.profiles.get(name) {
            Some(p) => p.clone(),
            None if name == "default" => ProfileConfig::default(),
            None => {
                return Err(ConfigError::ValidationError(format!(
                    "unknown profile '{name}' ({} configured)",
                    self.profiles.len()
                )));
            }
        };

        Ok(Settings {
            profile: name.to_string(),
            provider: overlay.provider.or_else(|| self.provider.clone()),
            model: overlay.model.or_else(|| self.model.clone()),
            system_prompt: overlay.system_prompt.or_else(|| self.system_prompt.clone()),
            display_name: overlay
                .display_name
                .unwrap_or_else(|| self.display_name.clone()),
            data_dir: self.data_dir(),
            responder_executable: self.responder.executable.clone(),
            responder_timeout_secs: self.responder.timeout_secs,
            search_api_key: self.search.api_key.clone(),
            search_max_results: self.search.max_results,
        })
    }

    /// Generate a default config TOML string (for `onboard`).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: None,
            model: None,
            system_prompt: None,
            display_name: default_display_name(),
            data_dir: None,
            responder: ResponderConfig::default(),
            search: SearchConfig::default(),
            profiles: HashMap::new(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.display_name, "ember");
        assert_eq!(config.responder.timeout_secs, 120);
        assert_eq!(config.search.max_results, 5);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.display_name, config.display_name);
        assert_eq!(parsed.responder.timeout_secs, config.responder.timeout_secs);
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().display_name, "ember");
    }

    #[test]
    fn zero_timeout_rejected() {
        let toml_str = "[responder]\ntimeout_secs = 0\n";
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, toml_str).unwrap();
        let result = AppConfig::load_from(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn out_of_range_max_results_rejected() {
        let toml_str = "[search]\nmax_results = 50\n";
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, toml_str).unwrap();
        let result = AppConfig::load_from(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn profile_overlays_base_settings() {
        let toml_str = r#"
provider = "openrouter"
model = "base-model"

[profiles.navi]
model = "navi-model"
display_name = "navi"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();

        let base = config.resolve(None).unwrap();
        assert_eq!(base.profile, "default");
        assert_eq!(base.model.as_deref(), Some("base-model"));
        assert_eq!(base.display_name, "ember");

        let navi = config.resolve(Some("navi")).unwrap();
        assert_eq!(navi.profile, "navi");
        assert_eq!(navi.provider.as_deref(), Some("openrouter"));
        assert_eq!(navi.model.as_deref(), Some("navi-model"));
        assert_eq!(navi.display_name, "navi");
    }

    #[test]
    fn unknown_profile_rejected() {
        let config = AppConfig::default();
        let result = config.resolve(Some("nope"));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn settings_debug_redacts_api_key() {
        let mut config = AppConfig::default();
        config.search.api_key = Some("brv-secret-token".into());
        let settings = config.resolve(None).unwrap();
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("brv-secret-token"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("display_name"));
        assert!(toml_str.contains("timeout_secs"));
    }
}
