use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::PathBuf, time::Duration};

use crate::{
    error::QWeatherError,
    locale::{Lang, Locale, UnitSystem},
};

/// Environment variable holding the API key; wins over the config file.
pub const API_KEY_ENV: &str = "QWEATHER_API_KEY";

/// Environment variable overriding the configured API host.
pub const API_HOST_ENV: &str = "QWEATHER_API_HOST";

pub const DEFAULT_API_HOST: &str = "api.qweather.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// API key resolved for one invocation. `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Key with everything but its edges hidden, for log lines.
    pub fn masked(&self) -> String {
        let key = &self.0;
        let chars = key.chars().count();
        if chars <= 8 {
            "*".repeat(chars)
        } else {
            let head: String = key.chars().take(4).collect();
            let tail: String = key.chars().skip(chars - 4).collect();
            format!("{head}...{tail}")
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.masked()).finish()
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// api_host = "api.qweather.com"
/// lang = "zh"
/// unit = "m"
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Optional stored key; `QWEATHER_API_KEY` takes precedence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Host (or full base URL) shared by the weather and air-quality APIs.
    pub api_host: String,

    pub lang: Lang,
    pub unit: UnitSystem,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_host: DEFAULT_API_HOST.to_string(),
            lang: Lang::default(),
            unit: UnitSystem::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml = self.to_toml()?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "qweather", "qweather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration TOML")
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    /// Apply `QWEATHER_API_HOST` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_host_override(std::env::var(API_HOST_ENV).ok())
    }

    pub fn with_host_override(mut self, host: Option<String>) -> Self {
        if let Some(host) = host.filter(|h| !h.trim().is_empty()) {
            self.api_host = host.trim().to_string();
        }
        self
    }

    /// Resolve the API key: `env_value` (read from `QWEATHER_API_KEY`) wins over the stored key.
    pub fn credential_from(&self, env_value: Option<String>) -> Result<Credential, QWeatherError> {
        env_value
            .or_else(|| self.api_key.clone())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .map(Credential)
            .ok_or(QWeatherError::MissingCredential)
    }

    /// Base URL for API paths; a bare host gets the `https://` scheme.
    pub fn base_url(&self) -> String {
        let host = self.api_host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{host}")
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn locale(&self) -> Locale {
        Locale::new(self.lang, self.unit)
    }

    /// Convenience helper: store a key and return whether one was replaced.
    pub fn set_api_key(&mut self, api_key: String) -> bool {
        self.api_key.replace(api_key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_errors_when_nothing_is_set() {
        let cfg = Config::default();
        let err = cfg.credential_from(None).unwrap_err();

        assert_eq!(err, QWeatherError::MissingCredential);
    }

    #[test]
    fn environment_wins_over_stored_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        let key = cfg.credential_from(Some("ENV_KEY".into())).unwrap();
        assert_eq!(key.expose(), "ENV_KEY");

        let key = cfg.credential_from(None).unwrap();
        assert_eq!(key.expose(), "FILE_KEY");
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let cfg = Config::default();
        assert!(cfg.credential_from(Some("   ".into())).is_err());
    }

    #[test]
    fn credential_debug_is_masked() {
        let key = Credential::new("abcdef0123456789");
        assert_eq!(key.masked(), "abcd...6789");
        assert!(!format!("{key:?}").contains("0123"));
        assert_eq!(Credential::new("short").masked(), "*****");
    }

    #[test]
    fn toml_roundtrip_keeps_settings() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.lang = Lang::En;
        cfg.unit = UnitSystem::Imperial;

        let parsed = Config::from_toml(&cfg.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg = Config::from_toml("lang = \"en\"").unwrap();

        assert_eq!(cfg.lang, Lang::En);
        assert_eq!(cfg.api_host, DEFAULT_API_HOST);
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn base_url_adds_scheme_only_for_bare_hosts() {
        let cfg = Config::default().with_host_override(Some("abc.re.qweatherapi.com".into()));
        assert_eq!(cfg.base_url(), "https://abc.re.qweatherapi.com");

        let cfg = Config::default().with_host_override(Some("http://127.0.0.1:8080/".into()));
        assert_eq!(cfg.base_url(), "http://127.0.0.1:8080");

        let cfg = Config::default().with_host_override(Some(" ".into()));
        assert_eq!(cfg.api_host, DEFAULT_API_HOST);
    }
}
