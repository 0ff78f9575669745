//! Shared configuration for Qubes Air console tools.
//!
//! TOML profiles (one per console server), environment overrides, and
//! translation to `qubes_air_core::ConsoleConfig`. The CLI layers its own
//! flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use qubes_air_core::{ConsoleConfig, DEFAULT_ORIGIN, LoadOrdering};

/// Prefix for environment overrides. Nested keys use `__`
/// (`QUBES_AIR_DEFAULTS__TIMEOUT=10`).
pub const ENV_PREFIX: &str = "QUBES_AIR_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    /// API base override applied to every profile. Normally only set
    /// through `QUBES_AIR_API_BASE_URL`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named console servers.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            api_base_url: None,
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub load_ordering: LoadOrdering,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            load_ordering: LoadOrdering::default(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named console server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Console origin (e.g., "https://qubes-air.lan:8443").
    pub server: String,

    /// Versioned API prefix or absolute URL. Defaults to `/api/v1`.
    pub api_base: Option<String>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Override how overlapping list refreshes are reconciled.
    pub load_ordering: Option<LoadOrdering>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "qubes-air", "qubes-air").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("qubes-air");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file (which may be absent) + environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation to ConsoleConfig ────────────────────────────────────

impl Config {
    /// Pick the active profile: the named one, else `default_profile`.
    ///
    /// Returns `Ok(None)` when nothing is configured under the default
    /// name; callers then fall back to the local development server.
    pub fn profile(&self, name: Option<&str>) -> Result<Option<(&str, &Profile)>, ConfigError> {
        if let Some(name) = name {
            return self
                .profiles
                .get_key_value(name)
                .map(|(k, p)| Some((k.as_str(), p)))
                .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() });
        }

        Ok(self
            .default_profile
            .as_deref()
            .and_then(|default| self.profiles.get_key_value(default))
            .map(|(k, p)| (k.as_str(), p)))
    }

    /// Build the runtime `ConsoleConfig` for a profile (or the defaults
    /// when `profile` is `None`). No CLI flag overrides.
    pub fn to_console_config(&self, profile: Option<&Profile>) -> Result<ConsoleConfig, ConfigError> {
        let server = profile.map_or(DEFAULT_ORIGIN, |p| p.server.as_str());
        validate_origin(server)?;

        let mut console = ConsoleConfig::new(server)
            .with_timeout(Duration::from_secs(
                profile
                    .and_then(|p| p.timeout)
                    .unwrap_or(self.defaults.timeout),
            ))
            .with_load_ordering(
                profile
                    .and_then(|p| p.load_ordering)
                    .unwrap_or(self.defaults.load_ordering),
            );
        console.accept_invalid_certs = profile
            .and_then(|p| p.insecure)
            .unwrap_or(self.defaults.insecure);

        if let Some(base) = self
            .api_base_url
            .as_deref()
            .or_else(|| profile.and_then(|p| p.api_base.as_deref()))
            .filter(|base| !base.trim().is_empty())
        {
            console = console.with_api_base(base);
        }

        Ok(console)
    }
}

/// Reject anything that is not an absolute http(s) URL.
pub fn validate_origin(server: &str) -> Result<(), ConfigError> {
    let url = url::Url::parse(server).map_err(|e| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL '{server}': {e}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Validation {
            field: "server".into(),
            reason: format!("unsupported scheme '{other}' (expected http or https)"),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
default_profile = "lab"

[defaults]
output = "json"
timeout = 12

[profiles.lab]
server = "https://qubes-air.lab:8443"
insecure = true

[profiles.cloud]
server = "https://console.example.com"
api_base = "/api/v2"
timeout = 60
load_ordering = "latest-request"
"#;

    fn write_sample() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.timeout, 30);
        assert!(cfg.profiles.is_empty());
        assert!(cfg.profile(None).unwrap().is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let (_dir, path) = write_sample();
        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.timeout, 12);
        assert_eq!(cfg.defaults.color, "auto");
        assert_eq!(cfg.profiles.len(), 2);
    }

    #[test]
    fn default_profile_inherits_global_defaults() {
        let (_dir, path) = write_sample();
        let cfg = load_config_from(&path).unwrap();
        let (name, profile) = cfg.profile(None).unwrap().unwrap();
        assert_eq!(name, "lab");

        let console = cfg.to_console_config(Some(profile)).unwrap();
        assert_eq!(console.origin, "https://qubes-air.lab:8443");
        assert_eq!(console.api_base, "/api/v1");
        assert_eq!(console.timeout, Duration::from_secs(12));
        assert!(console.accept_invalid_certs);
        assert_eq!(console.load_ordering, LoadOrdering::LastCompletion);
    }

    #[test]
    fn named_profile_overrides_everything() {
        let (_dir, path) = write_sample();
        let cfg = load_config_from(&path).unwrap();
        let (_, profile) = cfg.profile(Some("cloud")).unwrap().unwrap();

        let console = cfg.to_console_config(Some(profile)).unwrap();
        assert_eq!(console.api_base, "/api/v2");
        assert_eq!(console.timeout, Duration::from_secs(60));
        assert_eq!(console.load_ordering, LoadOrdering::LatestRequest);
        assert!(!console.accept_invalid_certs);
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let cfg = Config::default();
        let err = cfg.profile(Some("nope")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile { ref name } if name == "nope"));
    }

    #[test]
    fn api_base_override_wins_over_profile() {
        let profile = Profile {
            server: "http://10.0.0.2:8080".into(),
            api_base: Some("/api/v2".into()),
            insecure: None,
            timeout: None,
            load_ordering: None,
        };
        let cfg = Config {
            api_base_url: Some("https://gateway.example.com/qubes/api".into()),
            ..Config::default()
        };
        let console = cfg.to_console_config(Some(&profile)).unwrap();
        assert_eq!(console.api_base, "https://gateway.example.com/qubes/api");
    }

    #[test]
    fn no_profile_targets_local_server() {
        let console = Config::default().to_console_config(None).unwrap();
        assert_eq!(console.origin, DEFAULT_ORIGIN);
    }

    #[test]
    fn rejects_non_http_server() {
        assert!(validate_origin("ftp://files.lan").is_err());
        assert!(validate_origin("not a url").is_err());
        assert!(validate_origin("https://ok.lan").is_ok());
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                server: "http://192.168.10.5:8080".into(),
                api_base: None,
                insecure: Some(false),
                timeout: Some(5),
                load_ordering: Some(LoadOrdering::LatestRequest),
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let (_, profile) = loaded.profile(None).unwrap().unwrap();
        assert_eq!(profile.server, "http://192.168.10.5:8080");
        assert_eq!(profile.timeout, Some(5));
        assert_eq!(profile.load_ordering, Some(LoadOrdering::LatestRequest));
    }
}
