//! Shared configuration for sectorly.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `sectorly_core::PanelConfig`. The CLI layers its own
//! flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sectorly_core::config::{DEFAULT_CODE_FORMAT, DEFAULT_CYCLE_TIMEOUT, DEFAULT_UPDATE_INTERVAL};
use sectorly_core::{FetchOptions, PanelConfig, TlsMode, TransportConfig};

/// Keyring service name for stored secrets.
pub const KEYRING_SERVICE: &str = "sectorly";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

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
    /// Profile used when none is given on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named panel profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Look up `name`, or the default profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, p)| (k.as_str(), p))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
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
    10
}

/// One alarm panel and the account that reaches it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Account e-mail.
    pub email: Option<String>,

    /// Password (plaintext; prefer keyring or `SECTORLY_PASSWORD`).
    pub password: Option<String>,

    pub panel_id: String,

    /// Panel user code (plaintext; prefer keyring or `SECTORLY_CODE`).
    pub code: Option<String>,

    /// Required number of digits in a user code.
    pub code_format: Option<usize>,

    /// Optional endpoint switches. Missing keys keep their defaults.
    #[serde(default)]
    pub fetch: FetchOptions,

    /// Override the API root.
    pub api_url: Option<String>,

    /// Seconds between update cycles in `watch` mode.
    pub update_interval: Option<u64>,

    /// Deadline for one update cycle in seconds; `0` disables it.
    pub cycle_timeout: Option<u64>,

    /// Per-request timeout in seconds.
    pub timeout: Option<u64>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification (debugging proxies only).
    pub insecure: Option<bool>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("net", "sectorly", "sectorly").map_or_else(
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
    p.push("sectorly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file yields the defaults.
///
/// Nested keys use a double underscore in the environment, e.g.
/// `SECTORLY_DEFAULTS__OUTPUT=json`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SECTORLY_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to the canonical path.
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

// ── Credential resolution ───────────────────────────────────────────

/// Account e-mail: profile, then `SECTORLY_EMAIL`.
pub fn resolve_email(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .email
        .clone()
        .or_else(|| std::env::var("SECTORLY_EMAIL").ok())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Password: `SECTORLY_PASSWORD`, then keyring, then plaintext.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_secret("SECTORLY_PASSWORD", profile_name, "password", profile.password.as_deref())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Panel user code: `SECTORLY_CODE`, then keyring, then plaintext.
/// `None` when no code is stored anywhere.
pub fn resolve_code(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    resolve_secret("SECTORLY_CODE", profile_name, "code", profile.code.as_deref())
}

fn resolve_secret(
    env_var: &str,
    profile_name: &str,
    kind: &str,
    plaintext: Option<&str>,
) -> Option<SecretString> {
    // 1. Env var
    if let Ok(val) = std::env::var(env_var) {
        return Some(SecretString::from(val));
    }

    // 2. Keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{kind}")) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    plaintext.map(|s| SecretString::from(s.to_owned()))
}

/// Store a secret (`password` or `code`) for a profile in the system keyring.
pub fn store_secret(profile_name: &str, kind: &str, secret: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{kind}"))?;
    entry.set_password(secret)?;
    Ok(())
}

// ── Profile → PanelConfig ───────────────────────────────────────────

/// Build a `PanelConfig` from a profile, resolving credentials.
pub fn profile_to_panel_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<PanelConfig, ConfigError> {
    if profile.panel_id.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "panel_id".into(),
            reason: "must not be empty".into(),
        });
    }

    let email = resolve_email(profile, profile_name)?;
    let password = resolve_password(profile, profile_name)?;

    let mut config =
        PanelConfig::new(email, password, profile.panel_id.clone()).map_err(|e| {
            ConfigError::Validation {
                field: "api_url".into(),
                reason: e.to_string(),
            }
        })?;

    if let Some(ref api_url) = profile.api_url {
        config.base_url = api_url.parse().map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {api_url}"),
        })?;
    }

    let code_format = profile.code_format.unwrap_or(DEFAULT_CODE_FORMAT);
    if code_format == 0 {
        return Err(ConfigError::Validation {
            field: "code_format".into(),
            reason: "must be at least 1".into(),
        });
    }
    config.code_format = code_format;
    config.fetch = profile.fetch;

    config.update_interval = profile
        .update_interval
        .filter(|s| *s > 0)
        .map_or(DEFAULT_UPDATE_INTERVAL, Duration::from_secs);
    config.cycle_timeout = match profile.cycle_timeout {
        Some(0) => None,
        Some(secs) => Some(Duration::from_secs(secs)),
        None => Some(DEFAULT_CYCLE_TIMEOUT),
    };

    let tls = if profile.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };
    let defaults = TransportConfig::default();
    config.transport = TransportConfig {
        tls,
        request_timeout: profile
            .timeout
            .map_or(defaults.request_timeout, Duration::from_secs),
        image_timeout: defaults.image_timeout,
    };

    Ok(config)
}
