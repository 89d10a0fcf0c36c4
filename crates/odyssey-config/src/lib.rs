//! Shared configuration for the CodeOdyssey CLI.
//!
//! TOML settings merged with `ODYSSEY_*` environment variables, token
//! storage backend selection, and translation to
//! `odyssey_core::ClientConfig`.

mod keyring_store;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use odyssey_api::{FileTokenStore, TokenStore};
use odyssey_core::{ClientConfig, DEFAULT_API_URL, TlsVerification};

pub use keyring_store::{KEYRING_SERVICE, KeyringTokenStore};

/// Overrides the config file location when set.
pub const CONFIG_PATH_ENV: &str = "ODYSSEY_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("token store unavailable: {0}")]
    TokenStore(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// Where the session token is kept between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    /// `token` file in the data directory.
    #[default]
    File,
    /// OS keyring entry.
    Keyring,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// API root, e.g. `http://localhost:8080/api/`.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Custom CA certificate (PEM).
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,

    #[serde(default)]
    pub token_backend: TokenBackend,

    /// Directory for the token file. Platform data dir when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Default output format: table, json, json-compact, yaml, plain.
    #[serde(default = "default_output")]
    pub output: String,

    /// Default tracing filter when neither `-v` nor `RUST_LOG` is given.
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout: default_timeout(),
            insecure: false,
            ca_cert: None,
            token_backend: TokenBackend::default(),
            data_dir: None,
            output: default_output(),
            log_level: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_output() -> String {
    "table".into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "codeodyssey", "odyssey")
}

fn home_fallback(kind: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(kind);
    p.push("odyssey");
    p
}

/// Resolve the config file path: `ODYSSEY_CONFIG`, then platform conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

impl Config {
    /// Directory holding the token file.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.data_dir {
            return dir.clone();
        }
        project_dirs().map_or_else(
            || home_fallback(".local/share"),
            |dirs| dirs.data_dir().to_path_buf(),
        )
    }
}

// ── Loading / saving ────────────────────────────────────────────────

/// Load config from the canonical path plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` (missing file is fine) plus `ODYSSEY_*` env vars.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ODYSSEY_"))
        .extract()?;
    Ok(config)
}

/// Serialize config to TOML at the canonical path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(cfg)?)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Validate and convert into the runtime client config.
pub fn to_client_config(cfg: &Config) -> Result<ClientConfig, ConfigError> {
    let base_url: url::Url = cfg.api_url.parse().map_err(|_| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL: {}", cfg.api_url),
    })?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("unsupported scheme '{}'", base_url.scheme()),
        });
    }
    if cfg.timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    let tls = if cfg.insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca) = cfg.ca_cert {
        TlsVerification::CustomCa(ca.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(ClientConfig {
        base_url,
        tls,
        timeout: Duration::from_secs(cfg.timeout),
    })
}

/// Open the configured token backend.
pub fn token_store(cfg: &Config) -> Result<Arc<dyn TokenStore>, ConfigError> {
    Ok(match cfg.token_backend {
        TokenBackend::File => Arc::new(FileTokenStore::in_dir(cfg.data_dir())),
        TokenBackend::Keyring => Arc::new(KeyringTokenStore::new()?),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let cfg = Config::default();
        let client = to_client_config(&cfg).unwrap();
        assert_eq!(client.base_url.as_str(), "http://localhost:8080/api/");
        assert_eq!(client.timeout, Duration::from_secs(30));
        assert_eq!(client.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_url = \"https://learn.example.com/api\"\ntimeout = 5\ntoken_backend = \"keyring\"\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.api_url, "https://learn.example.com/api");
        assert_eq!(cfg.timeout, 5);
        assert_eq!(cfg.token_backend, TokenBackend::Keyring);
        assert_eq!(cfg.output, "table");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.timeout, 30);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config {
            insecure: true,
            data_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert!(loaded.insecure);
        assert_eq!(loaded.data_dir(), dir.path());
    }

    #[test]
    fn rejects_bad_url_and_timeout() {
        let cfg = Config {
            api_url: "not a url".into(),
            ..Config::default()
        };
        assert!(matches!(
            to_client_config(&cfg),
            Err(ConfigError::Validation { ref field, .. }) if field == "api_url"
        ));

        let cfg = Config {
            timeout: 0,
            ..Config::default()
        };
        assert!(to_client_config(&cfg).is_err());
    }

    #[test]
    fn insecure_wins_over_custom_ca() {
        let cfg = Config {
            insecure: true,
            ca_cert: Some("/tmp/ca.pem".into()),
            ..Config::default()
        };
        assert_eq!(
            to_client_config(&cfg).unwrap().tls,
            TlsVerification::DangerAcceptInvalid
        );
    }

    #[test]
    fn file_backend_uses_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config {
            data_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        let store = token_store(&cfg).unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
