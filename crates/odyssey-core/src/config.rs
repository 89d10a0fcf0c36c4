// ── Runtime client configuration ──
//
// Describes how to reach the backend. Never touches disk: the CLI loads
// its config file and hands a `ClientConfig` in.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Backend root used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed local backends).
    DangerAcceptInvalid,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:8080/api/`.
    pub base_url: Url,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    pub(crate) fn transport(&self) -> odyssey_api::TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => odyssey_api::TlsMode::System,
            TlsVerification::CustomCa(path) => odyssey_api::TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => odyssey_api::TlsMode::DangerAcceptInvalid,
        };
        odyssey_api::TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
