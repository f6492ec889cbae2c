// ── Runtime dashboard configuration ──
//
// Describes *where* the analyzer server lives and how often to poll it.
// Never touches disk: netsight-config (or a test) builds a `DashboardConfig`
// and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use netsight_api::transport::{TlsMode, TransportConfig};

/// Default interval of the connection-table poll.
pub const DEFAULT_DEVICES_INTERVAL: Duration = Duration::from_millis(1000);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for one analyzer server.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Server root URL (e.g., `http://127.0.0.1:8000`).
    pub url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Connection-table polling interval.
    pub devices_interval: Duration,
}

impl DashboardConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            devices_interval: DEFAULT_DEVICES_INTERVAL,
        }
    }

    /// Translate into the api-level transport settings.
    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
