//! Configuration for the netsight dashboard.
//!
//! A TOML file in the platform config directory, layered with
//! `NETSIGHT_`-prefixed environment variables and command-line overrides,
//! validated and translated to `netsight_core::DashboardConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use netsight_core::{DashboardConfig, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

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
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub polling: PollingSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerSection {
    /// Analyzer server root URL.
    #[serde(default = "default_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout: default_timeout(),
            insecure: false,
            ca_cert: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PollingSection {
    /// Connection table refresh interval in milliseconds.
    #[serde(default = "default_devices_interval_ms")]
    pub devices_interval_ms: u64,
}

impl Default for PollingSection {
    fn default() -> Self {
        Self {
            devices_interval_ms: default_devices_interval_ms(),
        }
    }
}

fn default_url() -> String {
    "http://127.0.0.1:8000".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_devices_interval_ms() -> u64 {
    1000
}

/// Values given on the command line. `None` leaves the loaded value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub devices_interval_ms: Option<u64>,
    pub insecure: bool,
}

impl Config {
    /// Apply command-line values on top of file and environment.
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(ref url) = overrides.url {
            self.server.url.clone_from(url);
        }
        if let Some(ms) = overrides.devices_interval_ms {
            self.polling.devices_interval_ms = ms;
        }
        if overrides.insecure {
            self.server.insecure = true;
        }
    }

    /// Validate and build the runtime configuration.
    pub fn to_dashboard_config(&self) -> Result<DashboardConfig, ConfigError> {
        let url: url::Url = self
            .server
            .url
            .parse()
            .map_err(|e| ConfigError::Validation {
                field: "server.url".into(),
                reason: format!("invalid URL '{}': {e}", self.server.url),
            })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "server.url".into(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if self.server.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "server.timeout".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.polling.devices_interval_ms == 0 {
            return Err(ConfigError::Validation {
                field: "polling.devices_interval_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }

        let tls = if self.server.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.server.ca_cert {
            TlsVerification::CustomCa(ca_path.clone())
        } else {
            TlsVerification::SystemDefaults
        };

        let mut config = DashboardConfig::new(url);
        config.tls = tls;
        config.timeout = Duration::from_secs(self.server.timeout);
        config.devices_interval = Duration::from_millis(self.polling.devices_interval_ms);
        Ok(config)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "netsight", "netsight").map_or_else(
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
    p.push("netsight");
    p
}

// ── Config loading ──────────────────────────────────────────────────

fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NETSIGHT_").split("__"))
}

/// Load from an explicit file + environment. A missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), exists = path.exists(), "loading config");
    let config: Config = figment_for(path).extract()?;
    debug!(url = %config.server.url, interval_ms = config.polling.devices_interval_ms, "config loaded");
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML at `path`, creating parent directories.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    debug!(path = %path.display(), "config saved");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    // Loading reads the process environment, so every test that loads runs
    // inside a `Jail`, which serializes them.

    fn write(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_| {
            let dir = tempfile::tempdir().unwrap();
            let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
            assert_eq!(cfg, Config::default());

            let dash = cfg.to_dashboard_config().unwrap();
            assert_eq!(dash.url.as_str(), "http://127.0.0.1:8000/");
            assert_eq!(dash.devices_interval, Duration::from_millis(1000));
            assert_eq!(dash.tls, TlsVerification::SystemDefaults);
            Ok(())
        });
    }

    #[test]
    fn file_values_are_loaded() {
        Jail::expect_with(|_| {
            let dir = tempfile::tempdir().unwrap();
            let path = write(
                &dir,
                r#"
                [server]
                url = "https://analyzer.lan:8443/api"
                timeout = 5
                ca_cert = "/etc/netsight/ca.pem"

                [polling]
                devices_interval_ms = 2500
                "#,
            );

            let dash = load_config_from(&path).unwrap().to_dashboard_config().unwrap();
            assert_eq!(dash.url.as_str(), "https://analyzer.lan:8443/api");
            assert_eq!(dash.timeout, Duration::from_secs(5));
            assert_eq!(dash.devices_interval, Duration::from_millis(2500));
            assert_eq!(
                dash.tls,
                TlsVerification::CustomCa(PathBuf::from("/etc/netsight/ca.pem"))
            );
            Ok(())
        });
    }

    #[test]
    fn overrides_win_over_file() {
        Jail::expect_with(|_| {
            let dir = tempfile::tempdir().unwrap();
            let path = write(&dir, "[server]\nurl = \"http://a:1\"\n");

            let mut cfg = load_config_from(&path).unwrap();
            cfg.apply(&Overrides {
                url: Some("http://b:2".into()),
                devices_interval_ms: Some(250),
                insecure: true,
            });

            let dash = cfg.to_dashboard_config().unwrap();
            assert_eq!(dash.url.as_str(), "http://b:2/");
            assert_eq!(dash.devices_interval, Duration::from_millis(250));
            assert_eq!(dash.tls, TlsVerification::DangerAcceptInvalid);
            Ok(())
        });
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut cfg = Config::default();
        cfg.server.url = "not a url".into();
        assert!(matches!(
            cfg.to_dashboard_config(),
            Err(ConfigError::Validation { ref field, .. }) if field == "server.url"
        ));

        let mut cfg = Config::default();
        cfg.server.url = "ftp://host".into();
        assert!(cfg.to_dashboard_config().is_err());

        let mut cfg = Config::default();
        cfg.polling.devices_interval_ms = 0;
        assert!(matches!(
            cfg.to_dashboard_config(),
            Err(ConfigError::Validation { ref field, .. }) if field == "polling.devices_interval_ms"
        ));

        let mut cfg = Config::default();
        cfg.server.timeout = 0;
        assert!(cfg.to_dashboard_config().is_err());
    }

    #[test]
    fn malformed_toml_is_a_figment_error() {
        Jail::expect_with(|_| {
            let dir = tempfile::tempdir().unwrap();
            let path = write(&dir, "[polling]\ndevices_interval_ms = \"fast\"\n");
            assert!(matches!(load_config_from(&path), Err(ConfigError::Figment(_))));
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[polling]\ndevices_interval_ms = 2000\n")?;
            jail.set_env("NETSIGHT_POLLING__DEVICES_INTERVAL_MS", "750");
            jail.set_env("NETSIGHT_SERVER__URL", "http://env-host:9000");

            let cfg = load_config_from(Path::new("config.toml")).unwrap();
            assert_eq!(cfg.polling.devices_interval_ms, 750);
            assert_eq!(cfg.server.url, "http://env-host:9000");
            Ok(())
        });
    }

    #[test]
    fn saved_config_round_trips_through_loader() {
        Jail::expect_with(|_| {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("config.toml");
            let mut cfg = Config::default();
            cfg.polling.devices_interval_ms = 1500;

            save_config_to(&cfg, &path).unwrap();
            assert_eq!(load_config_from(&path).unwrap(), cfg);
            Ok(())
        });
    }
}
