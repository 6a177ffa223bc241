//! Server configuration.
//!
//! Layered as: defaults -> YAML file (if given) -> env (`TESSERA__*`, `__`
//! nests) -> CLI overrides.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use authority::AuthorityConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use tessera_auth::AuthConfig;

pub const ENV_PREFIX: &str = "TESSERA__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
    pub authority: AuthorityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Requests running longer are answered with 408.
    #[serde(with = "tessera_utils::humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_owned(),
            port: 8087,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    /// # Errors
    /// `bind` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip = self
            .bind
            .parse()
            .with_context(|| format!("invalid bind address: {}", self.bind))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Connection string, e.g. `sqlite://tessera.db?mode=rwc` or `postgres://...`.
    pub url: String,
    pub max_connections: u32,
    #[serde(with = "tessera_utils::humantime_serde")]
    pub connect_timeout: Duration,
    /// Run schema migrations on startup.
    pub migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://tessera.db?mode=rwc".to_owned(),
            max_connections: 10,
            connect_timeout: Duration::from_secs(10),
            migrate: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load the layered configuration. A missing `path` skips the YAML layer.
    ///
    /// # Errors
    /// Unreadable YAML, unknown keys or values of the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::figment(path)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("failed to parse configuration")
    }

    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file_exact(path));
        }
        figment
    }

    /// Apply command-line overrides on top of the loaded layers.
    pub fn apply_cli_overrides(&mut self, port: Option<u16>, verbose: u8) {
        if let Some(port) = port {
            self.server.port = port;
        }
        match verbose {
            0 => {}
            1 => "info".clone_into(&mut self.logging.level),
            2 => "debug".clone_into(&mut self.logging.level),
            _ => "trace".clone_into(&mut self.logging.level),
        }
    }

    /// Cross-field checks run before anything is started.
    ///
    /// # Errors
    /// Invalid auth or authority settings, or a bad bind address.
    pub fn validate(&self) -> Result<()> {
        self.auth.validate().context("invalid auth configuration")?;
        self.authority
            .validate()
            .context("invalid authority configuration")?;
        self.server.socket_addr()?;
        if self.database.url.is_empty() {
            anyhow::bail!("database.url must be set");
        }
        Ok(())
    }

    /// Effective configuration as pretty JSON. Secrets are never serialized.
    ///
    /// # Errors
    /// Serialization failures.
    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to render configuration")
    }
}
