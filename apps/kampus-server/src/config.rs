//! Server configuration.
//!
//! # Configuration sources (lowest to highest priority)
//!
//! 1. Built-in defaults
//! 2. YAML file passed with `--config`
//! 3. Environment variables prefixed with `KAMPUS__`, nested with `__`
//!
//! - `KAMPUS__SERVER__BIND_ADDR` → `server.bind_addr`
//! - `KAMPUS__REQUEST_GATE__LOGIN_PATH` → `request_gate.login_path`
//! - `KAMPUS__SESSION_RESOLVER__MODE` → `session_resolver.mode`
//!
//! Lists such as `site_resolver.sites` belong in the YAML file.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use request_gate::RequestGateConfig;
use serde::{Deserialize, Serialize};
use site_resolver::SiteResolverConfig;
use static_session_plugin::StaticSessionPluginConfig;

pub const ENV_PREFIX: &str = "KAMPUS__";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub request_gate: RequestGateConfig,
    pub session_resolver: StaticSessionPluginConfig,
    pub site_resolver: SiteResolverConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// How long in-flight requests may run after a shutdown signal.
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_owned(),
            shutdown_timeout_secs: 10,
        }
    }
}

impl ServerConfig {
    /// # Errors
    ///
    /// Returns an error if `bind_addr` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr
            .parse()
            .with_context(|| format!("invalid server.bind_addr {:?}", self.bind_addr))
    }

    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl AppConfig {
    /// Layered figment for an optional YAML file.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load configuration from defaults, the given YAML file and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or the merged configuration
    /// does not deserialize.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path
            && !path.exists()
        {
            bail!("config file {} does not exist", path.display());
        }

        Self::figment(path).extract().with_context(|| match path {
            Some(path) => format!("failed to load config from {} and environment", path.display()),
            None => "failed to load config from environment".to_owned(),
        })
    }
}
