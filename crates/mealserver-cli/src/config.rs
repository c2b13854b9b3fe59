//! Configuration file loading and environment overrides

use anyhow::{Context, Result, bail};
use mealserver_core::MealDbConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Root config structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub mealdb: MealDbConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Stdio,
    Http,
}

impl FromStr for Transport {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdio" => Ok(Transport::Stdio),
            "http" => Ok(Transport::Http),
            other => bail!("Unknown transport '{}', expected 'stdio' or 'http'", other),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default)]
    pub transport: Transport,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Resolve `host:port`; `host` may be an IP address or a hostname
    pub async fn resolve_addr(&self) -> Result<SocketAddr> {
        let host = self.host.trim();
        if host.is_empty() {
            bail!("server.host must not be empty");
        }
        tokio::net::lookup_host((host, self.port))
            .await
            .with_context(|| format!("Failed to resolve server.host '{}'", host))?
            .next()
            .with_context(|| format!("server.host '{}' resolved to no address", host))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

/// Directory holding mealserver's config file
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mealserver")
}

pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

impl Config {
    /// Parse config from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config TOML")
    }

    /// Load from an explicit path, or from the default location when `None`.
    ///
    /// A missing default file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                Self::parse(&content)
            }
            None => {
                let path = default_config_path();
                if !path.exists() {
                    return Ok(Self::default());
                }
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                Self::parse(&content)
            }
        }
    }

    /// Apply `MEALDB_*` / `MEALSERVER_*` overrides from `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(key) = lookup("MEALDB_API_KEY") {
            self.mealdb.api_key = key;
        }
        if let Some(base) = lookup("MEALDB_API_BASE") {
            self.mealdb.api_base = Some(base);
        }
        if let Some(transport) = lookup("MEALSERVER_TRANSPORT") {
            self.server.transport = transport.parse()?;
        }
        if let Some(host) = lookup("MEALSERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("MEALSERVER_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid MEALSERVER_PORT '{}'", port))?;
        }
        if let Some(level) = lookup("MEALSERVER_LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
    }

    pub fn validate(&self) -> Result<()> {
        self.mealdb.validate()?;
        if self.server.transport == Transport::Http && self.server.host.trim().is_empty() {
            bail!("server.host must not be empty");
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.transport, Transport::Stdio);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert_eq!(
            config.mealdb.base_url(),
            "https://www.themealdb.com/api/json/v1/1"
        );
    }

    #[test]
    fn test_parse_full() {
        let config = Config::parse(
            r#"
[mealdb]
api_key = "9973533"
timeout_secs = 10
detail_concurrency = 4

[server]
transport = "http"
host = "0.0.0.0"
port = 9000

[logging]
level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(
            config.mealdb.base_url(),
            "https://www.themealdb.com/api/json/v1/9973533"
        );
        assert_eq!(config.mealdb.timeout_secs, 10);
        assert_eq!(config.mealdb.detail_concurrency, 4);
        assert_eq!(config.server.transport, Transport::Http);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_parse_rejects_unknown_transport() {
        assert!(Config::parse("[server]\ntransport = \"carrier-pigeon\"").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("MEALDB_API_KEY", "2"),
            ("MEALDB_API_BASE", "http://localhost:1234/api"),
            ("MEALSERVER_TRANSPORT", "HTTP"),
            ("MEALSERVER_PORT", "3000"),
            ("MEALSERVER_LOG_LEVEL", "trace"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.mealdb.api_key, "2");
        assert_eq!(config.mealdb.base_url(), "http://localhost:1234/api");
        assert_eq!(config.server.transport, Transport::Http);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn test_env_override_bad_port() {
        let mut config = Config::default();
        let result = config.apply_overrides(|k| (k == "MEALSERVER_PORT").then(|| "eighty".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nlevel = \"warn\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.mealdb, MealDbConfig::default());
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("absent.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.server.transport = Transport::Http;
        config.server.host = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.mealdb.detail_concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_resolve_addr_accepts_ip_and_hostname() {
        let mut server = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 9000,
            ..Default::default()
        };
        assert_eq!(
            server.resolve_addr().await.unwrap(),
            "0.0.0.0:9000".parse::<SocketAddr>().unwrap()
        );

        server.host = "localhost".to_string();
        let addr = server.resolve_addr().await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 9000);

        let mut config = Config::default();
        config.server.transport = Transport::Http;
        config.server.host = "localhost".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_to_toml_round_trips() {
        let mut config = Config::default();
        config.server.transport = Transport::Http;
        let text = config.to_toml().unwrap();
        assert!(text.contains("transport = \"http\""));
        assert_eq!(Config::parse(&text).unwrap(), config);
    }
}
