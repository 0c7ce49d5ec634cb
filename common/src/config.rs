//! Service configuration.
//!
//! Values come from environment variables; a `.env` file in the working
//! directory is applied first without overriding variables that are already
//! set.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default bind port.
pub const DEFAULT_PORT: u16 = 7071;

/// Default request body limit (10 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Default per-call timeout inside the sharing client.
pub const DEFAULT_SHARING_TIMEOUT_SECS: u64 = 120;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "pretty" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Service name, used in logs.
    pub service_name: String,
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Log output format.
    pub log_format: LogFormat,
    /// Directory for materialized profiles; the OS temp dir when `None`.
    pub profile_temp_dir: Option<PathBuf>,
    /// Request body limit in bytes.
    pub max_body_bytes: usize,
    /// Timeout applied to each HTTP call made by the sharing client.
    pub sharing_timeout: Duration,
    /// When set, callers must present this key.
    pub access_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_name: "sharing-gateway".to_string(),
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            log_format: LogFormat::Text,
            profile_temp_dir: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            sharing_timeout: Duration::from_secs(DEFAULT_SHARING_TIMEOUT_SECS),
            access_key: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration for the named service from the process environment.
    pub fn load_with_service(service_name: &str) -> Self {
        Self::from_lookup(service_name, |key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(service_name: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            service_name: service_name.to_string(),
            host: non_empty("SERVER_HOST").unwrap_or(defaults.host),
            port: parse_or(non_empty("SERVER_PORT"), "SERVER_PORT", defaults.port),
            log_format: non_empty("LOG_FORMAT")
                .and_then(|v| LogFormat::parse(&v))
                .unwrap_or(defaults.log_format),
            profile_temp_dir: non_empty("PROFILE_TEMP_DIR").map(PathBuf::from),
            max_body_bytes: parse_or(
                non_empty("MAX_BODY_BYTES"),
                "MAX_BODY_BYTES",
                defaults.max_body_bytes,
            ),
            sharing_timeout: Duration::from_secs(parse_or(
                non_empty("SHARING_HTTP_TIMEOUT_SECS"),
                "SHARING_HTTP_TIMEOUT_SECS",
                DEFAULT_SHARING_TIMEOUT_SECS,
            )),
            access_key: non_empty("GATEWAY_ACCESS_KEY"),
        }
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr + Copy>(raw: Option<String>, key: &str, default: T) -> T {
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %value, "invalid value, using default");
            default
        }),
        None => default,
    }
}

/// Applies `KEY=VALUE` lines from `path` to the environment.
///
/// Missing files are ignored. Variables already present in the environment
/// win over the file.
pub fn load_dotenv(path: &Path) {
    let Ok(content) = std::fs::read_to_string(path) else {
        return;
    };
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim().trim_matches('"');
            if std::env::var(key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }
}
