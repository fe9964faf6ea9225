//! Process-wide settings, read once from the environment at start-up.
//!
//! Environment variables (all optional):
//! - `DOKKAN_APP_NAME`, `DOKKAN_APP_VERSION`, `DOKKAN_DEBUG`
//! - `DOKKAN_HOST`, `DOKKAN_PORT`
//! - `DOKKAN_ALLOWED_ORIGINS` - comma separated CORS origins, `*` for any
//! - `DOKKAN_SOURCE_BASE_URL`, `DOKKAN_SOURCE_TIMEOUT_SECS`, `DOKKAN_SOURCE_RETRIES`
//! - `DOKKAN_CACHE_TTL_SECS`
//! - `DOKKAN_LOG_LEVEL` - default filter when `RUST_LOG` is unset
use std::env;
use std::time::Duration;

use crate::data::repository::{
    RepositoryConfig, DEFAULT_CACHE_TTL_SECS, DEFAULT_SOURCE_BASE_URL, DEFAULT_SOURCE_RETRIES,
    DEFAULT_SOURCE_TIMEOUT_SECS,
};

pub const DEFAULT_APP_NAME: &str = "Dokkan Damage Calculator API";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub app_name: String,
    pub app_version: String,
    pub debug: bool,
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub source_base_url: String,
    pub source_timeout_secs: u64,
    pub source_retry_count: u32,
    pub cache_ttl_secs: u64,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            debug: false,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
            source_base_url: DEFAULT_SOURCE_BASE_URL.to_string(),
            source_timeout_secs: DEFAULT_SOURCE_TIMEOUT_SECS,
            source_retry_count: DEFAULT_SOURCE_RETRIES,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Unset or unparsable values keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        let read = |key: &str| lookup(key).map(|value| value.trim().to_string());

        if let Some(name) = read("DOKKAN_APP_NAME").filter(|v| !v.is_empty()) {
            settings.app_name = name;
        }
        if let Some(version) = read("DOKKAN_APP_VERSION").filter(|v| !v.is_empty()) {
            settings.app_version = version;
        }
        if let Some(debug) = read("DOKKAN_DEBUG").and_then(|v| parse_bool(&v)) {
            settings.debug = debug;
        }
        if let Some(host) = read("DOKKAN_HOST").filter(|v| !v.is_empty()) {
            settings.host = host;
        }
        if let Some(port) = read("DOKKAN_PORT").and_then(|v| v.parse().ok()) {
            settings.port = port;
        }
        if let Some(origins) = read("DOKKAN_ALLOWED_ORIGINS") {
            let origins: Vec<String> = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
            if !origins.is_empty() {
                settings.allowed_origins = origins;
            }
        }
        if let Some(url) = read("DOKKAN_SOURCE_BASE_URL").filter(|v| !v.is_empty()) {
            settings.source_base_url = url;
        }
        if let Some(timeout) = read("DOKKAN_SOURCE_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            settings.source_timeout_secs = timeout;
        }
        if let Some(retries) = read("DOKKAN_SOURCE_RETRIES").and_then(|v| v.parse().ok()) {
            settings.source_retry_count = retries;
        }
        if let Some(ttl) = read("DOKKAN_CACHE_TTL_SECS").and_then(|v| v.parse().ok()) {
            settings.cache_ttl_secs = ttl;
        }
        if let Some(level) = read("DOKKAN_LOG_LEVEL").filter(|v| !v.is_empty()) {
            settings.log_level = level.to_ascii_lowercase();
        } else if settings.debug {
            settings.log_level = "debug".to_string();
        }

        settings
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn repository_config(&self) -> RepositoryConfig {
        RepositoryConfig {
            timeout: Duration::from_secs(self.source_timeout_secs),
            retries: self.source_retry_count,
            ttl: Duration::from_secs(self.cache_ttl_secs),
            base_url: self.source_base_url.clone(),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let settings = settings_from(&[]);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.bind_addr(), "0.0.0.0:8000");

        let repo = settings.repository_config();
        assert_eq!(repo.timeout, Duration::from_secs(30));
        assert_eq!(repo.retries, 3);
        assert_eq!(repo.ttl, Duration::from_secs(3600));
        assert_eq!(repo.base_url, "https://api.dokkan.example.com");
    }

    #[test]
    fn overrides_are_parsed() {
        let settings = settings_from(&[
            ("DOKKAN_PORT", "9001"),
            ("DOKKAN_ALLOWED_ORIGINS", " https://a.example , https://b.example ,"),
            ("DOKKAN_CACHE_TTL_SECS", "5"),
            ("DOKKAN_SOURCE_RETRIES", "0"),
            ("DOKKAN_LOG_LEVEL", "WARN"),
        ]);

        assert_eq!(settings.port, 9001);
        assert_eq!(
            settings.allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(settings.cache_ttl_secs, 5);
        assert_eq!(settings.source_retry_count, 0);
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn unparsable_values_keep_defaults() {
        let settings = settings_from(&[("DOKKAN_PORT", "eighty"), ("DOKKAN_DEBUG", "maybe")]);
        assert_eq!(settings.port, DEFAULT_PORT);
        assert!(!settings.debug);
    }

    #[test]
    fn debug_flag_lowers_default_log_level() {
        let settings = settings_from(&[("DOKKAN_DEBUG", "true")]);
        assert!(settings.debug);
        assert_eq!(settings.log_level, "debug");
    }
}
