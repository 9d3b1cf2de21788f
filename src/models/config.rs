// src/models/config.rs

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and polling behavior settings
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Ordered proxy endpoint list; position defines fetch priority
    #[serde(default = "defaults::endpoints")]
    pub endpoints: Vec<EndpointInfo>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.monitor.user_agent.trim().is_empty() {
            return Err(AppError::validation("monitor.user_agent is empty"));
        }
        if self.monitor.timeout_secs == 0 {
            return Err(AppError::validation("monitor.timeout_secs must be > 0"));
        }
        if self.monitor.poll_interval_ms == 0 {
            return Err(AppError::validation("monitor.poll_interval_ms must be > 0"));
        }
        if url::Url::parse(&self.monitor.target_url).is_err() {
            return Err(AppError::validation("monitor.target_url is not a valid URL"));
        }
        if !(-12..=14).contains(&self.monitor.utc_offset_hours) {
            return Err(AppError::validation(
                "monitor.utc_offset_hours must be within -12..=14",
            ));
        }
        if self.endpoints.is_empty() {
            return Err(AppError::validation("No endpoints defined"));
        }
        for endpoint in &self.endpoints {
            if endpoint.id.trim().is_empty() {
                return Err(AppError::validation("endpoint id is empty"));
            }
            if endpoint.param.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "endpoint {} has an empty query param",
                    endpoint.id
                )));
            }
            if url::Url::parse(&endpoint.base).is_err() {
                return Err(AppError::validation(format!(
                    "endpoint {} has an invalid base URL",
                    endpoint.id
                )));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monitor: MonitorConfig::default(),
            endpoints: defaults::endpoints(),
        }
    }
}

/// HTTP client and polling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Polling interval in milliseconds
    #[serde(default = "defaults::poll_interval")]
    pub poll_interval_ms: u64,

    /// Bulletin page to monitor
    #[serde(default = "defaults::target_url")]
    pub target_url: String,

    /// UTC offset of the monitored region (WIB = +7)
    #[serde(default = "defaults::utc_offset")]
    pub utc_offset_hours: i32,

    /// Zone label rendered after timestamps
    #[serde(default = "defaults::zone_label")]
    pub zone_label: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            poll_interval_ms: defaults::poll_interval(),
            target_url: defaults::target_url(),
            utc_offset_hours: defaults::utc_offset(),
            zone_label: defaults::zone_label(),
        }
    }
}

/// Response envelope kind of a proxy endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Envelope {
    /// Response body is the bulletin markup directly
    RawText,
    /// Response body is JSON; the markup sits in its `contents` field
    JsonWrapped,
}

/// One configured proxy endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointInfo {
    /// Short identifier used in logs and the status line
    pub id: String,

    /// Proxy base URL
    pub base: String,

    /// Query parameter carrying the percent-encoded target URL
    pub param: String,

    /// How the proxy wraps the response
    pub envelope: Envelope,
}

mod defaults {
    use super::{EndpointInfo, Envelope};

    // Monitor defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; dini-monitor/1.0)".into()
    }
    pub fn timeout() -> u64 {
        15
    }
    pub fn poll_interval() -> u64 {
        60_000
    }
    pub fn target_url() -> String {
        "https://www.bmkg.go.id/cuaca/peringatan-dini-cuaca/61".into()
    }
    pub fn utc_offset() -> i32 {
        7
    }
    pub fn zone_label() -> String {
        "WIB".into()
    }

    // Endpoint defaults, most stable proxy first
    pub fn endpoints() -> Vec<EndpointInfo> {
        vec![
            EndpointInfo {
                id: "CodeTabs".to_string(),
                base: "https://api.codetabs.com/v1/proxy".to_string(),
                param: "quest".to_string(),
                envelope: Envelope::RawText,
            },
            EndpointInfo {
                id: "AllOriginsJson".to_string(),
                base: "https://api.allorigins.win/get".to_string(),
                param: "url".to_string(),
                envelope: Envelope::JsonWrapped,
            },
            EndpointInfo {
                id: "AllOriginsRaw".to_string(),
                base: "https://api.allorigins.win/raw".to_string(),
                param: "url".to_string(),
                envelope: Envelope::RawText,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn default_endpoint_order_is_fixed() {
        let config = Config::default();
        let ids: Vec<&str> = config.endpoints.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["CodeTabs", "AllOriginsJson", "AllOriginsRaw"]);
    }

    #[test]
    fn validate_rejects_zero_interval() {
        let mut config = Config::default();
        config.monitor.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_endpoints() {
        let mut config = Config::default();
        config.endpoints.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_endpoint_base() {
        let mut config = Config::default();
        config.endpoints[0].base = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_partial_toml_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[monitor]\npoll_interval_ms = 30000").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.monitor.poll_interval_ms, 30_000);
        assert_eq!(config.monitor.zone_label, "WIB");
        assert_eq!(config.endpoints.len(), 3);
    }
}
