//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the lane-change service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LaneChangeConfig {
    /// Listen port. Required.
    pub port: u16,

    /// Listen address (IP literal).
    pub host: String,

    /// Key of the lane served to clients without an assignment.
    #[serde(rename = "default")]
    pub default_lane: String,

    /// Lane definitions keyed by lane key.
    pub lanes: BTreeMap<String, LaneDefinition>,

    /// Assignment retention and sweeping.
    pub assignments: AssignmentConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request limits.
    pub security: SecurityConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

impl Default for LaneChangeConfig {
    fn default() -> Self {
        Self {
            port: 0,
            host: "0.0.0.0".to_string(),
            default_lane: String::new(),
            lanes: BTreeMap::new(),
            assignments: AssignmentConfig::default(),
            timeouts: TimeoutConfig::default(),
            security: SecurityConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl LaneChangeConfig {
    /// Socket address to bind, if `host` parses.
    pub fn listen_addr(&self) -> Option<SocketAddr> {
        self.host
            .parse::<IpAddr>()
            .ok()
            .map(|ip| SocketAddr::new(ip, self.port))
    }
}

/// A lane as written in the config file.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct LaneDefinition {
    /// Response headers for this lane.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Response body for this lane.
    #[serde(default)]
    pub content: String,
}

/// Assignment store settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssignmentConfig {
    /// Retention for assignments made without a duration. 0 = never expire.
    pub default_ttl_secs: u64,

    /// How often expired assignments are reclaimed, in seconds.
    pub sweep_interval_secs: u64,
}

impl AssignmentConfig {
    pub fn default_ttl(&self) -> Option<Duration> {
        (self.default_ttl_secs > 0).then(|| Duration::from_secs(self.default_ttl_secs))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: 0,
            sweep_interval_secs: 600,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error), overridden by RUST_LOG.
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
