use super::defaults::*;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub version: u32,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_metrics_prefix")]
    pub prefix: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            prefix: default_metrics_prefix(),
        }
    }
}

/// How closely reuse decisions follow RFC 7234.
///
/// `Lenient` skips the request-side `Pragma`, `no-cache`, `min-fresh` and
/// `max-age` checks so that clients cannot force origin traffic.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceMode {
    #[default]
    Strict,
    Lenient,
}

impl ComplianceMode {
    pub fn is_strict(self) -> bool {
        matches!(self, ComplianceMode::Strict)
    }
}

/// Which directive set `max-stale` is read from when bounding stale reuse.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MaxStaleSource {
    /// Read from the stored response's `Cache-Control` (historic behavior).
    #[default]
    Legacy,
    /// Read from the request's `Cache-Control`, per RFC 7234 §5.2.1.2.
    Rfc,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    #[serde(default)]
    pub compliance: ComplianceMode,
    #[serde(default)]
    pub max_stale_source: MaxStaleSource,
    #[serde(default)]
    pub default_ttl_secs: Option<u64>,
    #[serde(default = "default_heuristic_percent")]
    pub heuristic_percent: u32,
    #[serde(default = "default_heuristic_max_secs")]
    pub heuristic_max_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            compliance: ComplianceMode::default(),
            max_stale_source: MaxStaleSource::default(),
            default_ttl_secs: None,
            heuristic_percent: default_heuristic_percent(),
            heuristic_max_secs: default_heuristic_max_secs(),
        }
    }
}
