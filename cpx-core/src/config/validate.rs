use anyhow::{anyhow, Result};

use super::types::*;

pub(super) fn validate_config(config: &Config) -> Result<()> {
    if config.version != 1 {
        return Err(anyhow!(
            "unsupported config.version {} (expected 1)",
            config.version
        ));
    }
    validate_logging_config(&config.logging)?;
    validate_metrics_config(&config.metrics)?;
    validate_cache_config(&config.cache)?;
    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> Result<()> {
    if logging.level.trim().is_empty() {
        return Err(anyhow!("logging.level must not be empty"));
    }
    let format = logging.format.to_ascii_lowercase();
    if format != "json" && format != "pretty" {
        return Err(anyhow!(
            "logging.format must be one of json, pretty (got {})",
            logging.format
        ));
    }
    Ok(())
}

fn validate_metrics_config(metrics: &MetricsConfig) -> Result<()> {
    let first = metrics
        .prefix
        .chars()
        .next()
        .ok_or_else(|| anyhow!("metrics.prefix must not be empty"))?;
    if !(first.is_ascii_alphabetic() || first == '_' || first == ':') {
        return Err(anyhow!("metrics.prefix must start with [A-Za-z_:]"));
    }
    if !metrics
        .prefix
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
    {
        return Err(anyhow!("metrics.prefix must contain only [A-Za-z0-9_:]"));
    }
    Ok(())
}

fn validate_cache_config(cache: &CacheConfig) -> Result<()> {
    if cache.heuristic_percent > 100 {
        return Err(anyhow!(
            "cache.heuristic_percent must be within 0..=100 (got {})",
            cache.heuristic_percent
        ));
    }
    if cache.heuristic_percent > 0 && cache.heuristic_max_secs == 0 {
        return Err(anyhow!(
            "cache.heuristic_max_secs must be > 0 when heuristic freshness is enabled"
        ));
    }
    Ok(())
}
