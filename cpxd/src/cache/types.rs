use super::directives::{parse_cache_control, CacheControl};
use cpx_core::config::CacheConfig;
use http::HeaderMap;
use std::fmt;
use std::time::{Duration, SystemTime};

/// Outcome of a reuse evaluation, ordered by permissiveness (`Cannot` lowest, `Can` highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Reuse {
    /// Treat as a miss and fetch from origin.
    Cannot,
    /// Revalidate before use; never serve if revalidation is impossible.
    MustRevalidate,
    /// Revalidate before use; serving stale is allowed if the origin is unreachable.
    MustRevalidateCanStale,
    /// Serve as-is.
    Can,
}

impl Reuse {
    pub fn as_str(self) -> &'static str {
        match self {
            Reuse::Cannot => "cannot",
            Reuse::MustRevalidate => "must_revalidate",
            Reuse::MustRevalidateCanStale => "must_revalidate_can_stale",
            Reuse::Can => "can",
        }
    }

    pub fn requires_revalidation(self) -> bool {
        matches!(self, Reuse::MustRevalidate | Reuse::MustRevalidateCanStale)
    }

    /// `Can`, or a revalidating verdict once the caller's revalidation has succeeded.
    pub fn reusable(self, revalidated: bool) -> bool {
        match self {
            Reuse::Can => true,
            Reuse::MustRevalidate | Reuse::MustRevalidateCanStale => revalidated,
            Reuse::Cannot => false,
        }
    }
}

impl fmt::Display for Reuse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored response as handed over by the object store. Read-only during evaluation.
#[derive(Debug, Clone)]
pub struct StoredResponse {
    /// Headers of the request that produced this response; used for `Vary` matching.
    pub request_headers: HeaderMap,
    pub response_headers: HeaderMap,
    pub response_cache_control: CacheControl,
    /// When the request that produced this response was sent.
    pub request_time: SystemTime,
    /// When the response was received (or last refreshed).
    pub response_time: SystemTime,
}

impl StoredResponse {
    /// Builds a record, deriving the response directive set from its `Cache-Control` fields.
    pub fn new(
        request_headers: HeaderMap,
        response_headers: HeaderMap,
        request_time: SystemTime,
        response_time: SystemTime,
    ) -> Self {
        let response_cache_control = parse_cache_control(&response_headers);
        Self {
            request_headers,
            response_headers,
            response_cache_control,
            request_time,
            response_time,
        }
    }
}

/// The incoming request being matched against a stored response.
#[derive(Debug, Clone, Default)]
pub struct CacheRequest {
    pub headers: HeaderMap,
    pub cache_control: CacheControl,
}

impl CacheRequest {
    pub fn new(headers: HeaderMap, cache_control: CacheControl) -> Self {
        Self {
            headers,
            cache_control,
        }
    }

    pub fn from_headers(headers: HeaderMap) -> Self {
        let cache_control = parse_cache_control(&headers);
        Self {
            headers,
            cache_control,
        }
    }
}

/// Fallbacks used when a response carries neither freshness directives nor `Expires`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshnessPolicy {
    pub default_ttl: Option<Duration>,
    /// Share of `Date - Last-Modified` granted as heuristic freshness; 0 disables it.
    pub heuristic_percent: u32,
    pub heuristic_max: Duration,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

impl FreshnessPolicy {
    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            default_ttl: config.default_ttl_secs.map(Duration::from_secs),
            heuristic_percent: config.heuristic_percent,
            heuristic_max: Duration::from_secs(config.heuristic_max_secs),
        }
    }
}
