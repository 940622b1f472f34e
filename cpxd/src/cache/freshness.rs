use super::age::current_age;
use super::directives::{http_date, http_delta_seconds_cc, CacheControl, Directive};
use super::types::{FreshnessPolicy, StoredResponse};
use http::header::{DATE, EXPIRES, LAST_MODIFIED};
use http::HeaderMap;
use std::time::{Duration, SystemTime};

/// RFC 7234 §4.2.1: `s-maxage`, then `max-age`, then `Expires - Date`, then the
/// `Last-Modified` heuristic, then the configured default, then zero.
pub fn freshness_lifetime(
    response_headers: &HeaderMap,
    response_cc: &CacheControl,
    response_time: SystemTime,
    policy: &FreshnessPolicy,
) -> Duration {
    if let Some(ttl) = http_delta_seconds_cc(response_cc, &Directive::SMaxAge) {
        return ttl;
    }
    if let Some(ttl) = http_delta_seconds_cc(response_cc, &Directive::MaxAge) {
        return ttl;
    }
    if response_headers.contains_key(EXPIRES) {
        let Some(expires) = http_date(response_headers, &EXPIRES) else {
            // RFC 7234 §5.3: an invalid Expires means "already expired".
            return Duration::ZERO;
        };
        let date = http_date(response_headers, &DATE).unwrap_or(response_time);
        return expires.duration_since(date).unwrap_or(Duration::ZERO);
    }
    if let Some(heuristic) = heuristic_freshness(response_headers, policy) {
        return heuristic;
    }
    policy.default_ttl.unwrap_or(Duration::ZERO)
}

fn heuristic_freshness(response_headers: &HeaderMap, policy: &FreshnessPolicy) -> Option<Duration> {
    if policy.heuristic_percent == 0 {
        return None;
    }
    let since = since_last_modified(response_headers)?;
    let scaled = since
        .as_secs()
        .saturating_mul(u64::from(policy.heuristic_percent))
        / 100;
    Some(Duration::from_secs(scaled).min(policy.heuristic_max))
}

fn since_last_modified(response_headers: &HeaderMap) -> Option<Duration> {
    let last_modified = http_date(response_headers, &LAST_MODIFIED)?;
    let date = http_date(response_headers, &DATE)?;
    Some(date.duration_since(last_modified).unwrap_or(Duration::ZERO))
}

pub fn stored_freshness_lifetime(stored: &StoredResponse, policy: &FreshnessPolicy) -> Duration {
    freshness_lifetime(
        &stored.response_headers,
        &stored.response_cache_control,
        stored.response_time,
        policy,
    )
}

pub fn stored_current_age(stored: &StoredResponse, now: SystemTime) -> Duration {
    current_age(
        &stored.response_headers,
        stored.request_time,
        stored.response_time,
        now,
    )
}

/// Fresh iff the lifetime strictly exceeds the current age; equality is already stale.
pub fn fresh(stored: &StoredResponse, policy: &FreshnessPolicy, now: SystemTime) -> bool {
    stored_freshness_lifetime(stored, policy) > stored_current_age(stored, now)
}

/// Vacuously true without a request `min-fresh`; otherwise the remaining freshness must
/// strictly exceed it.
pub fn in_min_fresh(
    request_cc: &CacheControl,
    stored: &StoredResponse,
    policy: &FreshnessPolicy,
    now: SystemTime,
) -> bool {
    let Some(min_fresh) = http_delta_seconds_cc(request_cc, &Directive::MinFresh) else {
        return true;
    };
    let lifetime = stored_freshness_lifetime(stored, policy);
    let age = stored_current_age(stored, now);
    match lifetime.checked_sub(age) {
        Some(remaining) => min_fresh < remaining,
        None => false,
    }
}
