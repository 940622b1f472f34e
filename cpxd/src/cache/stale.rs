use super::directives::{http_delta_seconds_cc, CacheControl, Directive};
use super::freshness::{stored_current_age, stored_freshness_lifetime};
use super::observer::StaleBranch;
use super::types::{FreshnessPolicy, Reuse, StoredResponse};
use cpx_core::config::{ComplianceMode, MaxStaleSource};
use std::time::SystemTime;

/// RFC 7234 §4.2.4 allowance for a response that is no longer fresh.
///
/// The checks run in a fixed order and the first one that applies decides.
pub fn allowed_stale(
    request_cc: &CacheControl,
    stored: &StoredResponse,
    compliance: ComplianceMode,
    max_stale_source: MaxStaleSource,
    policy: &FreshnessPolicy,
    now: SystemTime,
) -> (StaleBranch, Reuse) {
    let response_cc = &stored.response_cache_control;
    if response_cc.contains(&Directive::MustRevalidate)
        || response_cc.contains(&Directive::ProxyRevalidate)
    {
        return (StaleBranch::RevalidateDirective, Reuse::MustRevalidate);
    }
    if compliance.is_strict()
        && request_cc.contains(&Directive::MaxAge)
        && !request_cc.contains(&Directive::MaxStale)
    {
        return (
            StaleBranch::RequestMaxAgeWithoutMaxStale,
            Reuse::MustRevalidateCanStale,
        );
    }
    if response_cc.contains(&Directive::NoCache) {
        return (StaleBranch::NoCache, Reuse::Cannot);
    }
    if response_cc.contains(&Directive::NoStore) {
        return (StaleBranch::NoStore, Reuse::Cannot);
    }
    let max_stale_cc = match max_stale_source {
        MaxStaleSource::Legacy => response_cc,
        MaxStaleSource::Rfc => request_cc,
    };
    if !in_max_stale(max_stale_cc, stored, policy, now) {
        return (StaleBranch::OutsideMaxStale, Reuse::MustRevalidate);
    }
    (StaleBranch::WithinMaxStale, Reuse::MustRevalidateCanStale)
}

/// Vacuously true when `max_stale_cc` has no usable `max-stale`; otherwise the
/// staleness must be strictly below the allowance.
pub fn in_max_stale(
    max_stale_cc: &CacheControl,
    stored: &StoredResponse,
    policy: &FreshnessPolicy,
    now: SystemTime,
) -> bool {
    let Some(max_stale) = http_delta_seconds_cc(max_stale_cc, &Directive::MaxStale) else {
        return true;
    };
    let lifetime = stored_freshness_lifetime(stored, policy);
    let age = stored_current_age(stored, now);
    match age.checked_sub(lifetime) {
        Some(staleness) => max_stale > staleness,
        None => true,
    }
}
