use super::directives::{has_pragma_no_cache, Directive};
use super::freshness::{fresh, in_min_fresh};
use super::observer::{NoopObserver, ReuseBranch, ReuseObserver};
use super::stale::allowed_stale;
use super::types::{CacheRequest, FreshnessPolicy, Reuse, StoredResponse};
use super::vary::selected_headers_match;
use cpx_core::config::{CacheConfig, ComplianceMode, MaxStaleSource};
use std::sync::Arc;
use std::time::SystemTime;

/// Decides whether a stored response may satisfy a request (RFC 7234 §4).
///
/// Holds no mutable state; one evaluator can be shared by every request handler.
#[derive(Clone)]
pub struct ReuseEvaluator {
    compliance: ComplianceMode,
    max_stale_source: MaxStaleSource,
    policy: FreshnessPolicy,
    observer: Arc<dyn ReuseObserver>,
}

impl std::fmt::Debug for ReuseEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReuseEvaluator")
            .field("compliance", &self.compliance)
            .field("max_stale_source", &self.max_stale_source)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Default for ReuseEvaluator {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

impl ReuseEvaluator {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            compliance: config.compliance,
            max_stale_source: config.max_stale_source,
            policy: FreshnessPolicy::from_config(config),
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_compliance(mut self, compliance: ComplianceMode) -> Self {
        self.compliance = compliance;
        self
    }

    pub fn with_max_stale_source(mut self, source: MaxStaleSource) -> Self {
        self.max_stale_source = source;
        self
    }

    pub fn with_policy(mut self, policy: FreshnessPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ReuseObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn compliance(&self) -> ComplianceMode {
        self.compliance
    }

    pub fn policy(&self) -> &FreshnessPolicy {
        &self.policy
    }

    pub fn evaluate(&self, request: &CacheRequest, stored: &StoredResponse) -> Reuse {
        self.evaluate_at(request, stored, SystemTime::now())
    }

    pub fn evaluate_at(
        &self,
        request: &CacheRequest,
        stored: &StoredResponse,
        now: SystemTime,
    ) -> Reuse {
        let (branch, verdict) = self.decide(request, stored, now);
        self.observer.reuse_decided(branch, verdict);
        verdict
    }

    /// Collapses the verdict to a boolean for callers that already know whether a
    /// revalidation succeeded.
    pub fn can_reuse(
        &self,
        request: &CacheRequest,
        stored: &StoredResponse,
        revalidated: bool,
    ) -> bool {
        self.can_reuse_at(request, stored, revalidated, SystemTime::now())
    }

    pub fn can_reuse_at(
        &self,
        request: &CacheRequest,
        stored: &StoredResponse,
        revalidated: bool,
        now: SystemTime,
    ) -> bool {
        self.evaluate_at(request, stored, now).reusable(revalidated)
    }

    fn decide(
        &self,
        request: &CacheRequest,
        stored: &StoredResponse,
        now: SystemTime,
    ) -> (ReuseBranch, Reuse) {
        let strict = self.compliance.is_strict();

        if !selected_headers_match(&stored.response_headers, &stored.request_headers) {
            return (ReuseBranch::VaryMismatch, Reuse::Cannot);
        }

        if !fresh(stored, &self.policy, now) {
            let (stale_branch, verdict) = allowed_stale(
                &request.cache_control,
                stored,
                self.compliance,
                self.max_stale_source,
                &self.policy,
                now,
            );
            self.observer.stale_decided(stale_branch, verdict);
            return (ReuseBranch::NotFresh, verdict);
        }

        if strict && has_pragma_no_cache(&request.headers) {
            return (ReuseBranch::PragmaNoCache, Reuse::MustRevalidate);
        }

        if strict && request.cache_control.contains(&Directive::NoCache) {
            return (ReuseBranch::RequestNoCache, Reuse::Cannot);
        }

        if stored.response_cache_control.contains(&Directive::NoCache) {
            return (ReuseBranch::ResponseNoCache, Reuse::Cannot);
        }

        if strict && !in_min_fresh(&request.cache_control, stored, &self.policy, now) {
            return (ReuseBranch::MinFreshViolated, Reuse::MustRevalidate);
        }

        (ReuseBranch::Fresh, Reuse::Can)
    }
}
