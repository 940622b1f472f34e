use super::types::Reuse;
use metrics::counter;

/// Orchestrator branch that produced a verdict, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReuseBranch {
    VaryMismatch,
    NotFresh,
    PragmaNoCache,
    RequestNoCache,
    ResponseNoCache,
    MinFreshViolated,
    Fresh,
}

impl ReuseBranch {
    pub fn as_str(self) -> &'static str {
        match self {
            ReuseBranch::VaryMismatch => "vary_mismatch",
            ReuseBranch::NotFresh => "not_fresh",
            ReuseBranch::PragmaNoCache => "pragma_no_cache",
            ReuseBranch::RequestNoCache => "request_no_cache",
            ReuseBranch::ResponseNoCache => "response_no_cache",
            ReuseBranch::MinFreshViolated => "min_fresh_violated",
            ReuseBranch::Fresh => "fresh",
        }
    }
}

/// Staleness-allowance branch that produced a verdict, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaleBranch {
    RevalidateDirective,
    RequestMaxAgeWithoutMaxStale,
    NoCache,
    NoStore,
    OutsideMaxStale,
    WithinMaxStale,
}

impl StaleBranch {
    pub fn as_str(self) -> &'static str {
        match self {
            StaleBranch::RevalidateDirective => "revalidate_directive",
            StaleBranch::RequestMaxAgeWithoutMaxStale => "request_max_age_without_max_stale",
            StaleBranch::NoCache => "no_cache",
            StaleBranch::NoStore => "no_store",
            StaleBranch::OutsideMaxStale => "outside_max_stale",
            StaleBranch::WithinMaxStale => "within_max_stale",
        }
    }
}

/// Passive hook notified of each decision. Implementations must not block.
pub trait ReuseObserver: Send + Sync {
    fn reuse_decided(&self, branch: ReuseBranch, verdict: Reuse) {
        let _ = (branch, verdict);
    }

    fn stale_decided(&self, branch: StaleBranch, verdict: Reuse) {
        let _ = (branch, verdict);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ReuseObserver for NoopObserver {}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ReuseObserver for TracingObserver {
    fn reuse_decided(&self, branch: ReuseBranch, verdict: Reuse) {
        tracing::debug!(
            target: "cache_reuse",
            branch = branch.as_str(),
            verdict = verdict.as_str(),
            "reuse decided"
        );
    }

    fn stale_decided(&self, branch: StaleBranch, verdict: Reuse) {
        tracing::debug!(
            target: "cache_reuse",
            branch = branch.as_str(),
            verdict = verdict.as_str(),
            "stale allowance decided"
        );
    }
}

/// Counts verdicts per branch through the `metrics` facade.
#[derive(Debug, Clone)]
pub struct MetricsObserver {
    reuse_total: String,
    stale_total: String,
}

impl MetricsObserver {
    pub fn new(prefix: &str) -> Self {
        Self {
            reuse_total: format!("{prefix}_cache_reuse_total"),
            stale_total: format!("{prefix}_cache_stale_total"),
        }
    }
}

impl ReuseObserver for MetricsObserver {
    fn reuse_decided(&self, branch: ReuseBranch, verdict: Reuse) {
        counter!(
            self.reuse_total.clone(),
            "branch" => branch.as_str(),
            "verdict" => verdict.as_str()
        )
        .increment(1);
    }

    fn stale_decided(&self, branch: StaleBranch, verdict: Reuse) {
        counter!(
            self.stale_total.clone(),
            "branch" => branch.as_str(),
            "verdict" => verdict.as_str()
        )
        .increment(1);
    }
}

impl<A: ReuseObserver, B: ReuseObserver> ReuseObserver for (A, B) {
    fn reuse_decided(&self, branch: ReuseBranch, verdict: Reuse) {
        self.0.reuse_decided(branch, verdict);
        self.1.reuse_decided(branch, verdict);
    }

    fn stale_decided(&self, branch: StaleBranch, verdict: Reuse) {
        self.0.stale_decided(branch, verdict);
        self.1.stale_decided(branch, verdict);
    }
}
