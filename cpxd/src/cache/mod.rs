mod age;
mod directives;
mod fixture;
mod freshness;
mod observer;
mod reuse;
mod stale;
mod storable;
mod types;
mod vary;

pub use age::{
    age_value, apparent_age, corrected_age_value, corrected_initial_age, current_age, date_value,
    resident_time, response_delay,
};
pub use directives::{
    has_pragma_no_cache, http_date, http_delta_seconds, http_delta_seconds_cc,
    parse_cache_control, CacheControl, Directive,
};
pub use fixture::{load_request, load_stored, parse_instant, RequestFixture, StoredFixture};
pub use freshness::{fresh, freshness_lifetime, in_min_fresh};
pub use observer::{
    MetricsObserver, NoopObserver, ReuseBranch, ReuseObserver, StaleBranch, TracingObserver,
};
pub use reuse::ReuseEvaluator;
pub use stale::{allowed_stale, in_max_stale};
pub use storable::{can_store, code_understood};
pub use types::{CacheRequest, FreshnessPolicy, Reuse, StoredResponse};
pub use vary::selected_headers_match;
