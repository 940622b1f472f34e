//! Current age of a stored response, RFC 7234 §4.2.3.
//!
//! Every function takes its instants explicitly; `now` is supplied by the caller.

use super::directives::{http_date, http_delta_seconds};
use http::header::{AGE, DATE};
use http::HeaderMap;
use std::time::{Duration, SystemTime};

/// `Age` header as delta-seconds; zero when absent or malformed.
pub fn age_value(response_headers: &HeaderMap) -> Duration {
    http_delta_seconds(response_headers, &AGE).unwrap_or(Duration::ZERO)
}

/// `Date` header, `None` when missing or unparsable (a protocol violation, not an error).
pub fn date_value(response_headers: &HeaderMap) -> Option<SystemTime> {
    http_date(response_headers, &DATE)
}

/// `max(0, response_time - date_value)`; zero when `Date` is unknown.
pub fn apparent_age(response_headers: &HeaderMap, response_time: SystemTime) -> Duration {
    let Some(date) = date_value(response_headers) else {
        return Duration::ZERO;
    };
    response_time.duration_since(date).unwrap_or(Duration::ZERO)
}

pub fn response_delay(request_time: SystemTime, response_time: SystemTime) -> Duration {
    response_time
        .duration_since(request_time)
        .unwrap_or(Duration::ZERO)
}

pub fn corrected_age_value(
    response_headers: &HeaderMap,
    request_time: SystemTime,
    response_time: SystemTime,
) -> Duration {
    age_value(response_headers).saturating_add(response_delay(request_time, response_time))
}

pub fn corrected_initial_age(
    response_headers: &HeaderMap,
    request_time: SystemTime,
    response_time: SystemTime,
) -> Duration {
    apparent_age(response_headers, response_time).max(corrected_age_value(
        response_headers,
        request_time,
        response_time,
    ))
}

pub fn resident_time(response_time: SystemTime, now: SystemTime) -> Duration {
    now.duration_since(response_time).unwrap_or(Duration::ZERO)
}

pub fn current_age(
    response_headers: &HeaderMap,
    request_time: SystemTime,
    response_time: SystemTime,
    now: SystemTime,
) -> Duration {
    corrected_initial_age(response_headers, request_time, response_time)
        .saturating_add(resident_time(response_time, now))
}
