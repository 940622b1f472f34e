use super::directives::{CacheControl, Directive};
use http::header::{AUTHORIZATION, EXPIRES};
use http::{HeaderMap, Method, StatusCode};

/// Status codes this cache understands (RFC 7234 §3).
pub fn code_understood(status: StatusCode) -> bool {
    matches!(
        status.as_u16(),
        100 | 101
            | 200..=206
            | 300..=305
            | 307
            | 308
            | 400..=417
            | 421
            | 426
            | 428
            | 429
            | 431
            | 500..=505
            | 511
    )
}

fn cacheable_by_default(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::OK
            | StatusCode::NON_AUTHORITATIVE_INFORMATION
            | StatusCode::NO_CONTENT
            | StatusCode::PARTIAL_CONTENT
            | StatusCode::MULTIPLE_CHOICES
            | StatusCode::MOVED_PERMANENTLY
            | StatusCode::PERMANENT_REDIRECT
            | StatusCode::NOT_FOUND
            | StatusCode::METHOD_NOT_ALLOWED
            | StatusCode::GONE
            | StatusCode::URI_TOO_LONG
            | StatusCode::NOT_IMPLEMENTED
    )
}

/// RFC 7234 §3: whether a shared cache may store this response at all.
pub fn can_store(
    request_method: &Method,
    request_headers: &HeaderMap,
    request_cc: &CacheControl,
    status: StatusCode,
    response_headers: &HeaderMap,
    response_cc: &CacheControl,
) -> bool {
    if request_method != Method::GET && request_method != Method::HEAD {
        return false;
    }
    if !code_understood(status) {
        return false;
    }
    if request_cc.contains(&Directive::NoStore) || response_cc.contains(&Directive::NoStore) {
        return false;
    }
    if response_cc.contains(&Directive::Private) {
        return false;
    }
    if request_headers.contains_key(AUTHORIZATION)
        && !(response_cc.contains(&Directive::Public)
            || response_cc.contains(&Directive::SMaxAge)
            || response_cc.contains(&Directive::MustRevalidate)
            || response_cc.contains(&Directive::ProxyRevalidate))
    {
        return false;
    }
    response_headers.contains_key(EXPIRES)
        || response_cc.contains(&Directive::MaxAge)
        || response_cc.contains(&Directive::SMaxAge)
        || response_cc.contains(&Directive::Public)
        || cacheable_by_default(status)
}
