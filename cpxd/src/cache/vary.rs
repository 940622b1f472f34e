use http::header::VARY;
use http::HeaderMap;

/// RFC 7234 §4.1 selected-header check.
///
/// Reads the first `Vary` field of the stored response. `*` never matches; otherwise each
/// listed field must have been present on the request that produced the stored response.
/// Field values are not compared, and the headers of the request being served are not
/// consulted, so the outcome does not depend on the compliance mode.
pub fn selected_headers_match(
    stored_response_headers: &HeaderMap,
    stored_request_headers: &HeaderMap,
) -> bool {
    let Some(vary) = stored_response_headers.get(VARY) else {
        return true;
    };
    let Ok(vary) = vary.to_str() else {
        return false;
    };
    let vary = vary.trim();
    if vary == "*" {
        return false;
    }
    vary.split(',')
        .map(|name| name.trim().to_ascii_lowercase())
        .filter(|name| !name.is_empty())
        .all(|name| {
            if name == "*" {
                return false;
            }
            stored_request_headers.contains_key(name.as_str())
        })
}
