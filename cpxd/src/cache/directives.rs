use http::header::{HeaderName, CACHE_CONTROL, PRAGMA};
use http::HeaderMap;
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, SystemTime};

/// A `Cache-Control` directive token. Unrecognized tokens are kept verbatim (lowercased)
/// so they can be forwarded untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Directive {
    MaxAge,
    SMaxAge,
    MinFresh,
    MaxStale,
    NoCache,
    NoStore,
    NoTransform,
    MustRevalidate,
    ProxyRevalidate,
    Public,
    Private,
    OnlyIfCached,
    StaleWhileRevalidate,
    StaleIfError,
    Extension(String),
}

impl Directive {
    pub fn from_token(token: &str) -> Self {
        let token = token.trim().to_ascii_lowercase();
        match token.as_str() {
            "max-age" => Directive::MaxAge,
            "s-maxage" => Directive::SMaxAge,
            "min-fresh" => Directive::MinFresh,
            "max-stale" => Directive::MaxStale,
            "no-cache" => Directive::NoCache,
            "no-store" => Directive::NoStore,
            "no-transform" => Directive::NoTransform,
            "must-revalidate" => Directive::MustRevalidate,
            "proxy-revalidate" => Directive::ProxyRevalidate,
            "public" => Directive::Public,
            "private" => Directive::Private,
            "only-if-cached" => Directive::OnlyIfCached,
            "stale-while-revalidate" => Directive::StaleWhileRevalidate,
            "stale-if-error" => Directive::StaleIfError,
            _ => Directive::Extension(token),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Directive::MaxAge => "max-age",
            Directive::SMaxAge => "s-maxage",
            Directive::MinFresh => "min-fresh",
            Directive::MaxStale => "max-stale",
            Directive::NoCache => "no-cache",
            Directive::NoStore => "no-store",
            Directive::NoTransform => "no-transform",
            Directive::MustRevalidate => "must-revalidate",
            Directive::ProxyRevalidate => "proxy-revalidate",
            Directive::Public => "public",
            Directive::Private => "private",
            Directive::OnlyIfCached => "only-if-cached",
            Directive::StaleWhileRevalidate => "stale-while-revalidate",
            Directive::StaleIfError => "stale-if-error",
            Directive::Extension(token) => token.as_str(),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directive set of one message. Presence is the primary signal; the argument is the
/// empty string for directives sent without `=value`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheControl {
    directives: HashMap<Directive, String>,
}

impl CacheControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, directive: Directive, value: impl Into<String>) {
        self.directives.insert(directive, value.into());
    }

    pub fn get(&self, directive: &Directive) -> Option<&str> {
        self.directives.get(directive).map(String::as_str)
    }

    pub fn contains(&self, directive: &Directive) -> bool {
        self.directives.contains_key(directive)
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Directive, &str)> {
        self.directives.iter().map(|(k, v)| (k, v.as_str()))
    }
}

impl FromIterator<(Directive, String)> for CacheControl {
    fn from_iter<I: IntoIterator<Item = (Directive, String)>>(iter: I) -> Self {
        Self {
            directives: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for CacheControl {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(name, value)| (Directive::from_token(name), value.to_string()))
            .collect()
    }
}

/// Tokenizes every `Cache-Control` field of `headers` into a directive set.
/// Later occurrences of a directive replace earlier ones.
pub fn parse_cache_control(headers: &HeaderMap) -> CacheControl {
    let mut out = CacheControl::new();
    for value in headers.get_all(CACHE_CONTROL) {
        let Ok(value) = value.to_str() else {
            continue;
        };
        for token in split_cache_control_tokens(value) {
            let Some((name, value)) = parse_cache_control_directive(token.as_str()) else {
                continue;
            };
            out.insert(Directive::from_token(name.as_str()), value);
        }
    }
    out
}

fn split_cache_control_tokens(value: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;
    for ch in value.chars() {
        if in_quotes {
            current.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_quotes = false;
            }
            continue;
        }
        match ch {
            '"' => {
                in_quotes = true;
                current.push(ch);
            }
            ',' => {
                let token = current.trim();
                if !token.is_empty() {
                    out.push(token.to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    let token = current.trim();
    if !token.is_empty() {
        out.push(token.to_string());
    }
    out
}

fn parse_cache_control_directive(token: &str) -> Option<(String, String)> {
    let (name, value) = match token.split_once('=') {
        Some((name, value)) => (name.trim(), unquote(value.trim())),
        None => (token.trim(), String::new()),
    };
    if name.is_empty() {
        return None;
    }
    Some((name.to_ascii_lowercase(), value))
}

fn unquote(value: &str) -> String {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return value.to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
            continue;
        }
        out.push(ch);
    }
    out
}

/// RFC 7234 §1.2.1 delta-seconds: ASCII digits only, no sign, no fraction.
fn parse_delta_seconds(raw: &str) -> Option<Duration> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u64>().ok().map(Duration::from_secs)
}

/// Delta-seconds from the first value of header `name`. Missing and malformed both yield `None`.
pub fn http_delta_seconds(headers: &HeaderMap, name: &HeaderName) -> Option<Duration> {
    let raw = headers.get(name)?.to_str().ok()?;
    parse_delta_seconds(raw.trim())
}

/// Delta-seconds argument of `directive`. Missing and malformed both yield `None`.
pub fn http_delta_seconds_cc(cc: &CacheControl, directive: &Directive) -> Option<Duration> {
    parse_delta_seconds(cc.get(directive)?)
}

/// First value of header `name` parsed as an HTTP-date (IMF-fixdate, RFC 850 or asctime).
pub fn http_date(headers: &HeaderMap, name: &HeaderName) -> Option<SystemTime> {
    let raw = headers.get(name)?.to_str().ok()?;
    httpdate::parse_http_date(raw.trim()).ok()
}

/// RFC 7234 §5.4: `Pragma: no-cache` counts only as the first pragma of the first field,
/// and only when the request carries no `Cache-Control` at all.
pub fn has_pragma_no_cache(request_headers: &HeaderMap) -> bool {
    if request_headers.contains_key(CACHE_CONTROL) {
        return false;
    }
    let Some(pragma) = request_headers.get(PRAGMA).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    pragma
        .split(',')
        .next()
        .is_some_and(|first| first.trim().eq_ignore_ascii_case("no-cache"))
}
