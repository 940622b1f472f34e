//! JSON fixtures describing a stored response and an incoming request.

use super::types::{CacheRequest, StoredResponse};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::SystemTime;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoredFixture {
    #[serde(default)]
    pub request_headers: Vec<(String, String)>,
    #[serde(default)]
    pub response_headers: Vec<(String, String)>,
    /// HTTP-date the originating request was sent.
    pub request_time: String,
    /// HTTP-date the response was received.
    pub response_time: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestFixture {
    #[serde(default)]
    pub headers: Vec<(String, String)>,
}

impl StoredFixture {
    pub fn into_stored(self) -> Result<StoredResponse> {
        let request_time = parse_instant(&self.request_time).context("stored.request_time")?;
        let response_time = parse_instant(&self.response_time).context("stored.response_time")?;
        Ok(StoredResponse::new(
            header_map_from_vec(&self.request_headers).context("stored.request_headers")?,
            header_map_from_vec(&self.response_headers).context("stored.response_headers")?,
            request_time,
            response_time,
        ))
    }
}

impl RequestFixture {
    pub fn into_request(self) -> Result<CacheRequest> {
        let headers = header_map_from_vec(&self.headers).context("request.headers")?;
        Ok(CacheRequest::from_headers(headers))
    }
}

pub fn load_stored(path: &Path) -> Result<StoredResponse> {
    let raw = std::fs::read(path)
        .with_context(|| format!("failed to read stored fixture: {}", path.display()))?;
    let fixture: StoredFixture = serde_json::from_slice(&raw)
        .with_context(|| format!("invalid stored fixture: {}", path.display()))?;
    fixture.into_stored()
}

pub fn load_request(path: &Path) -> Result<CacheRequest> {
    let raw = std::fs::read(path)
        .with_context(|| format!("failed to read request fixture: {}", path.display()))?;
    let fixture: RequestFixture = serde_json::from_slice(&raw)
        .with_context(|| format!("invalid request fixture: {}", path.display()))?;
    fixture.into_request()
}

pub fn parse_instant(raw: &str) -> Result<SystemTime> {
    httpdate::parse_http_date(raw.trim())
        .map_err(|err| anyhow!("invalid HTTP-date {raw:?}: {err}"))
}

pub fn header_map_from_vec(headers: &[(String, String)]) -> Result<http::HeaderMap> {
    let mut out = http::HeaderMap::new();
    for (name, value) in headers {
        let header_name = http::HeaderName::from_bytes(name.as_bytes())
            .with_context(|| format!("invalid header name {name:?}"))?;
        let header_value = http::HeaderValue::from_str(value)
            .with_context(|| format!("invalid value for header {name}"))?;
        out.append(header_name, header_value);
    }
    Ok(out)
}
