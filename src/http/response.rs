use super::RateLimitInfo;
use crate::error::Result;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::borrow::Cow;

/// A response whose body has been read to the end exactly once.
///
/// Every accessor works on the buffered copy, so a caller may look at the
/// bytes, then try one JSON shape and fall back to another.
#[derive(Debug, Clone)]
pub struct BufferedResponse {
    status: StatusCode,
    headers: HeaderMap,
    rate_limit: Option<RateLimitInfo>,
    body: Vec<u8>,
}

impl BufferedResponse {
    pub fn new(
        status: StatusCode,
        headers: HeaderMap,
        rate_limit: Option<RateLimitInfo>,
        body: Vec<u8>,
    ) -> Self {
        Self {
            status,
            headers,
            rate_limit,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn reason(&self) -> Option<&'static str> {
        self.status.canonical_reason()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }

    pub fn rate_limit(&self) -> Option<&RateLimitInfo> {
        self.rate_limit.as_ref()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Body as UTF-8; invalid sequences are replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }
}
