//! HTTP exchange types passed across the transport seam.
//!
//! # Design
//! Requests and responses are plain data. The executor never inspects header
//! semantics or body encoding; it forwards what the caller built and hands
//! back what the remote returned. All fields use owned types so values can be
//! moved into a transport or a test double without lifetime concerns.

use std::borrow::Cow;

/// A POST request described as plain data.
///
/// Headers keep caller order and may repeat a name. The body is already in the
/// wire format the remote API expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn post(url: &str, headers: &[(String, String)], body: &[u8]) -> Self {
        Self {
            url: url.to_string(),
            headers: headers.to_vec(),
            body: body.to_vec(),
        }
    }
}

/// An HTTP response described as plain data.
///
/// Produced by a `Transport` whenever the exchange completed, regardless of
/// the status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// The body as text, replacing invalid UTF-8 sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
