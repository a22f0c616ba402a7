//! Synchronous POST executor with classified failures.
//!
//! # Design
//! `RequestExecutor` holds only its transport and carries no state between
//! calls. Each `execute` performs exactly one exchange and resolves to either
//! the raw body of a 200 response or a single `ClassifiedError`. Nothing is
//! retried; callers decide what to do with a failure.

use tracing::debug;

use crate::classify::{classify_response, classify_transport_error};
use crate::error::ClassifiedError;
use crate::http::HttpRequest;
use crate::transport::{Transport, TransportConfig, UreqTransport};

/// Sends caller-built requests and translates failures.
///
/// Headers and body are forwarded untouched; the executor never encodes,
/// signs or parses them.
#[derive(Clone, Default)]
pub struct RequestExecutor<T = UreqTransport> {
    transport: T,
}

impl RequestExecutor<UreqTransport> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TransportConfig) -> Self {
        Self::with_transport(UreqTransport::new(config))
    }
}

impl<T: Transport> RequestExecutor<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// POST `body` to `url` with `headers` and return the response body.
    ///
    /// Only status 200 counts as success. Blocks until the exchange completes
    /// or the transport's timeout fires.
    pub fn execute(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &[u8],
    ) -> Result<Vec<u8>, ClassifiedError> {
        self.send(&HttpRequest::post(url, headers, body))
    }

    /// Like `execute`, decoding the body as UTF-8 text (lossily).
    pub fn execute_text(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &[u8],
    ) -> Result<String, ClassifiedError> {
        let bytes = self.execute(url, headers, body)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn send(&self, request: &HttpRequest) -> Result<Vec<u8>, ClassifiedError> {
        debug!(url = %request.url, headers = request.headers.len(), "sending POST");

        let response = self.transport.post(request).map_err(|err| {
            let classified = classify_transport_error(&request.url, &err);
            debug!(url = %request.url, kind = ?classified.kind(), cause = %err.message, "transport failed");
            classified
        })?;

        let status = response.status;
        match classify_response(response) {
            Ok(body) => {
                debug!(url = %request.url, bytes = body.len(), "request succeeded");
                Ok(body)
            }
            Err(classified) => {
                debug!(url = %request.url, status, kind = ?classified.kind(), "request rejected");
                Err(classified)
            }
        }
    }
}
