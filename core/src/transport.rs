//! The network seam: one synchronous POST per call.
//!
//! # Design
//! `Transport` is the only place that touches the network. A transport
//! reports every completed exchange as an `HttpResponse`, whatever its status,
//! and reports an exchange that produced no response as a `TransportError`
//! carrying a `TransportErrorCode`. Classification into user-facing errors
//! happens later in `classify`, so the mapping stays testable with synthetic
//! codes.
//!
//! `UreqTransport` is the production implementation. Idle connections are
//! not kept, so each call owns its connection and drops it on every exit path.

use std::io;
use std::time::Duration;

use crate::http::{HttpRequest, HttpResponse};

/// Executes a single POST and returns the raw exchange.
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// What went wrong below HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportErrorCode {
    /// The transport failed without reporting a reason.
    #[default]
    Unset,
    CouldNotConnect,
    CouldNotResolveHost,
    OperationTimedOut,
    /// The certificate chain does not lead to a trusted CA.
    CaCertificate,
    /// The peer certificate itself was rejected (expired, wrong name, ...).
    PeerCertificate,
    Other,
}

/// A failed exchange: no HTTP response was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransportError {
    pub code: TransportErrorCode,
    /// OS error number, when the failure surfaced as an I/O error.
    pub os_code: Option<i32>,
    pub message: String,
}

impl TransportError {
    pub fn new(code: TransportErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            os_code: None,
            message: message.into(),
        }
    }
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        let message = err.to_string();
        let (code, os_code) = match &err {
            ureq::Error::HostNotFound => (TransportErrorCode::CouldNotResolveHost, None),
            ureq::Error::ConnectionFailed => (TransportErrorCode::CouldNotConnect, None),
            ureq::Error::Timeout(_) => (TransportErrorCode::OperationTimedOut, None),
            ureq::Error::Rustls(tls) => (tls_code(tls), None),
            ureq::Error::Io(io_err) => (io_code(io_err), io_err.raw_os_error()),
            _ => (TransportErrorCode::Other, None),
        };
        Self {
            code,
            os_code,
            message,
        }
    }
}

fn tls_code(err: &rustls::Error) -> TransportErrorCode {
    match err {
        rustls::Error::InvalidCertificate(rustls::CertificateError::UnknownIssuer) => {
            TransportErrorCode::CaCertificate
        }
        rustls::Error::InvalidCertificate(_) => TransportErrorCode::PeerCertificate,
        _ => TransportErrorCode::Other,
    }
}

fn io_code(err: &io::Error) -> TransportErrorCode {
    // rustls reports handshake failures through the stream as wrapped io errors.
    if let Some(tls) = err.get_ref().and_then(|inner| inner.downcast_ref::<rustls::Error>()) {
        return tls_code(tls);
    }
    match err.kind() {
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::NotConnected
        | io::ErrorKind::AddrNotAvailable => TransportErrorCode::CouldNotConnect,
        io::ErrorKind::TimedOut => TransportErrorCode::OperationTimedOut,
        // getaddrinfo failures carry no dedicated kind; std formats them with
        // this prefix (unchanged from Rust 1.0 through 1.85).
        _ if err.to_string().starts_with("failed to lookup address information") => {
            TransportErrorCode::CouldNotResolveHost
        }
        _ => TransportErrorCode::Other,
    }
}

/// Settings for `UreqTransport`.
///
/// `timeout` bounds the whole exchange; `None` leaves ureq's defaults in
/// place. `user_agent` is sent only when the caller's headers carry none.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

/// `Transport` backed by a blocking `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    user_agent: Option<String>,
}

impl UreqTransport {
    pub fn new(config: TransportConfig) -> Self {
        // Status codes, 3xx included, are data here; classification decides
        // what is an error.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .max_idle_connections(0)
            .timeout_global(config.timeout)
            .build()
            .new_agent();
        Self {
            agent,
            user_agent: config.user_agent,
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(TransportConfig::default())
    }
}

impl Transport for UreqTransport {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.agent.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(user_agent) = &self.user_agent {
            let has_user_agent = request
                .headers
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case("user-agent"));
            if !has_user_agent {
                builder = builder.header("user-agent", user_agent.as_str());
            }
        }

        let mut response = builder.send(request.body.as_slice())?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()?;

        Ok(HttpResponse { status, body })
    }
}
