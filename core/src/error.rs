//! Error types returned by `RequestExecutor`.
//!
//! # Design
//! Every failed call produces exactly one `ClassifiedError`. Callers either
//! propagate it unchanged (its `Display` is the human-readable message) or
//! branch on `kind()` to tell connectivity problems apart from errors the
//! remote API reported itself.

use thiserror::Error;

/// Failure classes a single call can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The connection could not be established or the host did not resolve.
    ConnectionFailure,

    /// The transport gave up waiting for the remote.
    Timeout,

    /// The server certificate or its CA chain could not be verified.
    TlsVerificationFailure,

    /// Any other transport failure, including an unset error code.
    UnexpectedTransportError,

    /// A non-200 response whose body carried a structured `message`.
    RemoteApiError,

    /// A non-200 response without a usable structured message.
    UnexpectedHttpStatus,
}

impl ErrorKind {
    /// True when no HTTP response was obtained at all.
    pub fn is_transport(self) -> bool {
        matches!(
            self,
            ErrorKind::ConnectionFailure
                | ErrorKind::Timeout
                | ErrorKind::TlsVerificationFailure
                | ErrorKind::UnexpectedTransportError
        )
    }
}

/// A failure classified by kind, with the message shown to users.
///
/// `code` carries the underlying numeric transport error when one was
/// reported; it is absent for HTTP-status failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ClassifiedError {
    kind: ErrorKind,
    message: String,
    code: Option<i32>,
}

impl ClassifiedError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, code: Option<i32>) -> Self {
        Self {
            kind,
            message: message.into(),
            code,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }
}
