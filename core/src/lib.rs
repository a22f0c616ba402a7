//! Blocking POST gateway for a single remote API.
//!
//! # Overview
//! `RequestExecutor` sends a caller-built request (URL, headers, already
//! encoded body) and returns either the raw body of a 200 response or a
//! `ClassifiedError`. Failures fall into two branches: the transport could not
//! complete the exchange, or the remote answered with a status other than 200.
//!
//! # Design
//! - The executor is stateless; each call is one exchange with no retry.
//! - `Transport` isolates network I/O so classification can be exercised with
//!   test doubles; `UreqTransport` is the production implementation.
//! - `classify` holds the pure mapping functions from transport error codes
//!   and HTTP responses to `ClassifiedError`.
//! - Credentials, request signing and parameter encoding belong to callers.

pub mod classify;
pub mod error;
pub mod executor;
pub mod http;
pub mod transport;

pub use classify::{classify_response, classify_transport_error, try_decode, RemoteErrorBody};
pub use error::{ClassifiedError, ErrorKind};
pub use executor::RequestExecutor;
pub use http::{HttpRequest, HttpResponse};
pub use transport::{Transport, TransportConfig, TransportError, TransportErrorCode, UreqTransport};
