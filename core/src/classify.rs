//! Pure mapping from transport failures and HTTP responses to `ClassifiedError`.

use serde_json::{Map, Value};

use crate::error::{ClassifiedError, ErrorKind};
use crate::http::HttpResponse;
use crate::transport::{TransportError, TransportErrorCode};

/// The only status treated as success. Other 2xx codes are failures.
pub const SUCCESS_STATUS: u16 = 200;

/// Structured error payload returned by the remote API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteErrorBody {
    pub message: String,
}

/// Decode `body` as a JSON object that has a `message` field.
///
/// Only objects qualify. Scalar messages are rendered as text: strings as is,
/// numbers and booleans in their printed form (`true` as `1`, `false` as
/// empty), `null` as empty. Nested values keep their JSON text.
pub fn try_decode(body: &[u8]) -> Option<RemoteErrorBody> {
    let object: Map<String, Value> = serde_json::from_slice(body).ok()?;
    let message = match object.get("message")? {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null => String::new(),
        nested => nested.to_string(),
    };
    Some(RemoteErrorBody { message })
}

/// Map a failed exchange to the error reported for `url`.
pub fn classify_transport_error(url: &str, err: &TransportError) -> ClassifiedError {
    let (kind, message) = match err.code {
        TransportErrorCode::CouldNotConnect | TransportErrorCode::CouldNotResolveHost => {
            (ErrorKind::ConnectionFailure, connect_message(url))
        }
        TransportErrorCode::OperationTimedOut => (ErrorKind::Timeout, connect_message(url)),
        TransportErrorCode::CaCertificate | TransportErrorCode::PeerCertificate => (
            ErrorKind::TlsVerificationFailure,
            "Could not verify AWS SSL certificate".to_string(),
        ),
        TransportErrorCode::Unset | TransportErrorCode::Other => (
            ErrorKind::UnexpectedTransportError,
            format!("Unexpected error communicating with AWS. {}", err.message),
        ),
    };
    ClassifiedError::new(kind, message, err.os_code)
}

fn connect_message(url: &str) -> String {
    format!("Could not connect to AWS ({url}).  Please check your internet connection and try again.")
}

/// Return the body of a 200 response, or classify any other status.
///
/// A completed exchange reports no transport error code, so `code()` is
/// always `None` on this path.
pub fn classify_response(response: HttpResponse) -> Result<Vec<u8>, ClassifiedError> {
    if response.status == SUCCESS_STATUS {
        return Ok(response.body);
    }
    let err = match try_decode(&response.body) {
        Some(remote) => ClassifiedError::new(
            ErrorKind::RemoteApiError,
            format!("AWS error: {}(HTTP {})", remote.message, response.status),
            None,
        ),
        None => ClassifiedError::new(
            ErrorKind::UnexpectedHttpStatus,
            format!(
                "Unexpected HTTP code: {} with response: {}",
                response.status,
                response.text()
            ),
            None,
        ),
    };
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://agcod-v2.amazon.com/CreateGiftCard";

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn resolve_failure_is_connection_failure_naming_url() {
        let err = classify_transport_error(
            URL,
            &TransportError::new(TransportErrorCode::CouldNotResolveHost, "dns"),
        );
        assert_eq!(err.kind(), ErrorKind::ConnectionFailure);
        assert_eq!(
            err.message(),
            "Could not connect to AWS (https://agcod-v2.amazon.com/CreateGiftCard).  \
             Please check your internet connection and try again."
        );
    }

    #[test]
    fn connect_failure_is_connection_failure() {
        let err = classify_transport_error(
            URL,
            &TransportError::new(TransportErrorCode::CouldNotConnect, "refused"),
        );
        assert_eq!(err.kind(), ErrorKind::ConnectionFailure);
        assert!(err.message().contains(URL));
    }

    #[test]
    fn timeout_keeps_connect_message() {
        let err = classify_transport_error(
            URL,
            &TransportError::new(TransportErrorCode::OperationTimedOut, "timed out"),
        );
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(err.message().starts_with("Could not connect to AWS ("));
    }

    #[test]
    fn certificate_failures_share_one_message() {
        for code in [TransportErrorCode::CaCertificate, TransportErrorCode::PeerCertificate] {
            let err = classify_transport_error(URL, &TransportError::new(code, "bad cert"));
            assert_eq!(err.kind(), ErrorKind::TlsVerificationFailure);
            assert_eq!(err.message(), "Could not verify AWS SSL certificate");
        }
    }

    #[test]
    fn unset_and_other_codes_append_transport_message() {
        for code in [TransportErrorCode::Unset, TransportErrorCode::Other] {
            let err = classify_transport_error(URL, &TransportError::new(code, "protocol error"));
            assert_eq!(err.kind(), ErrorKind::UnexpectedTransportError);
            assert_eq!(
                err.message(),
                "Unexpected error communicating with AWS. protocol error"
            );
        }
    }

    #[test]
    fn transport_os_code_is_carried() {
        let err = classify_transport_error(
            URL,
            &TransportError {
                code: TransportErrorCode::CouldNotConnect,
                os_code: Some(111),
                message: "refused".to_string(),
            },
        );
        assert_eq!(err.code(), Some(111));
    }

    #[test]
    fn status_200_returns_body_unchanged() {
        let body = classify_response(response(200, r#"{"gcClaimCode":"ABCD"}"#)).unwrap();
        assert_eq!(body, br#"{"gcClaimCode":"ABCD"}"#);
    }

    #[test]
    fn other_2xx_statuses_are_failures() {
        for status in [201, 202, 204, 299] {
            let err = classify_response(response(status, "")).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnexpectedHttpStatus, "status {status}");
        }
    }

    #[test]
    fn structured_message_is_remote_api_error() {
        let err = classify_response(response(400, r#"{"message":"InvalidParameterValue"}"#))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteApiError);
        assert_eq!(err.message(), "AWS error: InvalidParameterValue(HTTP 400)");
        assert_eq!(err.code(), None);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let body = r#"{"errorCode":"F100","errorType":"InsufficientFunds","message":"Insufficient funds"}"#;
        let err = classify_response(response(400, body)).unwrap_err();
        assert_eq!(err.message(), "AWS error: Insufficient funds(HTTP 400)");
    }

    #[test]
    fn plain_text_body_is_unexpected_status() {
        let err = classify_response(response(500, "Internal Server Error")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedHttpStatus);
        assert_eq!(
            err.message(),
            "Unexpected HTTP code: 500 with response: Internal Server Error"
        );
    }

    #[test]
    fn json_without_message_is_unexpected_status() {
        let err = classify_response(response(403, r#"{"Message":"denied"}"#)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedHttpStatus);
        assert_eq!(
            err.message(),
            r#"Unexpected HTTP code: 403 with response: {"Message":"denied"}"#
        );
    }

    #[test]
    fn array_body_is_unexpected_status() {
        let err = classify_response(response(429, r#"["slow down"]"#)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedHttpStatus);
        assert_eq!(
            err.message(),
            r#"Unexpected HTTP code: 429 with response: ["slow down"]"#
        );
    }

    #[test]
    fn scalar_messages_are_rendered_as_text() {
        let cases = [
            (r#"{"message":42}"#, "AWS error: 42(HTTP 400)"),
            (r#"{"message":1.5}"#, "AWS error: 1.5(HTTP 400)"),
            (r#"{"message":null}"#, "AWS error: (HTTP 400)"),
            (r#"{"message":true}"#, "AWS error: 1(HTTP 400)"),
            (r#"{"message":false}"#, "AWS error: (HTTP 400)"),
        ];
        for (body, expected) in cases {
            let err = classify_response(response(400, body)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::RemoteApiError, "{body}");
            assert_eq!(err.message(), expected, "{body}");
        }
    }

    #[test]
    fn try_decode_rejects_non_objects() {
        assert_eq!(try_decode(b"\"message\""), None);
        assert_eq!(try_decode(b"[]"), None);
        assert_eq!(try_decode(br#"["message"]"#), None);
        assert_eq!(try_decode(b"{}"), None);
        assert_eq!(try_decode(b""), None);
        assert_eq!(
            try_decode(br#"{"message":"x"}"#),
            Some(RemoteErrorBody {
                message: "x".to_string()
            })
        );
    }
}
