//! Stand-in for the remote API, used by integration tests and manual runs.
//!
//! Every route accepts POST. `/status/{code}` answers with the requested
//! status and echoes the request body back, which lets a test script any
//! status/body pair the executor has to classify. `/redirect` and
//! `/large/{bytes}` cover responses a transport must pass through untouched.

use std::{collections::BTreeMap, time::Duration};

use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use tokio::net::TcpListener;
use tracing::debug;

pub fn app() -> Router {
    Router::new()
        .route("/echo", post(echo))
        .route("/headers", post(headers))
        .route("/status/{code}", post(status))
        .route("/sleep/{ms}", post(sleep))
        .route("/redirect", post(redirect))
        .route("/large/{bytes}", post(large))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(body: Bytes) -> Bytes {
    debug!(bytes = body.len(), "echo");
    body
}

/// Received headers grouped by lowercase name, values in arrival order.
async fn headers(headers: HeaderMap) -> Json<BTreeMap<String, Vec<String>>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in &headers {
        grouped
            .entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    Json(grouped)
}

async fn status(Path(code): Path<u16>, body: Bytes) -> Result<(StatusCode, Bytes), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    debug!(%status, bytes = body.len(), "scripted status");
    Ok((status, body))
}

async fn sleep(Path(ms): Path<u64>) -> &'static str {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    "done"
}

/// 302 pointing at `/echo`; clients must not follow it.
async fn redirect() -> (StatusCode, [(header::HeaderName, &'static str); 1], &'static str) {
    (StatusCode::FOUND, [(header::LOCATION, "/echo")], "moved")
}

/// 200 with a body of `bytes` ASCII `a`s.
async fn large(Path(bytes): Path<usize>) -> Vec<u8> {
    vec![b'a'; bytes]
}
