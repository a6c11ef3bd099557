use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use rand::Rng;
use std::fmt::Write;
use std::time::Instant;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

pub const TRACE_ID_HEADER: &str = "X-Trace-Id";

/// Filter used when `RUST_LOG` is unset or empty.
pub const DEFAULT_LOG_DIRECTIVES: &str =
    "linemon_server=info,linemon_alert=info,linemon_quality=info,linemon_collector=info";

/// Builds the subscriber filter. A non-empty `rust_log` replaces the
/// defaults entirely.
pub fn build_env_filter(rust_log: Option<&str>) -> Result<EnvFilter, ParseError> {
    match rust_log.map(str::trim) {
        Some(directives) if !directives.is_empty() => EnvFilter::try_new(directives),
        _ => EnvFilter::try_new(DEFAULT_LOG_DIRECTIVES),
    }
}

/// Maximum number of bytes of a JSON response body written to the log.
const MAX_BODY_LOG_BYTES: usize = 200;

/// Per-request trace id, stored in request extensions for handlers.
#[derive(Clone)]
pub struct TraceId(pub String);

impl std::ops::Deref for TraceId {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

/// 16 hex characters from 8 random bytes.
pub fn generate_trace_id() -> String {
    let bytes: [u8; 8] = rand::thread_rng().gen();
    let mut s = String::with_capacity(16);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

fn snippet(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) if s.len() > MAX_BODY_LOG_BYTES => {
            let mut end = MAX_BODY_LOG_BYTES;
            while !s.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &s[..end])
        }
        Ok(s) => s.to_string(),
        Err(_) => "<non-utf8 body>".to_string(),
    }
}

pub fn format_elapsed(elapsed_us: u128) -> String {
    if elapsed_us < 1000 {
        format!("{elapsed_us}µs")
    } else if elapsed_us < 1_000_000 {
        format!("{}ms", elapsed_us / 1000)
    } else {
        format!("{:.1}s", elapsed_us as f64 / 1_000_000.0)
    }
}

/// Logs every request and its response, and tags both with a trace id.
///
/// The id is inserted as a [`TraceId`] extension before the handler runs and
/// returned to the client in the `X-Trace-Id` header. Response bodies are
/// only logged for error statuses.
pub async fn request_logging(mut req: Request, next: Next) -> Response {
    let trace_id = generate_trace_id();
    req.extensions_mut().insert(TraceId(trace_id.clone()));

    let method = req.method().clone();
    let url = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    tracing::info!(
        trace_id = %trace_id,
        method = %method,
        path = %url,
        "--> request"
    );

    let start = Instant::now();
    let response = next.run(req).await;
    let elapsed = format_elapsed(start.elapsed().as_micros());
    let status = response.status();
    let status_code = status.as_u16();

    let mut response = if status.is_client_error() || status.is_server_error() {
        let (parts, body) = response.into_parts();
        let is_json = parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));
        let body_bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .unwrap_or_default();
        let body_snippet = if is_json {
            snippet(&body_bytes)
        } else {
            String::new()
        };

        if status.is_server_error() {
            tracing::error!(
                trace_id = %trace_id,
                status = status_code,
                elapsed = %elapsed,
                body = %body_snippet,
                "<-- response"
            );
        } else {
            tracing::warn!(
                trace_id = %trace_id,
                status = status_code,
                elapsed = %elapsed,
                body = %body_snippet,
                "<-- response"
            );
        }
        Response::from_parts(parts, Body::from(body_bytes))
    } else {
        tracing::info!(
            trace_id = %trace_id,
            status = status_code,
            elapsed = %elapsed,
            "<-- response"
        );
        response
    };

    if let Ok(val) = HeaderValue::from_str(&trace_id) {
        response.headers_mut().insert(TRACE_ID_HEADER, val);
    }
    response
}
