//! Trace id of the request being handled, reachable without threading it
//! through every call.
//!
//! `TraceSpan` opens the scope for each HTTP request; `AppError` and the
//! database error mapper read it to stamp `x-trace-id` and log lines. Code
//! running outside a request (startup, WebSocket actors, spawned clue tasks)
//! sees `"unknown"`.

use tokio::task_local;

const UNKNOWN: &str = "unknown";

task_local! {
    static TRACE_ID: String;
}

pub fn trace_id() -> String {
    TRACE_ID
        .try_with(String::clone)
        .unwrap_or_else(|_| UNKNOWN.to_string())
}

/// Run `future` with `trace_id` as the current trace id.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}
