//! One structured log line per completed request.
//!
//! Level follows the status class: 5xx at error, 4xx at warn, the rest at
//! info. Requests against a game carry its `game_id` so a game's history can
//! be pulled out of the logs.

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use crate::middleware::request_trace::TraceId;

pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

struct RequestLine {
    method: String,
    path: String,
    game_id: Option<String>,
    trace_id: String,
    started: Instant,
}

impl RequestLine {
    fn emit(&self, status: StatusCode) {
        let status_code = status.as_u16();
        let duration_us = self.started.elapsed().as_micros() as u64;
        let game_id = self.game_id.as_deref().unwrap_or("-");

        if status.is_server_error() {
            error!(http.method = %self.method, url.path = %self.path, http.status_code = status_code, duration_us, game_id, trace_id = %self.trace_id, "request_completed");
        } else if status.is_client_error() {
            warn!(http.method = %self.method, url.path = %self.path, http.status_code = status_code, duration_us, game_id, trace_id = %self.trace_id, "request_completed");
        } else {
            info!(http.method = %self.method, url.path = %self.path, http.status_code = status_code, duration_us, game_id, trace_id = %self.trace_id, "request_completed");
        }
    }
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let line = RequestLine {
            method: req.method().to_string(),
            path: req.path().to_string(),
            game_id: game_id_from_path(req.path()),
            trace_id: req
                .extensions()
                .get::<TraceId>()
                .map(|t| t.0.clone())
                .unwrap_or_else(|| "unknown".to_string()),
            started: Instant::now(),
        };

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;
            let status = match &result {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            line.emit(status);
            result
        })
    }
}

/// The segment after `/games/` in game and realtime routes. Route matching
/// has not happened yet when the logger runs, so this reads the raw path.
fn game_id_from_path(path: &str) -> Option<String> {
    let (_, rest) = path.split_once("/games/")?;
    let id = rest.split('/').next()?;
    (!id.is_empty()).then(|| id.to_ascii_lowercase())
}
