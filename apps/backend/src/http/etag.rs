//! ETag helpers for optimistic concurrency control.
//!
//! A game's ETag names its id and lock version, so `If-Match` carries the
//! version a client last saw and `If-None-Match` lets polling clients skip
//! unchanged snapshots.

use actix_web::http::header::{HeaderMap, IF_MATCH, IF_NONE_MATCH};

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Generate an ETag for a game resource.
///
/// Format: `"game-{id}-v{version}"` (quoted, per RFC 9110)
pub fn game_etag(id: &str, version: i32) -> String {
    format!(r#""game-{id}-v{version}""#)
}

/// Parse the lock version from a game ETag value.
///
/// The version follows the last `-v`, so ids containing `-v` still parse.
pub fn parse_game_version_from_etag(s: &str) -> Result<i32, AppError> {
    let s = s.trim().trim_start_matches("W/").trim_matches('"');

    let version_prefix = "-v";
    let version_start = s
        .strip_prefix("game-")
        .and_then(|_| s.rfind(version_prefix))
        .ok_or_else(|| {
            AppError::bad_request(
                ErrorCode::InvalidHeader,
                format!("Invalid ETag format: expected \"game-{{id}}-v{{version}}\", got: \"{s}\""),
            )
        })?
        + version_prefix.len();

    let version_str = &s[version_start..];
    version_str.parse::<i32>().map_err(|_| {
        AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!("Invalid ETag format: version must be a valid integer, got: \"{version_str}\""),
        )
    })
}

/// Version required by an `If-Match` header, if one was sent. `*` matches any.
pub fn if_match_version(headers: &HeaderMap) -> Result<Option<i32>, AppError> {
    let Some(value) = headers.get(IF_MATCH) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| {
        AppError::bad_request(ErrorCode::InvalidHeader, "If-Match must be visible ASCII")
    })?;
    if value.trim() == "*" {
        return Ok(None);
    }
    parse_game_version_from_etag(value).map(Some)
}

/// True when `If-None-Match` lists `etag` (or is `*`).
pub fn if_none_match_hits(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get(IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| {
            v.split(',')
                .map(|tag| tag.trim().trim_start_matches("W/"))
                .any(|tag| tag == "*" || tag == etag)
        })
}
