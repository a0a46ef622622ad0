use std::future::{ready, Ready};
use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::services::game_session::normalize_game_id;

/// Normalized `{game_id}` path segment.
///
/// Existence is not checked here; the session service reports unknown games.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameId(pub String);

impl Deref for GameId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl FromRequest for GameId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match req.match_info().get("game_id") {
            Some(raw) => normalize_game_id(raw).map(GameId).map_err(AppError::from),
            None => Err(AppError::bad_request(
                ErrorCode::InvalidGameId,
                "Missing game_id parameter",
            )),
        };
        ready(result)
    }
}
