use actix_web::http::header::{ETAG, LOCATION};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::clue_adapter::ClueWarning;
use crate::domain::game_transition::GameTransition;
use crate::domain::snapshot::{snapshot, GameSnapshot, ViewerRole};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{GameId, ValidatedJson};
use crate::http::etag::{game_etag, if_match_version, if_none_match_hits};
use crate::repos::games::GameRecord;
use crate::services::game_session::MutationOutcome;
use crate::state::app_state::AppState;

#[derive(Debug, Default, Deserialize)]
struct ViewQuery {
    view: Option<String>,
}

impl ViewQuery {
    fn role(&self) -> Result<ViewerRole, AppError> {
        match &self.view {
            None => Ok(ViewerRole::default()),
            Some(raw) => raw
                .parse::<ViewerRole>()
                .map_err(|e: String| AppError::bad_request(ErrorCode::BadRequest, e)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RevealRequest {
    index: usize,
}

#[derive(Debug, Deserialize)]
struct ClueRequestBody {
    word: String,
    count: i64,
}

#[derive(Debug, Serialize)]
struct WarningBody {
    code: ClueWarning,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ActionResponse {
    game: GameSnapshot,
    transitions: Vec<GameTransition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<WarningBody>,
}

fn render(record: &GameRecord, view: ViewerRole) -> GameSnapshot {
    snapshot(&record.id, record.version, &record.state, view)
}

fn snapshot_response(status: StatusCode, record: &GameRecord, view: ViewerRole) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header((ETAG, game_etag(&record.id, record.version)))
        .json(render(record, view))
}

fn action_response(outcome: MutationOutcome, view: ViewerRole) -> HttpResponse {
    let etag = game_etag(&outcome.record.id, outcome.record.version);
    let body = ActionResponse {
        game: render(&outcome.record, view),
        transitions: outcome.transitions,
        warning: outcome.warning.map(|code| WarningBody {
            code,
            message: code.message(),
        }),
    };
    HttpResponse::Ok().insert_header((ETAG, etag)).json(body)
}

/// POST /api/games
async fn create_game(
    query: web::Query<ViewQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = query.role()?;
    let record = app_state.sessions().create_game().await?;
    let mut response = snapshot_response(StatusCode::CREATED, &record, view);
    if let Ok(location) = format!("/api/games/{}", record.id).parse() {
        response.headers_mut().insert(LOCATION, location);
    }
    Ok(response)
}

/// PUT /api/games/{game_id}
async fn create_or_join(
    game_id: GameId,
    query: web::Query<ViewQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = query.role()?;
    let record = app_state.sessions().create_or_join(&game_id).await?;
    Ok(snapshot_response(StatusCode::OK, &record, view))
}

/// GET /api/games/{game_id}
async fn get_game(
    http_req: HttpRequest,
    game_id: GameId,
    query: web::Query<ViewQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = query.role()?;
    let record = app_state.sessions().load(&game_id).await?;

    let etag = game_etag(&record.id, record.version);
    if if_none_match_hits(http_req.headers(), &etag) {
        return Ok(HttpResponse::build(StatusCode::NOT_MODIFIED)
            .insert_header((ETAG, etag))
            .finish());
    }

    Ok(snapshot_response(StatusCode::OK, &record, view))
}

/// POST /api/games/{game_id}/reveal
async fn reveal(
    http_req: HttpRequest,
    game_id: GameId,
    query: web::Query<ViewQuery>,
    body: ValidatedJson<RevealRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = query.role()?;
    let expected = if_match_version(http_req.headers())?;
    let outcome = app_state
        .sessions()
        .reveal(&game_id, body.index, expected)
        .await?;
    Ok(action_response(outcome, view))
}

/// POST /api/games/{game_id}/clue
async fn submit_clue(
    http_req: HttpRequest,
    game_id: GameId,
    query: web::Query<ViewQuery>,
    body: ValidatedJson<ClueRequestBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = query.role()?;
    let expected = if_match_version(http_req.headers())?;
    let body = body.into_inner();
    let outcome = app_state
        .sessions()
        .submit_clue(&game_id, &body.word, body.count, expected)
        .await?;
    Ok(action_response(outcome, view))
}

/// POST /api/games/{game_id}/clue/generate
async fn generate_clue(
    http_req: HttpRequest,
    game_id: GameId,
    query: web::Query<ViewQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = query.role()?;
    if let Some(expected) = if_match_version(http_req.headers())? {
        let current = app_state.sessions().load(&game_id).await?;
        if current.version != expected {
            return Err(AppError::conflict(
                ErrorCode::OptimisticLock,
                format!(
                    "Game lock version mismatch: expected {}, but game has version {}",
                    expected, current.version
                ),
            ));
        }
    }
    let outcome = app_state.sessions().request_clue(&game_id).await?;
    Ok(action_response(outcome, view))
}

/// POST /api/games/{game_id}/end-turn
async fn end_turn(
    http_req: HttpRequest,
    game_id: GameId,
    query: web::Query<ViewQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = query.role()?;
    let expected = if_match_version(http_req.headers())?;
    let outcome = app_state.sessions().end_turn(&game_id, expected).await?;
    Ok(action_response(outcome, view))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::post().to(create_game)))
        .service(
            web::resource("/{game_id}")
                .route(web::get().to(get_game))
                .route(web::put().to(create_or_join)),
        )
        .service(web::resource("/{game_id}/reveal").route(web::post().to(reveal)))
        .service(web::resource("/{game_id}/clue").route(web::post().to(submit_clue)))
        .service(web::resource("/{game_id}/clue/generate").route(web::post().to(generate_clue)))
        .service(web::resource("/{game_id}/end-turn").route(web::post().to(end_turn)));
}
