use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use futures_util::stream;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::snapshot::{snapshot, ViewerRole};
use crate::error::AppError;
use crate::repos::games::GameRecord;
use crate::services::game_session::normalize_game_id;
use crate::state::app_state::AppState;
use crate::ws::hub::GameSubscription;
use crate::ws::protocol::{ClientMsg, ErrorCode, ServerMsg};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

/// A committed record delivered by the hub.
#[derive(Message)]
#[rtype(result = "()")]
struct GameUpdate(Arc<GameRecord>);

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let game_id = normalize_game_id(&path.into_inner()).map_err(AppError::from)?;

    // Subscribe before the initial load so no commit falls between the two.
    let subscription = app_state.hub().subscribe(&game_id);

    let session = WsSession::new(game_id, app_state, subscription);
    ws::start(session, &req, stream)
}

pub struct WsSession {
    conn_id: Uuid,
    game_id: String,
    app_state: web::Data<AppState>,
    view: ViewerRole,
    subscription: Option<GameSubscription>,
    latest: Option<Arc<GameRecord>>,

    last_heartbeat: Instant,
}

impl WsSession {
    fn new(game_id: String, app_state: web::Data<AppState>, subscription: GameSubscription) -> Self {
        Self {
            conn_id: Uuid::new_v4(),
            game_id,
            app_state,
            view: ViewerRole::default(),
            subscription: Some(subscription),
            latest: None,
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_error_and_close(
        &self,
        ctx: &mut ws::WebsocketContext<Self>,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        let msg = ServerMsg::Error {
            code,
            message: message.into(),
        };
        Self::send_json(ctx, &msg);
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    fn send_game_state(&self, ctx: &mut ws::WebsocketContext<Self>) {
        if let Some(record) = &self.latest {
            let game = snapshot(&record.id, record.version, &record.state, self.view);
            Self::send_json(
                ctx,
                &ServerMsg::GameState {
                    version: record.version,
                    game,
                },
            );
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    conn_id = %actor.conn_id,
                    game_id = %actor.game_id,
                    "[WS SESSION] heartbeat timeout; closing"
                );
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }

    /// Load the current record, send `ack` plus the first snapshot, then
    /// start forwarding hub updates.
    fn start_stream(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let app_state = self.app_state.clone();
        let game_id = self.game_id.clone();

        ctx.spawn(
            async move { app_state.sessions().load(&game_id).await }
                .into_actor(self)
                .map(|res, actor, ctx| match res {
                    Ok(record) => {
                        Self::send_json(ctx, &ServerMsg::Ack { message: "subscribed" });

                        let record = Arc::new(record);
                        actor.latest = Some(record.clone());
                        actor.send_game_state(ctx);

                        if let Some(mut subscription) = actor.subscription.take() {
                            subscription.mark_seen(record.version);
                            let updates = stream::unfold(subscription, |mut sub| async move {
                                sub.next().await.map(|record| (GameUpdate(record), sub))
                            });
                            ctx.add_stream(updates);
                        }
                    }
                    Err(err) => {
                        warn!(
                            conn_id = %actor.conn_id,
                            game_id = %actor.game_id,
                            error = %err,
                            "[WS SESSION] initial load failed"
                        );
                        let code = match err {
                            AppError::NotFound { .. } => ErrorCode::NotFound,
                            AppError::BadRequest { .. } | AppError::Validation { .. } => {
                                ErrorCode::BadRequest
                            }
                            _ => ErrorCode::Unavailable,
                        };
                        actor.subscription = None;
                        actor.send_error_and_close(ctx, code, err.to_string());
                    }
                }),
        );
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(
            conn_id = %self.conn_id,
            game_id = %self.game_id,
            "[WS SESSION] started"
        );
        self.start_heartbeat(ctx);
        self.start_stream(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!(
            conn_id = %self.conn_id,
            game_id = %self.game_id,
            "[WS SESSION] stopped"
        );
    }
}

impl StreamHandler<GameUpdate> for WsSession {
    fn handle(&mut self, GameUpdate(record): GameUpdate, ctx: &mut Self::Context) {
        // The subscription already filters stale versions; this guards the
        // window between the initial load and the first update.
        if self
            .latest
            .as_ref()
            .is_some_and(|latest| record.version <= latest.version)
        {
            return;
        }
        self.latest = Some(record);
        self.send_game_state(ctx);
    }

    fn finished(&mut self, ctx: &mut Self::Context) {
        warn!(
            conn_id = %self.conn_id,
            game_id = %self.game_id,
            "[WS SESSION] hub stream ended"
        );
        ctx.stop();
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();

                let parsed: Result<ClientMsg, _> = serde_json::from_str(&text);
                let Ok(cmd) = parsed else {
                    self.send_error_and_close(ctx, ErrorCode::BadRequest, "Malformed JSON");
                    return;
                };

                match cmd {
                    ClientMsg::SetView { role } => {
                        self.view = role;
                        Self::send_json(ctx, &ServerMsg::Ack { message: "view_set" });
                        self.send_game_state(ctx);
                    }
                    ClientMsg::Ping => {
                        Self::send_json(ctx, &ServerMsg::Pong);
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                self.send_error_and_close(ctx, ErrorCode::BadRequest, "Binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    game_id = %self.game_id,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}
