//! HTTP interface to the session manager.
//!
//! JSON endpoints for creating, joining, and playing sessions, plus a
//! server-sent events stream of accepted moves per session.

use crate::config::ServerConfig;
use crate::session::{
    Participant, ParticipantId, SessionError, SessionId, SessionManager, SessionSnapshot,
    SyncEvent,
};
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use strictly_checkers::{Color, IllegalReason, Move, Square};
use tokio::sync::broadcast::error::RecvError;
use tower::ServiceBuilder;
use tracing::{debug, info, instrument, warn};

/// Request for creating a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// Desired session ID; generated when absent.
    #[serde(default)]
    pub session_id: Option<SessionId>,
}

/// Response for a created session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    /// ID of the new session.
    pub session_id: SessionId,
}

/// Request for joining a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    /// Display name.
    pub name: String,
}

/// Request for proposing a move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Proposer's token, as returned by join.
    pub participant_id: ParticipantId,
    /// Color the proposer claims to move for.
    pub color: Color,
    /// Source square as `[row, col]`.
    pub from: Square,
    /// Destination square as `[row, col]`.
    pub to: Square,
}

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
    /// Rule that rejected the move, for illegal moves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<IllegalReason>,
}

/// Session error rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(SessionError);

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, reason) = match &self.0 {
            SessionError::NotFound(_) => (StatusCode::NOT_FOUND, None),
            SessionError::AlreadyExists(_) | SessionError::SessionFull(_) => {
                (StatusCode::CONFLICT, None)
            }
            SessionError::UnknownParticipant | SessionError::NotAuthorized { .. } => {
                (StatusCode::FORBIDDEN, None)
            }
            SessionError::Illegal(reason) => (StatusCode::UNPROCESSABLE_ENTITY, Some(*reason)),
            SessionError::OutOfBounds(_) => (StatusCode::BAD_REQUEST, None),
            SessionError::Transition(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };
        let error = match reason {
            Some(reason) => format!("{}: {}", self.0, reason.describe()),
            None => self.0.to_string(),
        };
        (status, Json(ErrorBody { error, reason })).into_response()
    }
}

/// Builds the application router over a shared session manager.
pub fn router(sessions: SessionManager) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/sessions", get(list_sessions).post(create_session))
        .route("/sessions/{id}", get(get_session).delete(end_session))
        .route("/sessions/{id}/join", post(join_session))
        .route("/sessions/{id}/moves", post(submit_move))
        .route("/sessions/{id}/events", get(session_events))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(sessions)
}

async fn health() -> &'static str {
    "ok"
}

#[instrument(skip(sessions))]
async fn list_sessions(State(sessions): State<SessionManager>) -> Json<Vec<SessionId>> {
    Json(sessions.list_sessions())
}

#[instrument(skip(sessions))]
async fn create_session(
    State(sessions): State<SessionManager>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), ApiError> {
    let session_id = sessions.create_session(req.session_id)?;
    Ok((StatusCode::CREATED, Json(CreateSessionResponse { session_id })))
}

#[instrument(skip(sessions))]
async fn get_session(
    State(sessions): State<SessionManager>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(sessions.snapshot(&id)?))
}

#[instrument(skip(sessions))]
async fn end_session(
    State(sessions): State<SessionManager>,
    Path(id): Path<SessionId>,
) -> Result<StatusCode, ApiError> {
    sessions.end_session(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(sessions))]
async fn join_session(
    State(sessions): State<SessionManager>,
    Path(id): Path<SessionId>,
    Json(req): Json<JoinRequest>,
) -> Result<Json<Participant>, ApiError> {
    Ok(Json(sessions.join(&id, req.name)?))
}

#[instrument(skip(sessions, req))]
async fn submit_move(
    State(sessions): State<SessionManager>,
    Path(id): Path<SessionId>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<SyncEvent>, ApiError> {
    let mv = Move::new(req.from, req.to);
    let event = sessions.submit_move(&id, &req.participant_id, req.color, mv)?;
    Ok(Json(event))
}

#[instrument(skip(sessions))]
async fn session_events(
    State(sessions): State<SessionManager>,
    Path(id): Path<SessionId>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let receiver = sessions.subscribe(&id)?;
    info!(session_id = %id, "Subscriber attached");

    let stream = futures::stream::unfold(receiver, |mut receiver| async move {
        let event = match receiver.recv().await {
            Ok(sync) => Event::default()
                .event("move")
                .id(sync.version.to_string())
                .json_data(&sync)
                .unwrap_or_else(|e| Event::default().comment(format!("unserializable event: {}", e))),
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Subscriber lagged; it must refetch the snapshot");
                Event::default().event("lagged").data(skipped.to_string())
            }
            Err(RecvError::Closed) => return None,
        };
        Some((Ok(event), receiver))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Runs the HTTP server until ctrl-c.
#[instrument(skip(config), fields(host = %config.host(), port = config.port()))]
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let sessions = SessionManager::new(*config.rules(), *config.event_buffer())
        .with_max_spectators(*config.max_spectators());
    let app = router(sessions);

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!("Server ready at http://{}:{}/", config.host(), config.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
