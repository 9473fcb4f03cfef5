use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::{
    api::dto::*,
    config::Config,
    models::internal::QueryStats,
    orchestrator::{ChatError, ChatOrchestrator},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub orchestrator: Arc<ChatOrchestrator>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: u32::from(status.as_u16()),
        }),
    )
}

pub async fn submit_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<(StatusCode, Json<ChatResponse>), ApiError> {
    let user_id = match req.user_id {
        Some(id) => id,
        None => state.config.read().await.default_user_id.clone(),
    };

    let turn = state
        .orchestrator
        .submit(&user_id, &req.message)
        .await
        .map_err(|e| match e {
            ChatError::EmptyQuery => api_error(StatusCode::BAD_REQUEST, e.to_string()),
            ChatError::ResponsePending { .. } => api_error(StatusCode::CONFLICT, e.to_string()),
        })?;

    // The answer lands in the transcript on its own; clients poll for it
    Ok((
        StatusCode::ACCEPTED,
        Json(ChatResponse {
            message: turn.pending,
        }),
    ))
}

pub async fn get_transcript(State(state): State<AppState>) -> Json<TranscriptResponse> {
    Json(state.orchestrator.snapshot().await.into())
}

pub async fn transcript_stats(State(state): State<AppState>) -> Json<QueryStats> {
    Json(state.orchestrator.stats().await)
}

pub async fn list_demos(State(state): State<AppState>) -> Json<DemoListResponse> {
    Json(DemoListResponse {
        demos: state.orchestrator.demos(),
    })
}

/// Unknown or empty conversations are not an error; `started` is false.
pub async fn play_demo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<PlayResponse> {
    let started = state.orchestrator.start_demo(&id).await;
    let snapshot = state.orchestrator.snapshot().await;

    Json(PlayResponse {
        started,
        playback: PlaybackStatus::new(&snapshot.playback, snapshot.is_typing, snapshot.last_stop),
    })
}

pub async fn stop_demo(State(state): State<AppState>) -> Json<StopResponse> {
    Json(StopResponse {
        stopped: state.orchestrator.stop_demo().await,
    })
}

pub async fn playback_status(State(state): State<AppState>) -> Json<PlaybackStatus> {
    let snapshot = state.orchestrator.snapshot().await;
    Json(PlaybackStatus::new(
        &snapshot.playback,
        snapshot.is_typing,
        snapshot.last_stop,
    ))
}

pub async fn health() -> &'static str {
    "OK"
}

pub fn create_router(state: AppState, cors_enabled: bool) -> Router {
    let router = Router::new()
        .route("/api/v1/chat", post(submit_chat))
        .route("/api/v1/transcript", get(get_transcript))
        .route("/api/v1/transcript/stats", get(transcript_stats))
        .route("/api/v1/demos", get(list_demos))
        .route("/api/v1/demos/{id}/play", post(play_demo))
        .route("/api/v1/playback", get(playback_status))
        .route("/api/v1/playback/stop", post(stop_demo))
        .route("/health", get(health))
        .with_state(state);

    if cors_enabled {
        router.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
    } else {
        router.layer(TraceLayer::new_for_http())
    }
}
