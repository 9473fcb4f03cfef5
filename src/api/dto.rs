use serde::{Deserialize, Serialize};

use crate::models::internal::{ChatMessage, DemoConversationSummary};
use crate::orchestrator::{PlaybackState, SessionSnapshot, StopReason};

// ==================== REQUEST DTOs ====================

#[derive(Debug, Deserialize, Serialize)]
pub struct ChatRequest {
    pub message: String,
    /// Falls back to the configured default user
    pub user_id: Option<String>,
}

// ==================== RESPONSE DTOs ====================

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: ChatMessage,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub messages: Vec<ChatMessage>,
    pub is_typing: bool,
    pub playback: PlaybackStatus,
}

impl From<SessionSnapshot> for TranscriptResponse {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            playback: PlaybackStatus::new(
                &snapshot.playback,
                snapshot.is_typing,
                snapshot.last_stop,
            ),
            messages: snapshot.messages,
            is_typing: snapshot.is_typing,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PlaybackStatus {
    pub state: String,
    pub conversation_id: Option<String>,
    pub index: usize,
    pub total: usize,
    pub progress: f64,
    pub is_typing: bool,
    pub last_stop: Option<StopReason>,
}

impl PlaybackStatus {
    pub fn new(state: &PlaybackState, is_typing: bool, last_stop: Option<StopReason>) -> Self {
        match state {
            PlaybackState::Idle => Self {
                state: "idle".to_string(),
                conversation_id: None,
                index: 0,
                total: 0,
                progress: 0.0,
                is_typing,
                last_stop,
            },
            PlaybackState::Playing {
                conversation_id,
                index,
                total,
                ..
            } => Self {
                state: "playing".to_string(),
                conversation_id: Some(conversation_id.clone()),
                index: *index,
                total: *total,
                progress: state.progress(),
                is_typing,
                last_stop,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DemoListResponse {
    pub demos: Vec<DemoConversationSummary>,
}

#[derive(Debug, Serialize)]
pub struct PlayResponse {
    pub started: bool,
    pub playback: PlaybackStatus,
}

#[derive(Debug, Serialize)]
pub struct StopResponse {
    pub stopped: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u32,
}
