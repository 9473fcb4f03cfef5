//! FinAssist - a financial chat assistant that answers questions from an
//! embedded dataset and replays scripted demo conversations.

pub mod api;
pub mod config;
pub mod data;
pub mod models;
pub mod orchestrator;
pub mod services;

// Re-export main types for convenience
pub use crate::api::dto::*;
pub use crate::api::routes::{create_router, AppState};
pub use crate::config::Config;
pub use crate::data::{ConversationRegistry, ConversationSource, FinancialDataset};
pub use crate::models::internal::{ChatMessage, DemoConversation, DemoTurn};
pub use crate::orchestrator::{
    ChatError, ChatOrchestrator, ConversationPlayer, Intent, IntentResolver, PlaybackState,
    StopReason,
};
pub use crate::services::{LatencyProfile, PlaybackTiming, Transcript, TranscriptEvent};
