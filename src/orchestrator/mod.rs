pub mod conversation_player;
pub mod formatting;
pub mod intent_resolver;
pub mod session;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::data::conversations::ConversationSource;
use crate::models::internal::{ChatMessage, DemoConversationSummary, QueryStats};
use crate::services::latency::{LatencyProfile, PlaybackTiming};
use crate::services::transcript::{Transcript, TranscriptEvent};

pub use conversation_player::ConversationPlayer;
pub use intent_resolver::{Intent, IntentResolver, Resolution};
pub use session::{PlaybackState, SessionState, SharedSession, StopReason};

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Query is empty")]
    EmptyQuery,
    #[error("A response is still pending for message {id}")]
    ResponsePending { id: String },
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub messages: Vec<ChatMessage>,
    pub is_typing: bool,
    pub playback: PlaybackState,
    pub progress: f64,
    pub last_stop: Option<StopReason>,
}

/// A live query that has been accepted and is waiting for its answer.
#[derive(Debug)]
pub struct LiveTurn {
    pub pending: ChatMessage,
    handle: JoinHandle<Option<ChatMessage>>,
}

impl LiveTurn {
    /// Wait for the response. `None` when the turn left the transcript before
    /// its answer landed (a demo cleared it).
    pub async fn completed(self) -> Option<ChatMessage> {
        self.handle.await.ok().flatten()
    }
}

/// One chat session: live questions answered by the intent resolver and
/// scripted demo playback, both writing to the same transcript.
pub struct ChatOrchestrator {
    session: SharedSession,
    resolver: Arc<IntentResolver>,
    player: ConversationPlayer,
    live_latency: LatencyProfile,
}

impl ChatOrchestrator {
    pub fn new(
        resolver: IntentResolver,
        source: Arc<dyn ConversationSource>,
        timing: PlaybackTiming,
        live_latency: LatencyProfile,
        transcript: Transcript,
    ) -> Self {
        let session = SessionState::shared(transcript);
        Self {
            player: ConversationPlayer::new(source, session.clone(), timing),
            session,
            resolver: Arc::new(resolver),
            live_latency,
        }
    }

    pub fn resolver(&self) -> &IntentResolver {
        &self.resolver
    }

    pub fn player(&self) -> &ConversationPlayer {
        &self.player
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Accept a live question and answer it after the simulated latency.
    ///
    /// A running demo is abandoned first. Only one live answer may be
    /// outstanding; a second submission is rejected until it lands.
    pub async fn submit(&self, user_id: &str, query: &str) -> Result<LiveTurn, ChatError> {
        if query.trim().is_empty() {
            return Err(ChatError::EmptyQuery);
        }

        let mut session = self.session.lock().await;
        if let Some(id) = session.pending_live() {
            warn!(pending = id, "Rejected live query while another is pending");
            return Err(ChatError::ResponsePending { id: id.to_string() });
        }
        if session.cancel_playback(StopReason::Preempted) {
            info!("Live query preempted demo playback");
        }

        let pending = ChatMessage::pending(Uuid::new_v4().to_string(), user_id, query);
        session.transcript.append(pending.clone());
        session.pending_live = Some(pending.id.clone());
        drop(session);

        info!(message_id = %pending.id, user_id, "Live query accepted");

        let handle = tokio::spawn(answer_live(
            self.session.clone(),
            self.resolver.clone(),
            self.live_latency,
            pending.id.clone(),
            query.to_string(),
        ));

        Ok(LiveTurn { pending, handle })
    }

    pub async fn start_demo(&self, conversation_id: &str) -> bool {
        self.player.start(conversation_id).await
    }

    pub async fn stop_demo(&self) -> bool {
        self.player.stop().await
    }

    pub fn demos(&self) -> Vec<DemoConversationSummary> {
        self.player.source().list()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let session = self.session.lock().await;
        let playback = session.playback();
        SessionSnapshot {
            messages: session.transcript().messages().to_vec(),
            is_typing: session.is_typing(),
            progress: playback.progress(),
            playback,
            last_stop: session.last_stop(),
        }
    }

    pub async fn stats(&self) -> QueryStats {
        self.session.lock().await.transcript().stats()
    }

    pub async fn subscribe_transcript(&self) -> broadcast::Receiver<TranscriptEvent> {
        self.session.lock().await.transcript().subscribe()
    }

    pub async fn subscribe_playback(&self) -> watch::Receiver<PlaybackState> {
        self.session.lock().await.subscribe_playback()
    }

    /// Returns once no demo is playing, with the reason the last one ended.
    pub async fn wait_for_idle(&self) -> Option<StopReason> {
        let mut rx = self.subscribe_playback().await;
        // Sender lives as long as the session, so this only errs on teardown
        let _ = rx.wait_for(PlaybackState::is_idle).await;
        self.session.lock().await.last_stop()
    }
}

async fn answer_live(
    shared: SharedSession,
    resolver: Arc<IntentResolver>,
    latency: LatencyProfile,
    message_id: String,
    query: String,
) -> Option<ChatMessage> {
    let started = Instant::now();
    tokio::time::sleep(latency.sample()).await;

    let resolution = resolver.resolve(&query);
    let processing_time = started.elapsed().as_secs_f64();

    let mut session = shared.lock().await;
    let landed = session.transcript.complete(
        &message_id,
        resolution.response,
        resolution.intent.query_type(),
        processing_time,
    );
    if session.pending_live.as_deref() == Some(message_id.as_str()) {
        session.pending_live = None;
    }

    if landed {
        info!(
            message_id = %message_id,
            intent = resolution.intent.query_type(),
            processing_time,
            "Live query answered"
        );
    } else {
        warn!(message_id = %message_id, "Live answer dropped; turn no longer in transcript");
    }

    session.transcript().get(&message_id).cloned()
}
