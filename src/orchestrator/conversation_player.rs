use std::sync::Arc;

use tracing::{debug, info};

use crate::data::conversations::ConversationSource;
use crate::models::internal::{ChatMessage, DemoConversation};
use crate::orchestrator::session::{PlaybackState, SharedSession, StopReason};
use crate::services::latency::PlaybackTiming;

/// Replays demo conversations into a session's transcript with simulated
/// pacing.
///
/// At most one playback chain is alive per session. Starting a conversation
/// cancels the previous chain before anything new is scheduled, and every
/// scripted mutation re-checks the session generation under the lock.
pub struct ConversationPlayer {
    source: Arc<dyn ConversationSource>,
    session: SharedSession,
    timing: PlaybackTiming,
}

impl ConversationPlayer {
    pub fn new(
        source: Arc<dyn ConversationSource>,
        session: SharedSession,
        timing: PlaybackTiming,
    ) -> Self {
        Self {
            source,
            session,
            timing,
        }
    }

    pub fn timing(&self) -> PlaybackTiming {
        self.timing
    }

    pub fn source(&self) -> &Arc<dyn ConversationSource> {
        &self.source
    }

    /// Begin replaying `conversation_id` from its first turn.
    ///
    /// Unknown or empty conversations leave the session untouched and return
    /// false.
    pub async fn start(&self, conversation_id: &str) -> bool {
        let Some(conversation) = self
            .source
            .get(conversation_id)
            .filter(|c| !c.turns.is_empty())
        else {
            debug!(conversation_id, "Ignoring playback request for unknown or empty conversation");
            return false;
        };

        let mut session = self.session.lock().await;
        if session.cancel_playback(StopReason::Restarted) {
            info!(conversation_id, "Cancelled running playback to start a new one");
        }

        session.transcript.clear();
        session.generation += 1;
        let generation = session.generation;
        let total = conversation.turns.len();

        session.set_playback(PlaybackState::Playing {
            conversation_id: conversation.id.clone(),
            index: 0,
            total,
            typing: false,
        });
        session.last_stop = None;

        // The task blocks on the session lock until this guard drops, so the
        // handle is always stored before the first turn runs.
        let task = tokio::spawn(run_playback(
            self.session.clone(),
            conversation,
            generation,
            self.timing,
        ));
        session.task = Some(task);

        info!(conversation_id, generation, total, "Playback started");
        true
    }

    /// Cancel the running playback. Already-appended turns stay. Returns
    /// false when nothing was playing.
    pub async fn stop(&self) -> bool {
        let mut session = self.session.lock().await;
        let stopped = session.cancel_playback(StopReason::Cancelled);
        if stopped {
            info!(generation = session.generation, "Playback stopped");
        }
        stopped
    }
}

async fn run_playback(
    shared: SharedSession,
    conversation: Arc<DemoConversation>,
    generation: u64,
    timing: PlaybackTiming,
) {
    let total = conversation.turns.len();

    for (index, turn) in conversation.turns.iter().enumerate() {
        let message_id = format!("replay{}-{}", generation, turn.id);

        {
            let mut session = shared.lock().await;
            if session.generation != generation {
                return;
            }
            session
                .transcript
                .append(ChatMessage::pending(&message_id, &turn.user_id, &turn.message));
            session.set_playback(PlaybackState::Playing {
                conversation_id: conversation.id.clone(),
                index,
                total,
                typing: true,
            });
        }

        tokio::time::sleep(timing.reveal.sample()).await;

        {
            let mut session = shared.lock().await;
            if session.generation != generation {
                return;
            }
            session.transcript.complete(
                &message_id,
                &turn.response,
                &turn.query_type,
                turn.processing_time,
            );
            session.set_playback(PlaybackState::Playing {
                conversation_id: conversation.id.clone(),
                index,
                total,
                typing: false,
            });
            debug!(turn = %turn.id, index, total, "Revealed scripted response");
        }

        if index + 1 < total {
            tokio::time::sleep(timing.advance).await;
        }
    }

    let mut session = shared.lock().await;
    if session.generation != generation {
        return;
    }
    session.set_playback(PlaybackState::Idle);
    session.last_stop = Some(StopReason::Completed);
    session.task = None;
    info!(conversation_id = %conversation.id, generation, "Playback completed");
}
