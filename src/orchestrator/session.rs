use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::services::transcript::Transcript;

pub type SharedSession = Arc<Mutex<SessionState>>;

/// Where scripted playback currently is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Playing {
        conversation_id: String,
        /// 0-based turn in progress.
        index: usize,
        total: usize,
        /// A response is about to be revealed.
        typing: bool,
    },
}

impl PlaybackState {
    pub fn is_idle(&self) -> bool {
        matches!(self, PlaybackState::Idle)
    }

    /// (index + 1) / total * 100 while playing, 0 when idle.
    pub fn progress(&self) -> f64 {
        match self {
            PlaybackState::Idle => 0.0,
            PlaybackState::Playing { index, total, .. } if *total > 0 => {
                (*index as f64 + 1.0) / *total as f64 * 100.0
            }
            PlaybackState::Playing { .. } => 0.0,
        }
    }
}

/// Why the last playback ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Completed,
    Cancelled,
    /// Replaced by another conversation.
    Restarted,
    /// Interrupted by a live query.
    Preempted,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            StopReason::Completed => "playback completed",
            StopReason::Cancelled => "playback stopped",
            StopReason::Restarted => "playback replaced by another conversation",
            StopReason::Preempted => "playback interrupted by a live query",
        };
        f.write_str(text)
    }
}

/// Everything one chat session owns: its transcript and playback bookkeeping.
///
/// Scripted turns only mutate the transcript while `generation` still equals
/// the value captured when their playback started; cancelling bumps it.
#[derive(Debug)]
pub struct SessionState {
    pub(crate) transcript: Transcript,
    pub(crate) playback: watch::Sender<PlaybackState>,
    pub(crate) generation: u64,
    pub(crate) task: Option<JoinHandle<()>>,
    pub(crate) pending_live: Option<String>,
    pub(crate) last_stop: Option<StopReason>,
}

impl SessionState {
    pub fn new(transcript: Transcript) -> Self {
        let (playback, _) = watch::channel(PlaybackState::Idle);
        Self {
            transcript,
            playback,
            generation: 0,
            task: None,
            pending_live: None,
            last_stop: None,
        }
    }

    pub fn shared(transcript: Transcript) -> SharedSession {
        Arc::new(Mutex::new(Self::new(transcript)))
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback.borrow().clone()
    }

    pub fn subscribe_playback(&self) -> watch::Receiver<PlaybackState> {
        self.playback.subscribe()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending_live(&self) -> Option<&str> {
        self.pending_live.as_deref()
    }

    pub fn last_stop(&self) -> Option<StopReason> {
        self.last_stop
    }

    /// A response is pending, scripted or live.
    pub fn is_typing(&self) -> bool {
        let scripted = matches!(
            *self.playback.borrow(),
            PlaybackState::Playing { typing: true, .. }
        );
        scripted || self.pending_live.is_some()
    }

    pub(crate) fn set_playback(&self, state: PlaybackState) {
        self.playback.send_replace(state);
    }

    /// Invalidate the running playback chain, if any. Transcript contents are
    /// kept as they are.
    pub(crate) fn cancel_playback(&mut self, reason: StopReason) -> bool {
        if self.playback.borrow().is_idle() {
            return false;
        }
        self.generation += 1;
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.set_playback(PlaybackState::Idle);
        self.last_stop = Some(reason);
        true
    }
}
