use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::broadcast;

use crate::models::internal::{ChatMessage, QueryStats, QueryTypeCount};

const EVENT_CAPACITY: usize = 256;
const TOP_QUERY_TYPES: usize = 5;

/// A mutation applied to the transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TranscriptEvent {
    Appended { id: String },
    Completed { id: String },
    Cleared,
}

/// Append-only list of turns shown to the user.
///
/// The only mutations are append, fill-in-response by id, and clear. Each
/// one is published to subscribers in the order it was applied.
#[derive(Debug)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    events: broadcast::Sender<TranscriptEvent>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            messages: Vec::new(),
            events,
        }
    }

    pub fn with_history(history: Vec<ChatMessage>) -> Self {
        let mut transcript = Self::new();
        transcript.messages = history;
        transcript
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TranscriptEvent> {
        self.events.subscribe()
    }

    pub fn append(&mut self, message: ChatMessage) {
        let id = message.id.clone();
        self.messages.push(message);
        self.publish(TranscriptEvent::Appended { id });
    }

    /// Fill in the response of the pending turn `id`.
    ///
    /// Returns false, and changes nothing, when no pending turn has that id.
    pub fn complete(
        &mut self,
        id: &str,
        response: impl Into<String>,
        query_type: impl Into<String>,
        processing_time: f64,
    ) -> bool {
        let Some(message) = self
            .messages
            .iter_mut()
            .find(|m| m.id == id && m.is_pending())
        else {
            return false;
        };

        message.response = response.into();
        message.query_type = query_type.into();
        message.processing_time = processing_time;
        message.is_successful = true;
        self.publish(TranscriptEvent::Completed { id: id.to_string() });
        true
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.publish(TranscriptEvent::Cleared);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn get(&self, id: &str) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Up to `limit` turns, newest first.
    pub fn recent(&self, limit: usize) -> Vec<&ChatMessage> {
        self.messages.iter().rev().take(limit).collect()
    }

    pub fn by_user(&self, user_id: &str) -> Vec<&ChatMessage> {
        self.messages
            .iter()
            .filter(|m| m.user_id == user_id)
            .collect()
    }

    pub fn stats(&self) -> QueryStats {
        let answered: Vec<&ChatMessage> = self.messages.iter().filter(|m| m.is_successful).collect();

        let average_response_time = if answered.is_empty() {
            0.0
        } else {
            answered.iter().map(|m| m.processing_time).sum::<f64>() / answered.len() as f64
        };

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for message in &answered {
            *counts.entry(message.query_type.as_str()).or_default() += 1;
        }
        let mut top_query_types: Vec<QueryTypeCount> = counts
            .into_iter()
            .map(|(query_type, count)| QueryTypeCount {
                query_type: query_type.to_string(),
                count,
            })
            .collect();
        top_query_types.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.query_type.cmp(&b.query_type))
        });
        top_query_types.truncate(TOP_QUERY_TYPES);

        QueryStats {
            total_queries: self.messages.len(),
            successful_queries: answered.len(),
            average_response_time,
            top_query_types,
        }
    }

    fn publish(&self, event: TranscriptEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
