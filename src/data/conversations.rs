use std::collections::HashMap;
use std::sync::Arc;

use crate::models::internal::{ChatMessage, DemoConversation, DemoConversationSummary};

const BUILTIN_CONVERSATIONS: &str = include_str!("demo_conversations.json");
const BUILTIN_HISTORY: &str = include_str!("chat_history.json");

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Failed to parse demo conversations: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate demo conversation id: {0}")]
    DuplicateId(String),
}

/// Lookup of prerecorded demo conversations by identifier.
pub trait ConversationSource: Send + Sync {
    /// The named conversation, or `None` when nothing is registered under `id`.
    fn get(&self, id: &str) -> Option<Arc<DemoConversation>>;

    /// Summaries in registration order.
    fn list(&self) -> Vec<DemoConversationSummary>;
}

/// In-memory registry, immutable once built.
#[derive(Debug, Default)]
pub struct ConversationRegistry {
    order: Vec<Arc<DemoConversation>>,
    by_id: HashMap<String, Arc<DemoConversation>>,
}

impl ConversationRegistry {
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_json(BUILTIN_CONVERSATIONS)
    }

    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let conversations: Vec<DemoConversation> = serde_json::from_str(json)?;
        Self::new(conversations)
    }

    pub fn new(conversations: Vec<DemoConversation>) -> Result<Self, RegistryError> {
        let mut registry = Self::default();
        for conv in conversations {
            if registry.by_id.contains_key(&conv.id) {
                return Err(RegistryError::DuplicateId(conv.id));
            }
            let conv = Arc::new(conv);
            registry.by_id.insert(conv.id.clone(), conv.clone());
            registry.order.push(conv);
        }
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl ConversationSource for ConversationRegistry {
    fn get(&self, id: &str) -> Option<Arc<DemoConversation>> {
        self.by_id.get(id).cloned()
    }

    fn list(&self) -> Vec<DemoConversationSummary> {
        self.order.iter().map(|c| c.summary()).collect()
    }
}

/// Previously answered queries a session can be seeded with.
pub fn builtin_chat_history() -> Result<Vec<ChatMessage>, RegistryError> {
    #[derive(serde::Deserialize)]
    struct HistoryEntry {
        id: String,
        user_id: String,
        message: String,
        response: String,
        timestamp: chrono::DateTime<chrono::Utc>,
        query_type: String,
        processing_time: f64,
    }

    let entries: Vec<HistoryEntry> = serde_json::from_str(BUILTIN_HISTORY)?;
    Ok(entries
        .into_iter()
        .map(|e| ChatMessage {
            id: e.id,
            user_id: e.user_id,
            message: e.message,
            response: e.response,
            timestamp: e.timestamp,
            query_type: e.query_type,
            processing_time: e.processing_time,
            is_successful: true,
        })
        .collect())
}
