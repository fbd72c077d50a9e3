//! ChatMessage entity - one item in a room's message log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::RoomId;

/// What a chat log entry represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Regular chat text
    Message,
    /// System entry announcing a purchase
    Purchase,
    /// System entry announcing a viewer joining
    Join,
}

/// Chat message entity
///
/// Immutable once created; uniquely identified by `id`; ordered by
/// `created_at` ascending within a room's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub room_id: RoomId,
    pub author: String,
    pub body: String,
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new regular message
    pub fn new(room_id: RoomId, author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_id,
            author: author.into(),
            body: body.into(),
            kind: MessageKind::Message,
            created_at: Utc::now(),
        }
    }

}
