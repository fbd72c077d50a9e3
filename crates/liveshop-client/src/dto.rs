//! Wire DTOs and mappers for the collaborator endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use liveshop_core::{ChatMessage, ChatPage, Cursor, MessageKind, PaymentStatus, RoomId};

// ============================================================================
// Chat
// ============================================================================

/// One chat item as the backend serializes it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatItemDto {
    pub id: Uuid,
    pub room_id: String,
    pub author: String,
    pub body: String,
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
}

impl From<ChatItemDto> for ChatMessage {
    fn from(dto: ChatItemDto) -> Self {
        Self {
            id: dto.id,
            room_id: RoomId::new(dto.room_id),
            author: dto.author,
            body: dto.body,
            kind: dto.kind,
            created_at: dto.created_at,
        }
    }
}

impl From<&ChatMessage> for ChatItemDto {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            id: msg.id,
            room_id: msg.room_id.as_str().to_string(),
            author: msg.author.clone(),
            body: msg.body.clone(),
            kind: msg.kind,
            created_at: msg.created_at,
        }
    }
}

/// `GET /chat` response body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatFetchResponse {
    pub items: Vec<ChatItemDto>,
    #[serde(default)]
    pub last_cursor: Option<DateTime<Utc>>,
}

impl From<ChatFetchResponse> for ChatPage {
    fn from(response: ChatFetchResponse) -> Self {
        Self {
            items: response.items.into_iter().map(ChatMessage::from).collect(),
            last_cursor: response.last_cursor.map(Cursor::at),
        }
    }
}

/// `POST /chat` request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSendRequest {
    pub room_id: String,
    pub author: String,
    pub body: String,
}

/// `POST /chat` response body
#[derive(Debug, Clone, Deserialize)]
pub struct ChatSendResponse {
    pub item: ChatItemDto,
}

// ============================================================================
// Payment
// ============================================================================

/// `POST /payments` request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInitiateRequest {
    pub amount: i64,
    pub recipient: String,
    pub metadata: PaymentMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMetadata {
    pub product_id: String,
    pub buyer: String,
}

/// `POST /payments` response body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInitiateResponse {
    pub payment_id: String,
}

/// `GET /payments/status` response body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusResponse {
    pub status: String,
    #[serde(default)]
    pub tx_id: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl From<PaymentStatusResponse> for PaymentStatus {
    fn from(response: PaymentStatusResponse) -> Self {
        match response.status.as_str() {
            "pending" => Self::Pending,
            "completed" => Self::Completed {
                tx_id: response.tx_id.unwrap_or_default(),
            },
            "failed" => Self::Failed {
                reason: response
                    .reason
                    .unwrap_or_else(|| "payment failed".to_string()),
            },
            other => Self::Other(other.to_string()),
        }
    }
}
