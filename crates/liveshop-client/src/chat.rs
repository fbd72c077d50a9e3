//! HTTP implementation of the chat collaborator

use async_trait::async_trait;
use reqwest::Client;
use tracing::instrument;

use liveshop_core::{ChatMessage, ChatPage, ChatStore, Cursor, RoomId, SyncResult};

use crate::dto::{ChatFetchResponse, ChatSendRequest, ChatSendResponse};
use crate::error::{map_fetch_error, map_fetch_status, map_send_error};

/// Chat fetch/send over `GET /chat` and `POST /chat`
#[derive(Debug, Clone)]
pub struct HttpChatStore {
    base_url: String,
    client: Client,
}

impl HttpChatStore {
    /// Create a store against the given backend base URL
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    /// Create a store with a preconfigured client (timeouts, headers)
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat", self.base_url)
    }
}

#[async_trait]
impl ChatStore for HttpChatStore {
    #[instrument(skip(self), fields(room = %room))]
    async fn fetch(
        &self,
        room: &RoomId,
        since: Option<Cursor>,
        limit: usize,
    ) -> SyncResult<ChatPage> {
        let mut query: Vec<(&str, String)> = vec![
            ("roomId", room.as_str().to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(cursor) = since {
            query.push(("since", cursor.instant().to_rfc3339()));
        }

        let response = self
            .client
            .get(self.endpoint())
            .query(&query)
            .send()
            .await
            .map_err(|e| map_fetch_error(&e))?;

        if !response.status().is_success() {
            return Err(map_fetch_status(response.status()));
        }

        let body: ChatFetchResponse =
            response.json().await.map_err(|e| map_fetch_error(&e))?;

        Ok(ChatPage::from(body))
    }

    #[instrument(skip(self, body), fields(room = %room))]
    async fn send(&self, room: &RoomId, author: &str, body: &str) -> SyncResult<ChatMessage> {
        let request = ChatSendRequest {
            room_id: room.as_str().to_string(),
            author: author.to_string(),
            body: body.to_string(),
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| map_send_error(&e))?;

        if !response.status().is_success() {
            return Err(liveshop_core::SyncError::SendFailed(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let body: ChatSendResponse = response.json().await.map_err(|e| map_send_error(&e))?;

        Ok(ChatMessage::from(body.item))
    }
}
