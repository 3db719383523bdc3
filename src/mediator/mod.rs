use chrono::Utc;
use log::error;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::llm::chat::CompletionClient;
use crate::models::chat::{ Message, ReplyEnvelope, Role };

pub const MAX_TOKENS: u32 = 1000;
pub const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum MediatorError {
    /// The caller supplied zero messages. Detected before any remote call.
    #[error("No messages provided")]
    EmptyConversation,
    /// Any failure from the remote collaborator, carrying the underlying
    /// cause text verbatim. Never retried.
    #[error("{0}")]
    RemoteCallFailed(String),
}

/// Shared normalize-call-package procedure behind both transports. Holds
/// process-wide read-only state injected once at startup; safe to share via
/// `Arc` with no locking.
pub struct ChatMediator {
    client: Arc<dyn CompletionClient>,
    model: String,
    system_prompt: String,
}

impl ChatMediator {
    pub fn new(client: Arc<dyn CompletionClient>, model: String, system_prompt: String) -> Self {
        Self { client, model, system_prompt }
    }

    /// Forwards one conversation to the completion provider and packages the
    /// reply. A system turn is prepended only when the caller supplied none;
    /// caller-supplied system turns (including multiples) pass through
    /// untouched, in place.
    pub async fn mediate(&self, mut messages: Vec<Message>) -> Result<ReplyEnvelope, MediatorError> {
        if messages.is_empty() {
            return Err(MediatorError::EmptyConversation);
        }

        if !messages.iter().any(|m| m.role == Role::System) {
            messages.insert(0, Message::new(Role::System, self.system_prompt.clone()));
        }

        let content = self.client
            .complete(&self.model, &messages, MAX_TOKENS, TEMPERATURE).await
            .map_err(|e| {
                error!("Completion API error: {}", e);
                MediatorError::RemoteCallFailed(e.to_string())
            })?;

        Ok(ReplyEnvelope {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            content,
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::chat::testing::MockCompletionClient;

    fn mediator(client: Arc<MockCompletionClient>) -> ChatMediator {
        ChatMediator::new(client, "test-model".to_string(), "You are a test assistant.".to_string())
    }

    #[tokio::test]
    async fn empty_conversation_fails_without_remote_call() {
        let client = MockCompletionClient::replying("Hello!");
        let err = mediator(client.clone()).mediate(vec![]).await.unwrap_err();
        assert!(matches!(err, MediatorError::EmptyConversation));
        assert_eq!(err.to_string(), "No messages provided");
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn prepends_system_turn_when_absent() {
        let client = MockCompletionClient::replying("Hello!");
        mediator(client.clone())
            .mediate(vec![Message::new(Role::User, "Hi")]).await
            .unwrap();

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        let sent = &calls[0].messages;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], Message::new(Role::System, "You are a test assistant."));
        assert_eq!(sent[1], Message::new(Role::User, "Hi"));
    }

    #[tokio::test]
    async fn passes_conversation_through_when_system_turn_present() {
        let client = MockCompletionClient::replying("Hello!");
        let conversation = vec![
            Message::new(Role::User, "Hi"),
            Message::new(Role::System, "Mid-conversation instruction"),
            Message::new(Role::Assistant, "Hello")
        ];
        mediator(client.clone()).mediate(conversation.clone()).await.unwrap();

        assert_eq!(client.calls()[0].messages, conversation);
    }

    #[tokio::test]
    async fn multiple_system_turns_pass_through_unmodified() {
        let client = MockCompletionClient::replying("Hello!");
        let conversation = vec![
            Message::new(Role::System, "First"),
            Message::new(Role::System, "Second"),
            Message::new(Role::User, "Hi")
        ];
        mediator(client.clone()).mediate(conversation.clone()).await.unwrap();

        assert_eq!(client.calls()[0].messages, conversation);
    }

    #[tokio::test]
    async fn remote_call_uses_fixed_parameters() {
        let client = MockCompletionClient::replying("Hello!");
        mediator(client.clone())
            .mediate(vec![Message::new(Role::User, "Hi")]).await
            .unwrap();

        let call = &client.calls()[0];
        assert_eq!(call.model, "test-model");
        assert_eq!(call.max_tokens, 1000);
        assert_eq!(call.temperature, 0.7);
    }

    #[tokio::test]
    async fn packages_reply_with_fresh_id_and_timestamp() {
        let client = MockCompletionClient::replying("Hello!");
        let m = mediator(client);
        let before = Utc::now();

        let first = m.mediate(vec![Message::new(Role::User, "Hi")]).await.unwrap();
        let second = m.mediate(vec![Message::new(Role::User, "Hi")]).await.unwrap();

        assert_eq!(first.role, Role::Assistant);
        assert_eq!(first.content, "Hello!");
        assert!(first.timestamp >= before);
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn remote_failure_surfaces_cause_text_verbatim() {
        let client = MockCompletionClient::failing("connection timed out");
        let err = mediator(client.clone())
            .mediate(vec![Message::new(Role::User, "Hi")]).await
            .unwrap_err();

        assert!(matches!(err, MediatorError::RemoteCallFailed(_)));
        assert_eq!(err.to_string(), "connection timed out");
        assert_eq!(client.calls().len(), 1);
    }
}
