//! Chat-completion client for answer generation.
//!
//! Wraps an OpenAI-compatible chat API behind a small role-tagged message
//! type, so the rest of the crate never touches the wire types directly.
//! Calls are one attempt with a bounded timeout; failures surface as
//! [`MinneError::Completion`] with the provider's status and message.

use crate::error::{MinneError, Result};
use crate::openai::create_client_with_timeout;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs, Stop,
};
use std::time::Duration;
use tracing::{debug, instrument};

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A role-tagged chat message.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Chat-completion client with fixed model and sampling settings.
pub struct ChatClient {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ChatClient {
    /// Create a client for `model` with an optional base URL override.
    pub fn new(model: &str, api_base: Option<&str>, timeout: Duration) -> Self {
        Self {
            client: create_client_with_timeout(timeout, api_base),
            model: model.to_string(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override the response token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Send `messages` and return the assistant's reply text.
    ///
    /// `stop` optionally truncates generation at the given sequences.
    #[instrument(skip(self, messages), fields(model = %self.model, count = messages.len()))]
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        stop: Option<Vec<String>>,
    ) -> Result<String> {
        let wire_messages = convert_messages(messages)?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(&self.model)
            .messages(wire_messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens);
        if let Some(stop) = stop {
            builder.stop(Stop::StringArray(stop));
        }
        let request = builder
            .build()
            .map_err(|e| MinneError::Completion(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| MinneError::Completion(format!("Chat API error: {}", e)))?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| MinneError::Completion("Empty response from model".to_string()))?
            .clone();

        debug!("Received {} characters", answer.len());
        Ok(answer)
    }
}

/// Convert role-tagged messages into the wire representation.
fn convert_messages(messages: &[ChatMessage]) -> Result<Vec<ChatCompletionRequestMessage>> {
    messages
        .iter()
        .map(|message| {
            let converted: ChatCompletionRequestMessage = match message.role {
                ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
                    .content(message.content.clone())
                    .build()
                    .map_err(|e| MinneError::Completion(e.to_string()))?
                    .into(),
                ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
                    .content(message.content.clone())
                    .build()
                    .map_err(|e| MinneError::Completion(e.to_string()))?
                    .into(),
                ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                    .content(message.content.clone())
                    .build()
                    .map_err(|e| MinneError::Completion(e.to_string()))?
                    .into(),
            };
            Ok(converted)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let msg = ChatMessage::system("be helpful");
        assert_eq!(msg.role, ChatRole::System);
        assert_eq!(msg.content, "be helpful");

        assert_eq!(ChatMessage::user("hi").role, ChatRole::User);
        assert_eq!(ChatMessage::assistant("hello").role, ChatRole::Assistant);
    }

    #[test]
    fn test_convert_messages_preserves_order() {
        let messages = vec![
            ChatMessage::system("s"),
            ChatMessage::user("u"),
            ChatMessage::assistant("a"),
            ChatMessage::user("u2"),
        ];
        let wire = convert_messages(&messages).unwrap();
        assert_eq!(wire.len(), 4);
        assert!(matches!(
            wire[0],
            ChatCompletionRequestMessage::System(_)
        ));
        assert!(matches!(wire[1], ChatCompletionRequestMessage::User(_)));
        assert!(matches!(
            wire[2],
            ChatCompletionRequestMessage::Assistant(_)
        ));
        assert!(matches!(wire[3], ChatCompletionRequestMessage::User(_)));
    }
}
