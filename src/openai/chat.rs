//! Chat completion request/response for picking the roll words.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::OpenAiSettings;
use crate::error::BotError;

/// Request body for POST /v1/chat/completions
#[derive(Serialize, Debug)]
pub struct ChatCompletionRequest<'a> {
    /// Model name
    pub model: &'a str,
    /// Conversation, just the one user message here
    pub messages: Vec<ChatMessage>,
    /// Token cap
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Determinism seed
    pub seed: u32,
}

/// A role-tagged message.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// `user`, `system` or `assistant`
    pub role: String,
    /// Message text
    pub content: String,
}

/// Response body for POST /v1/chat/completions
#[derive(Deserialize, Debug)]
pub struct ChatCompletionResponse {
    /// Candidate completions
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// One candidate completion.
#[derive(Deserialize, Debug)]
pub struct ChatChoice {
    /// Position in the choices list
    #[serde(default)]
    pub index: u32,
    /// Raw message object; `content` is checked when extracting the text.
    #[serde(default)]
    pub message: Map<String, Value>,
}

impl ChatCompletionResponse {
    /// Text of the first choice.
    pub fn into_text(self) -> Result<String, BotError> {
        let first = self
            .choices
            .into_iter()
            .next()
            .ok_or(BotError::EmptyChoices)?;
        match first.message.get("content") {
            Some(Value::String(content)) => Ok(content.clone()),
            _ => Err(BotError::ContentNotString),
        }
    }
}

/// The instruction sent to the text model. `seed` is also how many words it thinks of.
pub fn words_instruction(seed: u32) -> String {
    format!(
        "Think of {seed} Dungeons and dragons related words that start with the letter D and give me the last 4. The words can be about the game or stereotypical things that go on with people while playing it. Put each on a newline."
    )
}

/// Builds the completion request for the given seed.
pub fn build_chat_request(settings: &OpenAiSettings, seed: u32) -> ChatCompletionRequest<'_> {
    ChatCompletionRequest {
        model: &settings.text_model,
        messages: vec![ChatMessage {
            role: "user".to_string(),
            content: words_instruction(seed),
        }],
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
        seed,
    }
}
