use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{LlmError, Result};

// -- Request types --

/// Message in a conversation, sent verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message author
    pub role: String,
    /// Message content (text or structured parts)
    pub content: Value,
    /// Any further fields, e.g. `name` or `tool_call_id`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatMessage {
    /// Create a message with an arbitrary role
    pub fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_owned(),
            content: Value::String(content.to_owned()),
            extra: Map::new(),
        }
    }

    /// Create a system message
    pub fn system(content: &str) -> Self {
        Self::new("system", content)
    }

    /// Create a user message
    pub fn user(content: &str) -> Self {
        Self::new("user", content)
    }

    /// Create an assistant message
    pub fn assistant(content: &str) -> Self {
        Self::new("assistant", content)
    }
}

/// Optional completion parameters
///
/// Recognized fields are typed; anything else goes in `extra` and is
/// forwarded without validation. An `extra` entry replaces a typed field of
/// the same name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatOptions {
    /// Sampling temperature (0.0 to 2.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Stop sequences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    /// Sampling seed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Presence penalty (-2.0 to 2.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    /// Frequency penalty (-2.0 to 2.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    /// End-user identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Output format, e.g. `{"type": "json_object"}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<Value>,
    /// Provider-specific passthrough fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A chat completion call
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletionRequest {
    /// Model name
    pub model: String,
    /// Conversation messages, in order
    pub messages: Vec<ChatMessage>,
    /// Additional parameters
    pub options: ChatOptions,
}

impl ChatCompletionRequest {
    /// JSON body for the completions endpoint
    ///
    /// Options are laid out first; `model` and `messages` always come from
    /// the request itself.
    pub fn body(&self) -> Result<Map<String, Value>> {
        let mut body = match serde_json::to_value(&self.options) {
            Ok(Value::Object(map)) => map,
            Ok(other) => return Err(LlmError::Parse(format!("options serialized to {other}"))),
            Err(e) => return Err(LlmError::Parse(format!("failed to encode options: {e}"))),
        };

        let messages =
            serde_json::to_value(&self.messages).map_err(|e| LlmError::Parse(format!("failed to encode messages: {e}")))?;

        body.insert("model".to_owned(), Value::String(self.model.clone()));
        body.insert("messages".to_owned(), messages);

        Ok(body)
    }
}

// -- Response types --

/// Chat completion response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletion {
    /// Unique response identifier
    #[serde(default)]
    pub id: String,
    /// Model used
    #[serde(default)]
    pub model: String,
    /// Generated choices
    pub choices: Vec<Choice>,
    /// Token usage statistics
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatCompletion {
    /// Text of the first choice, with missing content read as empty
    pub fn into_text(self) -> Result<String> {
        let choice = self.choices.into_iter().next().ok_or(LlmError::NoChoices)?;
        Ok(choice.message.content.unwrap_or_default())
    }
}

/// A single completion choice
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// Choice index
    #[serde(default)]
    pub index: u32,
    /// Generated message
    pub message: ChoiceMessage,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message inside a choice
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    /// Role of the author
    #[serde(default)]
    pub role: Option<String>,
    /// Generated text; null when the model produced none (e.g. tool calls)
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage statistics
///
/// Compatible servers often report only some of the counters; missing ones
/// read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: u32,
    /// Tokens in the completion
    #[serde(default)]
    pub completion_tokens: u32,
    /// Total tokens
    #[serde(default)]
    pub total_tokens: u32,
}
