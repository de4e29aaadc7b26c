#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]

//! Chat completion through the hosted `OpenAI` API

mod chat;
mod client;
mod error;
mod types;

pub use chat::{chat, chat_with};
pub use client::{ChatClient, OpenAiClient};
pub use error::{LlmError, Result};
pub use mosaic_config::DEFAULT_CHAT_MODEL;
pub use types::{ChatCompletion, ChatCompletionRequest, ChatMessage, ChatOptions, Choice, ChoiceMessage, Usage};
