use mosaic_config::DEFAULT_CHAT_MODEL;

use crate::{
    client::{ChatClient, OpenAiClient},
    error::Result,
    types::{ChatCompletionRequest, ChatMessage, ChatOptions},
};

/// Run a chat completion against `OpenAI` and return the generated text
///
/// A client is built from the environment on every call. `model` defaults to
/// `gpt-4o`. Missing content in the first choice is returned as an empty
/// string.
pub fn chat(messages: &[ChatMessage], model: Option<&str>, options: Option<ChatOptions>) -> Result<String> {
    let client = OpenAiClient::from_env()?;
    chat_with(&client, messages, model, options)
}

/// Run a chat completion with the given client
pub fn chat_with<C: ChatClient + ?Sized>(
    client: &C,
    messages: &[ChatMessage],
    model: Option<&str>,
    options: Option<ChatOptions>,
) -> Result<String> {
    let model = model.filter(|m| !m.is_empty()).unwrap_or(DEFAULT_CHAT_MODEL);

    let request = ChatCompletionRequest {
        model: model.to_owned(),
        messages: messages.to_vec(),
        options: options.unwrap_or_default(),
    };

    let completion = client.create_completion(&request)?;

    if let Some(usage) = completion.usage {
        tracing::debug!(
            model,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "chat completion usage"
        );
    }

    completion.into_text()
}
