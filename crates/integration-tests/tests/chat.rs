mod harness;

use harness::mock_openai::MockOpenAi;
use mosaic_llm::{ChatMessage, ChatOptions, LlmError, OpenAiClient, chat_with};
use serde_json::json;

#[tokio::test(flavor = "multi_thread")]
async fn chat_returns_first_choice_text() {
    let mock = MockOpenAi::start_with_response("Hello from mock").await.unwrap();
    let config = mock.config();

    let text = tokio::task::spawn_blocking(move || {
        let client = OpenAiClient::new(config);
        chat_with(&client, &[ChatMessage::user("hi")], None, None)
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(text, "Hello from mock");
    assert_eq!(
        mock.requests(),
        vec![json!({
            "model": "gpt-4o",
            "messages": [{ "role": "user", "content": "hi" }]
        })]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn null_content_becomes_empty_string() {
    let mock = MockOpenAi::start_with_null_content().await.unwrap();
    let config = mock.config();

    let text = tokio::task::spawn_blocking(move || {
        let client = OpenAiClient::new(config);
        chat_with(&client, &[ChatMessage::user("hi")], None, None)
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(text, "");
}

#[tokio::test(flavor = "multi_thread")]
async fn options_are_merged_into_the_request() {
    let mock = MockOpenAi::start_with_response("ok").await.unwrap();
    let config = mock.config();

    tokio::task::spawn_blocking(move || {
        let client = OpenAiClient::new(config);
        let mut options = ChatOptions {
            temperature: Some(0.5),
            ..ChatOptions::default()
        };
        options.extra.insert("reasoning_effort".to_owned(), json!("low"));

        chat_with(
            &client,
            &[ChatMessage::system("be terse"), ChatMessage::user("hi")],
            Some("gpt-4o-mini"),
            Some(options),
        )
    })
    .await
    .unwrap()
    .unwrap();

    let request = &mock.requests()[0];
    assert_eq!(request["model"], "gpt-4o-mini");
    assert_eq!(request["temperature"], 0.5);
    assert_eq!(request["reasoning_effort"], "low");
    assert_eq!(request["messages"][0], json!({ "role": "system", "content": "be terse" }));
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_key_is_an_upstream_error() {
    let mock = MockOpenAi::start_with_response("unused").await.unwrap();
    let config = mock.config().with_api_key("sk-wrong");

    let err = tokio::task::spawn_blocking(move || {
        let client = OpenAiClient::new(config);
        chat_with(&client, &[ChatMessage::user("hi")], None, None)
    })
    .await
    .unwrap()
    .unwrap_err();

    let LlmError::Upstream { status, message } = err else {
        panic!("expected an upstream error, got {err:?}");
    };
    assert_eq!(status, 401);
    assert_eq!(message, "Incorrect API key provided");
    assert!(mock.requests().is_empty());
}
