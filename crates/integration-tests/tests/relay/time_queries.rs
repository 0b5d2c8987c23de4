use indoc::formatdoc;
use integration_tests::{BackendMock, CompletionMock, TestServer, unused_address};
use serde_json::json;

use super::relay_config;

fn ask(content: &str) -> serde_json::Value {
    json!({ "messages": [{ "role": "user", "content": content }] })
}

#[tokio::test]
async fn time_query_is_answered_by_completion_api() {
    let completion = CompletionMock::new()
        .with_reply("It's 3:04 PM on Friday.")
        .spawn()
        .await
        .unwrap();

    let backend = BackendMock::new().spawn().await.unwrap();
    let server = TestServer::relay(&relay_config(&backend.url(), &completion.base_url())).await;

    let response = server.client.post("/api/chat", &ask("What time is it?")).await;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();

    insta::assert_json_snapshot!(body, @r#"
    {
      "choices": [
        {
          "message": {
            "content": "It's 3:04 PM on Friday."
          }
        }
      ]
    }
    "#);

    assert_eq!(backend.call_count(), 0);
    assert_eq!(completion.requests().len(), 1);
}

#[tokio::test]
async fn keyword_match_ignores_case() {
    let completion = CompletionMock::new().with_reply("Today is Friday.").spawn().await.unwrap();
    let backend = BackendMock::new().spawn().await.unwrap();
    let server = TestServer::relay(&relay_config(&backend.url(), &completion.base_url())).await;

    let response = server.client.post("/api/chat", &ask("DATE please")).await;
    let body: serde_json::Value = response.json().await.unwrap();

    insta::assert_json_snapshot!(body["choices"][0]["message"]["content"], @r#""Today is Friday.""#);
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn keyword_next_to_other_scripts_is_a_time_query() {
    let completion = CompletionMock::new().with_reply("现在是下午三点。").spawn().await.unwrap();
    let backend = BackendMock::new().spawn().await.unwrap();
    let server = TestServer::relay(&relay_config(&backend.url(), &completion.base_url())).await;

    let response = server.client.post("/api/chat", &ask("現在time是几点")).await;
    let body: serde_json::Value = response.json().await.unwrap();

    insta::assert_json_snapshot!(body["choices"][0]["message"]["content"], @r#""现在是下午三点。""#);
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn kelvin_sign_is_not_a_keyword_letter() {
    let completion = CompletionMock::new().spawn().await.unwrap();
    let backend = BackendMock::new().spawn().await.unwrap();
    let server = TestServer::relay(&relay_config(&backend.url(), &completion.base_url())).await;

    let response = server.client.post("/api/chat", &ask("cloc\u{212A}")).await;
    assert_eq!(response.status(), 200);

    assert!(completion.requests().is_empty());
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn partial_word_goes_to_backend() {
    let completion = CompletionMock::new().spawn().await.unwrap();
    let backend = BackendMock::new().spawn().await.unwrap();
    let server = TestServer::relay(&relay_config(&backend.url(), &completion.base_url())).await;

    let response = server.client.post("/api/chat", &ask("sometimes I update things")).await;
    let body: serde_json::Value = response.json().await.unwrap();

    insta::assert_json_snapshot!(body["choices"][0]["message"]["content"], @r#""Echo: sometimes I update things""#);
    assert!(completion.requests().is_empty());
}

#[tokio::test]
async fn completion_request_shape() {
    let completion = CompletionMock::new().spawn().await.unwrap();
    let backend = BackendMock::new().spawn().await.unwrap();

    let config = formatdoc! {r#"
        [relay.completion]
        base_url = "{}"
        api_key = "test-key"
        model = "gpt-4o-mini"
        temperature = 0.5

        [relay.backend]
        url = "{}"
    "#, completion.base_url(), backend.url()};

    let server = TestServer::relay(&config).await;

    let response = server.client.post("/api/chat", &ask("check the clock")).await;
    assert_eq!(response.status(), 200);

    let requests = completion.requests();
    assert_eq!(requests.len(), 1);

    let request = &requests[0];

    assert_eq!(request.authorization.as_deref(), Some("Bearer test-key"));
    assert_eq!(request.body["model"], "gpt-4o-mini");
    assert_eq!(request.body["temperature"], 0.5);
    assert_eq!(request.body["messages"].as_array().map(Vec::len), Some(1));
    assert_eq!(request.body["messages"][0]["role"], "user");

    let prompt = request.prompt();

    assert!(
        prompt.starts_with(r#"The user asked: "check the clock". Give a friendly, concise response with the current time and date in the user's location. The current time is "#),
        "{prompt}"
    );
    assert!(prompt.ends_with('.'), "{prompt}");
}

#[tokio::test]
async fn no_api_key_sends_no_authorization() {
    let completion = CompletionMock::new().spawn().await.unwrap();
    let backend = BackendMock::new().spawn().await.unwrap();

    let config = formatdoc! {r#"
        [relay.completion]
        base_url = "{}"

        [relay.backend]
        url = "{}"
    "#, completion.base_url(), backend.url()};

    let server = TestServer::relay(&config).await;

    let response = server.client.post("/api/chat", &ask("what's the time")).await;
    assert_eq!(response.status(), 200);

    let requests = completion.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization, None);
}

#[tokio::test]
async fn api_error_answers_with_apology() {
    let completion = CompletionMock::new()
        .with_status(401, "Incorrect API key provided")
        .spawn()
        .await
        .unwrap();

    let backend = BackendMock::new().spawn().await.unwrap();
    let server = TestServer::relay(&relay_config(&backend.url(), &completion.base_url())).await;

    let response = server.client.post("/api/chat", &ask("What time is it?")).await;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();

    insta::assert_json_snapshot!(body, @r#"
    {
      "choices": [
        {
          "message": {
            "content": "I'm sorry, I had trouble fetching the time. Please try again."
          }
        }
      ]
    }
    "#);

    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn api_unreachable_answers_with_apology() {
    let backend = BackendMock::new().spawn().await.unwrap();
    let completion_base_url = format!("http://{}/v1", unused_address().await);

    let server = TestServer::relay(&relay_config(&backend.url(), &completion_base_url)).await;

    let response = server.client.post("/api/chat", &ask("What time is it?")).await;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();

    insta::assert_json_snapshot!(
        body["choices"][0]["message"]["content"],
        @r#""I'm sorry, I had trouble fetching the time. Please try again.""#
    );

    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn malformed_api_response_answers_with_apology() {
    let completion = CompletionMock::new().with_malformed_body().spawn().await.unwrap();
    let backend = BackendMock::new().spawn().await.unwrap();
    let server = TestServer::relay(&relay_config(&backend.url(), &completion.base_url())).await;

    let response = server.client.post("/api/chat", &ask("date?")).await;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();

    insta::assert_json_snapshot!(
        body["choices"][0]["message"]["content"],
        @r#""I'm sorry, I had trouble fetching the time. Please try again.""#
    );
}

#[tokio::test]
async fn custom_fallback_message() {
    let completion = CompletionMock::new().with_status(500, "boom").spawn().await.unwrap();
    let backend = BackendMock::new().spawn().await.unwrap();

    let config = formatdoc! {r#"
        [relay.completion]
        base_url = "{}"
        fallback_message = "Clock is out of order."

        [relay.backend]
        url = "{}"
    "#, completion.base_url(), backend.url()};

    let server = TestServer::relay(&config).await;

    let response = server.client.post("/api/chat", &ask("time?")).await;
    let body: serde_json::Value = response.json().await.unwrap();

    insta::assert_json_snapshot!(body["choices"][0]["message"]["content"], @r#""Clock is out of order.""#);
}

#[tokio::test]
async fn no_choices_falls_through_to_backend() {
    let completion = CompletionMock::new().with_no_choices().spawn().await.unwrap();
    let backend = BackendMock::new().spawn().await.unwrap();
    let server = TestServer::relay(&relay_config(&backend.url(), &completion.base_url())).await;

    let response = server.client.post("/api/chat", &ask("What time is it?")).await;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();

    insta::assert_json_snapshot!(body["choices"][0]["message"]["content"], @r#""Echo: What time is it?""#);
    assert_eq!(completion.requests().len(), 1);
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn empty_reply_falls_through_to_backend() {
    let completion = CompletionMock::new().with_reply("").spawn().await.unwrap();
    let backend = BackendMock::new().spawn().await.unwrap();
    let server = TestServer::relay(&relay_config(&backend.url(), &completion.base_url())).await;

    let response = server.client.post("/api/chat", &ask("What time is it?")).await;
    let body: serde_json::Value = response.json().await.unwrap();

    insta::assert_json_snapshot!(body["choices"][0]["message"]["content"], @r#""Echo: What time is it?""#);
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn null_content_falls_through_to_backend() {
    let completion = CompletionMock::new().with_null_content().spawn().await.unwrap();
    let backend = BackendMock::new().spawn().await.unwrap();
    let server = TestServer::relay(&relay_config(&backend.url(), &completion.base_url())).await;

    let response = server.client.post("/api/chat", &ask("clock")).await;
    let body: serde_json::Value = response.json().await.unwrap();

    insta::assert_json_snapshot!(body["choices"][0]["message"]["content"], @r#""Echo: clock""#);
}

#[tokio::test]
async fn custom_keywords() {
    let completion = CompletionMock::new().with_reply("Son las tres.").spawn().await.unwrap();
    let backend = BackendMock::new().spawn().await.unwrap();

    let config = formatdoc! {r#"
        [relay.intent]
        keywords = ["hora"]

        [relay.completion]
        base_url = "{}"

        [relay.backend]
        url = "{}"
    "#, completion.base_url(), backend.url()};

    let server = TestServer::relay(&config).await;

    let response = server.client.post("/api/chat", &ask("¿Qué hora es?")).await;
    let body: serde_json::Value = response.json().await.unwrap();
    insta::assert_json_snapshot!(body["choices"][0]["message"]["content"], @r#""Son las tres.""#);

    let response = server.client.post("/api/chat", &ask("what time is it?")).await;
    let body: serde_json::Value = response.json().await.unwrap();
    insta::assert_json_snapshot!(body["choices"][0]["message"]["content"], @r#""Echo: what time is it?""#);
}
