use indoc::formatdoc;
use integration_tests::{BackendMock, TestServer};
use reqwest::Method;
use serde_json::json;

#[tokio::test]
async fn preflight_is_allowed_from_any_origin() {
    let backend = BackendMock::new().spawn().await.unwrap();

    let config = formatdoc! {r#"
        [relay.backend]
        url = "{}"
    "#, backend.url()};

    let server = TestServer::relay(&config).await;

    let response = server
        .client
        .request(Method::OPTIONS, "/api/chat")
        .header("Origin", "http://example.com")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    let allow_origin = response
        .headers()
        .get("access-control-allow-origin")
        .and_then(|v| v.to_str().ok());

    insta::assert_debug_snapshot!(allow_origin, @r#"
    Some(
        "*",
    )
    "#);

    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn chat_response_carries_cors_headers() {
    let backend = BackendMock::new().spawn().await.unwrap();

    let config = formatdoc! {r#"
        [relay.backend]
        url = "{}"
    "#, backend.url()};

    let server = TestServer::relay(&config).await;

    let response = server
        .client
        .request(Method::POST, "/api/chat")
        .header("Origin", "http://localhost:3000")
        .json(&json!({ "messages": [{ "role": "user", "content": "hello" }] }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn cors_disabled() {
    let backend = BackendMock::new().spawn().await.unwrap();

    let config = formatdoc! {r#"
        [relay.cors]
        enabled = false

        [relay.backend]
        url = "{}"
    "#, backend.url()};

    let server = TestServer::relay(&config).await;

    let response = server
        .client
        .request(Method::POST, "/api/chat")
        .header("Origin", "http://localhost:3000")
        .json(&json!({ "messages": [{ "role": "user", "content": "hello" }] }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert!(response.headers().get("access-control-allow-origin").is_none());
}
