use scoped_messages::config::AppConfig;
use scoped_messages::message::{AuthorizedResponse, Message};
use scoped_messages::routes::create_router;
use scoped_messages::services::messages::CreateMode;
use scoped_messages::services::token::TokenIssuer;
use scoped_messages::state::AppState;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use std::sync::Arc;
use tower::util::ServiceExt;

const SECRET: &str = "api-test-secret";

fn app_with(config: AppConfig) -> Router {
    let state = Arc::new(AppState::new(&config).unwrap());
    create_router(state)
}

fn app() -> Router {
    app_with(AppConfig::with_secret(SECRET))
}

fn token(scopes: &[&str]) -> String {
    TokenIssuer::new(SECRET).issue("alice", scopes, 300).unwrap()
}

fn get(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(t) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, bearer: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

#[tokio::test]
async fn list_messages_with_read_scope() {
    let response = app().oneshot(get("/messages", Some(&token(&["read"])))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let messages: Vec<Message> = body_json(response).await;
    assert_eq!(messages, vec![Message::new("Hello, World!")]);
}

#[tokio::test]
async fn list_messages_with_write_scope_and_two_presets() {
    let mut config = AppConfig::with_secret(SECRET);
    config.seed_messages = vec!["Hello, World!".to_string(), "Second message".to_string()];

    let response = app_with(config)
        .oneshot(get("/messages", Some(&token(&["write"]))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let messages: Vec<Message> = body_json(response).await;
    assert_eq!(messages.len(), 2);
}

#[tokio::test]
async fn list_messages_without_token_is_unauthorized() {
    let response = app().oneshot(get("/messages", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
}

#[tokio::test]
async fn list_messages_with_wrong_scope_is_forbidden() {
    let response = app().oneshot(get("/messages", Some(&token(&["profile"])))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_message_echoes_by_default() {
    let response = app()
        .oneshot(post_json("/createMessage", Some(&token(&["write"])), r#"{"messageText":"hi"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let msg: Message = body_json(response).await;
    assert_eq!(msg.text(), "hi");
}

#[tokio::test]
async fn create_message_accepts_null_text() {
    let response = app()
        .oneshot(post_json("/createMessage", Some(&token(&["write"])), r#"{"messageText":null}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let msg: Message = body_json(response).await;
    assert_eq!(msg.text(), "");
}

#[tokio::test]
async fn create_message_prefix_mode() {
    let mut config = AppConfig::with_secret(SECRET);
    config.create_mode = CreateMode::Prefix;

    let response = app_with(config)
        .oneshot(post_json("/createMessage", Some(&token(&["write"])), r#"{"messageText":"hi"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let msg: Message = body_json(response).await;
    assert_eq!(msg.text(), "Message created: hi");
}

#[tokio::test]
async fn create_message_with_read_scope_is_forbidden() {
    let response = app()
        .oneshot(post_json("/createMessage", Some(&token(&["read"])), r#"{"messageText":"hi"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let challenge = response.headers()[header::WWW_AUTHENTICATE].to_str().unwrap();
    assert!(challenge.contains("insufficient_scope"));
}

#[tokio::test]
async fn create_message_with_malformed_body_is_bad_request() {
    let response = app()
        .oneshot(post_json("/createMessage", Some(&token(&["write"])), "{not json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn authorized_is_public() {
    let response = app().oneshot(get("/authorized?code=abc123", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: AuthorizedResponse = body_json(response).await;
    assert_eq!(body.code, "abc123");
}

#[tokio::test]
async fn authorized_ignores_malformed_bearer() {
    let response = app()
        .oneshot(get("/authorized?code=abc123", Some("not-a-jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: AuthorizedResponse = body_json(response).await;
    assert_eq!(body.code, "abc123");
}

#[tokio::test]
async fn authorized_without_code_is_bad_request() {
    let response = app().oneshot(get("/authorized", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unmapped_route_requires_authentication() {
    let response = app().oneshot(get("/somewhere", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app().oneshot(get("/somewhere", Some(&token(&[])))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_tokens_are_unauthorized() {
    let expired = TokenIssuer::new(SECRET).issue("alice", &["read"], -120).unwrap();
    let foreign = TokenIssuer::new("someone-else").issue("alice", &["read"], 300).unwrap();

    for bad in [expired, foreign, "garbage".to_string()] {
        let response = app().oneshot(get("/messages", Some(&bad))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let challenge = response.headers()[header::WWW_AUTHENTICATE].to_str().unwrap();
        assert!(challenge.contains("invalid_token"));
    }
}

#[tokio::test]
async fn token_without_subject_reads_messages() {
    let now = chrono::Utc::now().timestamp();
    let claims = serde_json::json!({ "scope": "read", "exp": now + 300 });
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let response = app().oneshot(get("/messages", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn non_bearer_scheme_is_unauthorized() {
    let req = Request::builder()
        .method("GET")
        .uri("/messages")
        .header(header::AUTHORIZATION, "Basic YWxpY2U6c2VjcmV0")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_redirects_to_authorization_server() {
    let response = app()
        .oneshot(get("/oauth2/authorization/client-oauth", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.contains("response_type=code"));
    assert!(location.contains("client_id=client-app"));
}

#[tokio::test]
async fn login_for_unknown_registration_is_not_found() {
    let response = app()
        .oneshot(get("/oauth2/authorization/someone-else", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
