use async_trait::async_trait;
use axum::body::{ to_bytes, Body };
use axum::http::{ header, Request, StatusCode };
use axum::Router;
use serde_json::{ json, Value };
use solace_relay::config::prompt::{ PromptConfig, DEFAULT_EMPTY_PROMPT_ERROR, DEFAULT_PROVIDER_ERROR };
use solace_relay::history::{ HistoryStore, MemoryHistoryStore };
use solace_relay::llm::chat::{ ChatClient, CompletionResponse };
use solace_relay::relay::ChatRelay;
use solace_relay::safety::DEFAULT_CRISIS_RESOURCES;
use solace_relay::server::api::router;
use std::error::Error;
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::Arc;
use tower::ServiceExt;

/// Echoes a canned reply, or fails every call when `reply` is None.
struct CannedClient {
    reply: Option<&'static str>,
    calls: AtomicUsize,
}

#[async_trait]
impl ChatClient for CannedClient {
    async fn complete(
        &self,
        _prompt: &str
    ) -> Result<CompletionResponse, Box<dyn Error + Send + Sync>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Some(reply) => Ok(CompletionResponse { response: reply.to_string() }),
            None => Err("connection refused".into()),
        }
    }

    fn get_model(&self) -> String {
        "canned".into()
    }

    fn get_base_url(&self) -> Option<String> {
        None
    }
}

fn app(reply: Option<&'static str>) -> (Router, Arc<CannedClient>) {
    let client = Arc::new(CannedClient { reply, calls: AtomicUsize::new(0) });
    let history: Arc<dyn HistoryStore> = Arc::new(MemoryHistoryStore::new(16));
    let relay = ChatRelay::new(
        client.clone(),
        Some(history),
        Arc::new(PromptConfig::default())
    );
    (router(Arc::new(relay)), client)
}

async fn post_chat(app: Router, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn crisis_prompt_returns_reply_with_hotline_block() {
    let (app, _) = app(Some("You matter."));
    let (status, body) = post_chat(app, json!({ "prompt": "I want to kill myself" }).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let text = body["response"].as_str().unwrap();
    assert!(text.starts_with("You matter."));
    assert!(text.ends_with(DEFAULT_CRISIS_RESOURCES));
    assert!(body["session_id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn ordinary_prompt_returns_model_text_verbatim() {
    let (app, _) = app(Some("Rough days happen."));
    let (status, body) = post_chat(app, json!({ "prompt": "I had a rough day" }).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Rough days happen.");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn message_field_is_accepted() {
    let (app, _) = app(Some("Hi."));
    let (status, body) = post_chat(app, json!({ "message": "hello" }).to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Hi.");
}

#[tokio::test]
async fn empty_prompt_is_rejected_without_calling_provider() {
    for payload in [json!({ "prompt": "" }), json!({}), json!({ "message": "   " })] {
        let (app, client) = app(Some("unused"));
        let (status, body) = post_chat(app, payload.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "success": false, "error": DEFAULT_EMPTY_PROMPT_ERROR }));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn malformed_body_gets_guidance_message() {
    let (app, client) = app(Some("unused"));
    let (status, body) = post_chat(app, "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], DEFAULT_EMPTY_PROMPT_ERROR);
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn provider_failure_returns_static_apology() {
    let (app, client) = app(None);
    let (status, body) = post_chat(app, json!({ "prompt": "hello" }).to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "success": false, "error": DEFAULT_PROVIDER_ERROR }));
    assert_eq!(client.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn supplied_session_id_is_echoed() {
    let (app, _) = app(Some("ok"));
    let (_, body) = post_chat(
        app,
        json!({ "prompt": "hello", "session_id": "session-42" }).to_string()
    ).await;
    assert_eq!(body["session_id"], "session-42");
}

#[tokio::test]
async fn index_serves_chat_page() {
    let (app, _) = app(Some("ok"));
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap()).await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Solace Chatbot"));
    assert!(html.contains("/chat"));
}

#[tokio::test]
async fn prompt_and_message_together_use_prompt() {
    let (app, client) = app(Some("Heard."));
    let (status, body) = post_chat(
        app,
        json!({ "prompt": "I feel low", "message": "ignored" }).to_string()
    ).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Heard.");
    assert_eq!(client.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn session_less_requests_keep_history_bounded() {
    let client = Arc::new(CannedClient { reply: Some("ok"), calls: AtomicUsize::new(0) });
    let store = Arc::new(MemoryHistoryStore::new(16).with_max_sessions(5));
    let history: Arc<dyn HistoryStore> = store.clone();
    let relay = ChatRelay::new(client, Some(history), Arc::new(PromptConfig::default()));
    let app = router(Arc::new(relay));

    let mut session_ids = Vec::new();
    for i in 0..50 {
        let (status, body) = post_chat(
            app.clone(),
            json!({ "prompt": format!("message {}", i) }).to_string()
        ).await;
        assert_eq!(status, StatusCode::OK);
        session_ids.push(body["session_id"].as_str().unwrap().to_string());
    }

    let mut retained = 0;
    for id in &session_ids {
        if !store.recent_lines(id).await.is_empty() {
            retained += 1;
        }
    }
    assert_eq!(retained, 5);
    for id in &session_ids[45..] {
        assert_eq!(store.recent_lines(id).await.len(), 2);
    }
}
