use crate::models::api::{ ChatRequest, ChatResponse };
use crate::relay::{ ChatRelay, RelayError };
use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    Json,
    extract::{ State, rejection::JsonRejection },
    response::{ Html, IntoResponse, Response },
    http::StatusCode,
};
use tower::ServiceBuilder;
use tower_http::cors::{ Any, CorsLayer };
use uuid::Uuid;
use log::{ info, warn };

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[derive(Clone)]
struct AppState {
    relay: Arc<ChatRelay>,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match &self {
            RelayError::EmptyPrompt(_) => StatusCode::BAD_REQUEST,
            RelayError::Provider { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ChatResponse::failure(self.user_message()))).into_response()
    }
}

pub fn router(relay: Arc<ChatRelay>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/chat", post(chat_handler))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(AppState { relay })
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!("Rejected /chat body: {}", rejection.body_text());
            let message = state.relay.prompt_config().empty_prompt_error.clone();
            return RelayError::EmptyPrompt(message).into_response();
        }
    };

    let session_id = req.session_id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let prompt = req.text();
    info!("POST /chat session={} chars={}", session_id, prompt.chars().count());

    match state.relay.process_message(&session_id, prompt).await {
        Ok(text) => (StatusCode::OK, Json(ChatResponse::ok(text, session_id))).into_response(),
        Err(e) => e.into_response(),
    }
}
