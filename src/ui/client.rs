use crate::models::api::{ ChatRequest, ChatResponse };
use reqwest::Client as HttpClient;
use log::debug;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request to relay failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("relay reported an error: {0}")]
    Relay(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub session_id: Option<String>,
}

impl TryFrom<ChatResponse> for Reply {
    type Error = ClientError;

    fn try_from(resp: ChatResponse) -> Result<Self, Self::Error> {
        match resp {
            ChatResponse { success: true, response: Some(text), session_id, .. } =>
                Ok(Reply { text, session_id }),
            ChatResponse { error, .. } =>
                Err(ClientError::Relay(error.unwrap_or_else(|| "Something went wrong".to_string()))),
        }
    }
}

/// Posts chat messages to a running relay.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: HttpClient,
    chat_url: String,
}

impl RelayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: HttpClient::new(),
            chat_url: format!("{}/chat", base_url.trim_end_matches('/')),
        }
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    pub async fn send(&self, prompt: &str, session_id: Option<&str>) -> Result<Reply, ClientError> {
        let body = ChatRequest {
            prompt: Some(prompt.to_string()),
            message: None,
            session_id: session_id.map(str::to_string),
        };
        debug!("POST {} session={:?}", self.chat_url, session_id);
        // Error statuses still carry a ChatResponse body with the relay's message.
        let resp = self.http.post(&self.chat_url).json(&body).send().await?;
        let payload = resp.json::<ChatResponse>().await?;
        Reply::try_from(payload)
    }
}
