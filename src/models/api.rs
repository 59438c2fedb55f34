use serde::{ Serialize, Deserialize };

/// Body of `POST /chat`. `message` is accepted in place of `prompt`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ChatRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ChatRequest {
    /// The user's text: `prompt` unless it is blank, then `message`.
    pub fn text(&self) -> &str {
        [&self.prompt, &self.message]
            .into_iter()
            .flatten()
            .find(|text| !text.trim().is_empty())
            .or(self.prompt.as_ref())
            .map(String::as_str)
            .unwrap_or_default()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ChatResponse {
    pub fn ok(response: String, session_id: String) -> Self {
        Self { success: true, response: Some(response), error: None, session_id: Some(session_id) }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self { success: false, response: None, error: Some(error.into()), session_id: None }
    }
}
