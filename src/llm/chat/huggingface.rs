use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{ Deserialize, Serialize };
use std::error::Error as StdError;
use log::info;

use super::{ ChatClient, CompletionResponse };
use crate::llm::{ LlmConfig, LlmType };

pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_MODEL: &str = "HuggingFaceH4/zephyr-7b-beta";
const DEFAULT_MAX_NEW_TOKENS: u32 = 250;

#[derive(Debug)]
pub struct HuggingFaceChatClient {
    http: HttpClient,
    api_key: String,
    base_url: String,
    model: String,
    max_new_tokens: u32,
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    return_full_text: bool,
}

#[derive(Deserialize)]
struct Generation {
    generated_text: String,
}

/// The Inference API answers with a list of generations, a bare generation,
/// or `{"error": "..."}` (model loading, bad token, quota).
#[derive(Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batch(Vec<Generation>),
    Single(Generation),
    Error {
        error: String,
    },
}

pub(crate) fn extract_generated_text(
    body: &str
) -> Result<String, Box<dyn StdError + Send + Sync>> {
    let parsed: InferenceResponse = serde_json
        ::from_str(body)
        .map_err(|e| format!("Unexpected Hugging Face response: {}", e))?;
    match parsed {
        InferenceResponse::Batch(generations) =>
            generations
                .into_iter()
                .next()
                .map(|g| g.generated_text.trim().to_string())
                .ok_or_else(|| "Hugging Face returned no generations".into()),
        InferenceResponse::Single(g) => Ok(g.generated_text.trim().to_string()),
        InferenceResponse::Error { error } => Err(format!("Hugging Face error: {}", error).into()),
    }
}

impl HuggingFaceChatClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>
    ) -> Self {
        Self {
            http: HttpClient::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_new_tokens: max_tokens.unwrap_or(DEFAULT_MAX_NEW_TOKENS),
            temperature,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        if config.llm_type != LlmType::HuggingFace {
            return Err("Invalid config type for HuggingFaceChatClient".into());
        }
        let api_key = config.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| "Hugging Face API key is required for HuggingFaceChatClient".to_string())?;

        Ok(
            Self::new(
                api_key,
                config.model.clone(),
                config.base_url.clone(),
                config.max_tokens,
                config.temperature
            )
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url.trim_end_matches('/'), self.model)
    }
}

#[async_trait]
impl ChatClient for HuggingFaceChatClient {
    async fn complete(
        &self,
        prompt: &str
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>> {
        let url = self.endpoint();
        info!("HuggingFaceChatClient::complete() → model={} url={}", self.model, url);

        let req = InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters {
                max_new_tokens: self.max_new_tokens,
                temperature: self.temperature,
                return_full_text: false,
            },
        };
        let resp = self.http.post(&url).bearer_auth(&self.api_key).json(&req).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            // Error bodies usually carry {"error": ...}; fall back to the status line.
            return match extract_generated_text(&body) {
                Err(e) => Err(format!("HTTP {}: {}", status, e).into()),
                Ok(_) => Err(format!("HTTP error: {}", status).into()),
            };
        }
        let text = extract_generated_text(&body)?;
        Ok(CompletionResponse { response: text })
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_first_generation_of_a_batch() {
        let text = extract_generated_text(
            r#"[{"generated_text":"  You're not alone. "},{"generated_text":"second"}]"#
        ).unwrap();
        assert_eq!(text, "You're not alone.");
    }

    #[test]
    fn reads_single_generation() {
        let text = extract_generated_text(r#"{"generated_text":"hello"}"#).unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn error_payload_becomes_error() {
        let err = extract_generated_text(r#"{"error":"Model is currently loading"}"#).unwrap_err();
        assert!(err.to_string().contains("Model is currently loading"));
        assert!(extract_generated_text("[]").is_err());
        assert!(extract_generated_text("<html>").is_err());
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let client = HuggingFaceChatClient::new(
            "k".into(),
            Some("org/model".into()),
            Some("http://localhost:8080/".into()),
            None,
            None
        );
        assert_eq!(client.endpoint(), "http://localhost:8080/models/org/model");
        assert_eq!(client.max_new_tokens, DEFAULT_MAX_NEW_TOKENS);
    }
}
