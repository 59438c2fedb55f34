pub mod gemini;
pub mod huggingface;

use async_trait::async_trait;
use serde::Deserialize;
use std::error::Error as StdError;
use std::sync::Arc;
use super::{ LlmConfig, LlmType };
use self::gemini::GeminiChatClient;
use self::huggingface::HuggingFaceChatClient;

#[derive(Deserialize, Debug, Clone)]
pub struct CompletionResponse {
    pub response: String,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        prompt: &str
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> Option<String>;
}

pub fn new_client(
    config: &LlmConfig
) -> Result<Arc<dyn ChatClient>, Box<dyn StdError + Send + Sync>> {
    let client: Arc<dyn ChatClient> = match config.llm_type {
        LlmType::Gemini => {
            let specific_client = GeminiChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
        LlmType::HuggingFace => {
            let specific_client = HuggingFaceChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
    };
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_is_rejected_for_every_provider() {
        for llm_type in [LlmType::Gemini, LlmType::HuggingFace] {
            let config = LlmConfig { llm_type, ..Default::default() };
            let err = new_client(&config).err().expect("client should not build without a key");
            assert!(err.to_string().contains("API key"), "unexpected error: {}", err);
        }
    }

    #[test]
    fn huggingface_client_uses_adapter_defaults() {
        let config = LlmConfig {
            llm_type: LlmType::HuggingFace,
            api_key: Some("hf-test".into()),
            ..Default::default()
        };
        let client = new_client(&config).unwrap();
        assert_eq!(client.get_model(), huggingface::DEFAULT_MODEL);
        assert_eq!(client.get_base_url().as_deref(), Some(huggingface::DEFAULT_BASE_URL));
    }
}
