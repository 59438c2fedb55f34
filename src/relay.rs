use crate::cli::Args;
use crate::config::prompt::{ self, PromptConfig };
use crate::history::{ format_history_for_prompt, initialize_history_store, HistoryStore };
use crate::llm::{ LlmConfig, LlmType };
use crate::llm::chat::{ ChatClient, new_client as new_chat_client };
use crate::safety::CrisisDetector;

use log::{ info, warn, error };
use std::error::Error;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The user sent nothing to relay. Carries the guidance shown to the user.
    #[error("{0}")]
    EmptyPrompt(String),
    /// Any provider failure (network, auth, quota). Carries the apology shown to the user.
    #[error("{message}")]
    Provider {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl RelayError {
    pub fn user_message(&self) -> &str {
        match self {
            RelayError::EmptyPrompt(message) => message,
            RelayError::Provider { message, .. } => message,
        }
    }
}

pub struct ChatRelay {
    chat_client: Arc<dyn ChatClient>,
    history_store: Option<Arc<dyn HistoryStore>>,
    prompt_config: Arc<PromptConfig>,
    detector: CrisisDetector,
}

impl ChatRelay {
    pub fn new(
        chat_client: Arc<dyn ChatClient>,
        history_store: Option<Arc<dyn HistoryStore>>,
        prompt_config: Arc<PromptConfig>
    ) -> Self {
        let detector = CrisisDetector::new(
            &prompt_config.crisis_keywords,
            prompt_config.crisis_resources.clone()
        );
        Self { chat_client, history_store, prompt_config, detector }
    }

    pub fn with_detector(mut self, detector: CrisisDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn from_args(args: &Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let llm_type: LlmType = args.chat_llm_type
            .parse()
            .map_err(|e| format!("Invalid chat LLM type: {}", e))?;
        let api_key = args.provider_api_key();
        if api_key.is_none() {
            error!(
                "{} API key is missing. Please set {} in your .env file.",
                llm_type,
                match llm_type {
                    LlmType::Gemini => "GEMINI_API_KEY",
                    LlmType::HuggingFace => "HF_API_KEY",
                }
            );
        }
        let chat_config = LlmConfig {
            llm_type,
            api_key,
            model: args.chat_model.clone(),
            base_url: args.chat_base_url.clone(),
            max_tokens: args.chat_max_tokens,
            temperature: args.chat_temperature,
        };
        let chat_client = new_chat_client(&chat_config)?;
        info!(
            "Chat client configured: Type={}, Model={}, BaseURL={:?}",
            llm_type,
            chat_client.get_model(),
            chat_client.get_base_url().as_deref().unwrap_or("adapter default")
        );

        let prompt_config = prompt::load_prompts(args.prompts_path.as_deref())?;
        let history_store = initialize_history_store(args);
        let mut relay = Self::new(chat_client, history_store, prompt_config);

        if let Some(keywords) = &args.crisis_keywords {
            let detector = CrisisDetector::new(keywords, relay.prompt_config.crisis_resources.clone());
            if detector.keywords().is_empty() {
                warn!("CRISIS_KEYWORDS is set but empty; crisis detection is effectively disabled.");
            }
            relay = relay.with_detector(detector);
        }
        info!("Crisis keywords: {:?}", relay.detector().keywords());

        Ok(relay)
    }

    pub fn prompt_config(&self) -> &PromptConfig {
        &self.prompt_config
    }

    pub fn detector(&self) -> &CrisisDetector {
        &self.detector
    }

    pub async fn process_message(
        &self,
        session_id: &str,
        message: &str
    ) -> Result<String, RelayError> {
        if message.trim().is_empty() {
            return Err(RelayError::EmptyPrompt(self.prompt_config.empty_prompt_error.clone()));
        }

        let history_str = match &self.history_store {
            Some(store) => format_history_for_prompt(&store.recent_lines(session_id).await),
            None => String::new(),
        };
        let full_prompt = prompt::build_prompt(&self.prompt_config, &history_str, message);

        let completion = self.chat_client.complete(&full_prompt).await.map_err(|e| {
            error!("Error generating content for session {}: {}", session_id, e);
            RelayError::Provider {
                message: self.prompt_config.provider_error.clone(),
                source: e,
            }
        })?;

        if let Some(store) = &self.history_store {
            store.append_exchange(session_id, message, &completion.response).await;
        }

        if self.detector.is_crisis(message) {
            warn!("Crisis keywords detected in session {}; appending support resources", session_id);
        }
        Ok(self.detector.annotate(message, completion.response))
    }
}
