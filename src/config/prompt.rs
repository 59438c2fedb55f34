use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::sync::Arc;
use log::info;

use crate::safety::{ DEFAULT_CRISIS_KEYWORDS, DEFAULT_CRISIS_RESOURCES };

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a compassionate and supportive AI assistant designed to help people dealing with depression.
- Respond with empathy, understanding, and kindness.
- Avoid giving medical advice, but offer emotional support and encouragement.
- If the user expresses thoughts of self-harm or suicide, include crisis hotline information in your response.
- Suggest healthy coping strategies when appropriate.
- Keep responses concise but meaningful.";

pub const DEFAULT_EMPTY_PROMPT_ERROR: &str =
    "Please share how you're feeling or what you'd like to talk about.";

pub const DEFAULT_PROVIDER_ERROR: &str =
    "I'm sorry, I'm having trouble responding right now. Please try again or reach out to a support line if you need immediate help.";

#[derive(Debug)]
pub enum PromptError {
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    EmptySystemPrompt,
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::IoError(e) => write!(f, "Prompt file IO error: {}", e),
            PromptError::JsonError(e) => write!(f, "Prompt JSON parsing error: {}", e),
            PromptError::EmptySystemPrompt => write!(f, "Prompt file has an empty system_prompt"),
        }
    }
}

impl Error for PromptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PromptError::IoError(e) => Some(e),
            PromptError::JsonError(e) => Some(e),
            PromptError::EmptySystemPrompt => None,
        }
    }
}

impl From<std::io::Error> for PromptError {
    fn from(err: std::io::Error) -> Self {
        PromptError::IoError(err)
    }
}

impl From<serde_json::Error> for PromptError {
    fn from(err: serde_json::Error) -> Self {
        PromptError::JsonError(err)
    }
}

/// Texts the relay sends to the model and back to users. Every field is
/// optional in the JSON file and falls back to the built-in wording.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PromptConfig {
    pub system_prompt: String,
    pub crisis_keywords: Vec<String>,
    pub crisis_resources: String,
    pub empty_prompt_error: String,
    pub provider_error: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            crisis_keywords: DEFAULT_CRISIS_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            crisis_resources: DEFAULT_CRISIS_RESOURCES.to_string(),
            empty_prompt_error: DEFAULT_EMPTY_PROMPT_ERROR.to_string(),
            provider_error: DEFAULT_PROVIDER_ERROR.to_string(),
        }
    }
}

impl PromptConfig {
    fn validate(&self) -> Result<(), PromptError> {
        if self.system_prompt.trim().is_empty() {
            return Err(PromptError::EmptySystemPrompt);
        }
        Ok(())
    }
}

pub fn load_prompts_from_str(json: &str) -> Result<PromptConfig, PromptError> {
    let config: PromptConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

pub fn load_prompts(path: Option<&str>) -> Result<Arc<PromptConfig>, Box<dyn Error + Send + Sync>> {
    let Some(path) = path.filter(|p| !p.trim().is_empty()) else {
        info!("No prompts file configured, using built-in prompts.");
        return Ok(Arc::new(PromptConfig::default()));
    };
    let file_content = fs
        ::read_to_string(path)
        .map_err(|e| format!("Failed to read prompts file '{}': {}", path, e))?;
    let config = load_prompts_from_str(&file_content).map_err(|e|
        format!("Failed to parse prompts file '{}': {}", path, e)
    )?;
    info!("Loaded prompts from {}", path);
    Ok(Arc::new(config))
}

/// System prompt, then the session's history block if any, then the user's message.
pub fn build_prompt(config: &PromptConfig, history: &str, user_text: &str) -> String {
    let mut prompt = String::with_capacity(
        config.system_prompt.len() + history.len() + user_text.len() + 32
    );
    prompt.push_str(&config.system_prompt);
    prompt.push_str("\n\n");
    if !history.is_empty() {
        prompt.push_str(history);
        prompt.push('\n');
    }
    prompt.push_str("User message: ");
    prompt.push_str(user_text);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let config = load_prompts_from_str(r#"{"crisis_keywords":["give up"]}"#).unwrap();
        assert_eq!(config.crisis_keywords, vec!["give up".to_string()]);
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(config.empty_prompt_error, DEFAULT_EMPTY_PROMPT_ERROR);
    }

    #[test]
    fn blank_system_prompt_is_rejected() {
        let err = load_prompts_from_str(r#"{"system_prompt":"   "}"#).unwrap_err();
        assert!(matches!(err, PromptError::EmptySystemPrompt));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = load_prompts_from_str("{not json").unwrap_err();
        assert!(matches!(err, PromptError::JsonError(_)));
    }

    #[test]
    fn missing_path_uses_defaults() {
        let config = load_prompts(None).unwrap();
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert!(load_prompts(Some("/definitely/not/here.json")).is_err());
    }

    #[test]
    fn prompt_without_history_is_system_then_message() {
        let config = PromptConfig { system_prompt: "SYS".into(), ..Default::default() };
        assert_eq!(build_prompt(&config, "", "hello"), "SYS\n\nUser message: hello");
    }

    #[test]
    fn history_sits_between_system_prompt_and_message() {
        let config = PromptConfig { system_prompt: "SYS".into(), ..Default::default() };
        let prompt = build_prompt(&config, "Previous conversation:\nUser: a\nBot: b\n", "c");
        assert_eq!(prompt, "SYS\n\nPrevious conversation:\nUser: a\nBot: b\n\nUser message: c");
    }
}
