use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Chat LLM Provider Args ---
    /// Type of LLM provider for chat completion (gemini, huggingface)
    #[arg(long, env = "CHAT_LLM_TYPE", default_value = "gemini")]
    pub chat_llm_type: String,

    /// API key for Gemini. Required when CHAT_LLM_TYPE=gemini.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// API key for the Hugging Face Inference API. Required when CHAT_LLM_TYPE=huggingface.
    #[arg(long, env = "HF_API_KEY", hide_env_values = true)]
    pub hf_api_key: Option<String>,

    /// Model name for chat completion (e.g., gemini-1.5-flash, HuggingFaceH4/zephyr-7b-beta)
    #[arg(long, env = "CHAT_MODEL")] // No default, rely on adapter defaults if None
    pub chat_model: Option<String>,

    /// Base URL for the Chat LLM provider API
    #[arg(long, env = "CHAT_BASE_URL")] // No default, let adapters handle defaults if None
    pub chat_base_url: Option<String>,

    /// Upper bound on generated tokens per reply.
    #[arg(long, env = "CHAT_MAX_TOKENS")]
    pub chat_max_tokens: Option<u32>,

    /// Sampling temperature passed to the provider.
    #[arg(long, env = "CHAT_TEMPERATURE")]
    pub chat_temperature: Option<f32>,

    // --- History Args ---
    /// Include the rolling per-session conversation history in each prompt.
    #[arg(long, env = "HISTORY_ENABLED", default_value = "false")]
    pub history_enabled: bool,

    /// Number of history lines kept per session (one line per user or bot turn).
    #[arg(long, env = "HISTORY_MAX_LINES", default_value = "16")]
    pub history_max_lines: usize,

    /// Number of sessions whose history is kept; the least recently active is dropped first.
    #[arg(long, env = "HISTORY_MAX_SESSIONS", default_value = "1000")]
    pub history_max_sessions: usize,

    // --- Prompt / Safety Args ---
    /// Optional path to a JSON prompt configuration file. Built-in prompts are used when unset.
    #[arg(long, env = "PROMPTS_PATH")]
    pub prompts_path: Option<String>,

    /// Comma-separated crisis keywords overriding the configured set.
    #[arg(long, env = "CRISIS_KEYWORDS", value_delimiter = ',')]
    pub crisis_keywords: Option<Vec<String>>,

    // --- General App Args ---
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:5000")]
    pub server_addr: String,

    /// Optional path to the TLS certificate file (PEM format) for enabling HTTPS. Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format) for enabling HTTPS. Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

impl Args {
    /// API key for whichever provider `chat_llm_type` selects, ignoring blank values.
    pub fn provider_api_key(&self) -> Option<String> {
        let key = match self.chat_llm_type.to_lowercase().as_str() {
            "huggingface" | "hf" => self.hf_api_key.as_ref(),
            _ => self.gemini_api_key.as_ref(),
        };
        key.filter(|k| !k.trim().is_empty()).cloned()
    }
}

/// Arguments for the terminal chat client.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Terminal chat window for the Solace relay", long_about = None)]
pub struct ChatArgs {
    /// Base URL of a running relay.
    #[arg(long, env = "RELAY_URL", default_value = "http://127.0.0.1:5000")]
    pub relay_url: String,

    /// Start in dark mode regardless of the terminal's color scheme.
    #[arg(long, conflicts_with = "light")]
    pub dark: bool,

    /// Start in light mode regardless of the terminal's color scheme.
    #[arg(long)]
    pub light: bool,
}
