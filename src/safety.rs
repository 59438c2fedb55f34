//! Keyword-based crisis detection.
//!
//! A message is treated as a crisis message when its lowercased text
//! contains any of the configured keywords as a substring. Detection runs
//! on the user's input; the resources block is appended to the model's
//! reply only after generation succeeded.

pub const DEFAULT_CRISIS_KEYWORDS: [&str; 5] = [
    "kill myself",
    "end my life",
    "suicide",
    "self-harm",
    "hurt myself",
];

pub const DEFAULT_CRISIS_RESOURCES: &str = "I'm really worried about you. You don't have to go through this alone. Please consider reaching out to someone who can help:
- National Suicide Prevention Lifeline: 1-800-273-8255 (USA)
- Crisis Text Line: Text HOME to 741741
- Or call emergency services (911 in the USA) if you're in immediate danger.";

#[derive(Debug, Clone)]
pub struct CrisisDetector {
    keywords: Vec<String>,
    resources: String,
}

impl Default for CrisisDetector {
    fn default() -> Self {
        Self::new(DEFAULT_CRISIS_KEYWORDS, DEFAULT_CRISIS_RESOURCES)
    }
}

impl CrisisDetector {
    pub fn new<I, S>(keywords: I, resources: impl Into<String>) -> Self
        where I: IntoIterator<Item = S>, S: AsRef<str>
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Self { keywords, resources: resources.into() }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_crisis(&self, input: &str) -> bool {
        let lowered = input.to_lowercase();
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }

    /// Returns `response` with the resources block appended when `input` is a crisis message.
    pub fn annotate(&self, input: &str, response: String) -> String {
        if !self.is_crisis(input) {
            return response;
        }
        let mut annotated = response;
        annotated.push_str("\n\n");
        annotated.push_str(&self.resources);
        annotated
    }
}
