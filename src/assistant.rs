//! Optional generative-assistant capability
//!
//! The assistant is reserved for documentation features. It is detected from
//! the environment and injected into the pipeline as an `Option`; nothing in
//! the scan → write → verify flow depends on it.

use std::env;
use std::fmt;
use tracing::{info, warn};

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "DEPMINT_ASSISTANT_MODEL";
const DEFAULT_MODEL: &str = "gemini-pro";

#[derive(Clone, PartialEq, Eq)]
pub struct AssistantSettings {
    pub provider: String,
    pub model: String,
    api_key: String,
}

impl AssistantSettings {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider: "gemini".to_string(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Reads the assistant settings, `None` when no API key is set
    pub fn from_env() -> Option<Self> {
        let api_key = env::var(API_KEY_VAR).ok().filter(|k| !k.trim().is_empty());
        let Some(api_key) = api_key else {
            warn!(
                "{} not set, assistant features are disabled",
                API_KEY_VAR
            );
            return None;
        };

        let model = env::var(MODEL_VAR).unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        info!(model = %model, "Assistant configured");
        Some(Self::new(model, api_key))
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for AssistantSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistantSettings")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
