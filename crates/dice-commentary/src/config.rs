//! Commentary service configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable holding the optional API credential.
pub const API_KEY_ENV: &str = "API_KEY";

/// Default model name.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default API root (the model path and method are appended).
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for [`GeminiCommentator`](crate::GeminiCommentator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentaryConfig {
    /// API credential. `None` means unconfigured: the engine will not ask.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model name. Default: `gemini-2.5-flash`.
    pub model: String,
    /// API root URL. Default: the public Generative Language endpoint.
    pub endpoint: String,
    /// Sampling temperature. Default: 1.2.
    pub temperature: f32,
    /// Per-request timeout. Default: 15 s.
    pub timeout: Duration,
}

impl Default for CommentaryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_owned(),
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            temperature: 1.2,
            timeout: Duration::from_secs(15),
        }
    }
}

impl CommentaryConfig {
    /// Defaults plus the credential from `API_KEY`, if set and non-empty.
    pub fn from_env() -> Self {
        Self::default().with_api_key(std::env::var(API_KEY_ENV).ok())
    }

    /// Replace the credential. Blank strings count as absent.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key
            .map(|k| k.trim().to_owned())
            .filter(|k| !k.is_empty());
        self
    }

    /// Whether a credential is present.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Full URL of the `generateContent` method for the configured model.
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CommentaryConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert!((config.temperature - 1.2).abs() < f32::EPSILON);
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert!(!config.is_configured());
    }

    #[test]
    fn blank_key_is_unconfigured() {
        let config = CommentaryConfig::default().with_api_key(Some("   ".to_owned()));
        assert!(!config.is_configured());

        let config = CommentaryConfig::default().with_api_key(Some(" k-123 ".to_owned()));
        assert_eq!(config.api_key.as_deref(), Some("k-123"));
    }

    #[test]
    fn generate_url_joins_parts() {
        let config = CommentaryConfig {
            endpoint: "http://localhost:8080/v1beta/".to_owned(),
            ..Default::default()
        };
        assert_eq!(
            config.generate_url(),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn serialized_config_omits_the_key() {
        let config = CommentaryConfig::default().with_api_key(Some("secret".to_owned()));
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
