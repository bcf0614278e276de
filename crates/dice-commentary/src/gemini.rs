//! Gemini `generateContent` client.
//!
//! [`GeminiCommentator`] sends one prompt per roll and returns the first
//! candidate's text. The prompt asks for a very short fortune in Chinese.

use async_trait::async_trait;
use dice_core::face::FaceValue;
use serde::{Deserialize, Serialize};

use crate::config::CommentaryConfig;
use crate::{Commentator, CommentaryError};

/// Upper bound on how much of an error body is kept in [`CommentaryError::Status`].
const MAX_ERROR_BODY: usize = 512;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    pub temperature: f32,
    pub thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ThinkingConfig {
    pub thinking_budget: u32,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Content,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, trimmed. `None` if empty.
    pub(crate) fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

/// The instruction sent for a rolled face.
pub fn prompt_for(value: FaceValue) -> String {
    format!(
        "User just rolled a {value} on a six-sided die.\n\
         Act as a mystical fortune teller or a witty commentator.\n\
         Give a very short (max 20 words), fun, and creative interpretation of \
         what this number means for their luck right now.\n\
         Reply in Chinese."
    )
}

pub(crate) fn build_request(config: &CommentaryConfig, value: FaceValue) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            role: Some("user".to_owned()),
            parts: vec![Part {
                text: Some(prompt_for(value)),
            }],
        }],
        generation_config: GenerationConfig {
            temperature: config.temperature,
            thinking_config: ThinkingConfig { thinking_budget: 0 },
        },
    }
}

// ---------------------------------------------------------------------------
// GeminiCommentator
// ---------------------------------------------------------------------------

/// [`Commentator`] backed by the Gemini REST API.
pub struct GeminiCommentator {
    client: reqwest::Client,
    config: CommentaryConfig,
}

impl GeminiCommentator {
    /// Build a client. An absent credential is allowed: the commentator then
    /// reports itself unconfigured and every call returns
    /// [`CommentaryError::Unconfigured`].
    ///
    /// # Errors
    ///
    /// Returns [`CommentaryError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: CommentaryConfig) -> Result<Self, CommentaryError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("dice-commentary/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CommentaryError::Transport(format!("client error: {e}")))?;

        tracing::debug!(
            model = %config.model,
            configured = config.is_configured(),
            "commentary client ready"
        );

        Ok(Self { client, config })
    }

    /// Shorthand for `GeminiCommentator::new(CommentaryConfig::from_env())`.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn from_env() -> Result<Self, CommentaryError> {
        Self::new(CommentaryConfig::from_env())
    }

    pub fn config(&self) -> &CommentaryConfig {
        &self.config
    }
}

#[async_trait]
impl Commentator for GeminiCommentator {
    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn interpret(&self, value: FaceValue) -> Result<String, CommentaryError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(CommentaryError::Unconfigured)?;

        let response = self
            .client
            .post(self.config.generate_url())
            .header("x-goog-api-key", api_key)
            .json(&build_request(&self.config, value))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|&i| body.is_char_boundary(i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(CommentaryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let parsed: GenerateResponse = serde_json::from_slice(&bytes)
            .map_err(|e| CommentaryError::Malformed(e.to_string()))?;

        let text = parsed.text().ok_or(CommentaryError::Empty)?;
        tracing::trace!(value = value.get(), %text, "commentary received");
        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
