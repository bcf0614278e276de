//! Dice Commentary -- The text-generation collaborator that reads a fortune
//! into a rolled face.
//!
//! The roll engine depends on exactly one capability from this crate:
//! [`Commentator::interpret`], an async call that turns a [`FaceValue`] into a
//! short line of text or fails. Failures never reach the engine as errors:
//! [`interpret_or_fallback`] logs them and substitutes a fixed fallback line.
//!
//! # Architecture
//!
//! - **`Commentator`**: the one-operation trait. Swap providers or mock it in
//!   tests by implementing it.
//! - **`GeminiCommentator`**: REST client for the Gemini `generateContent` API.
//! - **`CannedCommentator`**: in-process lines, no network.
//! - **`CommentaryConfig`**: credential, model, endpoint, sampling and timeout.
//! - **`CommentaryError`**: unconfigured, transport, status, malformed, empty.
//!
//! # Example
//!
//! ```
//! use dice_commentary::{interpret_or_fallback, CannedCommentator, Commentator};
//! use dice_core::face::FaceValue;
//!
//! # tokio_test_block(async {
//! let oracle = CannedCommentator::new(["大吉"]);
//! assert!(oracle.is_configured());
//! let line = interpret_or_fallback(&oracle, FaceValue::SIX).await;
//! assert_eq!(line, "大吉");
//! # });
//! # fn tokio_test_block(f: impl std::future::Future<Output = ()>) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

#![deny(unsafe_code)]

mod canned;
pub mod config;
pub mod gemini;

use async_trait::async_trait;
use dice_core::face::FaceValue;

pub use canned::CannedCommentator;
pub use config::CommentaryConfig;
pub use gemini::GeminiCommentator;

// ---------------------------------------------------------------------------
// Fallback lines
// ---------------------------------------------------------------------------

/// Shown when no credential is configured.
pub const FALLBACK_UNCONFIGURED: &str = "请配置 API KEY 以获取 AI 解读。";

/// Shown when the service answers with no text.
pub const FALLBACK_SILENT: &str = "命运之神保持沉默...";

/// Shown when the service cannot be reached or answers with an error.
pub const FALLBACK_UNAVAILABLE: &str = "云端连接似乎有些波动...";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by a commentary request.
#[derive(Debug, thiserror::Error)]
pub enum CommentaryError {
    /// No usable credential.
    #[error("commentary service is not configured (no API credential)")]
    Unconfigured,

    /// The request could not be sent or the response body not read.
    #[error("commentary transport failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("commentary service returned HTTP {status}: {body}")]
    Status {
        status: u16,
        body: String,
    },

    /// The response body was not the expected shape.
    #[error("malformed commentary response: {0}")]
    Malformed(String),

    /// The response parsed but carried no text.
    #[error("commentary response contained no text")]
    Empty,
}

impl CommentaryError {
    /// The fixed line the engine shows in place of this error.
    pub fn fallback_text(&self) -> &'static str {
        match self {
            CommentaryError::Unconfigured => FALLBACK_UNCONFIGURED,
            CommentaryError::Empty => FALLBACK_SILENT,
            CommentaryError::Transport(_)
            | CommentaryError::Status { .. }
            | CommentaryError::Malformed(_) => FALLBACK_UNAVAILABLE,
        }
    }
}

impl From<reqwest::Error> for CommentaryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CommentaryError::Malformed(e.to_string())
        } else {
            CommentaryError::Transport(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Commentator
// ---------------------------------------------------------------------------

/// A source of one-line commentary for a rolled face.
#[async_trait]
pub trait Commentator: Send + Sync {
    /// Whether a credential (or equivalent) is available. The engine skips
    /// the request entirely when this is `false`.
    fn is_configured(&self) -> bool {
        true
    }

    /// Produce commentary for `value`.
    ///
    /// # Errors
    ///
    /// Any [`CommentaryError`]; callers normally go through
    /// [`interpret_or_fallback`] instead of handling these.
    async fn interpret(&self, value: FaceValue) -> Result<String, CommentaryError>;
}

/// Ask `commentator` about `value`, converting any failure into its fixed
/// fallback line. Never fails.
pub async fn interpret_or_fallback(commentator: &dyn Commentator, value: FaceValue) -> String {
    match commentator.interpret(value).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, value = value.get(), "commentary request failed -- using fallback");
            e.fallback_text().to_owned()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    #[async_trait]
    impl Commentator for Broken {
        async fn interpret(&self, _value: FaceValue) -> Result<String, CommentaryError> {
            Err(CommentaryError::Transport("connection refused".to_owned()))
        }
    }

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(f)
    }

    #[test]
    fn fallback_text_per_error() {
        assert_eq!(CommentaryError::Unconfigured.fallback_text(), FALLBACK_UNCONFIGURED);
        assert_eq!(CommentaryError::Empty.fallback_text(), FALLBACK_SILENT);
        assert_eq!(
            CommentaryError::Status { status: 503, body: String::new() }.fallback_text(),
            FALLBACK_UNAVAILABLE
        );
        assert_eq!(
            CommentaryError::Malformed("eof".to_owned()).fallback_text(),
            FALLBACK_UNAVAILABLE
        );
    }

    #[test]
    fn failure_becomes_fallback() {
        let line = block_on(interpret_or_fallback(&Broken, FaceValue::THREE));
        assert_eq!(line, FALLBACK_UNAVAILABLE);
    }

    #[test]
    fn default_is_configured() {
        assert!(Broken.is_configured());
    }

    #[test]
    fn status_error_message() {
        let e = CommentaryError::Status { status: 429, body: "quota".to_owned() };
        assert_eq!(e.to_string(), "commentary service returned HTTP 429: quota");
    }
}
