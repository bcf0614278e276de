//! Offline commentator.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dice_core::face::FaceValue;

use crate::{Commentator, CommentaryError};

/// Cycles through a fixed list of lines. `{value}` in a line is replaced by
/// the rolled face. An empty list answers [`CommentaryError::Empty`].
#[derive(Debug, Default)]
pub struct CannedCommentator {
    lines: Vec<String>,
    next: AtomicUsize,
}

impl CannedCommentator {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            next: AtomicUsize::new(0),
        }
    }

    /// How many lines have been handed out.
    pub fn calls(&self) -> usize {
        self.next.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Commentator for CannedCommentator {
    async fn interpret(&self, value: FaceValue) -> Result<String, CommentaryError> {
        if self.lines.is_empty() {
            return Err(CommentaryError::Empty);
        }
        let i = self.next.fetch_add(1, Ordering::Relaxed) % self.lines.len();
        Ok(self.lines[i].replace("{value}", &value.to_string()))
    }
}
