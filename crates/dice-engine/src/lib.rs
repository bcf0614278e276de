//! Dice Engine -- Roll lifecycle for a single animated die.
//!
//! This crate builds on [`dice_core`] to provide the session driver: the
//! state machine that draws a face, hands it to the rotation calculator,
//! settles after the spin animation, keeps the history, and asks the
//! [`dice_commentary`] collaborator for a fortune.
//!
//! - [`session::RollSession`] is the synchronous state machine. It can be
//!   stepped by hand, which is how most tests drive it.
//! - [`driver::SessionDriver`] runs a session on Tokio: settle timer,
//!   commentary task, and a `watch` channel of [`snapshot::SessionView`]s for
//!   observers.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use dice_engine::prelude::*;
//!
//! let rng = ScriptedRng::new([FaceValue::SIX], []);
//! let mut session = RollSession::new(SessionConfig::default(), rng, Arc::new(SystemClock));
//!
//! session.request_roll();
//! session.settle();
//!
//! assert_eq!(session.current_value(), FaceValue::SIX);
//! assert!(session.orientation().rests_on(FaceValue::SIX));
//! assert_eq!(session.history().len(), 1);
//! ```

#![deny(unsafe_code)]

pub mod clock;
pub mod driver;
pub mod session;
pub mod snapshot;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

/// Re-export the core crate for convenience.
pub use dice_core;

/// Re-export the commentary crate for convenience.
pub use dice_commentary;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    // Re-export everything from the core prelude.
    pub use dice_core::prelude::*;

    // Engine-specific exports.
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::driver::{RollHandle, RollOutcome, SessionDriver};
    pub use crate::session::{
        CommentaryTicket, RollSession, RollStarted, SessionConfig, Settled, SETTLE_DURATION,
    };
    pub use crate::snapshot::SessionView;

    // Commentary types for convenient access.
    pub use dice_commentary::{
        interpret_or_fallback, CannedCommentator, Commentator, CommentaryConfig, CommentaryError,
        GeminiCommentator,
    };
}
