//! Observer-facing session snapshot with BLAKE3 hashing.
//!
//! [`SessionView`] is what a UI binding renders: the current face and its
//! pips, the cube orientation and spin duration, the phase, the history, the
//! AI toggle, and the interpretation slot. Views are plain data, published on
//! every change by the driver.
//!
//! [`SessionView::state_hash`] digests the serialized view. Two sessions that
//! went through the same rolls with the same seed and clock produce the same
//! hash, which is how determinism is tested.
//!
//! ```
//! use std::sync::Arc;
//! use dice_engine::prelude::*;
//!
//! let run = || {
//!     let mut session = RollSession::new(
//!         SessionConfig::default(),
//!         SeededRng::from_seed(9),
//!         Arc::new(ManualClock::new(0)),
//!     );
//!     for _ in 0..5 {
//!         session.request_roll();
//!         session.settle();
//!     }
//!     session.view().state_hash()
//! };
//! assert_eq!(run(), run());
//! assert_eq!(run().len(), 64);
//! ```

use dice_core::prelude::*;
use serde::{Deserialize, Serialize};

/// Read-only state of a session at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    /// Face shown (already the drawn face while rolling).
    pub current_value: FaceValue,
    /// Accepted-roll counter.
    pub roll_trigger: u64,
    /// Cumulative cube rotation to animate toward.
    pub orientation: Orientation,
    pub phase: RollPhase,
    /// Completed rolls, newest first.
    pub history: Vec<RollRecord>,
    pub ai_enabled: bool,
    pub interpretation: Option<String>,
    pub loading_commentary: bool,
    /// Spin animation length; equal to the settle delay.
    pub spin_duration_ms: u64,
}

impl SessionView {
    /// Pip cells of the current face (row-major 3x3 grid).
    pub fn pip_cells(&self) -> &'static [u8] {
        self.current_value.pip_cells()
    }

    /// Whether the settled value may be shown (hidden while spinning).
    pub fn shows_result(&self) -> bool {
        !self.phase.is_rolling()
    }

    /// CSS transition matching the settle delay.
    pub fn spin_transition(&self) -> String {
        format!("transform {}ms cubic-bezier(0.2, 0.8, 0.3, 1)", self.spin_duration_ms)
    }

    /// BLAKE3 hex digest (64 lowercase hex chars) of the serialized view.
    pub fn state_hash(&self) -> String {
        let json_bytes =
            serde_json::to_vec(self).expect("SessionView should always be JSON-serializable");
        blake3::hash(&json_bytes).to_hex().to_string()
    }
}
