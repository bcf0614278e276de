//! Dice Core -- Face values, rotation geometry, and roll history for a single
//! six-sided die.
//!
//! This crate holds the pure, synchronous parts of the die: which face is up,
//! the fixed orientation that shows each face to the viewer, the calculator
//! that turns a face into the next cumulative cube rotation, and the
//! newest-first record of past rolls. It performs no I/O and has no notion of
//! time beyond the timestamps it is handed.
//!
//! # Quick Start
//!
//! ```
//! use dice_core::prelude::*;
//!
//! let mut rng = ScriptedRng::new([FaceValue::FOUR], [3.5, 4.2]);
//! let face = rng.face();
//! let spins_x = rng.spins(&SpinRange::default());
//! let spins_y = rng.spins(&SpinRange::default());
//!
//! let orientation = Orientation::ZERO.advance_to(face, spins_x, spins_y);
//! assert!(orientation.rests_on(face));
//! assert!(orientation.x > 3.0 * 360.0);
//! ```

#![deny(unsafe_code)]

pub mod face;
pub mod history;
pub mod random;
pub mod rotation;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by die operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiceError {
    /// A face value outside `1..=6` was supplied.
    #[error("face value {value} is out of range (expected 1..=6)")]
    InvalidFace {
        value: u8,
    },

    /// An angle was NaN or infinite.
    #[error("angle {angle} is not finite")]
    NonFiniteAngle {
        angle: f64,
    },

    /// A spin range that cannot produce at least one forward turn.
    #[error("invalid spin range: min_turns={min_turns}, variance={variance}")]
    InvalidSpinRange {
        min_turns: f64,
        variance: f64,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::face::{FaceTarget, FaceValue, FACE_TARGETS};
    pub use crate::history::{RollHistory, RollPhase, RollRecord};
    pub use crate::random::{RollRng, ScriptedRng, SeededRng};
    pub use crate::rotation::{next_angle, Orientation, SpinRange, DEGREES_PER_TURN};
    pub use crate::DiceError;
}

// ---------------------------------------------------------------------------
// Integration Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn every_face_lands_from_zero() {
        for face in FaceValue::ALL {
            let orientation = Orientation::ZERO.advance_to(face, 3.0, 3.0);
            assert!(orientation.rests_on(face), "face {face} did not land");
            assert!(orientation.x > 0.0 && orientation.y > 0.0);
        }
    }

    #[test]
    fn consecutive_rolls_keep_moving_forward() {
        let mut rng = SeededRng::from_seed(7);
        let range = SpinRange::default();
        let mut orientation = Orientation::ZERO;

        for _ in 0..200 {
            let face = rng.face();
            let next = orientation.advance_to(face, rng.spins(&range), rng.spins(&range));
            assert!(next.x > orientation.x);
            assert!(next.y > orientation.y);
            assert!(next.rests_on(face));
            orientation = next;
        }
    }

    #[test]
    fn error_messages_name_the_value() {
        let err = FaceValue::new(9).unwrap_err();
        assert_eq!(err.to_string(), "face value 9 is out of range (expected 1..=6)");
    }
}
