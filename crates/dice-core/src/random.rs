//! Randomness capability for rolls.
//!
//! The engine never touches a global RNG. Everything it draws goes through a
//! [`RollRng`]: uniform faces over `1..=6` and uniform continuous spin counts
//! over a [`SpinRange`]. Gameplay-quality randomness only.
//!
//! - [`SeededRng`] wraps a PCG generator. A fixed seed gives a reproducible
//!   session; [`SeededRng::from_entropy`] gives a fresh one.
//! - [`ScriptedRng`] replays fixed sequences, for tests and demos.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::face::FaceValue;
use crate::rotation::SpinRange;

// ---------------------------------------------------------------------------
// RollRng
// ---------------------------------------------------------------------------

/// Source of face values and spin counts.
pub trait RollRng: Send {
    /// A face drawn uniformly from `1..=6`.
    fn face(&mut self) -> FaceValue;

    /// A spin count drawn uniformly from `[range.min_turns, range.max_turns())`.
    fn spins(&mut self, range: &SpinRange) -> f64;
}

// ---------------------------------------------------------------------------
// SeededRng
// ---------------------------------------------------------------------------

/// PCG-backed [`RollRng`].
#[derive(Debug, Clone)]
pub struct SeededRng {
    rng: Pcg64,
}

impl SeededRng {
    /// Deterministic generator: the same seed yields the same draws.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    /// Generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: Pcg64::from_entropy(),
        }
    }
}

impl RollRng for SeededRng {
    fn face(&mut self) -> FaceValue {
        FaceValue::ALL[self.rng.gen_range(0..FaceValue::ALL.len())]
    }

    fn spins(&mut self, range: &SpinRange) -> f64 {
        range.lerp(self.rng.gen::<f64>())
    }
}

// ---------------------------------------------------------------------------
// ScriptedRng
// ---------------------------------------------------------------------------

/// [`RollRng`] that hands out pre-arranged values in order.
///
/// Once a script runs out, faces fall back to face 1 and spins fall back to
/// the range's lower bound. Scripted spins are returned verbatim, even if
/// they lie outside the requested range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    faces: VecDeque<FaceValue>,
    spins: VecDeque<f64>,
}

impl ScriptedRng {
    pub fn new(
        faces: impl IntoIterator<Item = FaceValue>,
        spins: impl IntoIterator<Item = f64>,
    ) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            spins: spins.into_iter().collect(),
        }
    }

    /// Queue another face.
    pub fn push_face(&mut self, face: FaceValue) {
        self.faces.push_back(face);
    }

    /// Queue another spin count.
    pub fn push_spins(&mut self, spins: f64) {
        self.spins.push_back(spins);
    }

    /// Faces not yet drawn.
    pub fn remaining_faces(&self) -> usize {
        self.faces.len()
    }
}

impl RollRng for ScriptedRng {
    fn face(&mut self) -> FaceValue {
        self.faces.pop_front().unwrap_or_else(|| {
            tracing::trace!("face script exhausted, drawing {}", FaceValue::default());
            FaceValue::default()
        })
    }

    fn spins(&mut self, range: &SpinRange) -> f64 {
        self.spins.pop_front().unwrap_or_else(|| {
            tracing::trace!(min_turns = range.min_turns, "spin script exhausted");
            range.min_turns
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
