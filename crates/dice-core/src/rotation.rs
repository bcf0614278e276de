//! Cumulative cube rotation and the face-landing calculator.
//!
//! The die's visual model is rotated by two cumulative angles, one per axis.
//! The angles are never wrapped: every roll adds several full turns so the
//! cube always appears to spin forward, then lands so that the angle modulo a
//! full turn equals the target face's resting angle.
//!
//! [`next_angle`] is the per-axis calculation. [`Orientation::advance_to`]
//! applies it to both axes with independently drawn spin counts so the axes
//! do not turn in lockstep.

use serde::{Deserialize, Serialize};

use crate::face::FaceValue;
use crate::random::RollRng;
use crate::DiceError;

/// Degrees in one full turn.
pub const DEGREES_PER_TURN: f64 = 360.0;

/// Tolerance used when comparing wrapped angles.
const ANGLE_EPSILON: f64 = 1e-9;

// ---------------------------------------------------------------------------
// SpinRange
// ---------------------------------------------------------------------------

/// Range of extra full turns added per roll: `[min_turns, min_turns + variance)`.
///
/// This is a presentation parameter. Any range with `min_turns >= 1` keeps
/// the forward-motion guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinRange {
    /// Lower bound (inclusive) on extra turns. Default: 3.
    pub min_turns: f64,
    /// Width of the range. Default: 3, giving `[3, 6)`.
    pub variance: f64,
}

impl Default for SpinRange {
    fn default() -> Self {
        Self {
            min_turns: 3.0,
            variance: 3.0,
        }
    }
}

impl SpinRange {
    /// Check that the range is finite, non-negative in width, and spins at
    /// least one full turn.
    ///
    /// # Errors
    ///
    /// Returns [`DiceError::InvalidSpinRange`] otherwise.
    pub fn validate(&self) -> Result<(), DiceError> {
        let ok = self.min_turns.is_finite()
            && self.variance.is_finite()
            && self.min_turns >= 1.0
            && self.variance >= 0.0;
        if ok {
            Ok(())
        } else {
            Err(DiceError::InvalidSpinRange {
                min_turns: self.min_turns,
                variance: self.variance,
            })
        }
    }

    /// Exclusive upper bound on turns (equal to `min_turns` when `variance` is 0).
    pub fn max_turns(&self) -> f64 {
        self.min_turns + self.variance
    }

    /// Map a unit sample in `[0, 1)` onto the range.
    pub fn lerp(&self, unit: f64) -> f64 {
        self.min_turns + unit * self.variance
    }
}

// ---------------------------------------------------------------------------
// next_angle
// ---------------------------------------------------------------------------

/// Compute the next cumulative angle for one axis.
///
/// Adds `spins` full turns to `current`, snaps down to a whole turn, then
/// offsets by `target_face_angle`. While the snapped result falls short of
/// `current + spins * 360` it is carried forward one more turn, so the result
/// is never behind the rough target.
///
/// For finite input with `spins >= 1`:
///
/// - `result > current`
/// - `(result - target_face_angle) mod 360 == 0`
/// - `current + spins * 360 <= result < current + spins * 360 + 360`
///
/// Non-finite input trips a debug assertion.
pub fn next_angle(current: f64, target_face_angle: f64, spins: f64) -> f64 {
    debug_assert!(current.is_finite(), "current angle must be finite, got {current}");
    debug_assert!(
        target_face_angle.is_finite(),
        "target face angle must be finite, got {target_face_angle}"
    );
    debug_assert!(spins.is_finite(), "spins must be finite, got {spins}");

    let rough_target = current + spins * DEGREES_PER_TURN;
    let base = (rough_target / DEGREES_PER_TURN).floor() * DEGREES_PER_TURN;

    let mut result = base + target_face_angle;
    // At most two carries for targets in [-180, 180].
    while result < rough_target {
        result += DEGREES_PER_TURN;
    }
    result
}

/// Wrap an angle into `[0, 360)`.
pub fn wrap_degrees(angle: f64) -> f64 {
    angle.rem_euclid(DEGREES_PER_TURN)
}

/// Whether two angles point the same way modulo a full turn.
pub fn same_heading(a: f64, b: f64) -> bool {
    let diff = wrap_degrees(a - b);
    diff < ANGLE_EPSILON || DEGREES_PER_TURN - diff < ANGLE_EPSILON
}

// ---------------------------------------------------------------------------
// Orientation
// ---------------------------------------------------------------------------

/// Cumulative rotation of the die's visual model, in degrees per axis.
///
/// Starts at [`Orientation::ZERO`] (face 1 toward the viewer) and only grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub x: f64,
    pub y: f64,
}

impl Orientation {
    /// No rotation: the pose before the first roll.
    pub const ZERO: Orientation = Orientation { x: 0.0, y: 0.0 };

    /// Build an orientation from explicit angles.
    ///
    /// # Errors
    ///
    /// Returns [`DiceError::NonFiniteAngle`] if either angle is NaN or infinite.
    pub fn new(x: f64, y: f64) -> Result<Self, DiceError> {
        for angle in [x, y] {
            if !angle.is_finite() {
                return Err(DiceError::NonFiniteAngle { angle });
            }
        }
        Ok(Self { x, y })
    }

    /// The orientation after spinning `spins_x` / `spins_y` turns and landing
    /// on `face`.
    pub fn advance_to(self, face: FaceValue, spins_x: f64, spins_y: f64) -> Self {
        let target = face.target();
        Self {
            x: next_angle(self.x, target.x, spins_x),
            y: next_angle(self.y, target.y, spins_y),
        }
    }

    /// Like [`advance_to`](Self::advance_to), drawing both spin counts from `rng`
    /// (X first, then Y).
    pub fn roll_to(self, face: FaceValue, rng: &mut dyn RollRng, range: &SpinRange) -> Self {
        let spins_x = rng.spins(range);
        let spins_y = rng.spins(range);
        self.advance_to(face, spins_x, spins_y)
    }

    /// Whether this orientation presents `face` to the viewer.
    pub fn rests_on(&self, face: FaceValue) -> bool {
        let target = face.target();
        same_heading(self.x, target.x) && same_heading(self.y, target.y)
    }

    /// Both angles wrapped into `[0, 360)`.
    pub fn wrapped(&self) -> (f64, f64) {
        (wrap_degrees(self.x), wrap_degrees(self.y))
    }

    /// CSS-style transform string for the cube, X rotation applied first.
    pub fn to_css_transform(&self) -> String {
        format!("rotateX({}deg) rotateY({}deg)", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- 1. next_angle basics -----------------------------------------------

    #[test]
    fn zero_target_from_zero_lands_on_whole_turn() {
        let result = next_angle(0.0, 0.0, 3.5);
        assert_eq!(result, 1440.0);
    }

    #[test]
    fn negative_target_from_zero() {
        // rough = 1512, base = 1440, 1440 - 90 = 1350 < 1512 -> 1710
        let result = next_angle(0.0, -90.0, 4.2);
        assert_eq!(result, 1710.0);
    }

    #[test]
    fn exact_whole_turns_do_not_carry() {
        // rough = 1080 exactly, base + 0 == rough, no carry.
        assert_eq!(next_angle(0.0, 0.0, 3.0), 1080.0);
    }

    #[test]
    fn positive_target_ahead_of_rough_is_kept() {
        // rough = 1100, base = 1080, 1080 + 90 = 1170 >= 1100.
        let spins = 1100.0 / 360.0;
        assert_eq!(next_angle(0.0, 90.0, spins), 1170.0);
    }

    #[test]
    fn far_negative_target_carries_twice() {
        // rough = 1430, base = 1080, 1080 - 180 = 900 -> 1260 -> 1620.
        let spins = 1430.0 / 360.0;
        let result = next_angle(0.0, -180.0, spins);
        assert_eq!(result, 1620.0);
        assert!(result >= 1430.0);
    }

    #[test]
    fn negative_current_moves_forward() {
        let result = next_angle(-725.0, 180.0, 3.0);
        assert!(result > -725.0);
        assert!(same_heading(result, 180.0));
    }

    // -- 2. Orientation -----------------------------------------------------

    #[test]
    fn zero_rests_on_face_one_only() {
        assert!(Orientation::ZERO.rests_on(FaceValue::ONE));
        for face in &FaceValue::ALL[1..] {
            assert!(!Orientation::ZERO.rests_on(*face));
        }
    }

    #[test]
    fn advance_to_face_four() {
        let next = Orientation::ZERO.advance_to(FaceValue::FOUR, 3.5, 4.2);
        assert_eq!(next, Orientation { x: 1440.0, y: 1710.0 });
        assert_eq!(next.wrapped(), (0.0, 270.0));
        assert!(next.rests_on(FaceValue::FOUR));
    }

    #[test]
    fn new_rejects_non_finite() {
        assert!(Orientation::new(0.0, f64::NAN).is_err());
        assert!(Orientation::new(f64::INFINITY, 0.0).is_err());
        assert!(Orientation::new(12.5, -3.0).is_ok());
    }

    #[test]
    fn css_transform_orders_x_then_y() {
        let o = Orientation { x: 1440.0, y: 1710.0 };
        assert_eq!(o.to_css_transform(), "rotateX(1440deg) rotateY(1710deg)");
    }

    // -- 3. SpinRange -------------------------------------------------------

    #[test]
    fn default_range_is_three_to_six() {
        let range = SpinRange::default();
        assert_eq!(range.min_turns, 3.0);
        assert_eq!(range.max_turns(), 6.0);
        assert_eq!(range.lerp(0.0), 3.0);
        assert!(range.lerp(0.999_999) < 6.0);
        assert!(range.validate().is_ok());
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        let bad = [
            SpinRange { min_turns: 0.5, variance: 1.0 },
            SpinRange { min_turns: 3.0, variance: -1.0 },
            SpinRange { min_turns: f64::NAN, variance: 1.0 },
        ];
        for range in bad {
            assert!(range.validate().is_err(), "{range:?} should be rejected");
        }
    }

    // -- 4. Debug assertions ------------------------------------------------

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "must be finite")]
    fn nan_current_panics_in_debug() {
        next_angle(f64::NAN, 0.0, 3.0);
    }
}
