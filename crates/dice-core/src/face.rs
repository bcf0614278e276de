//! Face values and the fixed orientation that presents each face.
//!
//! A [`FaceValue`] is the number on the die's upward face after a roll. Each
//! face has a [`FaceTarget`]: the pair of X/Y angles (degrees, within
//! `[-180, 180]`) at which the cube shows that face to the viewer. The table
//! is static and is the only source the rotation calculator consults.
//!
//! Faces are laid out on the cube as follows (unrotated cube, viewer looking
//! down -Z):
//!
//! | face | cube side | target (x, y) |
//! |------|-----------|---------------|
//! | 1    | front     | (0, 0)        |
//! | 2    | bottom    | (90, 0)       |
//! | 3    | left      | (0, 90)       |
//! | 4    | right     | (0, -90)      |
//! | 5    | top       | (-90, 0)      |
//! | 6    | back      | (180, 0)      |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DiceError;

// ---------------------------------------------------------------------------
// FaceValue
// ---------------------------------------------------------------------------

/// The upward face of the die, always in `1..=6`.
///
/// Construct through [`FaceValue::new`] or the associated constants; the
/// invariant is enforced at construction and on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FaceValue(u8);

impl FaceValue {
    pub const ONE: FaceValue = FaceValue(1);
    pub const TWO: FaceValue = FaceValue(2);
    pub const THREE: FaceValue = FaceValue(3);
    pub const FOUR: FaceValue = FaceValue(4);
    pub const FIVE: FaceValue = FaceValue(5);
    pub const SIX: FaceValue = FaceValue(6);

    /// All six faces in ascending order.
    pub const ALL: [FaceValue; 6] = [
        Self::ONE,
        Self::TWO,
        Self::THREE,
        Self::FOUR,
        Self::FIVE,
        Self::SIX,
    ];

    /// Validate a raw value.
    ///
    /// # Errors
    ///
    /// Returns [`DiceError::InvalidFace`] if `value` is not in `1..=6`.
    pub fn new(value: u8) -> Result<Self, DiceError> {
        if (1..=6).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DiceError::InvalidFace { value })
        }
    }

    /// The numeric value.
    pub fn get(self) -> u8 {
        self.0
    }

    /// The orientation at which this face points toward the viewer.
    pub fn target(self) -> FaceTarget {
        FACE_TARGETS[self.index()]
    }

    /// Cells of a row-major 3x3 grid (0 = top-left, 8 = bottom-right) that
    /// carry a pip on this face.
    pub fn pip_cells(self) -> &'static [u8] {
        const PIPS: [&[u8]; 6] = [
            &[4],
            &[0, 8],
            &[0, 4, 8],
            &[0, 2, 6, 8],
            &[0, 2, 4, 6, 8],
            &[0, 2, 3, 5, 6, 8],
        ];
        PIPS[self.index()]
    }

    fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl Default for FaceValue {
    /// Face 1: the face shown before any roll.
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<u8> for FaceValue {
    type Error = DiceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FaceValue> for u8 {
    fn from(face: FaceValue) -> Self {
        face.0
    }
}

impl fmt::Display for FaceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// FaceTarget
// ---------------------------------------------------------------------------

/// Resting X/Y angles (degrees) that present a face to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceTarget {
    pub x: f64,
    pub y: f64,
}

/// Target orientation per face, indexed by `face - 1`.
pub const FACE_TARGETS: [FaceTarget; 6] = [
    FaceTarget { x: 0.0, y: 0.0 },
    FaceTarget { x: 90.0, y: 0.0 },
    FaceTarget { x: 0.0, y: 90.0 },
    FaceTarget { x: 0.0, y: -90.0 },
    FaceTarget { x: -90.0, y: 0.0 },
    FaceTarget { x: 180.0, y: 0.0 },
];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
