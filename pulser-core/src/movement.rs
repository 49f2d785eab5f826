/// Levels of the two encoder phases, packed as `0b000000AB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhasePair(u8);

impl PhasePair {
    pub const fn new(a_high: bool, b_high: bool) -> Self {
        Self(((a_high as u8) << 1) | b_high as u8)
    }

    /// Keeps only the low two bits, anything above is not a phase.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b11)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn a_high(self) -> bool {
        self.0 & 0b10 != 0
    }

    pub const fn b_high(self) -> bool {
        self.0 & 0b01 != 0
    }
}

/// Previous phase pair in the high half, current pair in the low half.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransitionCode(u8);

impl TransitionCode {
    pub const fn new(previous: PhasePair, current: PhasePair) -> Self {
        Self((previous.bits() << 2) | current.bits())
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b1111)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn previous(self) -> PhasePair {
        PhasePair::from_bits(self.0 >> 2)
    }

    pub const fn current(self) -> PhasePair {
        PhasePair::from_bits(self.0)
    }

    pub fn movement(self) -> Movement {
        MOVEMENT_TABLE[self.0 as usize]
    }
}

/// Signed one-step movement implied by a single transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(i8)]
pub enum Movement {
    Backward = -1,
    /// No movement, or a transition a clean quadrature signal can't produce.
    Still = 0,
    Forward = 1,
}

impl Movement {
    pub const fn as_i8(self) -> i8 {
        self as i8
    }

    pub const fn is_still(self) -> bool {
        matches!(self, Movement::Still)
    }
}

use Movement::{Backward as B, Forward as F, Still as S};

/// Movement for every transition code.
///
/// Forward is the Gray sequence `00 -> 10 -> 11 -> 01 -> 00` (phase A leading).
/// Codes where neither or both phases changed map to [`Movement::Still`].
pub static MOVEMENT_TABLE: [Movement; 16] = [
    // previous 00
    S, B, F, S, //
    // previous 01
    F, S, S, B, //
    // previous 10
    B, S, S, F, //
    // previous 11
    S, F, B, S, //
];
