use crate::movement::{Movement, PhasePair, TransitionCode};

/// Source of the phase levels.
///
/// Implementations must sample both phases at once (a single port read), otherwise an
/// edge landing between two reads shows up as a double change.
pub trait PhaseInput {
    fn read_phases(&mut self) -> PhasePair;
}

/// Outcome of a single phase transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub code: TransitionCode,
    pub movement: Movement,
    /// The movement agreed with the previous transition, a pulse should follow.
    pub validated: bool,
}

/// Decoder with a one-transition look-back.
///
/// An edge is only forwarded when its movement equals the movement of the transition
/// before it, so a single reversed transition (bounce around a detent) never produces
/// a pulse.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuadratureDecoder {
    previous_phases: PhasePair,
    previous_movement: Movement,
}

impl QuadratureDecoder {
    /// `initial` should be sampled from the inputs before their interrupts are enabled.
    pub fn new(initial: PhasePair) -> Self {
        Self { previous_phases: initial, previous_movement: Movement::Still }
    }

    pub fn previous_phases(&self) -> PhasePair {
        self.previous_phases
    }

    pub fn previous_movement(&self) -> Movement {
        self.previous_movement
    }

    pub fn transition(&mut self, current: PhasePair) -> Transition {
        let code = TransitionCode::new(self.previous_phases, current);
        let movement = code.movement();

        // Literal equality: two consecutive `Still` transitions also validate.
        let validated = movement == self.previous_movement;

        self.previous_movement = movement;
        self.previous_phases = current;

        Transition { code, movement, validated }
    }

    /// Samples `input` once and runs the transition.
    pub fn poll<I: PhaseInput>(&mut self, input: &mut I) -> Transition {
        let current = input.read_phases();
        self.transition(current)
    }
}
