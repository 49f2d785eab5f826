use core::convert::Infallible;
use embedded_hal::digital::v2::{StatefulOutputPin, ToggleableOutputPin};

use crate::{
    decoder::{PhaseInput, QuadratureDecoder, Transition},
    shaper::{PulseShaper, PulseTimer},
};

/// The whole edge-to-pulse path: phase input, decoder and shaper.
///
/// Both methods are meant to be the body of an interrupt handler and never block.
pub struct EdgePulser<I, P, T> {
    input: I,
    decoder: QuadratureDecoder,
    shaper: PulseShaper<P, T>,
}

impl<I, P, T> EdgePulser<I, P, T>
where
    I: PhaseInput,
    P: StatefulOutputPin<Error = Infallible> + ToggleableOutputPin<Error = Infallible>,
    T: PulseTimer,
{
    /// Seeds the decoder with the current phase levels.
    pub fn new(mut input: I, shaper: PulseShaper<P, T>) -> Self {
        let initial = input.read_phases();
        Self { input, decoder: QuadratureDecoder::new(initial), shaper }
    }

    /// Handles a transition on either phase.
    pub fn on_phase_edge(&mut self) -> Transition {
        let transition = self.decoder.poll(&mut self.input);
        if transition.validated {
            self.shaper.trigger();
        }
        transition
    }

    /// Handles the timer interrupt. Returns whether the timer had actually expired,
    /// a stale pending interrupt is ignored.
    pub fn on_timer_expiry(&mut self) -> bool {
        self.shaper.expire_if_due()
    }

    pub fn decoder(&self) -> &QuadratureDecoder {
        &self.decoder
    }

    pub fn shaper(&self) -> &PulseShaper<P, T> {
        &self.shaper
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }
}
