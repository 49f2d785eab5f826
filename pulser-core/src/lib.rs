//! Board independent half of the quadrature pulser.
//!
//! [`decoder::QuadratureDecoder`] turns phase transitions into movements and only lets
//! through the ones that agree with the transition before them.
//! [`shaper::PulseShaper`] turns each accepted transition into a fixed-width pulse on
//! an output pin using a one-shot hardware timer. [`pulser::EdgePulser`] wires the two
//! together behind the interrupt entry points.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

use core::convert::Infallible;

pub mod decoder;
pub mod error;
pub mod movement;
pub mod pulser;
pub mod shaper;
pub mod timing;

pub use decoder::{PhaseInput, QuadratureDecoder, Transition};
pub use error::Error;
pub use movement::{Movement, PhasePair, TransitionCode, MOVEMENT_TABLE};
pub use pulser::EdgePulser;
pub use shaper::{Active, PulseShaper, PulseTimer, ShaperState};

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
