//! Compile-time configuration. Nothing here changes at run time.

use pulser_core::{timing, Active, PulseTimer};

use crate::board::PulseTim;

/// TIM3 is prescaled down to this tick rate.
pub const TIMER_TICK_HZ: u32 = 1_000_000;
pub const TIMER_TICK_NS: u32 = 1_000_000_000 / TIMER_TICK_HZ;

/// Width of every output pulse. Has to stay well below the 125 us between phase
/// transitions at the rated input rate.
pub const PULSE_WIDTH_NS: u32 = 20_000;

/// Output polarity: the pin rests low and pulses high.
pub const PULSE_ACTIVE: Active = Active::High;

pub const PULSE_RELOAD: u32 =
    match timing::reload_value(PULSE_WIDTH_NS, TIMER_TICK_NS, <PulseTim as PulseTimer>::MAX_COUNT) {
        Ok(reload) => reload,
        Err(_) => panic!("PULSE_WIDTH_NS does not fit in one TIM3 period"),
    };

pub const BANNER_BAUD: u32 = 115_200;

/// Shared by the edge and timer interrupts so neither preempts the other.
pub const HANDLER_PRIORITY: u8 = 0x20;
