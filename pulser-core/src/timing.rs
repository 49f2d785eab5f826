//! Conversion from a pulse width to the counter value the one-shot timer is loaded with.
//!
//! The timer counts up from the loaded value and raises its expiry flag when it wraps
//! from `max_count` back to zero, so a load of `max_count + 1 - ticks` expires after
//! exactly `ticks` ticks. That holds only if the load also restarts the tick
//! prescaler (see [`crate::PulseTimer::load`]). A load landing mid-tick would otherwise
//! lose up to one tick.

use crate::error::Error;

/// Number of whole timer ticks covering `pulse_width_ns`, rounded up.
///
/// Rounding up keeps the pulse at least as wide as requested, which downstream counters
/// rely on.
pub const fn pulse_ticks(pulse_width_ns: u32, tick_ns: u32) -> Result<u32, Error> {
    if pulse_width_ns == 0 {
        return Err(Error::ZeroPulseWidth);
    }
    if tick_ns == 0 {
        return Err(Error::ZeroTickPeriod);
    }

    let ticks = pulse_width_ns / tick_ns;
    if pulse_width_ns % tick_ns == 0 {
        Ok(ticks)
    } else {
        Ok(ticks + 1)
    }
}

/// Counter value to load so the timer expires `pulse_width_ns` (rounded up to whole
/// ticks) after being armed.
pub const fn reload_value(pulse_width_ns: u32, tick_ns: u32, max_count: u32) -> Result<u32, Error> {
    let ticks = match pulse_ticks(pulse_width_ns, tick_ns) {
        Ok(ticks) => ticks,
        Err(e) => return Err(e),
    };

    // A full period is max_count + 1 ticks, computed in u64 so u32::MAX timers fit.
    let period = max_count as u64 + 1;
    if ticks as u64 > period {
        return Err(Error::PulseWidthOutOfRange { ticks, max_ticks: max_count.saturating_add(1) });
    }

    Ok((period - ticks as u64) as u32)
}

/// Width of the pulse a given reload value produces.
pub const fn loaded_width_ns(reload: u32, tick_ns: u32, max_count: u32) -> u64 {
    (max_count as u64 + 1 - reload as u64) * tick_ns as u64
}
