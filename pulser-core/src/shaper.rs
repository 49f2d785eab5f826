use core::convert::Infallible;
use embedded_hal::digital::v2::{OutputPin, StatefulOutputPin, ToggleableOutputPin};

use crate::infallible;

/// One-shot hardware timer backing the pulse width.
///
/// The counter counts up from the loaded value and flags expiry when it wraps past
/// [`PulseTimer::MAX_COUNT`]. Every method must be a plain register access, they run in
/// interrupt context.
pub trait PulseTimer {
    /// Highest value the counter reaches before wrapping.
    const MAX_COUNT: u32;

    /// Whether the counter has wrapped since the flag was last cleared.
    fn is_expired(&self) -> bool;

    /// Clears a pending expiry flag.
    fn clear_expiry(&mut self);

    /// Writes the counter and restarts the current tick, so the first increment comes
    /// a full tick after the load.
    fn load(&mut self, count: u32);

    /// Unmasks the expiry interrupt.
    fn enable_expiry(&mut self);

    /// Masks the expiry interrupt.
    fn disable_expiry(&mut self);
}

/// Level the output is driven to while a pulse is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Active {
    Low,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShaperState {
    /// Timer disarmed, output at rest.
    Idle,
    /// Timer counting down the current pulse.
    Armed,
}

/// Monostable driving a single output pin.
///
/// Every validated edge toggles the output and (re)arms the timer, the expiry puts the
/// output back at rest. Edges closer together than one pulse width therefore show up
/// as separate, shorter output transitions instead of being merged.
pub struct PulseShaper<P, T> {
    pin: P,
    timer: T,
    active: Active,
    reload: u32,
    state: ShaperState,
}

impl<P, T> PulseShaper<P, T>
where
    P: StatefulOutputPin<Error = Infallible> + ToggleableOutputPin<Error = Infallible>,
    T: PulseTimer,
{
    /// Puts the output at rest and disarms the timer. Call before the timer and edge
    /// interrupts are unmasked in the NVIC.
    ///
    /// `reload` is the counter value from [`crate::timing::reload_value`].
    pub fn new(mut pin: P, mut timer: T, active: Active, reload: u32) -> Self {
        timer.disable_expiry();
        timer.clear_expiry();

        match active {
            Active::High => infallible(pin.set_low()),
            Active::Low => infallible(pin.set_high()),
        }

        Self { pin, timer, active, reload, state: ShaperState::Idle }
    }

    /// Starts a pulse, superseding one already in progress.
    pub fn trigger(&mut self) {
        // A stale flag from the free running counter would end the pulse right away.
        self.timer.clear_expiry();
        self.timer.load(self.reload);
        // The counter may have wrapped between the clear and the load.
        self.timer.clear_expiry();
        infallible(self.pin.toggle());
        self.timer.enable_expiry();

        self.state = ShaperState::Armed;
    }

    /// Ends the pulse. Safe to call at any time: the output only moves if it is away
    /// from rest, and the timer is always disarmed.
    pub fn expire(&mut self) {
        self.timer.clear_expiry();

        if self.is_active() {
            infallible(self.pin.toggle());
        }
        self.timer.disable_expiry();

        self.state = ShaperState::Idle;
    }

    /// Ends the pulse if the timer really expired. An expiry interrupt that was pending
    /// across a re-trigger finds the flag cleared and leaves the new pulse running.
    pub fn expire_if_due(&mut self) -> bool {
        if !self.timer.is_expired() {
            return false;
        }

        self.expire();
        true
    }

    pub fn state(&self) -> ShaperState {
        self.state
    }

    /// Whether the output currently sits at the active level.
    pub fn is_active(&self) -> bool {
        let high = infallible(self.pin.is_set_high());
        match self.active {
            Active::High => high,
            Active::Low => !high,
        }
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}
