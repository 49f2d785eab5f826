use hal::{
    gpio::{
        gpioa::{PA0, PA1},
        ExtiPin, Input, PullUp,
    },
    rcc::Clocks,
    stm32,
};
use pulser_core::{PhaseInput, PhasePair, PulseTimer};
use stm32f4xx_hal as hal;

use crate::config::TIMER_TICK_HZ;

#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum PhaseLine {
    A,
    B,
}

/// Encoder phases on PA0 (A) and PA1 (B).
pub struct EncoderPhases {
    a: PA0<Input<PullUp>>,
    b: PA1<Input<PullUp>>,
}

impl EncoderPhases {
    pub fn new(a: PA0<Input<PullUp>>, b: PA1<Input<PullUp>>) -> Self {
        Self { a, b }
    }

    /// Acknowledges the EXTI line that fired. Done before sampling so an edge landing
    /// during the handler pends again instead of being lost.
    pub fn clear_pending(&mut self, line: PhaseLine) {
        match line {
            PhaseLine::A => self.a.clear_interrupt_pending_bit(),
            PhaseLine::B => self.b.clear_interrupt_pending_bit(),
        }
    }
}

impl PhaseInput for EncoderPhases {
    fn read_phases(&mut self) -> PhasePair {
        // Both phases from one IDR read.
        let idr = unsafe { (*stm32::GPIOA::ptr()).idr.read().bits() };
        PhasePair::new(idr & (1 << 0) != 0, idr & (1 << 1) != 0)
    }
}

/// TIM3 as a free running 16-bit up-counter whose update event ends the pulse.
pub struct PulseTim {
    tim: stm32::TIM3,
}

impl PulseTim {
    /// The TIM3 clock has to be enabled in RCC beforehand.
    pub fn new(tim: stm32::TIM3, clocks: &Clocks) -> Self {
        // Timer clocks run at twice PCLK1 whenever APB1 is divided.
        let timer_clock = match clocks.ppre1() {
            1 => clocks.pclk1().0,
            _ => clocks.pclk1().0 * 2,
        };
        let prescaler = timer_clock / TIMER_TICK_HZ - 1;

        tim.cr1.modify(|_, w| w.cen().clear_bit());
        // Only a counter overflow may raise UIF, not the UG written on every load.
        tim.cr1.modify(|_, w| w.urs().set_bit());
        tim.psc.write(|w| unsafe { w.bits(prescaler) });
        tim.arr.write(|w| unsafe { w.bits(Self::MAX_COUNT) });
        // Latch the prescaler now rather than at the first overflow.
        tim.egr.write(|w| w.ug().set_bit());
        tim.sr.modify(|_, w| w.uif().clear_bit());
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { tim }
    }
}

impl PulseTimer for PulseTim {
    const MAX_COUNT: u32 = 0xFFFF;

    fn is_expired(&self) -> bool {
        self.tim.sr.read().uif().bit_is_set()
    }

    fn clear_expiry(&mut self) {
        self.tim.sr.modify(|_, w| w.uif().clear_bit());
    }

    fn load(&mut self, count: u32) {
        // UG restarts the prescaler, otherwise the first tick lands anywhere within the
        // next microsecond. It also zeroes CNT, so CNT is written after it.
        self.tim.egr.write(|w| w.ug().set_bit());
        self.tim.cnt.write(|w| unsafe { w.bits(count) });
    }

    fn enable_expiry(&mut self) {
        self.tim.dier.modify(|_, w| w.uie().set_bit());
    }

    fn disable_expiry(&mut self) {
        self.tim.dier.modify(|_, w| w.uie().clear_bit());
    }
}
