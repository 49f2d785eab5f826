#![no_main]
#![no_std]

use defmt_rtt as _; // defmt transport
use panic_reset as _; // panic handler

use stm32f4xx_hal as hal;

use crate::{
    board::{EncoderPhases, PhaseLine, PulseTim},
    config::{HANDLER_PRIORITY, PULSE_ACTIVE, PULSE_RELOAD, PULSE_WIDTH_NS},
};
use core::cell::RefCell;
use cortex_m::{interrupt::Mutex, peripheral::NVIC};
use cortex_m_rt::entry;
use hal::{
    gpio::{Edge, ExtiPin},
    interrupt,
    prelude::*,
    stm32,
};
use pulser_core::{EdgePulser, PulseShaper};

mod banner;
mod board;
mod config;

type PulseOutput = hal::gpio::gpiob::PB0<hal::gpio::Output<hal::gpio::PushPull>>;
type Pulser = EdgePulser<EncoderPhases, PulseOutput, PulseTim>;

/// Written once before the interrupts are unmasked, then only touched by the handlers.
static PULSER: Mutex<RefCell<Option<Pulser>>> = Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    let build_id = env!("PULSER_BUILD_ID");
    let mut cp = cortex_m::peripheral::Peripherals::take().expect("failed to get cortex_m peripherals");
    let mut dp = stm32::Peripherals::take().expect("failed to get stm32 peripherals");

    // The HAL has no driver for these, so enable their clocks before RCC is handed over.
    dp.RCC.apb1enr.modify(|_, w| w.tim3en().set_bit());
    dp.RCC.apb2enr.modify(|_, w| w.syscfgen().set_bit());

    let rcc = dp.RCC.constrain();

    let clocks = rcc
        .cfgr
        .use_hse(25.mhz()) // Use the High Speed External 25MHz crystal
        .sysclk(48.mhz())
        .pclk1(24.mhz())
        .freeze();

    defmt::info!(
        "{=str} ({=str}): sysclk {=u32} Hz, pclk1 {=u32} Hz",
        env!("CARGO_PKG_NAME"),
        build_id,
        clocks.sysclk().0,
        clocks.pclk1().0
    );

    let gpioa = dp.GPIOA.split();
    let gpiob = dp.GPIOB.split();

    let banner_pins = (gpioa.pa9.into_alternate_af7(), gpioa.pa10.into_alternate_af7());
    if let Err(e) = banner::announce(dp.USART1, banner_pins, clocks, build_id) {
        defmt::warn!("banner not sent: {}", e);
    }

    let mut phase_a = gpioa.pa0.into_pull_up_input();
    let mut phase_b = gpioa.pa1.into_pull_up_input();
    phase_a.make_interrupt_source(&mut dp.SYSCFG);
    phase_b.make_interrupt_source(&mut dp.SYSCFG);
    phase_a.trigger_on_edge(&mut dp.EXTI, Edge::RISING_FALLING);
    phase_b.trigger_on_edge(&mut dp.EXTI, Edge::RISING_FALLING);
    phase_a.enable_interrupt(&mut dp.EXTI);
    phase_b.enable_interrupt(&mut dp.EXTI);

    let output = gpiob.pb0.into_push_pull_output();
    let timer = PulseTim::new(dp.TIM3, &clocks);
    let shaper = PulseShaper::new(output, timer, PULSE_ACTIVE, PULSE_RELOAD);

    let mut phases = EncoderPhases::new(phase_a, phase_b);
    // Edges seen while setting up are covered by the initial sample below.
    phases.clear_pending(PhaseLine::A);
    phases.clear_pending(PhaseLine::B);

    let pulser = EdgePulser::new(phases, shaper);

    defmt::info!(
        "pulse width {=u32} ns, reload {=u32}, initial phases {}",
        PULSE_WIDTH_NS,
        PULSE_RELOAD,
        pulser.decoder().previous_phases()
    );

    cortex_m::interrupt::free(|cs| {
        PULSER.borrow(cs).replace(Some(pulser));
    });

    unsafe {
        cp.NVIC.set_priority(stm32::Interrupt::EXTI0, HANDLER_PRIORITY);
        cp.NVIC.set_priority(stm32::Interrupt::EXTI1, HANDLER_PRIORITY);
        cp.NVIC.set_priority(stm32::Interrupt::TIM3, HANDLER_PRIORITY);

        NVIC::unmask(stm32::Interrupt::EXTI0);
        NVIC::unmask(stm32::Interrupt::EXTI1);
        NVIC::unmask(stm32::Interrupt::TIM3);
    }

    // Everything else happens in the handlers.
    loop {
        cortex_m::asm::wfi();
    }
}

fn phase_edge(line: PhaseLine) {
    cortex_m::interrupt::free(|cs| {
        if let Some(pulser) = PULSER.borrow(cs).borrow_mut().as_mut() {
            pulser.input_mut().clear_pending(line);
            pulser.on_phase_edge();
        }
    });
}

#[interrupt]
fn EXTI0() {
    phase_edge(PhaseLine::A);
}

#[interrupt]
fn EXTI1() {
    phase_edge(PhaseLine::B);
}

#[interrupt]
fn TIM3() {
    cortex_m::interrupt::free(|cs| {
        if let Some(pulser) = PULSER.borrow(cs).borrow_mut().as_mut() {
            pulser.on_timer_expiry();
        }
    });
}
