//! Simulated board for driving an [`EdgePulser`] on the host.
//!
//! Time advances in prescaler cycles, [`CYCLES_PER_TICK`] to a timer tick. The timer
//! free-runs and wraps past `MAX_COUNT` like the real peripheral, and its interrupt
//! latches pending in the NVIC until the handler gets to run. The output pin records
//! every level change with its cycle, and every peripheral access made from inside a
//! handler is counted.

#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    convert::Infallible,
    rc::Rc,
    time::{Duration, Instant},
};

use embedded_hal::digital::v2::{OutputPin, StatefulOutputPin, ToggleableOutputPin};
use pulser_core::{
    timing, Active, EdgePulser, PhaseInput, PhasePair, PulseShaper, PulseTimer, Transition,
};

pub const TICK_NS: u32 = 1_000;
pub const PULSE_WIDTH_NS: u32 = 20_000;
pub const PULSE_TICKS: u64 = 20;
pub const CYCLES_PER_TICK: u64 = 4;

#[derive(Default)]
pub struct Bench {
    now: Cell<u64>,
    phases: Cell<u8>,
    reads: Cell<u32>,
    pin_high: Cell<bool>,
    output: RefCell<Vec<(u64, bool)>>,
    count: Cell<u32>,
    prescaler: Cell<u64>,
    expiry_flag: Cell<bool>,
    expiry_enabled: Cell<bool>,
    accesses: Cell<u32>,
}

impl Bench {
    fn touch(&self) {
        self.accesses.set(self.accesses.get() + 1);
    }

    fn record(&self) {
        self.output.borrow_mut().push((self.now.get(), self.pin_high.get()));
    }
}

pub struct SimInput(Rc<Bench>);

impl PhaseInput for SimInput {
    fn read_phases(&mut self) -> PhasePair {
        self.0.touch();
        self.0.reads.set(self.0.reads.get() + 1);
        PhasePair::from_bits(self.0.phases.get())
    }
}

pub struct SimPin(Rc<Bench>);

impl OutputPin for SimPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.touch();
        self.0.pin_high.set(false);
        self.0.record();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.touch();
        self.0.pin_high.set(true);
        self.0.record();
        Ok(())
    }
}

impl StatefulOutputPin for SimPin {
    fn is_set_high(&self) -> Result<bool, Infallible> {
        self.0.touch();
        Ok(self.0.pin_high.get())
    }

    fn is_set_low(&self) -> Result<bool, Infallible> {
        self.0.touch();
        Ok(!self.0.pin_high.get())
    }
}

impl ToggleableOutputPin for SimPin {
    type Error = Infallible;

    fn toggle(&mut self) -> Result<(), Infallible> {
        self.0.touch();
        self.0.pin_high.set(!self.0.pin_high.get());
        self.0.record();
        Ok(())
    }
}

pub struct SimTimer(Rc<Bench>);

impl PulseTimer for SimTimer {
    const MAX_COUNT: u32 = 0xFFFF;

    fn is_expired(&self) -> bool {
        self.0.touch();
        self.0.expiry_flag.get()
    }

    fn clear_expiry(&mut self) {
        self.0.touch();
        self.0.expiry_flag.set(false);
    }

    fn load(&mut self, count: u32) {
        self.0.touch();
        self.0.prescaler.set(0);
        self.0.count.set(count);
    }

    fn enable_expiry(&mut self) {
        self.0.touch();
        self.0.expiry_enabled.set(true);
    }

    fn disable_expiry(&mut self) {
        self.0.touch();
        self.0.expiry_enabled.set(false);
    }
}

/// Entry/exit measurements of every handler invocation.
#[derive(Debug, Default, Clone)]
pub struct HandlerStats {
    pub invocations: u32,
    pub max_accesses: u32,
    pub total: Duration,
    pub longest: Duration,
}

impl HandlerStats {
    pub fn average(&self) -> Duration {
        if self.invocations == 0 {
            Duration::default()
        } else {
            self.total / self.invocations
        }
    }

    fn record(&mut self, accesses: u32, elapsed: Duration) {
        self.invocations += 1;
        self.max_accesses = self.max_accesses.max(accesses);
        self.total += elapsed;
        self.longest = self.longest.max(elapsed);
    }
}

pub struct Sim {
    bench: Rc<Bench>,
    pulser: EdgePulser<SimInput, SimPin, SimTimer>,
    pub edge_stats: HandlerStats,
    pub expiry_stats: HandlerStats,
    /// Holds the expiry handler off, as a higher priority interrupt would.
    pub expiry_held_off: bool,
    /// Timer interrupt latched in the NVIC. Clearing the timer flag does not unpend it.
    expiry_pending: bool,
}

impl Sim {
    pub fn new(initial_phases: u8) -> Self {
        Self::with_active(initial_phases, Active::High)
    }

    pub fn with_active(initial_phases: u8, active: Active) -> Self {
        let bench = Rc::new(Bench::default());
        bench.phases.set(initial_phases);

        let reload = timing::reload_value(PULSE_WIDTH_NS, TICK_NS, SimTimer::MAX_COUNT).unwrap();
        let shaper =
            PulseShaper::new(SimPin(bench.clone()), SimTimer(bench.clone()), active, reload);
        let pulser = EdgePulser::new(SimInput(bench.clone()), shaper);

        // Setup writes are not handler work.
        bench.output.borrow_mut().clear();
        bench.reads.set(0);

        Self {
            bench,
            pulser,
            edge_stats: HandlerStats::default(),
            expiry_stats: HandlerStats::default(),
            expiry_held_off: false,
            expiry_pending: false,
        }
    }

    pub fn pulser(&self) -> &EdgePulser<SimInput, SimPin, SimTimer> {
        &self.pulser
    }

    /// Current time in whole ticks.
    pub fn now(&self) -> u64 {
        self.bench.now.get() / CYCLES_PER_TICK
    }

    pub fn output_high(&self) -> bool {
        self.bench.pin_high.get()
    }

    pub fn reads(&self) -> u32 {
        self.bench.reads.get()
    }

    pub fn expiry_armed(&self) -> bool {
        self.bench.expiry_enabled.get()
    }

    /// Output level changes since construction, as `(tick, level)`.
    pub fn output(&self) -> Vec<(u64, bool)> {
        self.output_cycles().into_iter().map(|(at, level)| (at / CYCLES_PER_TICK, level)).collect()
    }

    /// Output level changes since construction, as `(cycle, level)`.
    pub fn output_cycles(&self) -> Vec<(u64, bool)> {
        self.bench.output.borrow().clone()
    }

    /// Number of pulses started, counted on transitions to the active level.
    pub fn pulses_started(&self, active_high: bool) -> usize {
        self.bench.output.borrow().iter().filter(|(_, level)| *level == active_high).count()
    }

    /// Drives the phase inputs to `bits` and runs the edge handler.
    pub fn edge(&mut self, bits: u8) -> Transition {
        self.bench.phases.set(bits);

        self.bench.accesses.set(0);
        let entry = Instant::now();
        let transition = self.pulser.on_phase_edge();
        let elapsed = entry.elapsed();
        self.edge_stats.record(self.bench.accesses.get(), elapsed);

        transition
    }

    /// Lets `ticks` timer ticks pass, see [`Sim::advance_cycles`].
    pub fn advance(&mut self, ticks: u64) {
        self.advance_cycles(ticks * CYCLES_PER_TICK);
    }

    /// Lets `cycles` prescaler cycles pass. The timer counts on every completed tick and
    /// the expiry handler runs, on a tick, whenever its interrupt is pending and not held
    /// off.
    pub fn advance_cycles(&mut self, cycles: u64) {
        for _ in 0..cycles {
            self.bench.now.set(self.bench.now.get() + 1);

            let phase = self.bench.prescaler.get() + 1;
            if phase < CYCLES_PER_TICK {
                self.bench.prescaler.set(phase);
                continue;
            }
            self.bench.prescaler.set(0);

            let next = self.bench.count.get() + 1;
            if next > SimTimer::MAX_COUNT {
                self.bench.count.set(0);
                self.bench.expiry_flag.set(true);
            } else {
                self.bench.count.set(next);
            }

            if self.bench.expiry_flag.get() && self.bench.expiry_enabled.get() {
                self.expiry_pending = true;
            }
            if self.expiry_pending && !self.expiry_held_off {
                self.expiry_pending = false;

                self.bench.accesses.set(0);
                let entry = Instant::now();
                self.pulser.on_timer_expiry();
                let elapsed = entry.elapsed();
                self.expiry_stats.record(self.bench.accesses.get(), elapsed);
            }
        }
    }
}

/// Gray sequence in the forward direction.
pub const FORWARD: [u8; 4] = [0b00, 0b10, 0b11, 0b01];
