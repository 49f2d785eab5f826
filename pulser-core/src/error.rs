#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    ZeroPulseWidth,
    ZeroTickPeriod,
    /// The pulse needs more ticks than the timer can count before it overflows.
    PulseWidthOutOfRange { ticks: u32, max_ticks: u32 },
}

#[cfg(feature = "std")]
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::ZeroPulseWidth => write!(f, "pulse width must be non-zero"),
            Error::ZeroTickPeriod => write!(f, "timer tick period must be non-zero"),
            Error::PulseWidthOutOfRange { ticks, max_ticks } => {
                write!(f, "pulse needs {} timer ticks, the timer counts at most {}", ticks, max_ticks)
            },
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
