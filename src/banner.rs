use core::fmt::Write;
use hal::{
    prelude::*,
    rcc::Clocks,
    serial::{self, config::Config, Serial},
    stm32,
};
use stm32f4xx_hal as hal;

use crate::config::{BANNER_BAUD, PULSE_WIDTH_NS, TIMER_TICK_NS};

#[derive(Debug, defmt::Format)]
pub enum Error {
    Config,
    Write,
}

impl From<serial::config::InvalidConfig> for Error {
    fn from(_: serial::config::InvalidConfig) -> Error {
        Error::Config
    }
}

impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Error {
        Error::Write
    }
}

/// Writes the identification line on USART1. Blocks until sent, so only call it
/// before any interrupt is unmasked.
pub fn announce<PINS: serial::Pins<stm32::USART1>>(
    usart1: stm32::USART1,
    pins: PINS,
    clocks: Clocks,
    build_id: &str,
) -> Result<(), Error> {
    let config = Config::default().baudrate(BANNER_BAUD.bps());
    let serial = Serial::usart1(usart1, pins, config, clocks)?;
    let (mut tx, _rx) = serial.split();

    write!(
        tx,
        "\r\n{} {} ({})\r\npulse width {} ns, tick {} ns\r\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        build_id,
        PULSE_WIDTH_NS,
        TIMER_TICK_NS,
    )?;

    Ok(())
}
