//! A `no_std` driver for the HX711 load cell amplifier, built on the
//! [`embedded-hal`] 1.0 digital and delay traits.
//!
//! The driver bit-bangs the HX711 two-wire protocol, turns the raw
//! sample into grams with a single linear calibration and keeps a tare
//! offset.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/1.0

#![no_std]

pub mod error;
pub mod hx711;
pub mod observer;

pub use error::{CalibrationError, Error};
pub use hx711::{Calibration, GainMode, Hx711, ReadConfig, ReadyWait};
pub use observer::{LogObserver, Observer};

pub trait LoadCell {
    type Error;

    /// Read one raw sample from the load cell.
    fn read_raw(&mut self) -> Result<i64, Self::Error>;

    /// Read one sample and convert it to grams, relative to the tare.
    fn measure(&mut self) -> Result<i64, Self::Error>;

    /// Read one sample and use it as the new tare. Returns the sample.
    fn measure_and_set_tare(&mut self) -> Result<i64, Self::Error>;

    /// Set the tare to a previously recorded raw value, without reading.
    fn set_tare_value(&mut self, offset: i64);

    /// Get the load cell offset.
    fn tare_value(&self) -> i64;
}
