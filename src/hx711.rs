use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::Error;
use crate::observer::{LogObserver, Observer};
use crate::LoadCell;

mod calibration;
mod gain;
#[cfg(test)]
mod mock;

pub use calibration::Calibration;
pub use gain::GainMode;

/// Bit 23 of a sample; flipped on every raw reading.
pub const HX711_SIGN_FLIP: i64 = 0x80_0000;
/// The chip powers down once SCK stays high for more than 60 us.
const HX711_POWER_DOWN_US: u32 = 100;

/// How long `read_raw` keeps waiting for the chip to report ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyWait {
    /// Poll until DT goes low, however long that takes. A disconnected or
    /// powered-down chip blocks the caller indefinitely.
    #[default]
    Forever,
    /// Give up with [`Error::NotReady`] after this many busy polls.
    /// DT is always polled at least once, so `MaxPolls(0)` behaves like
    /// `MaxPolls(1)`.
    MaxPolls(u32),
}

/// Timing of a read cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadConfig {
    /// Sleep between two polls of DT while the chip is busy.
    pub poll_interval_us: u32,
    /// Hold time of each SCK level; the datasheet allows 0.2 to 50 us.
    pub pulse_delay_us: u32,
    pub ready_wait: ReadyWait,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            poll_interval_us: 1_000,
            pulse_delay_us: 1,
            ready_wait: ReadyWait::Forever,
        }
    }
}

/// HX711 driver, owning the SCK output, the DT input and a delay.
///
/// The driver is blocking and not reentrant: every read toggles the
/// physical pins, so one owner must serialize all calls.
pub struct Hx711<DtPin, SckPin, Delay, Obs = LogObserver> {
    dt_pin: DtPin,
    sck_pin: SckPin,
    delay: Delay,
    gain_mode: GainMode,
    calibration: Calibration,
    config: ReadConfig,
    offset: i64, // tare
    last_reading: i64,
    observer: Obs,
}

impl<DtPin, SckPin, Delay, E> Hx711<DtPin, SckPin, Delay>
where
    DtPin: InputPin<Error = E>,
    SckPin: OutputPin<Error = E>,
    Delay: DelayNs,
{
    /// Create the driver with the default read timing, logging through
    /// the `log` facade.
    ///
    /// The clock is driven low and one sample is taken as the initial
    /// tare. That sample includes whatever sits on the scale, so call
    /// [`LoadCell::measure_and_set_tare`] once the scale is known to be
    /// empty.
    pub fn new(
        dt_pin: DtPin,
        sck_pin: SckPin,
        delay: Delay,
        calibration: Calibration,
        gain_mode: GainMode,
    ) -> Result<Self, Error<E>> {
        Self::with_options(
            dt_pin,
            sck_pin,
            delay,
            calibration,
            gain_mode,
            ReadConfig::default(),
            LogObserver,
        )
    }
}

impl<DtPin, SckPin, Delay, Obs, E> Hx711<DtPin, SckPin, Delay, Obs>
where
    DtPin: InputPin<Error = E>,
    SckPin: OutputPin<Error = E>,
    Delay: DelayNs,
    Obs: Observer,
{
    /// Like [`Hx711::new`], with explicit read timing and event observer.
    pub fn with_options(
        dt_pin: DtPin,
        mut sck_pin: SckPin,
        delay: Delay,
        calibration: Calibration,
        gain_mode: GainMode,
        config: ReadConfig,
        observer: Obs,
    ) -> Result<Self, Error<E>> {
        sck_pin.set_low().map_err(Error::Pin)?;
        let mut hx711 = Self {
            dt_pin,
            sck_pin,
            delay,
            gain_mode,
            calibration,
            config,
            offset: 0,
            last_reading: 0,
            observer,
        };
        hx711.measure_and_set_tare()?;
        log::debug!(
            "initialized hx711, gain {:?}, tare {}",
            hx711.gain_mode,
            hx711.offset
        );
        Ok(hx711)
    }

    pub fn is_ready(&mut self) -> Result<bool, Error<E>> {
        // if the dt pin is low, device is ready for read
        self.dt_pin.is_low().map_err(Error::Pin)
    }

    /// Read one raw sample, aborting the ready wait as soon as
    /// `cancelled` returns true.
    ///
    /// `cancelled` is checked once per busy poll, before sleeping.
    pub fn read_raw_until<F>(&mut self, cancelled: F) -> Result<i64, Error<E>>
    where
        F: FnMut() -> bool,
    {
        self.sck_pin.set_low().map_err(Error::Pin)?;
        self.wait_ready(cancelled)?;

        // an interrupt stretching SCK high past 60us would power the chip down
        let count = critical_section::with(|_| self.shift_in())?;

        let raw = count ^ HX711_SIGN_FLIP;
        self.last_reading = raw;
        self.observer.raw_read(raw);
        Ok(raw)
    }

    /// Convert a raw sample to grams against the current tare.
    ///
    /// A restored tare may sit anywhere in `i64`; the delta saturates.
    pub fn grams_for(&self, raw: i64) -> i64 {
        self.calibration.grams(raw.saturating_sub(self.offset))
    }

    /// Most recent raw sample, including the one taken as initial tare.
    pub fn last_raw(&self) -> i64 {
        self.last_reading
    }

    pub fn gain_mode(&self) -> GainMode {
        self.gain_mode
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn config(&self) -> &ReadConfig {
        &self.config
    }

    /// Put the chip to sleep by holding SCK high.
    pub fn power_down(&mut self) -> Result<(), Error<E>> {
        self.sck_pin.set_low().map_err(Error::Pin)?;
        self.sck_pin.set_high().map_err(Error::Pin)?;
        self.delay.delay_us(HX711_POWER_DOWN_US);
        Ok(())
    }

    /// Wake the chip. It comes back in channel A, gain 128; the first
    /// read after waking restores the configured gain for the next one.
    pub fn power_up(&mut self) -> Result<(), Error<E>> {
        self.sck_pin.set_low().map_err(Error::Pin)
    }

    /// Give back the pins and the delay.
    pub fn release(self) -> (DtPin, SckPin, Delay) {
        (self.dt_pin, self.sck_pin, self.delay)
    }

    fn wait_ready<F>(&mut self, mut cancelled: F) -> Result<(), Error<E>>
    where
        F: FnMut() -> bool,
    {
        let mut polls: u32 = 0;
        while !self.is_ready()? {
            polls = polls.saturating_add(1);
            if let ReadyWait::MaxPolls(max) = self.config.ready_wait {
                if polls >= max.max(1) {
                    return Err(Error::NotReady { polls });
                }
            }
            if cancelled() {
                return Err(Error::Cancelled);
            }
            self.delay.delay_us(self.config.poll_interval_us);
        }
        if polls > 0 {
            self.observer.ready_after(polls);
        }
        Ok(())
    }

    /// Clock in one bit per gain pulse, MSB first, then send the
    /// gain-select pulse for the next conversion.
    fn shift_in(&mut self) -> Result<i64, Error<E>> {
        let mut count: i64 = 0;
        for _ in 0..self.gain_mode.pulses() {
            count <<= 1;
            if self.read_hx711_bit()? {
                count |= 1;
            }
        }
        self.toggle_sck_bit()?;
        Ok(count)
    }

    fn read_hx711_bit(&mut self) -> Result<bool, Error<E>> {
        self.sck_pin.set_high().map_err(Error::Pin)?;
        self.delay.delay_us(self.config.pulse_delay_us);
        self.sck_pin.set_low().map_err(Error::Pin)?;
        self.delay.delay_us(self.config.pulse_delay_us);
        self.dt_pin.is_high().map_err(Error::Pin)
    }

    fn toggle_sck_bit(&mut self) -> Result<(), Error<E>> {
        self.sck_pin.set_high().map_err(Error::Pin)?;
        self.delay.delay_us(self.config.pulse_delay_us);
        self.sck_pin.set_low().map_err(Error::Pin)?;
        self.delay.delay_us(self.config.pulse_delay_us);
        Ok(())
    }
}

impl<DtPin, SckPin, Delay, Obs, E> LoadCell for Hx711<DtPin, SckPin, Delay, Obs>
where
    DtPin: InputPin<Error = E>,
    SckPin: OutputPin<Error = E>,
    Delay: DelayNs,
    Obs: Observer,
{
    type Error = Error<E>;

    fn read_raw(&mut self) -> Result<i64, Self::Error> {
        self.read_raw_until(|| false)
    }

    fn measure(&mut self) -> Result<i64, Self::Error> {
        let raw = self.read_raw()?;
        Ok(self.grams_for(raw))
    }

    fn measure_and_set_tare(&mut self) -> Result<i64, Self::Error> {
        let raw = self.read_raw()?;
        self.set_tare_value(raw);
        Ok(raw)
    }

    fn set_tare_value(&mut self, offset: i64) {
        self.offset = offset;
        self.observer.tare_changed(offset);
    }

    fn tare_value(&self) -> i64 {
        self.offset
    }
}
