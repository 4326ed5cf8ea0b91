//! HX711 polling example
//!
//! Runs the driver against a simulated HX711 on the host. Swap `SimData`,
//! `SimClock` and `StdDelay` for your HAL's embedded-hal pins and delay.
//!
//! `RUST_LOG=trace cargo run --example polling`

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use hx711_scale::{Calibration, GainMode, Hx711, LoadCell};

/// Chip output for an empty 5 kg cell, before the bit 23 flip.
const EMPTY: u32 = 0x00_0000;
/// Roughly 50 g on a 5 kg, 2.0 mV/V cell.
const COUNTS_PER_STEP: u32 = 42_950;

struct Chip {
    sample: u32,
    rising_edges: u8,
}

struct SimData(Rc<RefCell<Chip>>);
struct SimClock(Rc<RefCell<Chip>>);

impl ErrorType for SimData {
    type Error = Infallible;
}

impl InputPin for SimData {
    // only the ready check asks for low; a new conversion starts there
    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.0.borrow_mut().rising_edges = 0;
        Ok(true)
    }

    fn is_high(&mut self) -> Result<bool, Infallible> {
        let chip = self.0.borrow();
        let bit = chip.rising_edges.saturating_sub(1);
        if bit >= 24 {
            return Ok(true);
        }
        Ok((chip.sample >> (23 - bit)) & 1 == 1)
    }
}

impl ErrorType for SimClock {
    type Error = Infallible;
}

impl OutputPin for SimClock {
    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().rising_edges += 1;
        Ok(())
    }
}

struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

fn main() {
    env_logger::init();

    let chip = Rc::new(RefCell::new(Chip {
        sample: EMPTY,
        rising_edges: 0,
    }));
    let hx711_dt = SimData(chip.clone());
    let hx711_sck = SimClock(chip.clone());

    let calibration = match Calibration::new(5000, 2.0) {
        Ok(calibration) => calibration,
        Err(err) => {
            eprintln!("bad calibration: {err}");
            return;
        }
    };

    // create the load sensor; this also takes the initial tare
    let mut load_sensor =
        match Hx711::new(hx711_dt, hx711_sck, StdDelay, calibration, GainMode::A128) {
            Ok(sensor) => sensor,
            Err(err) => {
                eprintln!("hx711 init failed: {err}");
                return;
            }
        };
    println!("Tare = {}", load_sensor.tare_value());

    for step in 1..=5 {
        chip.borrow_mut().sample = EMPTY + step * COUNTS_PER_STEP;
        match load_sensor.measure() {
            Ok(grams) => println!("Last Reading = {grams} g"),
            Err(err) => eprintln!("read failed: {err}"),
        }
    }
}
