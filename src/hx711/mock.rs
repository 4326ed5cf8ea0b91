//! Scripted pins and delay for host tests.

extern crate std;

use core::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinFault;

impl embedded_hal::digital::Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    ClockHigh,
    ClockLow,
    DataSampled(bool),
    DelayUs(u32),
}

#[derive(Default)]
struct Bus {
    events: Vec<Event>,
    levels: VecDeque<bool>,
    clock_fails: bool,
}

/// Shared view of everything the fake pins saw.
#[derive(Clone, Default)]
pub struct Probe(Rc<RefCell<Bus>>);

impl Probe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pins(&self) -> (FakeData, FakeClock, FakeDelay) {
        (FakeData(self.clone()), FakeClock(self.clone()), FakeDelay(self.clone()))
    }

    /// Queue a sample: `busy` polls reporting HIGH, the ready LOW, then
    /// the low `width` bits of `bits`, most significant first.
    pub fn push_sample(&self, busy: usize, bits: u32, width: u8) {
        let mut bus = self.0.borrow_mut();
        bus.levels.extend(core::iter::repeat(true).take(busy));
        bus.levels.push_back(false);
        for i in (0..width).rev() {
            bus.levels.push_back((bits >> i) & 1 == 1);
        }
    }

    pub fn fail_clock(&self) {
        self.0.borrow_mut().clock_fails = true;
    }

    pub fn clear_events(&self) {
        self.0.borrow_mut().events.clear();
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().events.clone()
    }

    pub fn clock_pulses(&self) -> usize {
        self.events().iter().filter(|e| **e == Event::ClockHigh).count()
    }

    pub fn clock_is_low(&self) -> bool {
        self.events()
            .iter()
            .rev()
            .find(|e| matches!(e, Event::ClockHigh | Event::ClockLow))
            == Some(&Event::ClockLow)
    }

    pub fn delays_of(&self, us: u32) -> usize {
        self.events()
            .iter()
            .filter(|e| **e == Event::DelayUs(us))
            .count()
    }

    pub fn remaining_levels(&self) -> usize {
        self.0.borrow().levels.len()
    }

    fn clock_fails(&self) -> bool {
        self.0.borrow().clock_fails
    }

    fn next_level(&self) -> bool {
        self.0.borrow_mut().levels.pop_front().unwrap_or(true)
    }

    fn record(&self, event: Event) {
        self.0.borrow_mut().events.push(event);
    }
}

pub struct FakeClock(Probe);

impl ErrorType for FakeClock {
    type Error = PinFault;
}

impl OutputPin for FakeClock {
    fn set_low(&mut self) -> Result<(), PinFault> {
        if self.0.clock_fails() {
            return Err(PinFault);
        }
        self.0.record(Event::ClockLow);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), PinFault> {
        if self.0.clock_fails() {
            return Err(PinFault);
        }
        self.0.record(Event::ClockHigh);
        Ok(())
    }
}

/// Replays the queued levels; once they run out the chip looks busy.
pub struct FakeData(Probe);

impl ErrorType for FakeData {
    type Error = PinFault;
}

impl InputPin for FakeData {
    fn is_high(&mut self) -> Result<bool, PinFault> {
        let level = self.0.next_level();
        self.0.record(Event::DataSampled(level));
        Ok(level)
    }

    fn is_low(&mut self) -> Result<bool, PinFault> {
        self.is_high().map(|high| !high)
    }
}

pub struct FakeDelay(Probe);

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.record(Event::DelayUs(ns / 1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.0.record(Event::DelayUs(us));
    }
}
