//! Event hooks for the driver.
//!
//! The driver never prints on its own. Every raw sample, tare change and
//! ready wait is handed to an [`Observer`]; the default [`LogObserver`]
//! forwards them to the `log` facade.

pub trait Observer {
    /// A raw sample was read from the chip.
    fn raw_read(&mut self, _raw: i64) {}

    /// The tare offset changed, either from a reading or set directly.
    fn tare_changed(&mut self, _offset: i64) {}

    /// The chip reported ready after `polls` busy polls.
    fn ready_after(&mut self, _polls: u32) {}
}

/// Forwards driver events to the `log` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn raw_read(&mut self, raw: i64) {
        log::trace!("hx711 raw reading: {raw}");
    }

    fn tare_changed(&mut self, offset: i64) {
        log::debug!("hx711 tare offset set to {offset}");
    }

    fn ready_after(&mut self, polls: u32) {
        log::trace!("hx711 ready after {polls} busy polls");
    }
}

/// Discards every event.
impl Observer for () {}

impl<T: Observer + ?Sized> Observer for &mut T {
    fn raw_read(&mut self, raw: i64) {
        (**self).raw_read(raw)
    }

    fn tare_changed(&mut self, offset: i64) {
        (**self).tare_changed(offset)
    }

    fn ready_after(&mut self, polls: u32) {
        (**self).ready_after(polls)
    }
}
