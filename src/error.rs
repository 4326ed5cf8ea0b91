/// Errors raised while talking to the HX711.
///
/// `E` is the error type shared by the clock and data pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error<E> {
    /// A pin could not be driven or sampled. The read is abandoned.
    #[error("hx711 pin access failed: {0:?}")]
    Pin(E),

    /// The chip stayed busy for the whole `ReadyWait::MaxPolls` budget.
    #[error("hx711 not ready after {polls} polls")]
    NotReady { polls: u32 },

    /// The caller cancelled the read while waiting for the chip.
    #[error("hx711 read cancelled while waiting for data")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CalibrationError {
    #[error("load cell capacity must be greater than zero grams")]
    ZeroCapacity,
    #[error("rated output must be a finite, positive mV/V value")]
    InvalidRatedOutput,
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::string::ToString;

    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            Error::<()>::NotReady { polls: 3 }.to_string(),
            "hx711 not ready after 3 polls"
        );
        assert_eq!(Error::Pin(7u8).to_string(), "hx711 pin access failed: 7");
        assert_eq!(
            CalibrationError::ZeroCapacity.to_string(),
            "load cell capacity must be greater than zero grams"
        );
    }
}
