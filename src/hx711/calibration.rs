use crate::error::CalibrationError;

/// Internal amplifier gain the rated-output formula assumes.
const PGA_GAIN: f64 = 128.0;
/// Half of the 24-bit range, 2^23.
const HALF_SCALE: f64 = 8_388_608.0;

/// Linear calibration of a load cell from its datasheet values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    capacity_grams: u32,
    rated_output_mv_per_v: f64,
}

impl Calibration {
    /// `capacity_grams` is the rated maximum load, `rated_output_mv_per_v`
    /// the cell's sensitivity (1.0 or 2.0 mV/V are common).
    pub fn new(capacity_grams: u32, rated_output_mv_per_v: f64) -> Result<Self, CalibrationError> {
        if capacity_grams == 0 {
            return Err(CalibrationError::ZeroCapacity);
        }
        if !rated_output_mv_per_v.is_finite() || rated_output_mv_per_v <= 0.0 {
            return Err(CalibrationError::InvalidRatedOutput);
        }
        Ok(Self {
            capacity_grams,
            rated_output_mv_per_v,
        })
    }

    pub fn capacity_grams(&self) -> u32 {
        self.capacity_grams
    }

    pub fn rated_output_mv_per_v(&self) -> f64 {
        self.rated_output_mv_per_v
    }

    /// Counts produced by a full-scale output.
    pub fn scale_factor(&self) -> f64 {
        (self.rated_output_mv_per_v / 1000.0) * PGA_GAIN * HALF_SCALE
    }

    /// Convert a tare-relative raw delta to whole grams.
    pub fn grams(&self, delta: i64) -> i64 {
        let grams = (delta as f64 * 0.5 * f64::from(self.capacity_grams)) / self.scale_factor();
        round_half_up(grams)
    }
}

/// `floor(x + 0.5)`; halves round towards positive infinity.
fn round_half_up(x: f64) -> i64 {
    libm::floor(x + 0.5) as i64
}
