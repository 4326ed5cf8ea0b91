/// Channel and gain selection.
///
/// The discriminant is the number of clock pulses clocked in per read
/// for that mode; one more gain-select pulse follows every read.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GainMode {
    /// Channel A, gain 128.
    #[default]
    A128 = 24,
    /// Channel A, gain 64.
    A64 = 26,
    /// Channel B, gain 32.
    B32 = 25,
}

impl GainMode {
    pub const ALL: [GainMode; 3] = [GainMode::A128, GainMode::A64, GainMode::B32];

    pub const fn pulses(self) -> u8 {
        self as u8
    }
}
