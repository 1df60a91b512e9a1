//! Timing Constants
//!
//! Pacing for the calibration loops and the classification loop, in
//! milliseconds.

/// Delay between calibration samples (milliseconds).
///
/// 50 Hz, fast enough to catch step impacts without flooding the I2C bus.
pub const CALIBRATION_SAMPLE_INTERVAL_MS: u32 = 20;

/// Delay between classification polls (milliseconds).
///
/// 10 Hz. Slower than calibration; a step excursion still spans several
/// polls at normal walking cadence.
pub const POLL_INTERVAL_MS: u32 = 100;

/// Extra pause after a jump is counted (milliseconds).
///
/// Lets the landing impact settle so it is not read as a second rise.
pub const JUMP_REFRACTORY_MS: u32 = 500;

/// Hold time of each LED blink in the end-of-calibration cue (milliseconds).
pub const CALIBRATION_DONE_BLINK_MS: u32 = 250;
