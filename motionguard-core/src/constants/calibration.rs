//! Calibration Constants
//!
//! Parameters for the rest/step/jump calibration procedure and the threshold
//! formula `threshold = resting_average + gain * deviation`.

// ===== PHASE LENGTH =====

/// Samples collected in each calibration phase.
///
/// At the default 20 ms pacing this is 10 seconds per phase: long enough for
/// a few strides or 3-5 jumps.
pub const SAMPLES_PER_PHASE: u32 = 500;

// ===== DEVIATION ESTIMATE =====

/// Number of standard deviations assumed between the resting mean and the
/// smoothed peak of a motion phase.
///
/// `deviation = (smoothed_peak - resting_average) / SIGMA_SPAN`
///
/// This is an approximation, not a statistical estimator.
pub const SIGMA_SPAN: f32 = 3.0;

// ===== THRESHOLD GAINS =====

/// Step gain for the step-only counter.
///
/// Places the threshold 0.9 deviations above rest, which lets roughly the
/// top 16% of the motion distribution through.
pub const STEP_GAIN_SINGLE: f32 = 0.9;

/// Step gain when steps and jumps are both detected.
///
/// Lower than the single-event gain so steps still register below the jump
/// threshold.
pub const STEP_GAIN_DUAL: f32 = 0.7;

/// Jump gain when steps and jumps are both detected.
///
/// Applied to the jump phase deviation, which is dominated by landing
/// impacts.
pub const JUMP_GAIN: f32 = 0.8;

/// Starting value of the smoothed peak for the jump phase.
///
/// The step phase starts from the rest phase maximum instead.
pub const JUMP_PEAK_SEED: f32 = 0.0;
