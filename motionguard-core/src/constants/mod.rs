//! Constants for MotionGuard Core
//!
//! Every default number the detector uses lives here, with a note on where it
//! came from. Most of them are empirical: they were tuned by hand on a wrist-
//! and waist-worn LSM6DSO at its default full scale.
//!
//! ## Organization
//!
//! - **Calibration**: phase lengths, the sigma span, threshold gains
//! - **Timing**: sampling cadence and pacing delays
//! - **Buffers**: fixed capacities for payloads and notification history

/// Calibration phase lengths and threshold gains.
pub mod calibration;

/// Sampling cadence and pacing delays.
pub mod timing;

/// Fixed buffer capacities.
pub mod buffers;

pub use calibration::{
    SAMPLES_PER_PHASE, SIGMA_SPAN, STEP_GAIN_SINGLE, STEP_GAIN_DUAL, JUMP_GAIN,
};

pub use timing::{
    CALIBRATION_SAMPLE_INTERVAL_MS, POLL_INTERVAL_MS, JUMP_REFRACTORY_MS,
};

pub use buffers::{PAYLOAD_CAPACITY, NOTIFICATION_HISTORY};
