//! Error Types for Motion Detection
//!
//! ## Design Philosophy
//!
//! The detector itself has almost nothing that can go wrong. Calibration is
//! plain arithmetic over whatever the sensor produced and never fails, and
//! classification is a comparison against fixed thresholds. What remains:
//!
//! 1. **Sensor failures**: the sample source reported an error. The source's
//!    own error type is carried through untouched so callers can match on it.
//! 2. **Misuse**: classifying before a calibration profile exists.
//! 3. **Payload overflow**: a notification did not fit its fixed buffer.
//!
//! Errors stay `Copy` whenever the source error is, and carry no heap data.
//!
//! ## Handling Strategy
//!
//! ```rust
//! use motionguard_core::{MotionError, SourceError};
//! use core::convert::Infallible;
//!
//! fn describe(err: MotionError<SourceError<Infallible>>) -> &'static str {
//!     match err {
//!         MotionError::Sensor(SourceError::EndOfStream) => "capture finished",
//!         MotionError::Sensor(_) => "sensor fault",
//!         MotionError::NotCalibrated => "run calibration first",
//!         MotionError::PayloadOverflow { .. } => "notification dropped",
//!     }
//! }
//!
//! assert_eq!(describe(MotionError::NotCalibrated), "run calibration first");
//! ```

use thiserror_no_std::Error;

/// Result type for detector operations, generic over the source error
pub type MotionResult<T, E> = Result<T, MotionError<E>>;

/// Errors raised by the motion detector
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MotionError<E> {
    /// The sample source failed to produce a reading
    #[error("sample source failed")]
    Sensor(E),

    /// Classification was requested before any calibration profile existed
    #[error("detector has not been calibrated")]
    NotCalibrated,

    /// Notification text exceeded the fixed payload buffer
    #[error("notification payload exceeds {capacity} bytes")]
    PayloadOverflow {
        /// Capacity of the payload buffer in bytes
        capacity: usize,
    },
}

impl<E> MotionError<E> {
    /// Returns the source error, if this is a sensor failure
    pub fn sensor_error(&self) -> Option<&E> {
        match self {
            Self::Sensor(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for MotionError<E> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Sensor(_) => defmt::write!(fmt, "Sample source failed"),
            Self::NotCalibrated => defmt::write!(fmt, "Not calibrated"),
            Self::PayloadOverflow { capacity } => {
                defmt::write!(fmt, "Payload exceeds {} bytes", capacity)
            }
        }
    }
}
