//! Core motion detection engine for MotionGuard
//!
//! Counts steps and jumps from a 3-axis accelerometer using thresholds
//! calibrated for the wearer at startup.
//! Designed for wearables with limited resources.
//!
//! Key constraints:
//! - Runs on a few KB of RAM (ESP32, Cortex-M)
//! - No heap allocation anywhere in the core
//! - One comparison chain per sample
//!
//! ```rust
//! use motionguard_core::{MotionClassifier, EventKind};
//!
//! // Thresholds normally come from calibration
//! let mut classifier = MotionClassifier::new(11.0, Some(14.0));
//!
//! let events: Vec<_> = [10.0, 12.0, 12.0, 10.0, 15.0, 10.0]
//!     .into_iter()
//!     .filter_map(|m| classifier.classify(m))
//!     .map(|e| e.kind)
//!     .collect();
//!
//! assert_eq!(events, [EventKind::Step, EventKind::Jump]);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod calibration;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod detector;
pub mod errors;
pub mod indicator;
pub mod notify;
pub mod sample;
pub mod source;
pub mod traits;

// Public API
pub use calibration::{CalibrationPhase, CalibrationProfile, Calibrator};
pub use classifier::{EventCounters, EventKind, LatchState, MotionClassifier, MotionEvent};
pub use config::DetectorConfig;
pub use detector::MotionDetector;
pub use errors::{MotionError, MotionResult};
pub use notify::{Notification, PayloadFormat};
pub use sample::Sample;
pub use source::SourceError;
pub use traits::{NotificationSink, PhaseIndicator, SampleSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
