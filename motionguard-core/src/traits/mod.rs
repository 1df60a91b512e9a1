//! Core Traits and Abstractions for MotionGuard
//!
//! The detector is generic over three collaborators, one trait each:
//!
//! - [`source`] - where samples come from ([`SampleSource`])
//! - [`sink`] - where counted events go ([`NotificationSink`])
//! - [`indicator`] - how calibration phases are cued ([`PhaseIndicator`])
//!
//! Pacing uses `embedded_hal::delay::DelayNs` directly rather than a trait
//! of our own, so any HAL delay plugs in.
//!
//! All dispatch is static. A board crate implements the three traits for its
//! IMU driver, radio and LED, and the compiler monomorphizes the rest.

pub mod source;
pub mod sink;
pub mod indicator;

pub use source::SampleSource;
pub use sink::NotificationSink;
pub use indicator::PhaseIndicator;
