//! Calibration Phase Indicator Trait
//!
//! Calibration asks the wearer to do something specific (stand still, walk,
//! jump) for a fixed time. Boards cue that with an LED, a buzzer or a
//! screen. Both callbacks default to doing nothing.

use crate::calibration::{CalibrationPhase, CalibrationProfile};

/// Receives calibration progress cues
pub trait PhaseIndicator {
    /// A phase is about to start collecting samples
    fn phase_started(&mut self, _phase: CalibrationPhase) {}

    /// Calibration finished and produced `profile`
    fn calibration_finished(&mut self, _profile: &CalibrationProfile) {}
}

/// No cues
impl PhaseIndicator for () {}

impl<T: PhaseIndicator + ?Sized> PhaseIndicator for &mut T {
    fn phase_started(&mut self, phase: CalibrationPhase) {
        (**self).phase_started(phase)
    }

    fn calibration_finished(&mut self, profile: &CalibrationProfile) {
        (**self).calibration_finished(profile)
    }
}
