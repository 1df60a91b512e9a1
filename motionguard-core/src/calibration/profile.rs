//! Calibration profile: the thresholds classification runs against

use crate::{
    classifier::EventKind,
    config::CalibrationConfig,
    constants::SIGMA_SPAN,
};

/// Threshold derived for one event kind
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventThreshold {
    /// Smoothed maximum observed in the motion phase
    pub peak: f32,
    /// Deviation estimate, `(peak - resting_average) / 3`
    pub deviation: f32,
    /// Gain applied to the deviation
    pub gain: f32,
    /// `resting_average + gain * deviation`
    pub threshold: f32,
}

impl EventThreshold {
    /// Derive a threshold from a phase peak
    pub fn derive(resting_average: f32, peak: f32, gain: f32) -> Self {
        let deviation = (peak - resting_average) / SIGMA_SPAN;
        Self {
            peak,
            deviation,
            gain,
            threshold: resting_average + gain * deviation,
        }
    }

    /// Deviation is zero, negative or not a number.
    ///
    /// The motion phase never rose above rest, so the threshold sits at or
    /// below the resting average and classification will be oversensitive.
    pub fn is_degenerate(&self) -> bool {
        self.deviation.is_nan() || self.deviation <= 0.0
    }
}

/// Result of calibration
///
/// Immutable once built. Recalibrating produces a new profile.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationProfile {
    resting_average: f32,
    resting_peak: f32,
    step: EventThreshold,
    jump: Option<EventThreshold>,
}

impl CalibrationProfile {
    /// Build a profile from phase statistics
    ///
    /// `jump_peak` is only used when the config's plan detects jumps.
    ///
    /// ```rust
    /// use motionguard_core::{CalibrationProfile, config::CalibrationConfig};
    ///
    /// let config = CalibrationConfig::step_only().with_gains(1.0, 1.0);
    /// let profile = CalibrationProfile::from_peaks(10.0, 10.5, 13.0, None, &config);
    ///
    /// assert_eq!(profile.standard_deviation(), 1.0);
    /// assert_eq!(profile.step_threshold(), 11.0);
    /// assert_eq!(profile.jump_threshold(), None);
    /// ```
    pub fn from_peaks(
        resting_average: f32,
        resting_peak: f32,
        step_peak: f32,
        jump_peak: Option<f32>,
        config: &CalibrationConfig,
    ) -> Self {
        let step = EventThreshold::derive(resting_average, step_peak, config.step_gain());
        let jump = if config.plan().detects_jumps() {
            jump_peak.map(|peak| EventThreshold::derive(resting_average, peak, config.jump_gain()))
        } else {
            None
        };

        Self {
            resting_average,
            resting_peak,
            step,
            jump,
        }
    }

    /// Mean magnitude while stationary
    pub fn resting_average(&self) -> f32 {
        self.resting_average
    }

    /// Raw maximum magnitude while stationary
    pub fn resting_peak(&self) -> f32 {
        self.resting_peak
    }

    /// Step deviation estimate
    pub fn standard_deviation(&self) -> f32 {
        self.step.deviation
    }

    /// Step threshold details
    pub fn step(&self) -> &EventThreshold {
        &self.step
    }

    /// Jump threshold details, if jumps were calibrated
    pub fn jump(&self) -> Option<&EventThreshold> {
        self.jump.as_ref()
    }

    /// Magnitude a step must exceed
    pub fn step_threshold(&self) -> f32 {
        self.step.threshold
    }

    /// Magnitude a jump must exceed, if jumps were calibrated
    pub fn jump_threshold(&self) -> Option<f32> {
        self.jump.map(|j| j.threshold)
    }

    /// Threshold for an event kind
    pub fn threshold(&self, kind: EventKind) -> Option<f32> {
        match kind {
            EventKind::Step => Some(self.step_threshold()),
            EventKind::Jump => self.jump_threshold(),
        }
    }

    /// True unless a jump threshold exists and does not exceed the step
    /// threshold.
    ///
    /// An inverted profile still works, but any excursion above the jump
    /// threshold is counted as a jump first.
    pub fn is_ordered(&self) -> bool {
        match self.jump_threshold() {
            Some(jump) => jump > self.step_threshold(),
            None => true,
        }
    }
}
