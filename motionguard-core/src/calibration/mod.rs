//! Threshold Calibration
//!
//! ## Procedure
//!
//! Every wearer, mounting point and sensor sits at a different baseline, so
//! thresholds are measured rather than hardcoded. Calibration runs fixed-
//! length phases, each a blocking loop of `N` samples paced by a delay:
//!
//! ```text
//! Rest  (N samples) ── sum, raw max ──► resting_average = sum / N
//!   │
//!   ▼  smoothed max seeded with the rest max
//! Step  (N samples) ── max = (m + max) / 2 when m > max
//!   │                  deviation = (max - resting_average) / 3
//!   │                  step_threshold = resting_average + k_step * deviation
//!   ▼  smoothed max seeded with 0
//! Jump  (N samples, dual plan only) ── same smoothing
//!                      jump_threshold = resting_average + k_jump * deviation
//! ```
//!
//! The factor 3 assumes the smoothed peak sits about three standard
//! deviations above the resting mean. It is a rough heuristic.
//!
//! ## Failure Modes
//!
//! The arithmetic never fails. If the wearer does not move during the step
//! phase the deviation collapses to about zero and the threshold lands on
//! the resting average. That profile is returned as is, with a warning in
//! the log. Light jumps can likewise leave the jump threshold below the step
//! threshold; that is also only logged (see [`CalibrationProfile::is_ordered`]).
//!
//! ## Usage
//!
//! [`Calibrator::run`] drives a live source. [`CalibrationSession`] is the
//! same arithmetic fed by hand, for replaying recorded magnitudes:
//!
//! ```rust
//! use motionguard_core::calibration::{CalibrationPhase, CalibrationSession};
//! use motionguard_core::config::CalibrationConfig;
//!
//! let mut session = CalibrationSession::new(CalibrationConfig::step_only());
//! session.record_all(CalibrationPhase::Rest, [9.8; 500]);
//! session.record_all(CalibrationPhase::Step, [9.8; 500]);
//!
//! let profile = session.finish();
//! assert_eq!(profile.resting_average(), 9.8);
//! assert_eq!(profile.standard_deviation(), 0.0);
//! assert_eq!(profile.step_threshold(), 9.8);
//! assert!(profile.step().is_degenerate());
//! ```

mod accumulator;
mod profile;

pub use accumulator::{RestAccumulator, SmoothedPeak};
pub use profile::{CalibrationProfile, EventThreshold};

use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::{
    config::CalibrationConfig,
    constants::calibration::JUMP_PEAK_SEED,
    errors::{MotionError, MotionResult},
    traits::{PhaseIndicator, SampleSource},
};

/// One calibration phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationPhase {
    /// Wearer stands still; establishes the resting baseline
    Rest,
    /// Wearer walks; establishes the step peak
    Step,
    /// Wearer jumps; establishes the jump peak
    Jump,
}

impl CalibrationPhase {
    /// Instruction shown to the wearer while this phase runs
    pub const fn prompt(&self) -> &'static str {
        match self {
            CalibrationPhase::Rest => "Stand still",
            CalibrationPhase::Step => "Take a few steps",
            CalibrationPhase::Jump => "Jump 3-5 times",
        }
    }

    /// Lowercase name
    pub const fn name(&self) -> &'static str {
        match self {
            CalibrationPhase::Rest => "rest",
            CalibrationPhase::Step => "step",
            CalibrationPhase::Jump => "jump",
        }
    }
}

impl fmt::Display for CalibrationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Incremental calibration over magnitudes supplied by the caller
///
/// Phases may be recorded in any order, but the step peak is seeded with
/// the rest maximum at the first step sample, so rest should come first to
/// match [`Calibrator::run`].
#[derive(Debug, Clone)]
pub struct CalibrationSession {
    config: CalibrationConfig,
    rest: RestAccumulator,
    step: Option<SmoothedPeak>,
    jump: Option<SmoothedPeak>,
}

impl CalibrationSession {
    /// Start an empty session
    pub fn new(config: CalibrationConfig) -> Self {
        Self {
            config,
            rest: RestAccumulator::new(),
            step: None,
            jump: None,
        }
    }

    /// Record one magnitude for `phase`
    pub fn record(&mut self, phase: CalibrationPhase, magnitude: f32) {
        match phase {
            CalibrationPhase::Rest => self.rest.add(magnitude),
            CalibrationPhase::Step => {
                let seed = self.rest.peak();
                self.step
                    .get_or_insert_with(|| SmoothedPeak::starting_at(seed))
                    .update(magnitude);
            }
            CalibrationPhase::Jump => {
                self.jump
                    .get_or_insert_with(|| SmoothedPeak::starting_at(JUMP_PEAK_SEED))
                    .update(magnitude);
            }
        }
    }

    /// Record a whole phase
    pub fn record_all<I>(&mut self, phase: CalibrationPhase, magnitudes: I)
    where
        I: IntoIterator<Item = f32>,
    {
        for magnitude in magnitudes {
            self.record(phase, magnitude);
        }
    }

    /// Rest statistics so far
    pub fn rest(&self) -> &RestAccumulator {
        &self.rest
    }

    /// Smoothed step peak so far; the rest maximum if no step sample arrived
    pub fn step_peak(&self) -> f32 {
        self.step.map(|p| p.value()).unwrap_or(self.rest.peak())
    }

    /// Smoothed jump peak so far; the jump seed if no jump sample arrived
    pub fn jump_peak(&self) -> f32 {
        self.jump.map(|p| p.value()).unwrap_or(JUMP_PEAK_SEED)
    }

    /// Derive the profile from everything recorded
    pub fn finish(&self) -> CalibrationProfile {
        CalibrationProfile::from_peaks(
            self.rest.average(),
            self.rest.peak(),
            self.step_peak(),
            Some(self.jump_peak()),
            &self.config,
        )
    }
}

/// Drives calibration against a live sample source
#[derive(Debug, Clone)]
pub struct Calibrator {
    config: CalibrationConfig,
}

impl Calibrator {
    /// Calibrator for the given parameters
    pub fn new(config: CalibrationConfig) -> Self {
        Self { config }
    }

    /// Calibration parameters
    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Run every phase of the plan and derive a profile
    ///
    /// Blocks for `phases * samples_per_phase * sample_interval`. A source
    /// error aborts calibration and is returned as [`MotionError::Sensor`].
    pub fn run<S, D, I>(
        &self,
        source: &mut S,
        delay: &mut D,
        indicator: &mut I,
    ) -> MotionResult<CalibrationProfile, S::Error>
    where
        S: SampleSource,
        D: DelayNs,
        I: PhaseIndicator,
    {
        let mut session = CalibrationSession::new(self.config);

        for &phase in self.config.plan().phases() {
            log_info!(
                "Calibrating {} phase: {} for {} samples",
                phase.name(),
                phase.prompt(),
                self.config.samples_per_phase()
            );
            indicator.phase_started(phase);
            self.collect_phase(phase, source, delay, &mut session)?;
        }

        let profile = session.finish();
        report(&profile);
        indicator.calibration_finished(&profile);

        Ok(profile)
    }

    fn collect_phase<S, D>(
        &self,
        phase: CalibrationPhase,
        source: &mut S,
        delay: &mut D,
        session: &mut CalibrationSession,
    ) -> MotionResult<(), S::Error>
    where
        S: SampleSource,
        D: DelayNs,
    {
        let interval_ms = self.config.sample_interval().ticks();

        for _ in 0..self.config.samples_per_phase() {
            let sample = nb::block!(source.poll_sample()).map_err(MotionError::Sensor)?;
            session.record(phase, sample.magnitude());
            delay.delay_ms(interval_ms);
        }

        Ok(())
    }
}

fn report(profile: &CalibrationProfile) {
    log_info!("Calibration done, resting average {}", profile.resting_average());
    log_info!("Step threshold {}", profile.step_threshold());
    if let Some(jump) = profile.jump_threshold() {
        log_info!("Jump threshold {}", jump);
    }

    if profile.step().is_degenerate() {
        log_warn!("Step phase never rose above rest; step detection will be oversensitive");
    }
    if profile.jump().map(|j| j.is_degenerate()).unwrap_or(false) {
        log_warn!("Jump phase never rose above rest; jump detection will be oversensitive");
    }
    if !profile.is_ordered() {
        log_warn!("Jump threshold does not exceed step threshold; jumps take priority");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(feature = "source-memory")]
    use crate::{sample::Sample, source::ScriptedSource};

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    #[derive(Default)]
    struct PhaseLog {
        started: heapless::Vec<CalibrationPhase, 4>,
        finished: bool,
    }

    impl PhaseIndicator for PhaseLog {
        fn phase_started(&mut self, phase: CalibrationPhase) {
            self.started.push(phase).ok();
        }

        fn calibration_finished(&mut self, _profile: &CalibrationProfile) {
            self.finished = true;
        }
    }

    #[test]
    fn step_peak_is_seeded_from_rest_max() {
        let mut session = CalibrationSession::new(CalibrationConfig::step_only());
        session.record_all(CalibrationPhase::Rest, [10.0, 12.0, 10.0]);
        session.record(CalibrationPhase::Step, 16.0);

        // (16 + 12) / 2, not (16 + 0) / 2
        assert_eq!(session.step_peak(), 14.0);
    }

    #[test]
    fn jump_peak_is_seeded_from_zero() {
        let mut session = CalibrationSession::new(CalibrationConfig::step_and_jump());
        session.record_all(CalibrationPhase::Rest, [10.0, 12.0]);
        session.record(CalibrationPhase::Jump, 16.0);

        assert_eq!(session.jump_peak(), 8.0);
    }

    #[test]
    fn missing_step_phase_falls_back_to_rest_peak() {
        let mut session = CalibrationSession::new(CalibrationConfig::step_only());
        session.record_all(CalibrationPhase::Rest, [10.0, 13.0, 10.0]);
        assert_eq!(session.step_peak(), 13.0);
    }

    #[cfg(feature = "source-memory")]
    #[test]
    fn run_reports_phases_in_order() {
        let config = CalibrationConfig::step_and_jump().with_samples_per_phase(2);
        let samples = [Sample::vertical(10.0); 6];
        let mut source = ScriptedSource::new(&samples);
        let mut indicator = PhaseLog::default();

        Calibrator::new(config)
            .run(&mut source, &mut NoDelay, &mut indicator)
            .unwrap();

        assert_eq!(
            indicator.started.as_slice(),
            &[CalibrationPhase::Rest, CalibrationPhase::Step, CalibrationPhase::Jump]
        );
        assert!(indicator.finished);
        assert!(source.is_exhausted());
    }

    #[cfg(feature = "source-memory")]
    #[test]
    fn run_propagates_source_exhaustion() {
        let config = CalibrationConfig::step_only().with_samples_per_phase(3);
        let samples = [Sample::vertical(10.0); 4];
        let mut source = ScriptedSource::new(&samples);

        let result = Calibrator::new(config).run(&mut source, &mut NoDelay, &mut ());
        assert!(matches!(result, Err(MotionError::Sensor(_))));
    }

    #[test]
    fn phase_prompts() {
        assert_eq!(CalibrationPhase::Rest.prompt(), "Stand still");
        assert_eq!(CalibrationPhase::Jump.name(), "jump");
    }
}
