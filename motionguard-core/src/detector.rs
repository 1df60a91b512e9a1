//! Motion Detector: calibration, classification and notification in one loop
//!
//! ## Overview
//!
//! [`MotionDetector`] owns everything that changes at runtime: the sample
//! source, the notification sink, the calibration profile, both latches and
//! the counters. Nothing is global, so several detectors (one per sensor)
//! can coexist.
//!
//! ```text
//! SampleSource ──► magnitude ──► MotionClassifier ──► Notification ──► NotificationSink
//!                                    ▲
//!                          CalibrationProfile
//! ```
//!
//! ## Driving It
//!
//! - [`MotionDetector::run`] / [`MotionDetector::run_for`]: the classic
//!   polled loop, paced by a `DelayNs` (100 ms per poll, plus a refractory
//!   pause after each jump in the dual preset)
//! - [`MotionDetector::poll`]: one blocking read and classification
//! - [`MotionDetector::process`]: push a sample obtained elsewhere, e.g.
//!   from a timer interrupt handoff or a scheduler tick
//!
//! ## Example
//!
//! ```rust
//! use motionguard_core::{
//!     CalibrationProfile, DetectorConfig, MotionDetector, Sample,
//!     config::CalibrationConfig, notify::RecentNotifications, source::ScriptedSource,
//! };
//!
//! let samples = [10.0, 12.0, 12.5, 10.0, 12.0, 10.0].map(Sample::vertical);
//! let profile = CalibrationProfile::from_peaks(
//!     10.0, 10.0, 13.0, None,
//!     &CalibrationConfig::step_only().with_gains(1.0, 1.0),
//! );
//!
//! let mut detector = MotionDetector::new(
//!     ScriptedSource::new(&samples),
//!     RecentNotifications::<4>::new(),
//!     DetectorConfig::step_counter(),
//! )
//! .with_profile(profile);
//!
//! for _ in 0..samples.len() {
//!     detector.poll()?;
//! }
//!
//! assert_eq!(detector.counters().steps, 2);
//! assert_eq!(detector.sink().latest().map(|n| n.as_str()), Some("2"));
//! # Ok::<(), motionguard_core::MotionError<motionguard_core::SourceError<core::convert::Infallible>>>(())
//! ```

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;

use crate::{
    calibration::{CalibrationProfile, Calibrator},
    classifier::{EventCounters, EventKind, LatchState, MotionClassifier, MotionEvent, Transition},
    config::DetectorConfig,
    constants::PAYLOAD_CAPACITY,
    errors::{MotionError, MotionResult},
    notify::Notification,
    sample::Sample,
    traits::{NotificationSink, PhaseIndicator, SampleSource},
};

#[derive(Debug, Clone)]
struct Calibrated {
    profile: CalibrationProfile,
    classifier: MotionClassifier,
}

impl Calibrated {
    fn new(profile: CalibrationProfile) -> Self {
        Self {
            classifier: MotionClassifier::from_profile(&profile),
            profile,
        }
    }
}

/// Calibrated step and jump detector over a source and a sink
pub struct MotionDetector<S, N> {
    source: S,
    sink: N,
    config: DetectorConfig,
    calibrated: Option<Calibrated>,
}

impl<S, N> MotionDetector<S, N>
where
    S: SampleSource,
    N: NotificationSink,
{
    /// Uncalibrated detector
    pub fn new(source: S, sink: N, config: DetectorConfig) -> Self {
        Self {
            source,
            sink,
            config,
            calibrated: None,
        }
    }

    /// Skip calibration and use a known profile
    pub fn with_profile(mut self, profile: CalibrationProfile) -> Self {
        self.set_profile(profile);
        self
    }

    /// Replace the profile; counters and latches start over
    pub fn set_profile(&mut self, profile: CalibrationProfile) {
        self.calibrated = Some(Calibrated::new(profile));
    }

    /// Run calibration against the detector's own source
    ///
    /// Blocks for the whole procedure. On success the new profile replaces
    /// any previous one and counters restart from zero. On failure the
    /// previous profile, if any, stays in place.
    pub fn calibrate<D, I>(
        &mut self,
        delay: &mut D,
        indicator: &mut I,
    ) -> MotionResult<&CalibrationProfile, S::Error>
    where
        D: DelayNs,
        I: PhaseIndicator,
    {
        let profile = Calibrator::new(*self.config.calibration())
            .run(&mut self.source, delay, indicator)?;
        let calibrated = self.calibrated.insert(Calibrated::new(profile));
        Ok(&calibrated.profile)
    }

    /// Active profile, if calibrated
    pub fn profile(&self) -> Option<&CalibrationProfile> {
        self.calibrated.as_ref().map(|c| &c.profile)
    }

    /// True once a profile is in place
    pub fn is_calibrated(&self) -> bool {
        self.calibrated.is_some()
    }

    /// Detector configuration
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Totals since calibration; zero before
    pub fn counters(&self) -> EventCounters {
        self.calibrated
            .as_ref()
            .map(|c| c.classifier.counters())
            .unwrap_or_default()
    }

    /// Latch state for a kind; `Idle` before calibration
    pub fn state(&self, kind: EventKind) -> LatchState {
        self.calibrated
            .as_ref()
            .map(|c| c.classifier.state(kind))
            .unwrap_or_default()
    }

    /// Zero counters and release latches, keeping the profile
    pub fn reset_counters(&mut self) {
        if let Some(calibrated) = self.calibrated.as_mut() {
            calibrated.classifier.reset();
        }
    }

    /// Classify one sample and notify the sink on a rising edge
    ///
    /// The payload is rendered before the latch and counters move, so a
    /// [`MotionError::PayloadOverflow`] leaves the detector as it was.
    pub fn process(&mut self, sample: Sample) -> MotionResult<Option<MotionEvent>, S::Error> {
        let calibrated = self.calibrated.as_mut().ok_or(MotionError::NotCalibrated)?;
        let magnitude = sample.magnitude();

        let Some(transition) = calibrated.classifier.peek(magnitude) else {
            return Ok(None);
        };

        match transition {
            Transition::Rise(event) => {
                let notification = Notification::new(event, self.config.payload())
                    .map_err(|_| MotionError::PayloadOverflow {
                        capacity: PAYLOAD_CAPACITY,
                    })?;
                calibrated.classifier.commit(transition);
                log_info!(
                    "{} detected at magnitude {}, payload \"{}\"",
                    event.kind.name(),
                    magnitude,
                    notification.as_str()
                );
                self.sink.notify(&notification);
                Ok(Some(event))
            }
            Transition::Fall(kind) => {
                calibrated.classifier.commit(transition);
                log_trace!("{} latch released at magnitude {}", kind.name(), magnitude);
                Ok(None)
            }
        }
    }

    /// Block for the next sample and classify it
    pub fn poll(&mut self) -> MotionResult<Option<MotionEvent>, S::Error> {
        if self.calibrated.is_none() {
            return Err(MotionError::NotCalibrated);
        }
        let sample = nb::block!(self.source.poll_sample()).map_err(MotionError::Sensor)?;
        self.process(sample)
    }

    /// Run `ticks` iterations of the polled loop and return the totals
    pub fn run_for<D: DelayNs>(
        &mut self,
        ticks: u32,
        delay: &mut D,
    ) -> MotionResult<EventCounters, S::Error> {
        for _ in 0..ticks {
            self.tick(delay)?;
        }
        Ok(self.counters())
    }

    /// Run the polled loop until the source fails
    pub fn run<D: DelayNs>(&mut self, delay: &mut D) -> MotionResult<Infallible, S::Error> {
        log_info!(
            "Detecting motion every {} ms",
            self.config.poll_interval().ticks()
        );
        loop {
            self.tick(delay)?;
        }
    }

    fn tick<D: DelayNs>(&mut self, delay: &mut D) -> MotionResult<(), S::Error> {
        let event = self.poll()?;

        if let Some(MotionEvent { kind: EventKind::Jump, .. }) = event {
            let refractory_ms = self.config.jump_refractory().ticks();
            if refractory_ms > 0 {
                delay.delay_ms(refractory_ms);
            }
        }
        delay.delay_ms(self.config.poll_interval().ticks());

        Ok(())
    }

    /// Notification sink
    pub fn sink(&self) -> &N {
        &self.sink
    }

    /// Notification sink, mutably (e.g. to drain a queue)
    pub fn sink_mut(&mut self) -> &mut N {
        &mut self.sink
    }

    /// Sample source, mutably
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Take the source and sink back
    pub fn into_parts(self) -> (S, N) {
        (self.source, self.sink)
    }
}
