//! Detector configuration
//!
//! Two presets cover the usual wearable setups:
//!
//! - [`DetectorConfig::step_counter`]: rest + step calibration, one
//!   threshold at gain 0.9, payload is the bare step count.
//! - [`DetectorConfig::step_and_jump`]: rest + step + jump calibration,
//!   gains 0.7 and 0.8, payload `"Steps: S Jumps: J"`, 500 ms pause after a
//!   jump.
//!
//! Everything can be tuned with the `with_*` methods, which sanitize their
//! input instead of failing.
//!
//! ```rust
//! use motionguard_core::config::{DetectorConfig, PhasePlan};
//!
//! let config = DetectorConfig::step_and_jump()
//!     .with_samples_per_phase(250)
//!     .with_poll_interval_ms(50);
//!
//! assert_eq!(config.calibration().plan(), PhasePlan::StepAndJump);
//! assert_eq!(config.calibration().samples_per_phase(), 250);
//! assert_eq!(config.poll_interval().ticks(), 50);
//! ```

use fugit::MillisDurationU32;

use crate::{
    calibration::CalibrationPhase,
    constants::{
        CALIBRATION_SAMPLE_INTERVAL_MS, JUMP_GAIN, JUMP_REFRACTORY_MS, POLL_INTERVAL_MS,
        SAMPLES_PER_PHASE, STEP_GAIN_DUAL, STEP_GAIN_SINGLE,
    },
    notify::PayloadFormat,
};

/// Which calibration phases run, and therefore which events are detected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhasePlan {
    /// Rest then step; steps only
    StepOnly,
    /// Rest, step, then jump; steps and jumps
    StepAndJump,
}

impl PhasePlan {
    /// Phases in the order they run
    pub const fn phases(&self) -> &'static [CalibrationPhase] {
        match self {
            PhasePlan::StepOnly => &[CalibrationPhase::Rest, CalibrationPhase::Step],
            PhasePlan::StepAndJump => &[
                CalibrationPhase::Rest,
                CalibrationPhase::Step,
                CalibrationPhase::Jump,
            ],
        }
    }

    /// True if this plan calibrates a jump threshold
    pub const fn detects_jumps(&self) -> bool {
        matches!(self, PhasePlan::StepAndJump)
    }
}

/// Calibration parameters
///
/// When deserialized, missing fields come from the preset matching `plan`
/// (step-only if `plan` is missing too), and the builders' sanitization
/// applies.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "CalibrationOverrides"))]
pub struct CalibrationConfig {
    samples_per_phase: u32,
    sample_interval_ms: u32,
    plan: PhasePlan,
    step_gain: f32,
    jump_gain: f32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self::step_only()
    }
}

impl CalibrationConfig {
    /// Rest + step calibration with the single-event step gain
    pub const fn step_only() -> Self {
        Self {
            samples_per_phase: SAMPLES_PER_PHASE,
            sample_interval_ms: CALIBRATION_SAMPLE_INTERVAL_MS,
            plan: PhasePlan::StepOnly,
            step_gain: STEP_GAIN_SINGLE,
            jump_gain: JUMP_GAIN,
        }
    }

    /// Rest + step + jump calibration with the dual-event gains
    pub const fn step_and_jump() -> Self {
        Self {
            samples_per_phase: SAMPLES_PER_PHASE,
            sample_interval_ms: CALIBRATION_SAMPLE_INTERVAL_MS,
            plan: PhasePlan::StepAndJump,
            step_gain: STEP_GAIN_DUAL,
            jump_gain: JUMP_GAIN,
        }
    }

    /// Samples per phase; at least 1
    pub fn with_samples_per_phase(mut self, samples: u32) -> Self {
        self.samples_per_phase = samples.max(1);
        self
    }

    /// Delay between calibration samples
    pub fn with_sample_interval_ms(mut self, interval_ms: u32) -> Self {
        self.sample_interval_ms = interval_ms;
        self
    }

    /// Replace the phase plan
    pub fn with_plan(mut self, plan: PhasePlan) -> Self {
        self.plan = plan;
        self
    }

    /// Step and jump gains; negative or non-finite gains become 0
    pub fn with_gains(mut self, step_gain: f32, jump_gain: f32) -> Self {
        self.step_gain = sanitize_gain(step_gain);
        self.jump_gain = sanitize_gain(jump_gain);
        self
    }

    /// Samples collected in each phase
    pub fn samples_per_phase(&self) -> u32 {
        self.samples_per_phase
    }

    /// Delay between calibration samples
    pub fn sample_interval(&self) -> MillisDurationU32 {
        MillisDurationU32::from_ticks(self.sample_interval_ms)
    }

    /// Phase plan
    pub fn plan(&self) -> PhasePlan {
        self.plan
    }

    /// Gain applied to the step deviation
    pub fn step_gain(&self) -> f32 {
        self.step_gain
    }

    /// Gain applied to the jump deviation
    pub fn jump_gain(&self) -> f32 {
        self.jump_gain
    }
}

fn sanitize_gain(gain: f32) -> f32 {
    if gain.is_finite() {
        gain.max(0.0)
    } else {
        0.0
    }
}

/// Full detector configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "DetectorOverrides"))]
pub struct DetectorConfig {
    calibration: CalibrationConfig,
    poll_interval_ms: u32,
    jump_refractory_ms: u32,
    payload: PayloadFormat,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::step_counter()
    }
}

impl DetectorConfig {
    /// Step-only counter
    pub const fn step_counter() -> Self {
        Self {
            calibration: CalibrationConfig::step_only(),
            poll_interval_ms: POLL_INTERVAL_MS,
            jump_refractory_ms: 0,
            payload: PayloadFormat::StepCount,
        }
    }

    /// Step and jump counter
    pub const fn step_and_jump() -> Self {
        Self {
            calibration: CalibrationConfig::step_and_jump(),
            poll_interval_ms: POLL_INTERVAL_MS,
            jump_refractory_ms: JUMP_REFRACTORY_MS,
            payload: PayloadFormat::Summary,
        }
    }

    /// Replace the calibration parameters
    pub fn with_calibration(mut self, calibration: CalibrationConfig) -> Self {
        self.calibration = calibration;
        self
    }

    /// Shortcut for `calibration.with_samples_per_phase`
    pub fn with_samples_per_phase(mut self, samples: u32) -> Self {
        self.calibration = self.calibration.with_samples_per_phase(samples);
        self
    }

    /// Delay between classification polls
    pub fn with_poll_interval_ms(mut self, interval_ms: u32) -> Self {
        self.poll_interval_ms = interval_ms;
        self
    }

    /// Extra pause after each counted jump
    pub fn with_jump_refractory_ms(mut self, refractory_ms: u32) -> Self {
        self.jump_refractory_ms = refractory_ms;
        self
    }

    /// Notification payload format
    pub fn with_payload(mut self, payload: PayloadFormat) -> Self {
        self.payload = payload;
        self
    }

    /// Calibration parameters
    pub fn calibration(&self) -> &CalibrationConfig {
        &self.calibration
    }

    /// Delay between classification polls
    pub fn poll_interval(&self) -> MillisDurationU32 {
        MillisDurationU32::from_ticks(self.poll_interval_ms)
    }

    /// Extra pause after each counted jump
    pub fn jump_refractory(&self) -> MillisDurationU32 {
        MillisDurationU32::from_ticks(self.jump_refractory_ms)
    }

    /// Notification payload format
    pub fn payload(&self) -> PayloadFormat {
        self.payload
    }

    /// Load a configuration from JSON
    ///
    /// Missing fields take the values of the preset selected by
    /// `calibration.plan`: [`DetectorConfig::step_and_jump`] for
    /// `"step_and_jump"`, [`DetectorConfig::step_counter`] otherwise.
    ///
    /// ```rust
    /// use motionguard_core::{PayloadFormat, config::{DetectorConfig, PhasePlan}};
    ///
    /// let config = DetectorConfig::from_json(
    ///     r#"{"calibration": {"plan": "step_and_jump", "samples_per_phase": 0}}"#,
    /// ).unwrap();
    /// assert_eq!(config.calibration().plan(), PhasePlan::StepAndJump);
    /// assert_eq!(config.calibration().samples_per_phase(), 1);
    /// assert_eq!(config.calibration().step_gain(), 0.7);
    /// assert_eq!(config.jump_refractory().ticks(), 500);
    /// assert_eq!(config.payload(), PayloadFormat::Summary);
    /// ```
    #[cfg(feature = "std")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to JSON
    #[cfg(feature = "std")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Calibration fields as found in a config file; all optional
#[cfg(feature = "serde")]
#[derive(Debug, Default, serde::Deserialize)]
struct CalibrationOverrides {
    samples_per_phase: Option<u32>,
    sample_interval_ms: Option<u32>,
    plan: Option<PhasePlan>,
    step_gain: Option<f32>,
    jump_gain: Option<f32>,
}

#[cfg(feature = "serde")]
impl CalibrationOverrides {
    fn preset(plan: Option<PhasePlan>) -> CalibrationConfig {
        match plan {
            Some(PhasePlan::StepAndJump) => CalibrationConfig::step_and_jump(),
            Some(PhasePlan::StepOnly) | None => CalibrationConfig::step_only(),
        }
    }

    fn apply(self, base: CalibrationConfig) -> CalibrationConfig {
        let mut config = base;
        if let Some(plan) = self.plan {
            config = config.with_plan(plan);
        }
        if let Some(samples) = self.samples_per_phase {
            config = config.with_samples_per_phase(samples);
        }
        if let Some(interval_ms) = self.sample_interval_ms {
            config = config.with_sample_interval_ms(interval_ms);
        }
        config.with_gains(
            self.step_gain.unwrap_or(base.step_gain),
            self.jump_gain.unwrap_or(base.jump_gain),
        )
    }
}

#[cfg(feature = "serde")]
impl From<CalibrationOverrides> for CalibrationConfig {
    fn from(overrides: CalibrationOverrides) -> Self {
        let base = CalibrationOverrides::preset(overrides.plan);
        overrides.apply(base)
    }
}

/// Detector fields as found in a config file; all optional
#[cfg(feature = "serde")]
#[derive(Debug, Default, serde::Deserialize)]
struct DetectorOverrides {
    calibration: Option<CalibrationOverrides>,
    poll_interval_ms: Option<u32>,
    jump_refractory_ms: Option<u32>,
    payload: Option<PayloadFormat>,
}

#[cfg(feature = "serde")]
impl From<DetectorOverrides> for DetectorConfig {
    fn from(overrides: DetectorOverrides) -> Self {
        let calibration = overrides.calibration.unwrap_or_default();
        let mut config = match calibration.plan {
            Some(PhasePlan::StepAndJump) => DetectorConfig::step_and_jump(),
            Some(PhasePlan::StepOnly) | None => DetectorConfig::step_counter(),
        };

        config.calibration = calibration.apply(config.calibration);
        if let Some(interval_ms) = overrides.poll_interval_ms {
            config.poll_interval_ms = interval_ms;
        }
        if let Some(refractory_ms) = overrides.jump_refractory_ms {
            config.jump_refractory_ms = refractory_ms;
        }
        if let Some(payload) = overrides.payload {
            config.payload = payload;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_counter_preset() {
        let config = DetectorConfig::step_counter();
        let cal = config.calibration();

        assert_eq!(cal.plan(), PhasePlan::StepOnly);
        assert_eq!(cal.samples_per_phase(), 500);
        assert_eq!(cal.sample_interval().ticks(), 20);
        assert_eq!(cal.step_gain(), 0.9);
        assert_eq!(config.poll_interval().ticks(), 100);
        assert_eq!(config.jump_refractory().ticks(), 0);
        assert_eq!(config.payload(), PayloadFormat::StepCount);
    }

    #[test]
    fn step_and_jump_preset() {
        let config = DetectorConfig::step_and_jump();
        let cal = config.calibration();

        assert_eq!(cal.plan(), PhasePlan::StepAndJump);
        assert_eq!(cal.step_gain(), 0.7);
        assert_eq!(cal.jump_gain(), 0.8);
        assert_eq!(config.jump_refractory().ticks(), 500);
        assert_eq!(config.payload(), PayloadFormat::Summary);
    }

    #[test]
    fn builders_sanitize_input() {
        let cal = CalibrationConfig::step_only()
            .with_samples_per_phase(0)
            .with_gains(-1.0, f32::NAN);

        assert_eq!(cal.samples_per_phase(), 1);
        assert_eq!(cal.step_gain(), 0.0);
        assert_eq!(cal.jump_gain(), 0.0);
    }

    #[test]
    fn plan_phases() {
        assert_eq!(PhasePlan::StepOnly.phases().len(), 2);
        assert_eq!(
            PhasePlan::StepAndJump.phases(),
            &[CalibrationPhase::Rest, CalibrationPhase::Step, CalibrationPhase::Jump]
        );
        assert!(!PhasePlan::StepOnly.detects_jumps());
        assert!(PhasePlan::StepAndJump.detects_jumps());
    }

    #[cfg(feature = "std")]
    #[test]
    fn json_round_trip_keeps_presets() {
        let config = DetectorConfig::step_and_jump().with_poll_interval_ms(40);
        let json = config.to_json().unwrap();
        assert_eq!(DetectorConfig::from_json(&json).unwrap(), config);
    }

    #[cfg(feature = "std")]
    #[test]
    fn json_plan_selects_matching_preset() {
        let dual = DetectorConfig::from_json(r#"{"calibration": {"plan": "step_and_jump"}}"#)
            .unwrap();
        assert_eq!(dual, DetectorConfig::step_and_jump());

        let single = DetectorConfig::from_json(r#"{"calibration": {"plan": "step_only"}}"#)
            .unwrap();
        assert_eq!(single, DetectorConfig::step_counter());

        assert_eq!(DetectorConfig::from_json("{}").unwrap(), DetectorConfig::step_counter());
    }

    #[cfg(feature = "std")]
    #[test]
    fn json_fields_override_the_preset() {
        let config = DetectorConfig::from_json(
            r#"{"calibration": {"plan": "step_and_jump", "jump_gain": -2.0},
                "payload": "step_count", "jump_refractory_ms": 250}"#,
        )
        .unwrap();
        let cal = config.calibration();

        assert_eq!(cal.step_gain(), 0.7);
        assert_eq!(cal.jump_gain(), 0.0);
        assert_eq!(cal.samples_per_phase(), 500);
        assert_eq!(config.jump_refractory().ticks(), 250);
        assert_eq!(config.poll_interval().ticks(), 100);
        assert_eq!(config.payload(), PayloadFormat::StepCount);
    }

    #[cfg(feature = "std")]
    #[test]
    fn json_rejects_unknown_plan() {
        assert!(DetectorConfig::from_json(r#"{"calibration": {"plan": "hop"}}"#).is_err());
    }
}
