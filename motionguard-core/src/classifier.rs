//! Hysteresis classification of magnitudes into motion events
//!
//! ## State Machine
//!
//! Each event kind has a latch:
//!
//! ```text
//!            magnitude > threshold  (count + notify)
//!   ┌──────┐ ─────────────────────────────────────► ┌────────┐
//!   │ Idle │                                         │ Active │
//!   └──────┘ ◄───────────────────────────────────── └────────┘
//!            magnitude < threshold
//! ```
//!
//! Anything else is a no-op, so a single excursion that stays above the
//! threshold for many samples counts once. A magnitude exactly equal to
//! the threshold never moves a latch.
//!
//! ## Priority
//!
//! Per sample the checks run as one chain and stop at the first transition:
//!
//! 1. jump rise
//! 2. step rise
//! 3. jump fall
//! 4. step fall
//!
//! So when a sample clears both thresholds, only the jump is counted on
//! that sample. The step latch is left alone and may rise on a later sample
//! if the magnitude is still above the step threshold.

use core::fmt;

use crate::calibration::CalibrationProfile;

/// Kinds of motion the detector counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    /// A step
    Step,
    /// A jump
    Jump,
}

impl EventKind {
    /// Lowercase name
    pub const fn name(&self) -> &'static str {
        match self {
            EventKind::Step => "step",
            EventKind::Jump => "jump",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Two-state hysteresis latch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LatchState {
    /// Below threshold, or never crossed
    #[default]
    Idle,
    /// Crossed the threshold and has not come back below it yet
    Active,
}

impl LatchState {
    /// True when latched
    pub fn is_active(&self) -> bool {
        matches!(self, LatchState::Active)
    }
}

/// Event totals since calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventCounters {
    /// Steps counted
    pub steps: u32,
    /// Jumps counted
    pub jumps: u32,
}

impl EventCounters {
    /// Count for one kind
    pub fn get(&self, kind: EventKind) -> u32 {
        match kind {
            EventKind::Step => self.steps,
            EventKind::Jump => self.jumps,
        }
    }

    fn increment(&mut self, kind: EventKind) {
        let counter = match kind {
            EventKind::Step => &mut self.steps,
            EventKind::Jump => &mut self.jumps,
        };
        *counter = counter.saturating_add(1);
    }
}

/// A counted motion event
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionEvent {
    /// What was counted
    pub kind: EventKind,
    /// Totals after counting this event
    pub counters: EventCounters,
    /// Magnitude of the sample that crossed the threshold
    pub magnitude: f32,
}

/// Latch transition produced by one sample
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    /// A latch went Idle → Active; the event was counted
    Rise(MotionEvent),
    /// A latch went Active → Idle
    Fall(EventKind),
}

/// Per-kind hysteresis classifier
#[derive(Debug, Clone)]
pub struct MotionClassifier {
    step_threshold: f32,
    jump_threshold: Option<f32>,
    step: LatchState,
    jump: LatchState,
    counters: EventCounters,
}

impl MotionClassifier {
    /// Classifier with explicit thresholds; `None` disables jumps
    pub fn new(step_threshold: f32, jump_threshold: Option<f32>) -> Self {
        Self {
            step_threshold,
            jump_threshold,
            step: LatchState::Idle,
            jump: LatchState::Idle,
            counters: EventCounters::default(),
        }
    }

    /// Classifier using a calibration profile's thresholds
    pub fn from_profile(profile: &CalibrationProfile) -> Self {
        Self::new(profile.step_threshold(), profile.jump_threshold())
    }

    /// Feed one magnitude; returns the transition it caused, if any
    pub fn update(&mut self, magnitude: f32) -> Option<Transition> {
        let transition = self.peek(magnitude)?;
        self.commit(transition);
        Some(transition)
    }

    /// Transition `magnitude` would cause, leaving the classifier untouched
    ///
    /// A rise carries the counters as they will be after [`commit`](Self::commit).
    pub fn peek(&self, magnitude: f32) -> Option<Transition> {
        if let Some(jump_threshold) = self.jump_threshold {
            if magnitude > jump_threshold && self.jump == LatchState::Idle {
                return Some(Transition::Rise(self.event(EventKind::Jump, magnitude)));
            }
        }

        if magnitude > self.step_threshold && self.step == LatchState::Idle {
            return Some(Transition::Rise(self.event(EventKind::Step, magnitude)));
        }

        if let Some(jump_threshold) = self.jump_threshold {
            if magnitude < jump_threshold && self.jump == LatchState::Active {
                return Some(Transition::Fall(EventKind::Jump));
            }
        }

        if magnitude < self.step_threshold && self.step == LatchState::Active {
            return Some(Transition::Fall(EventKind::Step));
        }

        None
    }

    /// Apply a transition returned by [`peek`](Self::peek)
    pub fn commit(&mut self, transition: Transition) {
        match transition {
            Transition::Rise(event) => {
                *self.latch_mut(event.kind) = LatchState::Active;
                self.counters = event.counters;
            }
            Transition::Fall(kind) => *self.latch_mut(kind) = LatchState::Idle,
        }
    }

    /// Feed one magnitude; returns the event counted, if any
    pub fn classify(&mut self, magnitude: f32) -> Option<MotionEvent> {
        match self.update(magnitude) {
            Some(Transition::Rise(event)) => Some(event),
            _ => None,
        }
    }

    fn event(&self, kind: EventKind, magnitude: f32) -> MotionEvent {
        let mut counters = self.counters;
        counters.increment(kind);

        MotionEvent {
            kind,
            counters,
            magnitude,
        }
    }

    fn latch_mut(&mut self, kind: EventKind) -> &mut LatchState {
        match kind {
            EventKind::Step => &mut self.step,
            EventKind::Jump => &mut self.jump,
        }
    }

    /// Latch state for a kind
    pub fn state(&self, kind: EventKind) -> LatchState {
        match kind {
            EventKind::Step => self.step,
            EventKind::Jump => self.jump,
        }
    }

    /// Totals so far
    pub fn counters(&self) -> EventCounters {
        self.counters
    }

    /// Step threshold in use
    pub fn step_threshold(&self) -> f32 {
        self.step_threshold
    }

    /// Jump threshold in use
    pub fn jump_threshold(&self) -> Option<f32> {
        self.jump_threshold
    }

    /// Zero the counters and release both latches
    pub fn reset(&mut self) {
        self.step = LatchState::Idle;
        self.jump = LatchState::Idle;
        self.counters = EventCounters::default();
    }
}
