//! Common test utilities for integration tests
//!
//! This module provides:
//! - Deterministic magnitude scripts for rest, walking and jumping
//! - A delay that records time instead of sleeping
//! - A sink that collects payloads

#![allow(dead_code)]

use embedded_hal::delay::DelayNs;
use motionguard_core::{Notification, NotificationSink, Sample};

/// Gravity in m/s², the resting magnitude of a still sensor
pub const GRAVITY: f32 = 9.81;

/// Small linear congruential generator so scripts are reproducible
pub struct Lcg(u32);

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self(seed)
    }

    /// Uniform value in [-1, 1]
    pub fn next_unit(&mut self) -> f32 {
        self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        ((self.0 >> 8) as f32 / (1u32 << 24) as f32) * 2.0 - 1.0
    }
}

/// Standing still: gravity plus up to ±`noise`
pub fn rest_magnitudes(count: usize, noise: f32, seed: u32) -> Vec<f32> {
    let mut rng = Lcg::new(seed);
    (0..count).map(|_| GRAVITY + noise * rng.next_unit()).collect()
}

/// Walking: one impact of height `peak` every `period` samples
pub fn walk_magnitudes(count: usize, period: usize, peak: f32) -> Vec<f32> {
    (0..count)
        .map(|i| match i % period {
            0 => GRAVITY + peak,
            1 => GRAVITY + peak / 2.0,
            _ => GRAVITY,
        })
        .collect()
}

/// Jumping: a takeoff of height `peak`, then a quiet flight phase
pub fn jump_magnitudes(count: usize, period: usize, peak: f32) -> Vec<f32> {
    (0..count)
        .map(|i| match i % period {
            0 | 1 => GRAVITY + peak,
            2 => GRAVITY + peak / 2.0,
            _ => GRAVITY * 0.3,
        })
        .collect()
}

/// Turn magnitudes into vertical samples
pub fn samples(magnitudes: &[f32]) -> Vec<Sample> {
    magnitudes.iter().copied().map(Sample::vertical).collect()
}

/// Records requested delays instead of sleeping
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub total_ms: u64,
    pub calls: usize,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ms += u64::from(ns / 1_000_000);
        self.calls += 1;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += u64::from(ms);
        self.calls += 1;
    }
}

/// Keeps every payload in arrival order
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub payloads: Vec<String>,
}

impl NotificationSink for CollectingSink {
    fn notify(&mut self, notification: &Notification) {
        self.payloads.push(notification.as_str().to_string());
    }
}
