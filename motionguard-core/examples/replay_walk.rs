//! Calibrate on a synthetic session, then count steps and jumps
//!
//! Run with `cargo run --example replay_walk`. Pass `--realtime` to pace the
//! loop with real sleeps instead of skipping them.

use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use motionguard_core::{
    notify::FnSink, source::ScriptedSource, CalibrationPhase, CalibrationProfile, DetectorConfig,
    MotionDetector, PhaseIndicator, Sample,
};

const GRAVITY: f32 = 9.81;

struct StdDelay {
    realtime: bool,
}

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        if self.realtime {
            thread::sleep(Duration::from_nanos(u64::from(ns)));
        }
    }
}

struct ConsolePrompts;

impl PhaseIndicator for ConsolePrompts {
    fn phase_started(&mut self, phase: CalibrationPhase) {
        println!("[{}] {}", phase, phase.prompt());
    }

    fn calibration_finished(&mut self, profile: &CalibrationProfile) {
        println!("Resting average: {:.3}", profile.resting_average());
        println!("Step threshold:  {:.3}", profile.step_threshold());
        if let Some(jump) = profile.jump_threshold() {
            println!("Jump threshold:  {:.3}", jump);
        }
    }
}

fn session(config: &DetectorConfig) -> Vec<Sample> {
    let n = config.calibration().samples_per_phase() as usize;
    let mut magnitudes = Vec::new();

    // Rest, with a little sensor noise
    magnitudes.extend((0..n).map(|i| GRAVITY + 0.02 * ((i % 7) as f32 - 3.0)));
    // Walk: one heel strike every 25 samples
    magnitudes.extend((0..n).map(|i| if i % 25 == 0 { GRAVITY + 4.0 } else { GRAVITY }));
    // Jump: takeoff then flight
    magnitudes.extend((0..n).map(|i| match i % 40 {
        0 => GRAVITY + 10.0,
        1..=5 => GRAVITY * 0.3,
        _ => GRAVITY,
    }));

    // Detection: ten strides, then three jumps
    magnitudes.extend((0..50).map(|i| match i % 5 {
        0 => GRAVITY + 2.0,
        _ => GRAVITY,
    }));
    magnitudes.extend((0..15).map(|i| match i % 5 {
        0 => GRAVITY + 10.0,
        _ => GRAVITY * 0.3,
    }));

    magnitudes.into_iter().map(Sample::vertical).collect()
}

fn main() {
    let realtime = std::env::args().any(|arg| arg == "--realtime");
    let config = DetectorConfig::step_and_jump();
    let samples = session(&config);

    let sink = FnSink(|n: &motionguard_core::Notification| {
        println!("{} -> \"{}\"", n.event().kind, n.as_str());
    });
    let mut detector = MotionDetector::new(ScriptedSource::new(&samples), sink, config);
    let mut delay = StdDelay { realtime };

    if let Err(e) = detector.calibrate(&mut delay, &mut ConsolePrompts) {
        eprintln!("Calibration failed: {}", e);
        return;
    }

    match detector.run(&mut delay) {
        Ok(never) => match never {},
        Err(e) => println!("Replay finished ({}), totals {:?}", e, detector.counters()),
    }
}
