//! Detector behaviour over scripted sessions

#![cfg(feature = "source-memory")]

mod common;

use common::{samples, CollectingSink, RecordingDelay};
use motionguard_core::{
    config::CalibrationConfig,
    notify::{LogSink, RecentNotifications},
    source::{ScriptedSource, SourceError},
    CalibrationProfile, DetectorConfig, EventKind, MotionClassifier, MotionDetector, MotionError,
    PayloadFormat, Sample,
};
use proptest::prelude::*;

/// Step threshold 11
fn step_profile() -> CalibrationProfile {
    CalibrationProfile::from_peaks(
        10.0,
        10.0,
        13.0,
        None,
        &CalibrationConfig::step_only().with_gains(1.0, 1.0),
    )
}

/// Step threshold 11, jump threshold 14
fn dual_profile() -> CalibrationProfile {
    CalibrationProfile::from_peaks(
        10.0,
        10.0,
        13.0,
        Some(16.0),
        &CalibrationConfig::step_and_jump().with_gains(1.0, 2.0),
    )
}

fn run_script(
    profile: CalibrationProfile,
    config: DetectorConfig,
    magnitudes: &[f32],
) -> (MotionDetector<ScriptedSource<'static>, CollectingSink>, RecordingDelay) {
    // Leaked so the returned detector can own its source
    let samples: &'static [Sample] = Box::leak(samples(magnitudes).into_boxed_slice());
    let mut detector =
        MotionDetector::new(ScriptedSource::new(samples), CollectingSink::default(), config)
            .with_profile(profile);
    let mut delay = RecordingDelay::default();
    detector
        .run_for(magnitudes.len() as u32, &mut delay)
        .unwrap();
    (detector, delay)
}

#[test]
fn uncalibrated_poll_is_rejected() {
    let samples = [Sample::vertical(12.0)];
    let mut detector = MotionDetector::new(
        ScriptedSource::new(&samples),
        LogSink,
        DetectorConfig::default(),
    );

    assert!(!detector.is_calibrated());
    assert_eq!(detector.poll(), Err(MotionError::NotCalibrated));
    assert_eq!(
        detector.run_for(1, &mut RecordingDelay::default()),
        Err(MotionError::NotCalibrated)
    );
}

#[test]
fn one_count_per_excursion() {
    let (detector, _) = run_script(
        step_profile(),
        DetectorConfig::step_counter(),
        &[10.0, 12.0, 13.0, 15.0, 12.0, 10.0, 10.5, 11.5, 10.0],
    );

    assert_eq!(detector.counters().steps, 2);
    assert_eq!(detector.sink().payloads, ["1", "2"]);
}

#[test]
fn jump_takes_priority_over_step() {
    let (detector, _) = run_script(
        dual_profile(),
        DetectorConfig::step_and_jump(),
        &[10.0, 15.0, 10.0],
    );

    let counters = detector.counters();
    assert_eq!(counters.jumps, 1);
    assert_eq!(counters.steps, 0);
    assert_eq!(detector.sink().payloads, ["Steps: 0 Jumps: 1"]);
}

#[test]
fn step_payload_format_ignores_jumps() {
    let config = DetectorConfig::step_and_jump().with_payload(PayloadFormat::StepCount);
    let (detector, _) = run_script(dual_profile(), config, &[12.0, 10.0, 15.0, 10.0, 12.0]);

    assert_eq!(detector.sink().payloads, ["1", "1", "2"]);
}

#[test]
fn refractory_pause_follows_each_jump() {
    let (_, delay) = run_script(
        dual_profile(),
        DetectorConfig::step_and_jump(),
        &[15.0, 10.0, 15.0, 10.0, 12.0, 10.0],
    );

    assert_eq!(delay.total_ms, 6 * 100 + 2 * 500);
}

#[test]
fn step_preset_has_no_refractory_pause() {
    let (_, delay) = run_script(
        step_profile(),
        DetectorConfig::step_counter(),
        &[12.0, 10.0, 12.0, 10.0],
    );

    assert_eq!(delay.total_ms, 4 * 100);
    assert_eq!(delay.calls, 4);
}

#[test]
fn history_sink_keeps_latest() {
    let samples = samples(&[12.0, 10.0, 12.0, 10.0, 12.0]);
    let mut detector = MotionDetector::new(
        ScriptedSource::new(&samples),
        RecentNotifications::<2>::new(),
        DetectorConfig::step_counter(),
    )
    .with_profile(step_profile());

    let result = detector.run(&mut RecordingDelay::default());
    assert!(matches!(result, Err(MotionError::Sensor(SourceError::EndOfStream))));

    let (_, history) = detector.into_parts();
    assert_eq!(history.len(), 2);
    assert_eq!(history.dropped(), 1);
    assert_eq!(history.latest().map(|n| n.as_str()), Some("3"));
}

#[test]
fn push_model_matches_polled_loop() {
    let script = [10.0, 12.0, 10.0, 15.0, 16.0, 10.0, 12.0];
    let (polled, _) = run_script(dual_profile(), DetectorConfig::step_and_jump(), &script);

    let mut pushed = MotionDetector::new(
        ScriptedSource::new(&[]),
        CollectingSink::default(),
        DetectorConfig::step_and_jump(),
    )
    .with_profile(dual_profile());
    for &m in &script {
        pushed.process(Sample::vertical(m)).unwrap();
    }

    assert_eq!(pushed.counters(), polled.counters());
    assert_eq!(pushed.sink().payloads, polled.sink().payloads);
    assert_eq!(pushed.state(EventKind::Step), polled.state(EventKind::Step));
}

proptest! {
    #[test]
    fn below_threshold_never_latches(magnitudes in prop::collection::vec(0.0f32..11.0, 0..300)) {
        let mut classifier = MotionClassifier::from_profile(&dual_profile());

        for m in magnitudes {
            prop_assert!(classifier.update(m).is_none());
        }
        prop_assert_eq!(classifier.counters().steps, 0);
        prop_assert_eq!(classifier.counters().jumps, 0);
    }

    #[test]
    fn each_excursion_counts_once(
        excursions in prop::collection::vec(
            (prop::collection::vec(11.01f32..13.99, 1..20), 1usize..10),
            0..20,
        )
    ) {
        let mut classifier = MotionClassifier::from_profile(&dual_profile());

        for (above, quiet) in &excursions {
            for &m in above {
                classifier.update(m);
            }
            for _ in 0..*quiet {
                classifier.update(10.0);
            }
        }

        prop_assert_eq!(classifier.counters().steps as usize, excursions.len());
        prop_assert_eq!(classifier.counters().jumps, 0);
    }

    #[test]
    fn classification_is_deterministic(magnitudes in prop::collection::vec(0.0f32..25.0, 0..200)) {
        let mut a = MotionClassifier::from_profile(&dual_profile());
        let mut b = MotionClassifier::from_profile(&dual_profile());

        for &m in &magnitudes {
            prop_assert_eq!(a.update(m), b.update(m));
        }
    }
}
