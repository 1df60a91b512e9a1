//! LED calibration cues
//!
//! Boards without a screen cue the wearer with a single LED:
//!
//! | Event                   | LED                               |
//! |-------------------------|-----------------------------------|
//! | Rest phase starts       | on, stand still until it goes off |
//! | Step or jump phase      | off                               |
//! | Calibration finished    | two 250 ms blinks                 |

use embedded_hal::{delay::DelayNs, digital::OutputPin};

use crate::{
    calibration::{CalibrationPhase, CalibrationProfile},
    constants::timing::CALIBRATION_DONE_BLINK_MS,
    traits::PhaseIndicator,
};

const DONE_BLINKS: u8 = 2;

/// [`PhaseIndicator`] driving an LED through `embedded-hal`
///
/// Pin errors are ignored: a broken LED must not abort calibration.
pub struct LedIndicator<P, D> {
    led: P,
    delay: D,
}

impl<P, D> LedIndicator<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    /// Drive `led`, using `delay` to time the completion blinks
    pub fn new(led: P, delay: D) -> Self {
        Self { led, delay }
    }

    /// Give the pin and delay back
    pub fn release(self) -> (P, D) {
        (self.led, self.delay)
    }
}

impl<P, D> PhaseIndicator for LedIndicator<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    fn phase_started(&mut self, phase: CalibrationPhase) {
        let _ = match phase {
            CalibrationPhase::Rest => self.led.set_high(),
            CalibrationPhase::Step | CalibrationPhase::Jump => self.led.set_low(),
        };
    }

    fn calibration_finished(&mut self, _profile: &CalibrationProfile) {
        for _ in 0..DONE_BLINKS {
            let _ = self.led.set_high();
            self.delay.delay_ms(CALIBRATION_DONE_BLINK_MS);
            let _ = self.led.set_low();
            self.delay.delay_ms(CALIBRATION_DONE_BLINK_MS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalibrationConfig;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    #[derive(Default)]
    struct RecordingPin {
        levels: heapless::Vec<bool, 8>,
    }

    impl ErrorType for RecordingPin {
        type Error = Infallible;
    }

    impl OutputPin for RecordingPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.levels.push(false).ok();
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.levels.push(true).ok();
            Ok(())
        }
    }

    #[derive(Default)]
    struct MsDelay(u32);

    impl DelayNs for MsDelay {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_ms(&mut self, ms: u32) {
            self.0 += ms;
        }
    }

    #[test]
    fn cues_each_phase_then_blinks_twice() {
        let mut indicator = LedIndicator::new(RecordingPin::default(), MsDelay::default());
        let profile = CalibrationProfile::from_peaks(
            10.0,
            10.0,
            13.0,
            None,
            &CalibrationConfig::step_only(),
        );

        indicator.phase_started(CalibrationPhase::Rest);
        indicator.phase_started(CalibrationPhase::Step);
        indicator.calibration_finished(&profile);

        let (pin, delay) = indicator.release();
        assert_eq!(pin.levels.as_slice(), &[true, false, true, false, true, false]);
        assert_eq!(delay.0, 4 * CALIBRATION_DONE_BLINK_MS);
    }
}
