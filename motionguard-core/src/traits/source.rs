//! Sample Source Trait
//!
//! The detector pulls accelerometer samples through this trait. It follows
//! the `nb` non-blocking protocol so the same driver works in a bare-metal
//! loop, under an RTOS, or on a desktop replaying a capture.
//!
//! ## Error Model
//!
//! - `nb::Error::WouldBlock` - no new sample yet, try again
//! - `nb::Error::Other(E)` - the source failed or ran out of data
//!
//! The detector blocks on `WouldBlock` with `nb::block!`, so a source that
//! never produces data stalls the loop. IMU register reads always return
//! something, so in practice only buffered sources report `WouldBlock`.

use crate::sample::Sample;

/// Pull-based source of accelerometer samples
///
/// ## Example Implementation
///
/// ```rust
/// use motionguard_core::{Sample, SampleSource};
///
/// struct FixedImu {
///     reading: Sample,
/// }
///
/// impl SampleSource for FixedImu {
///     type Error = ();
///
///     fn poll_sample(&mut self) -> nb::Result<Sample, Self::Error> {
///         Ok(self.reading)
///     }
/// }
///
/// let mut imu = FixedImu { reading: Sample::vertical(1.0) };
/// assert_eq!(nb::block!(imu.poll_sample()), Ok(Sample::vertical(1.0)));
/// ```
pub trait SampleSource {
    /// Error reported by the underlying sensor or capture
    type Error;

    /// Attempt to read the next sample
    ///
    /// Must not block indefinitely. Returning `WouldBlock` repeatedly is
    /// normal for sensors with a data-ready flag.
    fn poll_sample(&mut self) -> nb::Result<Sample, Self::Error>;

    /// Bounds on the number of samples left, like `Iterator::size_hint`
    ///
    /// Live sensors are unbounded and keep the default `(0, None)`.
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}

impl<S: SampleSource + ?Sized> SampleSource for &mut S {
    type Error = S::Error;

    fn poll_sample(&mut self) -> nb::Result<Sample, Self::Error> {
        (**self).poll_sample()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (**self).size_hint()
    }
}
