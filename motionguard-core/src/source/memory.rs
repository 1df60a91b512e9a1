//! Memory-backed sources for testing and replay
//!
//! Useful for:
//! - Unit testing with scripted magnitude sequences
//! - Replaying recorded sessions held in RAM
//! - Simulating a wearer on the host

use core::convert::Infallible;

use crate::sample::Sample;
use super::{SampleSource, SourceError};

/// Replays a slice of samples once, then reports `EndOfStream`
///
/// ```rust
/// use motionguard_core::{Sample, SampleSource, source::{ScriptedSource, SourceError}};
///
/// let samples = [Sample::vertical(9.8), Sample::vertical(12.0)];
/// let mut source = ScriptedSource::new(&samples);
///
/// assert_eq!(source.size_hint(), (2, Some(2)));
/// assert_eq!(source.poll_sample(), Ok(Sample::vertical(9.8)));
/// assert_eq!(source.poll_sample(), Ok(Sample::vertical(12.0)));
/// assert_eq!(
///     source.poll_sample(),
///     Err(nb::Error::Other(SourceError::EndOfStream))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedSource<'a> {
    samples: &'a [Sample],
    position: usize,
}

impl<'a> ScriptedSource<'a> {
    /// Replay `samples` from the start
    pub fn new(samples: &'a [Sample]) -> Self {
        Self {
            samples,
            position: 0,
        }
    }

    /// Rewind to the first sample
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Index of the next sample
    pub fn position(&self) -> usize {
        self.position
    }

    /// True once every sample was handed out
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.samples.len()
    }
}

impl<'a> SampleSource for ScriptedSource<'a> {
    type Error = SourceError<Infallible>;

    fn poll_sample(&mut self) -> nb::Result<Sample, Self::Error> {
        let sample = self
            .samples
            .get(self.position)
            .copied()
            .ok_or(nb::Error::Other(SourceError::EndOfStream))?;
        self.position += 1;
        Ok(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.samples.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}
