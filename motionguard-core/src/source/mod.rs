//! Sample sources
//!
//! Implementations of [`SampleSource`] that ship with the crate:
//!
//! - [`FnSource`] - wraps a closure, typically an IMU driver read
//! - `memory` - [`ScriptedSource`] replays a slice (tests, simulation)
//! - `file` - [`SampleFile`] replays a recorded CSV or JSON Lines capture
//!   (requires `std`)

use core::convert::Infallible;
use core::fmt;

use crate::sample::Sample;

#[cfg(feature = "source-memory")]
pub mod memory;

#[cfg(feature = "source-file")]
pub mod file;

#[cfg(feature = "source-memory")]
pub use memory::ScriptedSource;

#[cfg(feature = "source-file")]
pub use file::{SampleFile, FileFormat, FileSourceStats};

pub use crate::traits::SampleSource;

/// Errors raised by the bundled sources
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError<E> {
    /// Underlying I/O or bus error
    Transport(E),
    /// A record could not be parsed
    Format(&'static str),
    /// Replay reached the end of its data
    EndOfStream,
}

impl<E: fmt::Display> fmt::Display for SourceError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::Format(msg) => write!(f, "Format error: {}", msg),
            Self::EndOfStream => write!(f, "End of stream"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug + fmt::Display> std::error::Error for SourceError<E> {}

/// Source backed by an infallible closure
///
/// Matches sensors whose register read always yields a value:
///
/// ```rust
/// use motionguard_core::{Sample, SampleSource, source::FnSource};
///
/// let mut source = FnSource::new(|| Sample::new(0.0, 0.0, 1.0));
/// assert_eq!(nb::block!(source.poll_sample()), Ok(Sample::vertical(1.0)));
/// ```
pub struct FnSource<F> {
    read: F,
}

impl<F> FnSource<F>
where
    F: FnMut() -> Sample,
{
    /// Wrap a read function
    pub fn new(read: F) -> Self {
        Self { read }
    }
}

impl<F> SampleSource for FnSource<F>
where
    F: FnMut() -> Sample,
{
    type Error = Infallible;

    fn poll_sample(&mut self) -> nb::Result<Sample, Self::Error> {
        Ok((self.read)())
    }
}
