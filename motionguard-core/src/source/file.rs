//! File-based replay of recorded accelerometer captures
//!
//! Recordings let thresholds and detector behaviour be checked on the host
//! against real walks without the board attached.
//!
//! ## Supported Formats
//!
//! 1. **CSV**: `ax,ay,az` per line
//! 2. **JSON Lines**: `{"ax":0.1,"ay":-0.2,"az":9.8}` per line
//!
//! Blank lines and lines starting with `#` are ignored in both formats.
//! Lines that fail to parse, or that hold a NaN or infinite axis, are
//! [`SourceError::Format`] errors. They are counted in
//! [`FileSourceStats::parse_errors`] and by default skipped, so one corrupt
//! record does not end a long replay. With
//! [`SampleFile::with_strict_parsing`] the first one is returned instead.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::sample::Sample;
use super::{SampleSource, SourceError};

/// Capture formats understood by [`SampleFile`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-separated `ax,ay,az`
    Csv,
    /// One JSON object per line
    JsonLines,
}

/// Counters kept while replaying
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileSourceStats {
    /// Samples handed out
    pub samples_read: usize,
    /// Lines read, including skipped ones
    pub lines_processed: usize,
    /// Lines that failed to parse
    pub parse_errors: usize,
    /// Bytes consumed
    pub bytes_read: usize,
}

/// Replays a recorded capture one sample per poll
///
/// ```rust,no_run
/// use motionguard_core::{SampleSource, source::SampleFile};
///
/// let mut source = SampleFile::from_csv("walk.csv")?.with_skip_lines(1);
/// while let Ok(sample) = source.poll_sample() {
///     println!("{}", sample.magnitude());
/// }
/// # Ok::<(), motionguard_core::SourceError<std::io::Error>>(())
/// ```
pub struct SampleFile<R = BufReader<File>> {
    reader: R,
    format: FileFormat,
    line: String,
    skip_lines: usize,
    lines_skipped: usize,
    strict: bool,
    eof: bool,
    stats: FileSourceStats,
}

impl SampleFile {
    /// Open `path` in the given format
    pub fn open<P: AsRef<Path>>(path: P, format: FileFormat) -> Result<Self, SourceError<std::io::Error>> {
        let file = File::open(path).map_err(SourceError::Transport)?;
        Ok(Self::from_reader(BufReader::new(file), format))
    }

    /// Open a CSV capture
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, SourceError<std::io::Error>> {
        Self::open(path, FileFormat::Csv)
    }

    /// Open a JSON Lines capture
    pub fn from_json_lines<P: AsRef<Path>>(path: P) -> Result<Self, SourceError<std::io::Error>> {
        Self::open(path, FileFormat::JsonLines)
    }
}

impl<R: BufRead> SampleFile<R> {
    /// Replay from any buffered reader
    pub fn from_reader(reader: R, format: FileFormat) -> Self {
        Self {
            reader,
            format,
            line: String::new(),
            skip_lines: 0,
            lines_skipped: 0,
            strict: false,
            eof: false,
            stats: FileSourceStats::default(),
        }
    }

    /// Skip the first `lines` lines (headers)
    pub fn with_skip_lines(mut self, lines: usize) -> Self {
        self.skip_lines = lines;
        self
    }

    /// Return malformed records as errors instead of skipping them
    pub fn with_strict_parsing(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Capture format
    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Replay counters
    pub fn stats(&self) -> &FileSourceStats {
        &self.stats
    }

    /// Zero the replay counters
    pub fn reset_stats(&mut self) {
        self.stats = FileSourceStats::default();
    }

    /// Read the next line into the buffer; false at end of file
    fn next_line(&mut self) -> Result<bool, std::io::Error> {
        self.line.clear();
        let read = self.reader.read_line(&mut self.line)?;
        if read == 0 {
            self.eof = true;
            return Ok(false);
        }
        self.stats.bytes_read += read;
        self.stats.lines_processed += 1;
        Ok(true)
    }

    fn parse(&self, line: &str) -> Result<Sample, SourceError<std::io::Error>> {
        let sample = match self.format {
            FileFormat::Csv => parse_csv(line),
            FileFormat::JsonLines => {
                serde_json::from_str::<Sample>(line).map_err(|_| "invalid JSON record")
            }
        }
        .map_err(SourceError::Format)?;

        if !sample.is_finite() {
            return Err(SourceError::Format("non-finite value"));
        }
        Ok(sample)
    }
}

impl<R: BufRead> SampleSource for SampleFile<R> {
    type Error = SourceError<std::io::Error>;

    fn poll_sample(&mut self) -> nb::Result<Sample, Self::Error> {
        loop {
            if self.eof {
                return Err(nb::Error::Other(SourceError::EndOfStream));
            }
            if !self
                .next_line()
                .map_err(|e| nb::Error::Other(SourceError::Transport(e)))?
            {
                continue;
            }

            if self.lines_skipped < self.skip_lines {
                self.lines_skipped += 1;
                continue;
            }

            let line = self.line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match self.parse(line) {
                Ok(sample) => {
                    self.stats.samples_read += 1;
                    return Ok(sample);
                }
                Err(err) => {
                    self.stats.parse_errors += 1;
                    if self.strict {
                        return Err(nb::Error::Other(err));
                    }
                    log_warn!(
                        "Skipping line {}: {}",
                        self.stats.lines_processed,
                        err
                    );
                }
            }
        }
    }
}

/// Wraps an unbuffered reader, mostly for tests over byte slices
impl<T: Read> SampleFile<BufReader<T>> {
    /// Replay from an unbuffered reader
    pub fn from_unbuffered(reader: T, format: FileFormat) -> Self {
        Self::from_reader(BufReader::new(reader), format)
    }
}

fn parse_csv(line: &str) -> Result<Sample, &'static str> {
    let mut fields = line.split(',').map(str::trim);
    let mut axis = || -> Result<f32, &'static str> {
        fields
            .next()
            .ok_or("expected 3 fields")?
            .parse::<f32>()
            .map_err(|_| "invalid number")
    };

    let sample = Sample::new(axis()?, axis()?, axis()?);
    if fields.next().is_some() {
        return Err("expected 3 fields");
    }
    Ok(sample)
}
