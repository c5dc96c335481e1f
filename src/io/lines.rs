//! Decompressing line source for gzip-compressed mapping files.
//!
//! The UniProt mapping files are far too large to hold in memory, so this
//! module yields them one line at a time: open the file, verify the gzip
//! magic, wrap the stream in [`MultiGzDecoder`], and iterate owned lines.
//! The first line of every mapping file is a header and is skipped
//! unconditionally.
//!
//! # Example
//!
//! ```no_run
//! use idseek::io::LineSource;
//!
//! # fn main() -> idseek::Result<()> {
//! let source = LineSource::open("idmapping_selected.tab.gz")?;
//!
//! for line in source {
//!     let line = line?;
//!     // Process one decompressed line at a time (constant memory)
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::{IdseekError, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

/// Default maximum line length in bytes.
///
/// `idmapping_selected.tab` rows can carry thousands of cross-references in a
/// single line, so the limit sits well above any ordinary buffering default
/// (50 × 64 KiB). Lines beyond it are treated as corrupt input.
pub const DEFAULT_MAX_LINE_LEN: usize = 64 * 1024 * 50;

/// Capacity of the buffered reader wrapped around the decompressor.
const READ_BUF_CAPACITY: usize = 64 * 1024;

/// Streaming line reader over a gzip-compressed text file.
///
/// Forward-only and finite; restarting means calling [`LineSource::open`]
/// again. Empty lines are skipped, trailing `\n`/`\r\n` are stripped, and the
/// embedded tab delimiters are preserved untouched.
#[derive(Debug)]
pub struct LineSource {
    reader: BufReader<MultiGzDecoder<BufReader<File>>>,
    line_buf: String,
    line_number: usize,
    max_line_len: usize,
}

impl LineSource {
    /// Open a gzip-compressed mapping file with the default line limit.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened or does not start with the gzip
    /// magic bytes (31, 139).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_max_line_len(path, DEFAULT_MAX_LINE_LEN)
    }

    /// Open a gzip-compressed mapping file with an explicit line limit.
    pub fn with_max_line_len<P: AsRef<Path>>(path: P, max_line_len: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut raw = BufReader::new(file);

        // Peek at the first two bytes to reject non-gzip input before any
        // decode work happens.
        let peeked = raw.fill_buf()?;
        if peeked.len() < 2 || peeked[0] != 31 || peeked[1] != 139 {
            return Err(IdseekError::Compression(format!(
                "'{}' is not a valid gzip stream",
                path.display()
            )));
        }

        let decoder = MultiGzDecoder::new(raw);
        let mut source = LineSource {
            reader: BufReader::with_capacity(READ_BUF_CAPACITY, decoder),
            line_buf: String::with_capacity(1024),
            line_number: 0,
            max_line_len,
        };

        // The first line is a header in both mapping layouts.
        source.read_line()?;

        Ok(source)
    }

    /// Current line number in the decompressed stream (1-based, header included).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read the next line into the internal buffer.
    ///
    /// Returns `Ok(None)` at end of stream. The buffer holds the line without
    /// its trailing newline.
    fn read_line(&mut self) -> Result<Option<()>> {
        self.line_buf.clear();

        let n = self.reader.read_line(&mut self.line_buf).map_err(|e| {
            // A truncated or corrupt deflate stream surfaces here rather
            // than at open time.
            if e.kind() == ErrorKind::InvalidData || e.kind() == ErrorKind::UnexpectedEof {
                IdseekError::Compression(e.to_string())
            } else {
                IdseekError::Io(e)
            }
        })?;

        if n == 0 {
            return Ok(None);
        }

        self.line_number += 1;

        if self.line_buf.len() > self.max_line_len {
            return Err(IdseekError::LineTooLong {
                line: self.line_number,
                limit: self.max_line_len,
            });
        }

        while self.line_buf.ends_with('\n') || self.line_buf.ends_with('\r') {
            self.line_buf.pop();
        }

        Ok(Some(()))
    }
}

impl Iterator for LineSource {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.read_line() {
                Ok(Some(())) => {
                    if self.line_buf.is_empty() {
                        continue;
                    }
                    return Some(Ok(std::mem::take(&mut self.line_buf)));
                }
                Ok(None) => return None,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
