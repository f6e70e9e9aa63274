//! The character source seam.
//!
//! The tokenizer only requires a blocking "next character" primitive with a
//! clean end of input distinguishable from an I/O failure. Files, sockets
//! and in-memory slices all plug in behind [`CharSource`].

use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;

/// A blocking, byte-oriented character source.
pub trait CharSource {
    /// Returns the next character, `Ok(None)` on a clean end of input, or
    /// the underlying I/O error.
    ///
    /// # Errors
    ///
    /// Propagates the source's read failure; end of input is not an error.
    fn next_char(&mut self) -> io::Result<Option<u8>>;
}

/// In-memory input, mainly useful for tests and small documents.
impl CharSource for &[u8] {
    fn next_char(&mut self) -> io::Result<Option<u8>> {
        match self.split_first() {
            Some((&byte, rest)) => {
                *self = rest;
                Ok(Some(byte))
            }
            None => Ok(None),
        }
    }
}

const CHUNK: usize = 8 * 1024;

/// Adapter turning any [`Read`] into a [`CharSource`].
///
/// Reads refill an internal 8 KiB buffer, so handing over an unbuffered
/// file or socket does not cost one syscall per character. Interrupted
/// reads are retried.
#[derive(Debug)]
pub struct ReadSource<R> {
    inner: R,
    buf: Vec<u8>,
    pos: usize,
    len: usize,
}

impl<R: Read> ReadSource<R> {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: vec![0; CHUNK],
            pos: 0,
            len: 0,
        }
    }
}

impl ReadSource<File> {
    /// Opens the file at `path` for reading.
    ///
    /// # Errors
    ///
    /// Returns the error from [`File::open`] when the file cannot be
    /// opened.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::new(File::open(path)?))
    }
}

impl<R: Read> CharSource for ReadSource<R> {
    fn next_char(&mut self) -> io::Result<Option<u8>> {
        if self.pos == self.len {
            self.len = loop {
                match self.inner.read(&mut self.buf) {
                    Ok(filled) => break filled,
                    Err(err) if err.kind() == ErrorKind::Interrupted => {}
                    Err(err) => return Err(err),
                }
            };
            self.pos = 0;
            if self.len == 0 {
                return Ok(None);
            }
        }
        let byte = self.buf[self.pos];
        self.pos += 1;
        Ok(Some(byte))
    }
}
