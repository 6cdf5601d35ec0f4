//! Replayable request body.
//!
//! An inbound body is a single-pass stream, but signature verification,
//! logging, and payload parsing each need their own read. [`RequestBody`]
//! drains the stream once on first access and serves copies afterwards.
//!
//! Ownership is single-request, single-thread: concurrent reads of the same
//! buffer need external synchronization.

use std::io::{Cursor, Read};

use bytes::Bytes;

use crate::error::BodyError;

/// Size of each bounded read while draining the source.
pub const DRAIN_CHUNK_SIZE: usize = 128;

/// A request body that is either still backed by its source stream or fully
/// buffered. The transition happens exactly once.
#[derive(Debug)]
pub enum RequestBody<R> {
    /// Nothing has been read yet.
    Empty(R),
    /// The source has been drained; these bytes are the sole source of truth.
    Filled(Bytes),
}

impl<R: Read> RequestBody<R> {
    #[must_use]
    pub fn new(source: R) -> Self {
        Self::Empty(source)
    }

    #[must_use]
    pub fn is_filled(&self) -> bool {
        matches!(self, Self::Filled(_))
    }

    /// Returns a copy of the whole body, draining the source on first call.
    ///
    /// Callers own the returned vector; mutating it never affects later reads.
    ///
    /// # Errors
    ///
    /// Returns [`BodyError::Io`] if the source fails while draining. The
    /// buffer stays empty in that case.
    pub fn read_body(&mut self) -> Result<Vec<u8>, BodyError> {
        Ok(self.fill()?.to_vec())
    }

    /// Returns a fresh reader over the buffered body, for consumers that
    /// expect a stream (JSON parsers, multipart readers).
    ///
    /// # Errors
    ///
    /// Returns [`BodyError::Io`] if the source fails while draining.
    pub fn stream(&mut self) -> Result<BodyStream, BodyError> {
        Ok(BodyStream::new(self.fill()?))
    }

    /// Consumes the buffer, yielding the drained bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BodyError::Io`] if the source fails while draining.
    pub fn into_bytes(self) -> Result<Bytes, BodyError> {
        match self {
            Self::Filled(bytes) => Ok(bytes),
            Self::Empty(mut source) => Ok(drain(&mut source)?),
        }
    }

    fn fill(&mut self) -> Result<Bytes, BodyError> {
        let drained = match self {
            Self::Filled(bytes) => return Ok(bytes.clone()),
            Self::Empty(source) => drain(source)?,
        };
        *self = Self::Filled(drained.clone());
        Ok(drained)
    }
}

/// Reads `source` to exhaustion in bounded chunks.
fn drain<R: Read>(source: &mut R) -> std::io::Result<Bytes> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; DRAIN_CHUNK_SIZE];
    loop {
        match source.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => buffer.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(Bytes::from(buffer))
}

/// Readable view over a buffered body.
#[derive(Debug, Clone)]
pub struct BodyStream {
    inner: Cursor<Bytes>,
}

impl BodyStream {
    fn new(bytes: Bytes) -> Self {
        Self {
            inner: Cursor::new(bytes),
        }
    }

    /// Whether every byte has been consumed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.inner.position() >= self.inner.get_ref().len() as u64
    }

    /// Buffered bodies never block, so the stream is always ready.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        true
    }

    /// Listener-based asynchronous reads are not supported.
    ///
    /// # Errors
    ///
    /// Always returns [`BodyError::ListenerUnsupported`].
    pub fn set_read_listener<L>(&mut self, _listener: L) -> Result<(), BodyError> {
        Err(BodyError::ListenerUnsupported)
    }
}

impl Read for BodyStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}
