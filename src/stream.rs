//! The buffer contract the core requires of a byte stream, and the
//! `InputStream`/`OutputStream` adapters built on top of it.
//!
//! `Stream` itself is the one external collaborator `spec.md` asks us to
//! specify only the interface of (§1, §3 "Stream contract (external)"); a
//! concrete implementation (backed by a socket, or the in-memory one in
//! `connection.rs` used for tests) lives outside this module.

use crate::error::{Error, Result};

/// A contiguous byte buffer supporting append, peek, discard, and
/// reserve/commit write space.
///
/// Bytes returned by `data()` remain valid until the next `discard`,
/// `reserve`, or a reallocation triggered by either.
pub trait Stream {
    /// Currently-buffered readable bytes.
    fn data(&self) -> &[u8];

    /// Advance past the first `n` bytes of `data()`.
    fn discard(&mut self, n: usize);

    /// Ensure at least `n` writable bytes are available, returning them.
    fn reserve(&mut self, n: usize) -> &mut [u8];

    /// Acknowledge that `n` bytes (of a prior `reserve`) were written.
    fn commit(&mut self, n: usize);
}

/// Adapts a `Stream` plus a refill callback into peek-N / discard-N
/// semantics for the decode direction.
///
/// The slice returned by `peek_data` is only valid until the next call to
/// `peek_data` or `discard_data` on the same `InputStream` — in this port
/// that's enforced by the borrow checker rather than documented as a
/// caller obligation.
pub struct InputStream<S, F> {
    stream: S,
    refill: F,
}

impl<S, F> InputStream<S, F>
where
    S: Stream,
    F: FnMut(&mut S) -> Result<()>,
{
    pub fn new(stream: S, refill: F) -> Self {
        InputStream { stream, refill }
    }

    /// Block (via repeated `refill` calls) until the stream holds at least
    /// `n` bytes, then return a view of the buffered data.
    pub fn peek_data(&mut self, n: usize) -> Result<&[u8]> {
        while self.stream.data().len() < n {
            (self.refill)(&mut self.stream)?;
        }
        Ok(self.stream.data())
    }

    pub fn discard_data(&mut self, n: usize) {
        self.stream.discard(n);
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }
}

/// Adapts a `Stream` plus a drain callback into reserve-N / commit-N
/// semantics for the encode direction. No partial-flush semantics are
/// exposed: `flush_buffer` always drains until the stream is empty.
pub struct OutputStream<S, F> {
    stream: S,
    drain: F,
}

impl<S, F> OutputStream<S, F>
where
    S: Stream,
    F: FnMut(&mut S) -> Result<()>,
{
    pub fn new(stream: S, drain: F) -> Self {
        OutputStream { stream, drain }
    }

    pub fn reserve_buffer(&mut self, n: usize) -> &mut [u8] {
        self.stream.reserve(n)
    }

    pub fn flush_buffer(&mut self, n: usize) -> Result<()> {
        self.stream.commit(n);
        while !self.stream.data().is_empty() {
            (self.drain)(&mut self.stream)?;
        }
        Ok(())
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }
}

/// A simple growable in-memory `Stream`, used by tests and by
/// `connection.rs`'s demonstration wiring. Not a production buffer: it
/// never shrinks its backing allocation.
#[derive(Debug, Default)]
pub struct MemoryStream {
    buf: Vec<u8>,
    start: usize,
    /// End of committed (readable) data within `buf`. `buf` may extend past
    /// this when a `reserve` is pending its matching `commit` — `data()`
    /// never exposes that tail.
    committed_len: usize,
}

impl MemoryStream {
    pub fn new() -> Self {
        MemoryStream::default()
    }

    pub fn with_data(data: impl Into<Vec<u8>>) -> Self {
        let buf: Vec<u8> = data.into();
        let committed_len = buf.len();
        MemoryStream {
            buf,
            start: 0,
            committed_len,
        }
    }
}

impl Stream for MemoryStream {
    fn data(&self) -> &[u8] {
        &self.buf[self.start..self.committed_len]
    }

    fn discard(&mut self, n: usize) {
        assert!(self.start + n <= self.committed_len);
        self.start += n;
        if self.start == self.committed_len {
            self.buf.clear();
            self.start = 0;
            self.committed_len = 0;
        }
    }

    /// Ensure `n` writable bytes are available past the committed data and
    /// return them. Idempotent as long as `committed_len` hasn't moved: a
    /// second `reserve(n)` call before the matching `commit` returns the
    /// same region rather than a fresh one further out, matching the
    /// original `OutputStream::reserveBuffer`
    /// (examples/original_source/include/output_stream.h), which the
    /// chunked `Dumper` relies on by calling `reserve` twice (once to hand
    /// the caller a payload slice, again at flush time to fill in the size
    /// header) with nothing committed in between.
    fn reserve(&mut self, n: usize) -> &mut [u8] {
        if self.start > 0 {
            self.buf.drain(..self.start);
            self.committed_len -= self.start;
            self.start = 0;
        }
        let needed = self.committed_len + n;
        if self.buf.len() < needed {
            self.buf.resize(needed, 0);
        }
        &mut self.buf[self.committed_len..self.committed_len + n]
    }

    fn commit(&mut self, n: usize) {
        self.committed_len += n;
        self.buf.truncate(self.committed_len);
    }
}

/// An error raised by a refill callback to signal there is no more data to
/// read. Kept separate from `Error::EndOfStream` construction sites so
/// callers have a short, obvious spelling.
pub fn end_of_stream<T>() -> Result<T> {
    Err(Error::EndOfStream)
}
