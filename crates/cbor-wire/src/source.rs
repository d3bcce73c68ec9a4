use std::io::{BufRead, ErrorKind};

use crate::error::WireError;

/// Size of the stack buffer used when copying string bodies out of a
/// source that has no contiguous backing slice.
const COPY_CHUNK: usize = 4096;

/// Forward-only, peekable byte cursor.
///
/// The decoder never seeks backwards: it peeks at most one byte ahead and
/// otherwise consumes bytes in order. Implementations exist for in-memory
/// slices ([`SliceSource`]) and buffered streams ([`ReaderSource`]).
///
/// ```text
///   consumed           position        remaining
/// ├─────────────────────┼──────────────────────────┤
///                       ▲ peek() looks here
/// ```
pub trait Source {
    /// Look at the next byte without consuming it. `None` at end of input.
    ///
    /// # Errors
    ///
    /// Stream-backed sources surface I/O failures as [`WireError::Io`].
    fn peek(&mut self) -> Result<Option<u8>, WireError>;

    /// Consume and return the next byte. `None` at end of input.
    ///
    /// # Errors
    ///
    /// Stream-backed sources surface I/O failures as [`WireError::Io`].
    fn next_byte(&mut self) -> Result<Option<u8>, WireError>;

    /// Copy up to `buf.len()` bytes into `buf`, returning how many were
    /// read. Fewer than requested only at end of input.
    ///
    /// # Errors
    ///
    /// Stream-backed sources surface I/O failures as [`WireError::Io`].
    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, WireError>;

    /// Number of bytes consumed so far.
    fn position(&self) -> u64;

    /// Skip one byte. A no-op at end of input.
    ///
    /// # Errors
    ///
    /// Stream-backed sources surface I/O failures as [`WireError::Io`].
    fn advance(&mut self) -> Result<(), WireError> {
        self.next_byte().map(|_| ())
    }

    /// Whether the source is exhausted.
    ///
    /// # Errors
    ///
    /// Stream-backed sources surface I/O failures as [`WireError::Io`].
    fn is_eof(&mut self) -> Result<bool, WireError> {
        Ok(self.peek()?.is_none())
    }

    /// Consume the next byte, treating end of input as an error.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] when the source is exhausted.
    fn expect_byte(&mut self) -> Result<u8, WireError> {
        self.next_byte()?.ok_or(WireError::UnexpectedEof {
            offset: self.position(),
        })
    }

    /// Fill `buf` completely.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] when fewer than `buf.len()` bytes remain.
    fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<(), WireError> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read_into(&mut buf[filled..])?;
            if n == 0 {
                return Err(WireError::UnexpectedEof {
                    offset: self.position(),
                });
            }
            filled += n;
        }
        Ok(())
    }

    /// Append exactly `len` bytes to `out`.
    ///
    /// The copy proceeds in bounded chunks so a hostile length prefix
    /// cannot force a huge allocation before the input runs dry.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] when fewer than `len` bytes remain.
    fn append_exact(&mut self, out: &mut Vec<u8>, len: u64) -> Result<(), WireError> {
        let mut chunk = [0u8; COPY_CHUNK];
        let mut remaining = len;
        while remaining > 0 {
            let want = usize::try_from(remaining).map_or(COPY_CHUNK, |r| r.min(COPY_CHUNK));
            let n = self.read_into(&mut chunk[..want])?;
            if n == 0 {
                return Err(WireError::UnexpectedEof {
                    offset: self.position(),
                });
            }
            out.extend_from_slice(&chunk[..n]);
            remaining -= n as u64;
        }
        Ok(())
    }
}

impl<S: Source + ?Sized> Source for &mut S {
    fn peek(&mut self) -> Result<Option<u8>, WireError> {
        (**self).peek()
    }

    fn next_byte(&mut self) -> Result<Option<u8>, WireError> {
        (**self).next_byte()
    }

    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, WireError> {
        (**self).read_into(buf)
    }

    fn position(&self) -> u64 {
        (**self).position()
    }

    fn append_exact(&mut self, out: &mut Vec<u8>, len: u64) -> Result<(), WireError> {
        (**self).append_exact(out, len)
    }
}

// ── In-memory source ──────────────────────────────────────────────────────────

/// A [`Source`] over a borrowed byte slice.
#[derive(Clone, Debug)]
pub struct SliceSource<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// The bytes not consumed yet.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }
}

impl Source for SliceSource<'_> {
    fn peek(&mut self) -> Result<Option<u8>, WireError> {
        Ok(self.buf.get(self.pos).copied())
    }

    fn next_byte(&mut self) -> Result<Option<u8>, WireError> {
        let byte = self.buf.get(self.pos).copied();
        if byte.is_some() {
            self.pos += 1;
        }
        Ok(byte)
    }

    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, WireError> {
        let rest = self.remaining();
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.pos += n;
        Ok(n)
    }

    fn position(&self) -> u64 {
        self.pos as u64
    }

    fn append_exact(&mut self, out: &mut Vec<u8>, len: u64) -> Result<(), WireError> {
        let rest = self.remaining();
        match usize::try_from(len) {
            Ok(n) if n <= rest.len() => {
                out.extend_from_slice(&rest[..n]);
                self.pos += n;
                Ok(())
            }
            _ => {
                self.pos = self.buf.len();
                Err(WireError::UnexpectedEof {
                    offset: self.buf.len() as u64,
                })
            }
        }
    }
}

// ── Stream source ─────────────────────────────────────────────────────────────

/// A [`Source`] over any buffered reader (files, stdin, sockets).
///
/// Peeking uses the reader's own buffer via [`BufRead::fill_buf`], so no
/// extra lookahead state is kept here.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    pos: u64,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, pos: 0 }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn fill(&mut self) -> Result<&[u8], WireError> {
        loop {
            match self.reader.fill_buf() {
                Ok([]) => return Ok(&[]),
                Ok(_) => break,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(WireError::Io(e)),
            }
        }
        // Non-empty buffer: returned as-is without another read.
        self.reader.fill_buf().map_err(WireError::Io)
    }
}

impl<R: BufRead> Source for ReaderSource<R> {
    fn peek(&mut self) -> Result<Option<u8>, WireError> {
        Ok(self.fill()?.first().copied())
    }

    fn next_byte(&mut self) -> Result<Option<u8>, WireError> {
        let byte = self.fill()?.first().copied();
        if byte.is_some() {
            self.reader.consume(1);
            self.pos += 1;
        }
        Ok(byte)
    }

    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, WireError> {
        let mut filled = 0;
        while filled < buf.len() {
            let available = self.fill()?;
            if available.is_empty() {
                break;
            }
            let n = available.len().min(buf.len() - filled);
            buf[filled..filled + n].copy_from_slice(&available[..n]);
            self.reader.consume(n);
            self.pos += n as u64;
            filled += n;
        }
        Ok(filled)
    }

    fn position(&self) -> u64 {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Read};

    #[test]
    fn slice_peek_does_not_consume() {
        let mut src = SliceSource::new(&[0x01, 0x02]);
        assert_eq!(src.peek().unwrap(), Some(0x01));
        assert_eq!(src.peek().unwrap(), Some(0x01));
        assert_eq!(src.position(), 0);
        assert_eq!(src.next_byte().unwrap(), Some(0x01));
        assert_eq!(src.position(), 1);
    }

    #[test]
    fn slice_eof() {
        let mut src = SliceSource::new(&[0xAA]);
        assert!(!src.is_eof().unwrap());
        src.advance().unwrap();
        assert!(src.is_eof().unwrap());
        assert_eq!(src.next_byte().unwrap(), None);
        // advance at end of input is a no-op
        src.advance().unwrap();
        assert_eq!(src.position(), 1);
    }

    #[test]
    fn slice_append_exact_short_input() {
        let mut src = SliceSource::new(&[1, 2, 3]);
        let mut out = Vec::new();
        let err = src.append_exact(&mut out, 4).unwrap_err();
        assert!(matches!(err, WireError::UnexpectedEof { offset: 3 }));
        assert!(out.is_empty());
    }

    #[test]
    fn slice_append_exact_huge_length() {
        let mut src = SliceSource::new(&[1, 2, 3]);
        let mut out = Vec::new();
        assert!(matches!(
            src.append_exact(&mut out, u64::MAX),
            Err(WireError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn reader_source_matches_slice_source() {
        let data: Vec<u8> = (0..=255).collect();
        // Tiny buffer capacity forces refills across chunk boundaries
        let mut src = ReaderSource::new(BufReader::with_capacity(7, data.as_slice()));

        assert_eq!(src.peek().unwrap(), Some(0));
        assert_eq!(src.next_byte().unwrap(), Some(0));

        let mut buf = [0u8; 20];
        src.read_exact_into(&mut buf).unwrap();
        assert_eq!(buf[0], 1);
        assert_eq!(buf[19], 20);
        assert_eq!(src.position(), 21);

        let mut out = Vec::new();
        src.append_exact(&mut out, 235).unwrap();
        assert_eq!(out.len(), 235);
        assert_eq!(*out.last().unwrap(), 255);
        assert!(src.is_eof().unwrap());
    }

    #[test]
    fn reader_source_reports_eof_offset() {
        let data = [9u8; 5];
        let mut src = ReaderSource::new(BufReader::new(&data[..]));
        let mut buf = [0u8; 8];
        let err = src.read_exact_into(&mut buf).unwrap_err();
        assert!(matches!(err, WireError::UnexpectedEof { offset: 5 }));
    }

    /// Fails with `Interrupted` on every other read.
    struct Flaky<'a> {
        data: &'a [u8],
        interrupt: bool,
    }

    impl Read for Flaky<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(ErrorKind::Interrupted.into());
            }
            self.data.read(buf)
        }
    }

    #[test]
    fn reader_source_retries_interrupted_reads() {
        let flaky = Flaky {
            data: &[1, 2, 3, 4, 5],
            interrupt: false,
        };
        let mut src = ReaderSource::new(BufReader::with_capacity(2, flaky));

        assert_eq!(src.peek().unwrap(), Some(1));
        let mut out = Vec::new();
        src.append_exact(&mut out, 5).unwrap();
        assert_eq!(out, [1, 2, 3, 4, 5]);
        assert!(src.is_eof().unwrap());
        assert_eq!(src.position(), 5);
    }
}
