//! Bounded JSON writer.
//!
//! Every response is produced through a [`JsonWriter`] over the caller's
//! output slice. Each append checks the remaining capacity first and fails
//! with [`Overflow`] instead of writing past the end; the engine then
//! reports a zero-length result, so a partially written response is never
//! handed back.
//!
//! `write!` works directly on a writer (the inherent `write_fmt` returns
//! `Result<(), Overflow>`), and the writer is an [`std::io::Write`] sink so
//! `serde_json` can serialize collaborator data straight into it.

use core::fmt;
use std::io;

use serde::Serialize;

/// The output slice had no room for the next append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overflow;

impl fmt::Display for Overflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "output buffer overflow")
    }
}

impl std::error::Error for Overflow {}

pub struct JsonWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> JsonWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Whether `n` more bytes fit.
    fn fits(&self, n: usize) -> bool {
        n <= self.remaining()
    }

    /// The written prefix of the output slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    pub fn finish(self) -> usize {
        self.pos
    }

    // ── Raw appends ───────────────────────────────────────────

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Overflow> {
        if !self.fits(bytes.len()) {
            return Err(Overflow);
        }
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), Overflow> {
        self.write_bytes(s.as_bytes())
    }

    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), Overflow> {
        fmt::Write::write_fmt(self, args).map_err(|_| Overflow)
    }

    /// Unwritten tail of the output, for producers that fill it in place.
    /// Follow with [`advance`](Self::advance).
    pub fn remaining_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.pos..]
    }

    /// Commit `n` bytes written through [`remaining_mut`](Self::remaining_mut).
    pub fn advance(&mut self, n: usize) -> Result<(), Overflow> {
        if !self.fits(n) {
            return Err(Overflow);
        }
        self.pos += n;
        Ok(())
    }

    // ── Envelope ──────────────────────────────────────────────

    /// `{"error": N}`
    pub fn error_only(&mut self, code: i32) -> Result<(), Overflow> {
        write!(self, "{{\"error\": {}}}", code)
    }

    /// `{"error": N, "resp": ` — the caller writes the value, then [`end`](Self::end).
    pub fn begin_resp(&mut self, code: i32) -> Result<(), Overflow> {
        write!(self, "{{\"error\": {}, \"resp\": ", code)
    }

    /// `{"error": N` — the caller adds fields with [`field`](Self::field), then [`end`](Self::end).
    pub fn begin_object(&mut self, code: i32) -> Result<(), Overflow> {
        write!(self, "{{\"error\": {}", code)
    }

    pub fn field(&mut self, name: &str, value: i64) -> Result<(), Overflow> {
        write!(self, ", \"{}\": {}", name, value)
    }

    pub fn end(&mut self) -> Result<(), Overflow> {
        self.write_bytes(b"}")
    }

    /// `{"error": N, "resp": V}` for an integer value.
    pub fn int_resp(&mut self, code: i32, value: i64) -> Result<(), Overflow> {
        write!(self, "{{\"error\": {}, \"resp\": {}}}", code, value)
    }

    // ── Values ────────────────────────────────────────────────

    /// `[v0,v1,...]`, or `[]` when empty.
    pub fn uint_array(&mut self, values: &[u32]) -> Result<(), Overflow> {
        self.write_bytes(b"[")?;
        for (i, v) in values.iter().enumerate() {
            if i > 0 {
                self.write_bytes(b",")?;
            }
            write!(self, "{}", v)?;
        }
        self.write_bytes(b"]")
    }

    /// Each byte as its unsigned decimal value: `[255,216,...]`.
    pub fn byte_array(&mut self, bytes: &[u8]) -> Result<(), Overflow> {
        self.write_bytes(b"[")?;
        for (i, b) in bytes.iter().enumerate() {
            if i > 0 {
                self.write_bytes(b",")?;
            }
            write!(self, "{}", b)?;
        }
        self.write_bytes(b"]")
    }

    /// Serialize `value` with `serde_json`.
    pub fn json_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Overflow> {
        serde_json::to_writer(&mut *self, value).map_err(|_| Overflow)
    }
}

impl fmt::Write for JsonWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

impl io::Write for JsonWriter<'_> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.write_bytes(data)
            .map_err(|_| io::Error::new(io::ErrorKind::WriteZero, Overflow))?;
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
