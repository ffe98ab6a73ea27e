//! # Common Foundation Crate
//!
//! Shared byte readers/writers, the parse error type, and the small geometry
//! primitives used by the font engine and the glyph-cell renderer.
//!
//! Everything in an sfnt file is big-endian, so the reader and writer here
//! only speak big-endian.

#![forbid(unsafe_code)]

use core::fmt;
use std::ops::{Add, Mul, Sub};

use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// ParseError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur when parsing binary font data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Tried to read past the end of the buffer.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// A parsed value is not valid in context.
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
    /// A length or offset field points outside the acceptable range.
    #[error("length out of range: {0}")]
    LengthOutOfRange(&'static str),
}

// ─────────────────────────────────────────────────────────────────────────────
// Cursor — big-endian byte buffer reader
// ─────────────────────────────────────────────────────────────────────────────

/// A zero-copy, big-endian byte-buffer reader.
pub struct Cursor<'a> {
    buf: &'a [u8],
    off: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at offset 0.
    #[inline]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, off: 0 }
    }

    /// Create a cursor positioned at `pos`. Fails if `pos` is past the end.
    #[inline]
    pub fn at(buf: &'a [u8], pos: usize) -> Result<Self, ParseError> {
        let mut c = Self::new(buf);
        c.set_position(pos)?;
        Ok(c)
    }

    /// Current read position (byte offset).
    #[inline]
    pub fn position(&self) -> usize {
        self.off
    }

    /// Number of bytes remaining from the current position.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.off)
    }

    /// Set the read position. Returns an error if out of bounds.
    #[inline]
    pub fn set_position(&mut self, pos: usize) -> Result<(), ParseError> {
        if pos > self.buf.len() {
            return Err(ParseError::UnexpectedEof);
        }
        self.off = pos;
        Ok(())
    }

    #[inline]
    fn take(&mut self, n: usize) -> Result<&'a [u8], ParseError> {
        let end = self.off.checked_add(n).ok_or(ParseError::UnexpectedEof)?;
        let slice = self.buf.get(self.off..end).ok_or(ParseError::UnexpectedEof)?;
        self.off = end;
        Ok(slice)
    }

    /// Read a single byte.
    #[inline]
    pub fn u8(&mut self) -> Result<u8, ParseError> {
        Ok(self.take(1)?[0])
    }

    /// Read a signed byte.
    #[inline]
    pub fn i8(&mut self) -> Result<i8, ParseError> {
        Ok(self.take(1)?[0] as i8)
    }

    #[inline]
    pub fn u16(&mut self) -> Result<u16, ParseError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    #[inline]
    pub fn i16(&mut self) -> Result<i16, ParseError> {
        let b = self.take(2)?;
        Ok(i16::from_be_bytes([b[0], b[1]]))
    }

    #[inline]
    pub fn u32(&mut self) -> Result<u32, ParseError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a 2.14 fixed-point number (used by composite glyph transforms).
    #[inline]
    pub fn f2dot14(&mut self) -> Result<f32, ParseError> {
        Ok(self.i16()? as f32 / 16384.0)
    }

    /// Read a 4-byte table tag.
    #[inline]
    pub fn tag(&mut self) -> Result<[u8; 4], ParseError> {
        let b = self.take(4)?;
        Ok([b[0], b[1], b[2], b[3]])
    }

    /// Read exactly `n` bytes as a slice.
    #[inline]
    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8], ParseError> {
        self.take(n)
    }

    /// Skip `n` bytes.
    #[inline]
    pub fn skip(&mut self, n: usize) -> Result<(), ParseError> {
        self.take(n).map(|_| ())
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("off", &self.off)
            .field("len", &self.buf.len())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BufWriter — big-endian byte buffer writer
// ─────────────────────────────────────────────────────────────────────────────

/// A growable big-endian byte buffer writer.
///
/// Used to assemble sfnt files in memory (the synthetic fonts the test suites
/// render from).
#[derive(Clone, Default)]
pub struct BufWriter {
    pub out: Vec<u8>,
}

impl BufWriter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current length of the written data.
    #[inline]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    #[inline]
    pub fn u8(&mut self, v: u8) {
        self.out.push(v);
    }

    #[inline]
    pub fn u16(&mut self, v: u16) {
        self.out.extend_from_slice(&v.to_be_bytes());
    }

    #[inline]
    pub fn i16(&mut self, v: i16) {
        self.out.extend_from_slice(&v.to_be_bytes());
    }

    #[inline]
    pub fn u32(&mut self, v: u32) {
        self.out.extend_from_slice(&v.to_be_bytes());
    }

    /// Write a raw byte slice.
    #[inline]
    pub fn bytes(&mut self, b: &[u8]) {
        self.out.extend_from_slice(b);
    }

    /// Overwrite a previously written `u32` at byte offset `at`.
    ///
    /// Panics if `at + 4` is past the written data.
    #[inline]
    pub fn patch_u32(&mut self, at: usize, v: u32) {
        self.out[at..at + 4].copy_from_slice(&v.to_be_bytes());
    }

    /// Pad with zero bytes until the length is a multiple of 4.
    #[inline]
    pub fn pad4(&mut self) {
        while self.out.len() % 4 != 0 {
            self.out.push(0);
        }
    }

    /// Consume the writer and return the underlying buffer.
    #[inline]
    pub fn finish(self) -> Vec<u8> {
        self.out
    }
}

impl fmt::Debug for BufWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufWriter").field("len", &self.out.len()).finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Vec2 — 2D point
// ─────────────────────────────────────────────────────────────────────────────

/// A 2D point with `f32` components, in pixel space.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point halfway between `self` and `other`.
    #[inline]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Squared distance to `other`.
    #[inline]
    pub fn distance_sq(self, other: Self) -> f32 {
        let d = self - other;
        d.x * d.x + d.y * d.y
    }
}

impl fmt::Debug for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vec2({}, {})", self.x, self.y)
    }
}

impl Add for Vec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PixelBox — integer pixel rectangle
// ─────────────────────────────────────────────────────────────────────────────

/// A half-open integer pixel rectangle `[x0, x1) × [y0, y1)`, y pointing down.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct PixelBox {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl PixelBox {
    pub const EMPTY: Self = Self { x0: 0, y0: 0, x1: 0, y1: 0 };

    #[inline]
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        (self.x1 - self.x0).max(0)
    }

    #[inline]
    pub fn height(&self) -> i32 {
        (self.y1 - self.y0).max(0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Cursor ──

    #[test]
    fn cursor_u8() {
        let data = [0xAB];
        let mut c = Cursor::new(&data);
        assert_eq!(c.u8().unwrap(), 0xAB);
        assert!(c.u8().is_err());
    }

    #[test]
    fn cursor_big_endian_words() {
        let data = [0x00, 0x01, 0x00, 0x00, 0xFF, 0xFE];
        let mut c = Cursor::new(&data);
        assert_eq!(c.u32().unwrap(), 0x0001_0000);
        assert_eq!(c.i16().unwrap(), -2);
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn cursor_f2dot14() {
        let data = [0x40, 0x00, 0xC0, 0x00, 0x20, 0x00];
        let mut c = Cursor::new(&data);
        assert_eq!(c.f2dot14().unwrap(), 1.0);
        assert_eq!(c.f2dot14().unwrap(), -1.0);
        assert_eq!(c.f2dot14().unwrap(), 0.5);
    }

    #[test]
    fn cursor_tag_and_skip() {
        let data = *b"ttcf\x00\x01";
        let mut c = Cursor::new(&data);
        assert_eq!(&c.tag().unwrap(), b"ttcf");
        c.skip(1).unwrap();
        assert_eq!(c.u8().unwrap(), 1);
        assert_eq!(c.skip(1), Err(ParseError::UnexpectedEof));
    }

    #[test]
    fn cursor_at_out_of_bounds() {
        let data = [0u8; 4];
        assert!(Cursor::at(&data, 4).is_ok());
        assert!(Cursor::at(&data, 5).is_err());
    }

    #[test]
    fn cursor_huge_skip_does_not_overflow() {
        let data = [0u8; 4];
        let mut c = Cursor::new(&data);
        c.skip(2).unwrap();
        assert!(c.skip(usize::MAX).is_err());
        assert_eq!(c.position(), 2);
    }

    // ── BufWriter ──

    #[test]
    fn bufwriter_words_and_pad4() {
        let mut w = BufWriter::new();
        w.u16(0x0102);
        w.i16(-1);
        w.u8(7);
        w.pad4();
        assert_eq!(w.finish(), vec![0x01, 0x02, 0xFF, 0xFF, 0x07, 0, 0, 0]);
    }

    #[test]
    fn bufwriter_patch_u32() {
        let mut w = BufWriter::new();
        w.u32(0);
        w.u32(0xAAAA_AAAA);
        w.patch_u32(0, 0x0102_0304);
        assert_eq!(&w.out[..4], &[1, 2, 3, 4]);
        assert_eq!(w.len(), 8);
    }

    // ── Vec2 / PixelBox ──

    #[test]
    fn vec2_midpoint() {
        let m = Vec2::new(0.0, 2.0).midpoint(Vec2::new(4.0, 6.0));
        assert_eq!(m, Vec2::new(2.0, 4.0));
        assert_eq!(Vec2::ZERO.distance_sq(Vec2::new(3.0, 4.0)), 25.0);
    }

    #[test]
    fn pixel_box_dimensions() {
        let b = PixelBox::new(-2, 1, 5, 4);
        assert_eq!(b.width(), 7);
        assert_eq!(b.height(), 3);
        assert!(!b.is_empty());
        assert!(PixelBox::EMPTY.is_empty());
        assert!(PixelBox::new(3, 3, 1, 9).is_empty());
    }
}
