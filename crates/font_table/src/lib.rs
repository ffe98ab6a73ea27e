//! # Font Tables
//!
//! The finished bitmap font: a sorted code-point array parallel to the
//! concatenated page-packed glyphs, and its text renderings for firmware.
//!
//! - `symbols`: identifier names derived from the user's prefix
//! - `emit`: C header and Rust module renderers
//!
//! A consumer finds glyph `i` at `data[i * stride .. (i + 1) * stride]`, where
//! `i` is the binary-search position of the code point in `code_points`.

pub mod emit;
pub mod symbols;

pub use emit::{OutputFormat, render};
pub use symbols::SymbolNames;

use glyph_cell::{CellSize, PackedGlyph};
use thiserror::Error;

/// Errors raised while assembling or emitting a font table.
#[derive(Debug, Error)]
pub enum EmitError {
    /// The descriptor's glyph count is 16-bit.
    #[error("{0} glyphs do not fit a 16-bit glyph count")]
    TooManyGlyphs(usize),

    #[error("glyph data is {bytes} bytes, expected {glyphs} glyphs x {stride} bytes")]
    Layout { glyphs: usize, bytes: usize, stride: usize },

    #[error("code point U+{0:04X} is out of order or repeated")]
    Unsorted(u16),

    #[error("cannot format table text")]
    Format(#[from] std::fmt::Error),
}

// ─────────────────────────────────────────────────────────────────────────────
// FontTable
// ─────────────────────────────────────────────────────────────────────────────

/// Code points plus fixed-stride glyph data for one cell size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontTable {
    size: CellSize,
    code_points: Vec<u16>,
    data: Vec<u8>,
}

impl FontTable {
    /// Check the layout invariants and build the table.
    pub fn new(size: CellSize, code_points: Vec<u16>, data: Vec<u8>) -> Result<Self, EmitError> {
        if code_points.len() > u16::MAX as usize {
            return Err(EmitError::TooManyGlyphs(code_points.len()));
        }
        if let Some(w) = code_points.windows(2).find(|w| w[1] <= w[0]) {
            return Err(EmitError::Unsorted(w[1]));
        }
        let stride = size.stride();
        if data.len() != code_points.len() * stride {
            return Err(EmitError::Layout {
                glyphs: code_points.len(),
                bytes: data.len(),
                stride,
            });
        }
        Ok(Self { size, code_points, data })
    }

    /// Concatenate per-glyph bytes in code-point order.
    pub fn from_glyphs<I>(size: CellSize, code_points: Vec<u16>, glyphs: I) -> Result<Self, EmitError>
    where
        I: IntoIterator<Item = PackedGlyph>,
    {
        let mut data = Vec::with_capacity(code_points.len() * size.stride());
        for glyph in glyphs {
            data.extend_from_slice(glyph.as_bytes());
        }
        Self::new(size, code_points, data)
    }

    pub fn size(&self) -> CellSize {
        self.size
    }

    pub fn code_points(&self) -> &[u16] {
        &self.code_points
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn count(&self) -> usize {
        self.code_points.len()
    }

    pub fn stride(&self) -> usize {
        self.size.stride()
    }

    /// Packed bytes of `cp`, located the way the firmware does it.
    pub fn glyph(&self, cp: u16) -> Option<&[u8]> {
        let index = self.code_points.binary_search(&cp).ok()?;
        let stride = self.stride();
        self.data.get(index * stride..(index + 1) * stride)
    }

    /// Glyphs with no pixel set.
    pub fn empty_glyphs(&self) -> usize {
        self.data
            .chunks_exact(self.stride())
            .filter(|g| g.iter().all(|&b| b == 0))
            .count()
    }
}
