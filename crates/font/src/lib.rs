//! # Font Engine
//!
//! TrueType / TrueType Collection parsing and monochrome-friendly glyph
//! rasterization.
//!
//! - `tables`: TTC header, sfnt table directory, head, hhea, maxp, cmap (formats 4 and 12), loca
//! - `glyph`: simple and composite glyph outlines from the `glyf` table
//! - `rasterizer`: Bézier flattening and non-zero scanline fill into 8-bit bitmaps
//! - `face`: one face of a font file, resolving characters to pixel ink boxes and drawings
//! - `synth`: tiny in-memory fonts for tests (feature `synth`)

pub mod face;
pub mod glyph;
pub mod rasterizer;
pub mod tables;

#[cfg(any(test, feature = "synth"))]
pub mod synth;

pub use face::Face;
pub use rasterizer::{GlyphBitmap, Transform};

use common::ParseError;
use tables::TableTag;
use thiserror::Error;

/// Errors raised while loading a font face.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("malformed font data: {0}")]
    Parse(#[from] ParseError),

    #[error("missing required table '{0}'")]
    MissingTable(TableTag),

    #[error("face index {index} out of range (font has {count} faces)")]
    FaceIndex { index: u32, count: u32 },

    #[error("unsupported font: {0}")]
    Unsupported(&'static str),
}
