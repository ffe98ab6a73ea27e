//! # Glyph Cells
//!
//! Renders one character into a fixed N×N monochrome cell and packs it into
//! the SSD1306 page layout: column-major, eight rows per byte, bit 0 on top.
//!
//! - `render`: ink-box centering, scratch-canvas fallback, binarization
//! - `pack`: page packing of a thresholded cell

pub mod pack;
pub mod render;

pub use pack::{THRESHOLD, pack_pages};
pub use render::{GlyphSource, render_coverage, render_glyph};

// ─────────────────────────────────────────────────────────────────────────────
// CellSize
// ─────────────────────────────────────────────────────────────────────────────

/// Supported square cell sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellSize {
    S12,
    S16,
    S24,
}

impl CellSize {
    pub const ALL: [CellSize; 3] = [CellSize::S12, CellSize::S16, CellSize::S24];

    pub fn from_pixels(px: u32) -> Option<Self> {
        match px {
            12 => Some(Self::S12),
            16 => Some(Self::S16),
            24 => Some(Self::S24),
            _ => None,
        }
    }

    /// Edge length N, also the em size glyphs are scaled to.
    pub fn pixels(self) -> u32 {
        match self {
            Self::S12 => 12,
            Self::S16 => 16,
            Self::S24 => 24,
        }
    }

    /// Eight-row pages per column, `ceil(N / 8)`.
    pub fn pages(self) -> usize {
        (self.pixels() as usize).div_ceil(8)
    }

    /// Bytes per packed glyph, `N × pages`.
    pub fn stride(self) -> usize {
        self.pixels() as usize * self.pages()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PackedGlyph
// ─────────────────────────────────────────────────────────────────────────────

/// One glyph in page layout, exactly `stride()` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedGlyph {
    bytes: Vec<u8>,
}

impl PackedGlyph {
    /// An all-off glyph.
    pub fn blank(size: CellSize) -> Self {
        Self { bytes: vec![0; size.stride()] }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// No pixel is on.
    pub fn is_empty(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_geometry() {
        let geometry: Vec<_> = CellSize::ALL.iter().map(|s| (s.pixels(), s.pages(), s.stride())).collect();
        assert_eq!(geometry, vec![(12, 2, 24), (16, 2, 32), (24, 3, 72)]);
    }

    #[test]
    fn from_pixels() {
        assert_eq!(CellSize::from_pixels(16), Some(CellSize::S16));
        assert_eq!(CellSize::from_pixels(8), None);
    }

    #[test]
    fn blank_glyph() {
        let g = PackedGlyph::blank(CellSize::S24);
        assert_eq!(g.as_bytes().len(), 72);
        assert!(g.is_empty());
    }
}
