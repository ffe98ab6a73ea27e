//! Placing one character inside its cell.

use crate::pack::pack_pages;
use crate::{CellSize, PackedGlyph};
use common::PixelBox;
use font::{Face, GlyphBitmap};

/// Anything that can measure and draw characters at a pixel size.
///
/// Coordinates are pixels with y pointing down; `pen` is the glyph origin on
/// the baseline.
pub trait GlyphSource {
    /// Ink box relative to the pen. An empty box means the character has no
    /// ink; `None` means the box cannot be measured without drawing.
    fn ink_box(&self, ch: char, px: u32) -> Option<PixelBox>;

    /// Draw `ch` onto `canvas` with its origin at `pen`.
    fn draw(&self, ch: char, px: u32, canvas: &mut GlyphBitmap, pen: (i32, i32));

    /// Baseline distance below the top of a line.
    fn ascent(&self, px: u32) -> i32;
}

impl GlyphSource for Face<'_> {
    fn ink_box(&self, ch: char, px: u32) -> Option<PixelBox> {
        Face::ink_box(self, ch, px)
    }

    fn draw(&self, ch: char, px: u32, canvas: &mut GlyphBitmap, pen: (i32, i32)) {
        Face::draw(self, ch, px, canvas, pen)
    }

    fn ascent(&self, px: u32) -> i32 {
        self.ascent_px(px)
    }
}

/// Coverage of `ch` centered in an N×N cell, before thresholding.
///
/// The ink box's top-left corner lands at `((N - w) / 2, (N - h) / 2)`,
/// truncating toward zero. Without a measurable box the glyph is drawn on a
/// 3N×3N scratch canvas at `(N, N + ascent)`, its inked pixels are cropped and
/// pasted at the same centered position.
pub fn render_coverage<S: GlyphSource + ?Sized>(source: &S, ch: char, size: CellSize) -> GlyphBitmap {
    let px = size.pixels();
    let n = px as i32;
    let mut cell = GlyphBitmap::new(px, px);

    match source.ink_box(ch, px) {
        Some(ink) if ink.is_empty() => {}
        Some(ink) => {
            let x = (n - ink.width()) / 2;
            let y = (n - ink.height()) / 2;
            source.draw(ch, px, &mut cell, (x - ink.x0, y - ink.y0));
        }
        None => {
            let mut scratch = GlyphBitmap::new(px * 3, px * 3);
            source.draw(ch, px, &mut scratch, (n, n + source.ascent(px)));
            if let Some(ink) = scratch.ink_bounds() {
                let crop = scratch.crop(ink);
                cell.paste(&crop, (n - ink.width()) / 2, (n - ink.height()) / 2);
            }
        }
    }
    cell
}

/// Render `ch` into packed page bytes, exactly `size.stride()` long.
pub fn render_glyph<S: GlyphSource + ?Sized>(source: &S, ch: char, size: CellSize) -> PackedGlyph {
    pack_pages(&render_coverage(source, ch, size), size)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
