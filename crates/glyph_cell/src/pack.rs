//! Thresholding and SSD1306 page packing.

use crate::{CellSize, PackedGlyph};
use font::GlyphBitmap;

/// Coverage at or above this value turns a pixel on.
pub const THRESHOLD: u8 = 128;

#[inline]
fn is_on(coverage: u8) -> bool {
    coverage >= THRESHOLD
}

/// Pack an N×N coverage bitmap column by column.
///
/// Within a column, byte `p` holds rows `p*8 .. p*8+8` with bit 0 as the top
/// row. Bits for rows past N stay zero.
pub fn pack_pages(cell: &GlyphBitmap, size: CellSize) -> PackedGlyph {
    let n = size.pixels() as i32;
    let mut bytes = Vec::with_capacity(size.stride());
    for x in 0..n {
        for page in 0..size.pages() as i32 {
            let mut byte = 0u8;
            for bit in 0..8 {
                let y = page * 8 + bit;
                if y >= n {
                    break;
                }
                if is_on(cell.get(x, y)) {
                    byte |= 1 << bit;
                }
            }
            bytes.push(byte);
        }
    }
    PackedGlyph { bytes }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_major_pages() {
        let mut cell = GlyphBitmap::new(12, 12);
        cell.set(0, 0, 255);
        cell.set(0, 11, 255);
        cell.set(1, 8, 255);
        cell.set(11, 7, 255);

        let packed = pack_pages(&cell, CellSize::S12);
        let bytes = packed.as_bytes();
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[0..2], &[0x01, 0x08]);
        assert_eq!(&bytes[2..4], &[0x00, 0x01]);
        assert_eq!(&bytes[22..24], &[0x80, 0x00]);
        assert_eq!(bytes.iter().filter(|&&b| b != 0).count(), 4);
    }

    #[test]
    fn partial_last_page() {
        let mut cell = GlyphBitmap::new(12, 12);
        cell.data.fill(255);
        let packed = pack_pages(&cell, CellSize::S12);
        for column in packed.as_bytes().chunks(2) {
            assert_eq!(column, &[0xFF, 0x0F]);
        }
    }

    #[test]
    fn threshold_boundary() {
        let mut cell = GlyphBitmap::new(16, 16);
        cell.set(0, 0, THRESHOLD - 1);
        cell.set(0, 1, THRESHOLD);
        let packed = pack_pages(&cell, CellSize::S16);
        assert_eq!(packed.as_bytes()[0], 0x02);
        assert!(!packed.is_empty());
    }

    #[test]
    fn twenty_four_has_three_pages() {
        let mut cell = GlyphBitmap::new(24, 24);
        cell.set(5, 23, 200);
        cell.set(5, 16, 200);
        let packed = pack_pages(&cell, CellSize::S24);
        assert_eq!(&packed.as_bytes()[15..18], &[0x00, 0x00, 0x81]);
    }
}
