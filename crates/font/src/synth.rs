//! Tiny in-memory TrueType fonts.
//!
//! Builds just enough of an sfnt (`cmap`, `glyf`, `head`, `hhea`, `hmtx`,
//! `loca`, `maxp`) for the parser and rasterizer to treat it like a real
//! face. Glyph ids follow insertion order starting at 1; glyph 0 is an empty
//! `.notdef`.

use crate::glyph::{ARG_1_AND_2_ARE_WORDS, ARGS_ARE_XY_VALUES, MORE_COMPONENTS, ON_CURVE_POINT};
use crate::tables::TableTag;
use common::BufWriter;

/// A point of a synthetic contour: `(x, y, on_curve)` in font units.
pub type SynthPoint = (i16, i16, bool);

#[derive(Clone, Debug)]
enum SynthGlyph {
    Simple {
        contours: Vec<Vec<SynthPoint>>,
        bounds: [i16; 4],
    },
    Composite {
        components: Vec<(u16, i16, i16)>,
        bounds: [i16; 4],
    },
}

impl SynthGlyph {
    fn bounds(&self) -> [i16; 4] {
        match self {
            Self::Simple { bounds, .. } | Self::Composite { bounds, .. } => *bounds,
        }
    }
}

/// Builder for a single-face TrueType font.
#[derive(Clone, Debug)]
pub struct SynthFont {
    units_per_em: u16,
    ascender: i16,
    descender: i16,
    glyphs: Vec<(char, SynthGlyph)>,
    format12: bool,
}

impl SynthFont {
    /// An empty font with the given em size; ascender 7/8 em, descender -1/8 em.
    pub fn new(units_per_em: u16) -> Self {
        let em = units_per_em as i32;
        Self {
            units_per_em,
            ascender: (em * 7 / 8) as i16,
            descender: (-em / 8) as i16,
            glyphs: Vec::new(),
            format12: false,
        }
    }

    pub fn ascender(mut self, ascender: i16) -> Self {
        self.ascender = ascender;
        self
    }

    /// A filled axis-aligned rectangle, wound clockwise.
    pub fn rect(self, ch: char, x0: i16, y0: i16, x1: i16, y1: i16) -> Self {
        let contour = vec![(x0, y0, true), (x0, y1, true), (x1, y1, true), (x1, y0, true)];
        self.glyph(ch, vec![contour])
    }

    /// A simple glyph from explicit contours; the header box is computed.
    pub fn glyph(mut self, ch: char, contours: Vec<Vec<SynthPoint>>) -> Self {
        let bounds = points_bounds(contours.iter().flatten().map(|&(x, y, _)| (x, y)));
        self.glyphs.push((ch, SynthGlyph::Simple { contours, bounds }));
        self
    }

    /// A composite glyph placing earlier glyphs at `(dx, dy)` offsets.
    ///
    /// Panics if a referenced character was not added before.
    pub fn composite(mut self, ch: char, parts: &[(char, i16, i16)]) -> Self {
        let mut corners = Vec::new();
        let components = parts
            .iter()
            .map(|&(part, dx, dy)| {
                let idx = self
                    .glyphs
                    .iter()
                    .position(|(c, _)| *c == part)
                    .expect("composite part must be added first");
                let [x0, y0, x1, y1] = self.glyphs[idx].1.bounds();
                corners.push((x0 + dx, y0 + dy));
                corners.push((x1 + dx, y1 + dy));
                (idx as u16 + 1, dx, dy)
            })
            .collect();
        let bounds = points_bounds(corners.into_iter());
        self.glyphs.push((ch, SynthGlyph::Composite { components, bounds }));
        self
    }

    /// Zero the stored header box of `ch` while keeping its contours, as some
    /// broken fonts ship.
    pub fn clear_bounds(mut self, ch: char) -> Self {
        for (c, glyph) in &mut self.glyphs {
            if *c == ch {
                match glyph {
                    SynthGlyph::Simple { bounds, .. } | SynthGlyph::Composite { bounds, .. } => {
                        *bounds = [0; 4];
                    }
                }
            }
        }
        self
    }

    /// Also emit a format 12 cmap subtable (needed for non-BMP characters).
    pub fn with_format12(mut self) -> Self {
        self.format12 = true;
        self
    }

    /// Serialize to sfnt bytes.
    pub fn build(&self) -> Vec<u8> {
        let (glyf, loca) = self.glyf_and_loca();
        let tables = [
            (TableTag::CMAP, self.cmap()),
            (TableTag::GLYF, glyf),
            (TableTag::HEAD, self.head()),
            (TableTag::HHEA, self.hhea()),
            (TableTag::HMTX, self.hmtx()),
            (TableTag::LOCA, loca),
            (TableTag::MAXP, self.maxp()),
        ];
        assemble(0x0001_0000, &tables)
    }

    fn num_glyphs(&self) -> u16 {
        self.glyphs.len() as u16 + 1
    }

    fn font_bounds(&self) -> [i16; 4] {
        let corners = self.glyphs.iter().flat_map(|(_, g)| {
            let [x0, y0, x1, y1] = g.bounds();
            [(x0, y0), (x1, y1)]
        });
        points_bounds(corners)
    }

    fn mapping(&self) -> Vec<(u32, u16)> {
        let mut map: Vec<(u32, u16)> = self
            .glyphs
            .iter()
            .enumerate()
            .map(|(i, (ch, _))| (*ch as u32, i as u16 + 1))
            .collect();
        map.sort_unstable();
        map.dedup_by_key(|m| m.0);
        map
    }

    fn cmap(&self) -> Vec<u8> {
        let map = self.mapping();
        let format4 = cmap_format4(&map);
        let format12 = self.format12.then(|| cmap_format12(&map));

        let mut w = BufWriter::new();
        let num_tables: u16 = if format12.is_some() { 2 } else { 1 };
        w.u16(0);
        w.u16(num_tables);
        let header_len = 4 + 8 * num_tables as u32;
        w.u16(3);
        w.u16(1);
        w.u32(header_len);
        if format12.is_some() {
            w.u16(3);
            w.u16(10);
            w.u32(header_len + format4.len() as u32);
        }
        w.bytes(&format4);
        if let Some(f12) = format12 {
            w.bytes(&f12);
        }
        w.finish()
    }

    fn glyf_and_loca(&self) -> (Vec<u8>, Vec<u8>) {
        let mut glyf = BufWriter::new();
        let mut loca = BufWriter::new();
        // .notdef: no outline, so it starts and ends at 0
        loca.u32(0);
        loca.u32(0);
        for (_, glyph) in &self.glyphs {
            encode_glyph(&mut glyf, glyph);
            glyf.pad4();
            loca.u32(glyf.len() as u32);
        }
        (glyf.finish(), loca.finish())
    }

    fn head(&self) -> Vec<u8> {
        let [x_min, y_min, x_max, y_max] = self.font_bounds();
        let mut w = BufWriter::new();
        w.u16(1);
        w.u16(0);
        w.u32(0x0001_0000); // fontRevision
        w.u32(0); // checksumAdjustment
        w.u32(0x5F0F_3CF5); // magicNumber
        w.u16(0); // flags
        w.u16(self.units_per_em);
        w.bytes(&[0; 16]); // created + modified
        w.i16(x_min);
        w.i16(y_min);
        w.i16(x_max);
        w.i16(y_max);
        w.u16(0); // macStyle
        w.u16(8); // lowestRecPPEM
        w.i16(2); // fontDirectionHint
        w.i16(1); // indexToLocFormat: long
        w.i16(0); // glyphDataFormat
        w.finish()
    }

    fn hhea(&self) -> Vec<u8> {
        let mut w = BufWriter::new();
        w.u16(1);
        w.u16(0);
        w.i16(self.ascender);
        w.i16(self.descender);
        w.i16(0); // lineGap
        w.u16(self.units_per_em); // advanceWidthMax
        w.bytes(&[0; 22]); // minLSB .. metricDataFormat
        w.u16(self.num_glyphs());
        w.finish()
    }

    fn hmtx(&self) -> Vec<u8> {
        let mut w = BufWriter::new();
        for _ in 0..self.num_glyphs() {
            w.u16(self.units_per_em);
            w.i16(0);
        }
        w.finish()
    }

    fn maxp(&self) -> Vec<u8> {
        let mut w = BufWriter::new();
        w.u32(0x0000_5000);
        w.u16(self.num_glyphs());
        w.finish()
    }
}

fn points_bounds(points: impl Iterator<Item = (i16, i16)>) -> [i16; 4] {
    points
        .fold(None, |acc: Option<[i16; 4]>, (x, y)| {
            Some(match acc {
                None => [x, y, x, y],
                Some([x0, y0, x1, y1]) => [x0.min(x), y0.min(y), x1.max(x), y1.max(y)],
            })
        })
        .unwrap_or([0; 4])
}

fn encode_glyph(w: &mut BufWriter, glyph: &SynthGlyph) {
    let [x_min, y_min, x_max, y_max] = glyph.bounds();
    match glyph {
        SynthGlyph::Simple { contours, .. } => {
            w.i16(contours.len() as i16);
            for v in [x_min, y_min, x_max, y_max] {
                w.i16(v);
            }
            let mut end = 0u16;
            for contour in contours {
                end += contour.len() as u16;
                w.u16(end - 1);
            }
            w.u16(0); // instructionLength

            let points: Vec<SynthPoint> = contours.iter().flatten().copied().collect();
            // Long deltas only: neither short nor same bits set.
            for &(_, _, on) in &points {
                w.u8(if on { ON_CURVE_POINT } else { 0 });
            }
            let mut prev = 0i16;
            for &(x, _, _) in &points {
                w.i16(x - prev);
                prev = x;
            }
            prev = 0;
            for &(_, y, _) in &points {
                w.i16(y - prev);
                prev = y;
            }
        }
        SynthGlyph::Composite { components, .. } => {
            w.i16(-1);
            for v in [x_min, y_min, x_max, y_max] {
                w.i16(v);
            }
            for (i, &(gid, dx, dy)) in components.iter().enumerate() {
                let mut flags = ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES;
                if i + 1 < components.len() {
                    flags |= MORE_COMPONENTS;
                }
                w.u16(flags);
                w.u16(gid);
                w.i16(dx);
                w.i16(dy);
            }
        }
    }
}

/// One segment per BMP character plus the closing 0xFFFF segment.
fn cmap_format4(map: &[(u32, u16)]) -> Vec<u8> {
    let mut segments: Vec<(u16, i16)> = map
        .iter()
        .filter_map(|&(cp, gid)| {
            let cp = u16::try_from(cp).ok().filter(|&cp| cp != 0xFFFF)?;
            Some((cp, gid.wrapping_sub(cp) as i16))
        })
        .collect();
    segments.push((0xFFFF, 1));

    let seg_count = segments.len() as u16;
    let mut w = BufWriter::new();
    w.u16(4);
    w.u16(16 + 8 * seg_count); // length
    w.u16(0); // language
    w.u16(seg_count * 2);
    let entry_selector = 15 - seg_count.leading_zeros() as u16;
    let search_range = 2 << entry_selector;
    w.u16(search_range);
    w.u16(entry_selector);
    w.u16(seg_count * 2 - search_range);
    for &(cp, _) in &segments {
        w.u16(cp); // endCode
    }
    w.u16(0); // reservedPad
    for &(cp, _) in &segments {
        w.u16(cp); // startCode
    }
    for &(_, delta) in &segments {
        w.i16(delta);
    }
    for _ in &segments {
        w.u16(0); // idRangeOffset
    }
    w.finish()
}

fn cmap_format12(map: &[(u32, u16)]) -> Vec<u8> {
    let mut w = BufWriter::new();
    w.u16(12);
    w.u16(0);
    w.u32(16 + 12 * map.len() as u32);
    w.u32(0); // language
    w.u32(map.len() as u32);
    for &(cp, gid) in map {
        w.u32(cp);
        w.u32(cp);
        w.u32(gid as u32);
    }
    w.finish()
}

/// Lay out an sfnt: offset table, table directory, then 4-aligned tables.
fn assemble(sfnt_version: u32, tables: &[(TableTag, Vec<u8>)]) -> Vec<u8> {
    let num_tables = tables.len() as u16;
    let mut w = BufWriter::new();
    w.u32(sfnt_version);
    w.u16(num_tables);
    w.bytes(&[0; 6]); // searchRange, entrySelector, rangeShift

    let mut offset = 12 + 16 * tables.len();
    for (tag, data) in tables {
        w.bytes(&tag.0);
        w.u32(0); // checksum
        w.u32(offset as u32);
        w.u32(data.len() as u32);
        offset += data.len().next_multiple_of(4);
    }
    for (_, data) in tables {
        w.bytes(data);
        w.pad4();
    }
    w.finish()
}

/// Pack several sfnt files into one TrueType Collection, rebasing every
/// table offset onto the combined file.
pub fn collection(fonts: &[Vec<u8>]) -> Vec<u8> {
    let mut w = BufWriter::new();
    w.bytes(b"ttcf");
    w.u16(1);
    w.u16(0);
    w.u32(fonts.len() as u32);
    let slots = w.len();
    for _ in fonts {
        w.u32(0);
    }

    for (i, font) in fonts.iter().enumerate() {
        w.pad4();
        let base = w.len();
        w.patch_u32(slots + 4 * i, base as u32);

        let mut face = font.clone();
        let num_tables = u16::from_be_bytes([face[4], face[5]]) as usize;
        for t in 0..num_tables {
            let at = 12 + 16 * t + 8;
            let old = u32::from_be_bytes([face[at], face[at + 1], face[at + 2], face[at + 3]]);
            face[at..at + 4].copy_from_slice(&(old + base as u32).to_be_bytes());
        }
        w.bytes(&face);
    }
    w.finish()
}

/// Rename table `from` to `to` in a built font, e.g. to make a `glyf` font
/// look like a CFF one.
pub fn rename_table(font: &mut [u8], from: TableTag, to: TableTag) {
    let num_tables = u16::from_be_bytes([font[4], font[5]]) as usize;
    for t in 0..num_tables {
        let at = 12 + 16 * t;
        if font[at..at + 4] == from.0 {
            font[at..at + 4].copy_from_slice(&to.0);
        }
    }
}
