//! One face of a TrueType font file.

use crate::FontError;
use crate::glyph::{Contour, GlyphBounds, GlyphDesc, GlyphOutline, parse_glyph};
use crate::rasterizer::{GlyphBitmap, Transform, fill_outline};
use crate::tables::{
    Cmap, FontFile, HeadTable, HheaTable, MaxpTable, TableTag, face_offsets, get_glyph_offset,
    parse_cmap,
};
use common::{ParseError, PixelBox};
use log::debug;

/// Composite glyphs may nest at most this deep.
const MAX_COMPOSITE_DEPTH: u32 = 8;

/// A parsed face, borrowing the font file bytes.
pub struct Face<'a> {
    head: HeadTable,
    hhea: HheaTable,
    num_glyphs: u16,
    cmap: Cmap,
    glyf: &'a [u8],
    loca: &'a [u8],
}

impl<'a> Face<'a> {
    /// Load face `index` of a TTF (index 0 only) or TTC file.
    pub fn parse(data: &'a [u8], index: u32) -> Result<Self, FontError> {
        let offsets = face_offsets(data)?;
        let count = offsets.len() as u32;
        let &offset = offsets
            .get(index as usize)
            .ok_or(FontError::FaceIndex { index, count })?;

        let file = FontFile::parse_at(data, offset)?;
        let table = |tag: TableTag| file.table_data(tag).ok_or(FontError::MissingTable(tag));

        if file.find_table(TableTag::GLYF).is_none() && file.find_table(TableTag::CFF).is_some() {
            return Err(FontError::Unsupported("CFF outlines"));
        }

        let head = HeadTable::parse(table(TableTag::HEAD)?)?;
        let hhea = HheaTable::parse(table(TableTag::HHEA)?)?;
        let num_glyphs = MaxpTable::parse(table(TableTag::MAXP)?)?.num_glyphs;
        let cmap = parse_cmap(table(TableTag::CMAP)?)?;
        let glyf = table(TableTag::GLYF)?;
        let loca = table(TableTag::LOCA)?;

        debug!(
            "face {index}/{count}: {num_glyphs} glyphs, {} units/em, {} cmap",
            head.units_per_em,
            match cmap {
                Cmap::Format4(_) => "format 4",
                Cmap::Format12(_) => "format 12",
            }
        );

        Ok(Face { head, hhea, num_glyphs, cmap, glyf, loca })
    }

    /// Number of faces in the font file (1 for a plain TTF).
    pub fn face_count(data: &[u8]) -> Result<u32, FontError> {
        Ok(face_offsets(data)?.len() as u32)
    }

    pub fn units_per_em(&self) -> u16 {
        self.head.units_per_em
    }

    pub fn num_glyphs(&self) -> u16 {
        self.num_glyphs
    }

    /// Glyph id for `ch`; 0 means the face has no glyph for it.
    pub fn glyph_id(&self, ch: char) -> u16 {
        self.cmap.lookup(ch as u32)
    }

    /// Font units → pixels factor at `px` pixels per em.
    pub fn scale(&self, px: u32) -> f32 {
        px as f32 / self.head.units_per_em as f32
    }

    /// Distance from the top of the line to the baseline at `px` pixels per em.
    pub fn ascent_px(&self, px: u32) -> i32 {
        (self.hhea.ascender as f32 * self.scale(px)).round() as i32
    }

    /// The outline of glyph `glyph_id`, composites flattened into one
    /// contour list. `None` for glyphs without contours.
    pub fn outline(&self, glyph_id: u16) -> Result<Option<GlyphOutline>, FontError> {
        let mut contours = Vec::new();
        let Some(bounds) = self.collect_contours(glyph_id, 0, &mut contours)? else {
            return Ok(None);
        };
        if contours.is_empty() {
            return Ok(None);
        }
        Ok(Some(GlyphOutline { contours, bounds }))
    }

    /// Append the contours of `glyph_id` to `out`, returning the header box
    /// of the top-level glyph.
    fn collect_contours(
        &self,
        glyph_id: u16,
        depth: u32,
        out: &mut Vec<Contour>,
    ) -> Result<Option<GlyphBounds>, FontError> {
        if depth > MAX_COMPOSITE_DEPTH {
            return Err(ParseError::InvalidValue("composite glyphs nested too deep").into());
        }
        if glyph_id >= self.num_glyphs {
            return Err(ParseError::InvalidValue("glyph id out of range").into());
        }

        let (start, end) = get_glyph_offset(self.loca, glyph_id, self.head.index_to_loc_format)?;
        if end <= start {
            return Ok(None);
        }
        let data = self
            .glyf
            .get(start as usize..end as usize)
            .ok_or(ParseError::UnexpectedEof)?;

        match parse_glyph(data)? {
            GlyphDesc::Empty => Ok(None),
            GlyphDesc::Simple(outline) => {
                out.extend(outline.contours);
                Ok(Some(outline.bounds))
            }
            GlyphDesc::Composite { bounds, components } => {
                for comp in components {
                    let mut parts = Vec::new();
                    self.collect_contours(comp.glyph_id, depth + 1, &mut parts)?;
                    out.extend(parts.into_iter().map(|c| Contour {
                        points: c.points.into_iter().map(|p| comp.transform(p)).collect(),
                    }));
                }
                Ok(Some(bounds))
            }
        }
    }

    /// Pixel ink box of `ch` at `px` pixels per em, relative to the pen on the
    /// baseline (y down).
    ///
    /// Characters without a glyph, empty glyphs and glyphs that fail to parse
    /// give an empty box. `None` means the stored box is unusable although
    /// the glyph has contours, so the caller has to measure rendered ink.
    pub fn ink_box(&self, ch: char, px: u32) -> Option<PixelBox> {
        let glyph_id = self.glyph_id(ch);
        if glyph_id == 0 {
            return Some(PixelBox::EMPTY);
        }
        let outline = match self.outline(glyph_id) {
            Ok(Some(outline)) => outline,
            Ok(None) => return Some(PixelBox::EMPTY),
            Err(e) => {
                debug!("U+{:04X}: glyph {glyph_id} unreadable: {e}", ch as u32);
                return Some(PixelBox::EMPTY);
            }
        };

        let b = outline.bounds;
        if b.is_degenerate() {
            return None;
        }
        let s = self.scale(px);
        Some(PixelBox::new(
            (b.x_min as f32 * s).floor() as i32,
            (-(b.y_max as f32) * s).floor() as i32,
            (b.x_max as f32 * s).ceil() as i32,
            (-(b.y_min as f32) * s).ceil() as i32,
        ))
    }

    /// Draw `ch` at `px` pixels per em with the baseline pen at `pen`.
    ///
    /// Missing or unreadable glyphs draw nothing.
    pub fn draw(&self, ch: char, px: u32, canvas: &mut GlyphBitmap, pen: (i32, i32)) {
        let glyph_id = self.glyph_id(ch);
        if glyph_id == 0 {
            return;
        }
        match self.outline(glyph_id) {
            Ok(Some(outline)) => {
                let t = Transform::new(self.scale(px), pen.0 as f32, pen.1 as f32);
                fill_outline(&outline, &t, canvas);
            }
            Ok(None) => {}
            Err(e) => debug!("U+{:04X}: glyph {glyph_id} unreadable: {e}", ch as u32),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
