//! TrueType table parsing.
//!
//! Parses the TrueType Collection header, the sfnt table directory and the
//! tables the rasterizer needs: `head`, `hhea`, `maxp`, `cmap` (formats 4 and
//! 12) and `loca`.

use common::{Cursor, ParseError};

// ─────────────────────────────────────────────────────────────────────────────
// TableTag
// ─────────────────────────────────────────────────────────────────────────────

/// A 4-byte table tag identifying a TrueType table.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableTag(pub [u8; 4]);

impl TableTag {
    pub const HEAD: Self = Self(*b"head");
    pub const CMAP: Self = Self(*b"cmap");
    pub const GLYF: Self = Self(*b"glyf");
    pub const LOCA: Self = Self(*b"loca");
    pub const HHEA: Self = Self(*b"hhea");
    pub const HMTX: Self = Self(*b"hmtx");
    pub const MAXP: Self = Self(*b"maxp");
    pub const CFF: Self = Self(*b"CFF ");
}

impl core::fmt::Debug for TableTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = core::str::from_utf8(&self.0).unwrap_or("????");
        write!(f, "TableTag('{s}')")
    }
}

impl core::fmt::Display for TableTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = core::str::from_utf8(&self.0).unwrap_or("????");
        write!(f, "{s}")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Collections
// ─────────────────────────────────────────────────────────────────────────────

const TTC_TAG: [u8; 4] = *b"ttcf";

/// Byte offsets of every face's table directory.
///
/// A plain sfnt file has a single face at offset 0; a TrueType Collection
/// lists one offset per face in its header.
pub fn face_offsets(data: &[u8]) -> Result<Vec<u32>, ParseError> {
    let mut c = Cursor::new(data);
    if c.tag()? != TTC_TAG {
        return Ok(vec![0]);
    }
    let _major_version = c.u16()?;
    let _minor_version = c.u16()?;
    let num_fonts = c.u32()?;
    if num_fonts == 0 || num_fonts as usize > c.remaining() / 4 {
        return Err(ParseError::LengthOutOfRange("ttc face count"));
    }
    (0..num_fonts).map(|_| c.u32()).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// TableRecord / FontFile
// ─────────────────────────────────────────────────────────────────────────────

/// A single entry in the sfnt table directory.
#[derive(Clone, Copy, Debug)]
pub struct TableRecord {
    pub tag: TableTag,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

/// A parsed table directory with access to raw table data.
///
/// Table offsets are absolute within `data`, which for collections is the
/// whole `.ttc` file.
pub struct FontFile<'a> {
    pub data: &'a [u8],
    pub sfnt_version: u32,
    pub tables: Vec<TableRecord>,
}

impl<'a> FontFile<'a> {
    /// Parse a standalone sfnt file.
    pub fn parse(data: &'a [u8]) -> Result<Self, ParseError> {
        Self::parse_at(data, 0)
    }

    /// Parse the table directory starting at byte `offset`.
    pub fn parse_at(data: &'a [u8], offset: u32) -> Result<Self, ParseError> {
        let mut c = Cursor::at(data, offset as usize)?;

        let sfnt_version = c.u32()?;
        // TrueType (0x00010000), 'true' (legacy Apple) or 'OTTO' (CFF)
        if !matches!(sfnt_version, 0x0001_0000 | 0x7472_7565 | 0x4F54_544F) {
            return Err(ParseError::InvalidValue("not a TrueType font"));
        }

        let num_tables = c.u16()?;
        let _search_range = c.u16()?;
        let _entry_selector = c.u16()?;
        let _range_shift = c.u16()?;

        let mut tables = Vec::with_capacity(num_tables as usize);
        for _ in 0..num_tables {
            let tag = TableTag(c.tag()?);
            let checksum = c.u32()?;
            let offset = c.u32()?;
            let length = c.u32()?;
            tables.push(TableRecord { tag, checksum, offset, length });
        }

        Ok(FontFile { data, sfnt_version, tables })
    }

    /// Find a table by tag and return its raw data slice.
    pub fn table_data(&self, tag: TableTag) -> Option<&'a [u8]> {
        self.find_table(tag).and_then(|t| {
            let start = t.offset as usize;
            let end = start.checked_add(t.length as usize)?;
            self.data.get(start..end)
        })
    }

    /// Find a table record by tag.
    pub fn find_table(&self, tag: TableTag) -> Option<&TableRecord> {
        self.tables.iter().find(|t| t.tag == tag)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HeadTable
// ─────────────────────────────────────────────────────────────────────────────

/// Parsed `head` table.
#[derive(Clone, Debug)]
pub struct HeadTable {
    pub units_per_em: u16,
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
    pub index_to_loc_format: i16, // 0 = short (u16), 1 = long (u32)
}

impl HeadTable {
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        let mut c = Cursor::new(data);
        let _major_version = c.u16()?;
        let _minor_version = c.u16()?;
        let _font_revision = c.u32()?;
        let _checksum_adjust = c.u32()?;
        let _magic = c.u32()?;
        let _flags = c.u16()?;
        let units_per_em = c.u16()?;
        c.skip(16)?; // created + modified
        let x_min = c.i16()?;
        let y_min = c.i16()?;
        let x_max = c.i16()?;
        let y_max = c.i16()?;
        let _mac_style = c.u16()?;
        let _lowest_rec_ppem = c.u16()?;
        let _font_direction_hint = c.i16()?;
        let index_to_loc_format = c.i16()?;

        if units_per_em == 0 {
            return Err(ParseError::InvalidValue("unitsPerEm is zero"));
        }

        Ok(HeadTable { units_per_em, x_min, y_min, x_max, y_max, index_to_loc_format })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HheaTable / MaxpTable
// ─────────────────────────────────────────────────────────────────────────────

/// Parsed `hhea` (horizontal header) table.
#[derive(Clone, Debug)]
pub struct HheaTable {
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
}

impl HheaTable {
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        let mut c = Cursor::new(data);
        let _major = c.u16()?;
        let _minor = c.u16()?;
        let ascender = c.i16()?;
        let descender = c.i16()?;
        let line_gap = c.i16()?;
        Ok(HheaTable { ascender, descender, line_gap })
    }
}

/// Parsed `maxp` table.
#[derive(Clone, Debug)]
pub struct MaxpTable {
    pub num_glyphs: u16,
}

impl MaxpTable {
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        let mut c = Cursor::new(data);
        let _version = c.u32()?;
        let num_glyphs = c.u16()?;
        Ok(MaxpTable { num_glyphs })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// cmap
// ─────────────────────────────────────────────────────────────────────────────

/// Parsed `cmap` format 4 subtable (BMP segment mapping).
#[derive(Clone, Debug)]
pub struct CmapFormat4 {
    pub seg_count: u16,
    pub end_code: Vec<u16>,
    pub start_code: Vec<u16>,
    pub id_delta: Vec<i16>,
    pub id_range_offset: Vec<u16>,
    pub glyph_id_array: Vec<u16>,
}

impl CmapFormat4 {
    /// Parse a format 4 subtable starting at its format field.
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        let mut c = Cursor::new(data);
        let _format = c.u16()?;
        let length = c.u16()? as usize;
        let _language = c.u16()?;
        let seg_count = c.u16()? / 2;
        c.skip(6)?; // searchRange, entrySelector, rangeShift

        let end_code = read_u16_array(&mut c, seg_count)?;
        let _reserved_pad = c.u16()?;
        let start_code = read_u16_array(&mut c, seg_count)?;
        let id_delta = read_u16_array(&mut c, seg_count)?
            .into_iter()
            .map(|d| d as i16)
            .collect();
        let id_range_offset = read_u16_array(&mut c, seg_count)?;

        // Some fonts under-report `length`; never read beyond the slice.
        let available = length.min(data.len()).saturating_sub(c.position());
        let glyph_id_array = (0..available / 2).map(|_| c.u16()).collect::<Result<_, _>>()?;

        Ok(CmapFormat4 {
            seg_count,
            end_code,
            start_code,
            id_delta,
            id_range_offset,
            glyph_id_array,
        })
    }

    /// Look up a glyph ID for a BMP code point. Returns 0 (`.notdef`) if unmapped.
    pub fn lookup(&self, codepoint: u16) -> u16 {
        let seg_count = self.seg_count as usize;
        let i = self.end_code.partition_point(|&end| end < codepoint);
        if i >= seg_count || self.start_code[i] > codepoint {
            return 0;
        }

        if self.id_range_offset[i] == 0 {
            return (codepoint as i32 + self.id_delta[i] as i32) as u16;
        }

        // id_range_offset is relative to its own slot; rebase into glyph_id_array
        let idx = self.id_range_offset[i] as usize / 2 + (codepoint - self.start_code[i]) as usize;
        let Some(array_idx) = idx.checked_sub(seg_count - i) else {
            return 0;
        };
        match self.glyph_id_array.get(array_idx) {
            Some(&gid) if gid != 0 => (gid as i32 + self.id_delta[i] as i32) as u16,
            _ => 0,
        }
    }
}

fn read_u16_array(c: &mut Cursor<'_>, n: u16) -> Result<Vec<u16>, ParseError> {
    (0..n).map(|_| c.u16()).collect()
}

/// One sequential map group of a format 12 subtable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequentialMapGroup {
    pub start_char: u32,
    pub end_char: u32,
    pub start_glyph: u32,
}

/// Parsed `cmap` format 12 subtable (full Unicode segmented coverage).
#[derive(Clone, Debug)]
pub struct CmapFormat12 {
    pub groups: Vec<SequentialMapGroup>,
}

impl CmapFormat12 {
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        let mut c = Cursor::new(data);
        let _format = c.u16()?;
        let _reserved = c.u16()?;
        let _length = c.u32()?;
        let _language = c.u32()?;
        let num_groups = c.u32()? as usize;
        if num_groups > c.remaining() / 12 {
            return Err(ParseError::LengthOutOfRange("cmap format 12 group count"));
        }

        let mut groups = Vec::with_capacity(num_groups);
        for _ in 0..num_groups {
            groups.push(SequentialMapGroup {
                start_char: c.u32()?,
                end_char: c.u32()?,
                start_glyph: c.u32()?,
            });
        }
        Ok(CmapFormat12 { groups })
    }

    pub fn lookup(&self, codepoint: u32) -> u16 {
        let i = self.groups.partition_point(|g| g.end_char < codepoint);
        match self.groups.get(i) {
            Some(g) if g.start_char <= codepoint => {
                u16::try_from(g.start_glyph.wrapping_add(codepoint - g.start_char)).unwrap_or(0)
            }
            _ => 0,
        }
    }
}

/// The character-to-glyph mapping chosen for a face.
#[derive(Clone, Debug)]
pub enum Cmap {
    Format4(CmapFormat4),
    Format12(CmapFormat12),
}

impl Cmap {
    /// Glyph id for `codepoint`, 0 if the face has no glyph for it.
    pub fn lookup(&self, codepoint: u32) -> u16 {
        match self {
            Self::Format4(t) => u16::try_from(codepoint).map_or(0, |cp| t.lookup(cp)),
            Self::Format12(t) => t.lookup(codepoint),
        }
    }
}

/// Find and parse the best Unicode cmap subtable.
///
/// Format 12 wins over format 4 when both are present, so the whole Unicode
/// range stays addressable.
pub fn parse_cmap(data: &[u8]) -> Result<Cmap, ParseError> {
    let mut c = Cursor::new(data);
    let _version = c.u16()?;
    let num_tables = c.u16()?;

    let mut best: Option<(u16, usize)> = None;
    for _ in 0..num_tables {
        let platform_id = c.u16()?;
        let encoding_id = c.u16()?;
        let offset = c.u32()? as usize;

        let unicode = platform_id == 0 || (platform_id == 3 && matches!(encoding_id, 1 | 10));
        if !unicode {
            continue;
        }
        let Some(format) = data.get(offset..offset + 2).map(|b| u16::from_be_bytes([b[0], b[1]]))
        else {
            continue;
        };
        let better = match (format, best) {
            (12, Some((12, _))) | (4, Some(_)) => false,
            (12 | 4, _) => true,
            _ => false,
        };
        if better {
            best = Some((format, offset));
        }
    }

    let (format, offset) = best.ok_or(ParseError::InvalidValue("no Unicode cmap subtable"))?;
    let subtable = data.get(offset..).ok_or(ParseError::UnexpectedEof)?;
    match format {
        12 => CmapFormat12::parse(subtable).map(Cmap::Format12),
        _ => CmapFormat4::parse(subtable).map(Cmap::Format4),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// loca
// ─────────────────────────────────────────────────────────────────────────────

/// Byte range `(start, end)` of a glyph within the `glyf` table.
///
/// `index_to_loc_format`: 0 = short (offsets are u16 × 2), 1 = long (u32).
pub fn get_glyph_offset(
    loca_data: &[u8],
    glyph_id: u16,
    index_to_loc_format: i16,
) -> Result<(u32, u32), ParseError> {
    if index_to_loc_format == 0 {
        let mut c = Cursor::at(loca_data, glyph_id as usize * 2)?;
        Ok((c.u16()? as u32 * 2, c.u16()? as u32 * 2))
    } else {
        let mut c = Cursor::at(loca_data, glyph_id as usize * 4)?;
        Ok((c.u32()?, c.u32()?))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
