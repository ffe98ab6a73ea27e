//! Glyph outline parsing from the `glyf` table.
//!
//! Handles simple glyphs (contour points) and composite glyphs (references
//! to other glyphs with offsets and 2×2 transforms). Composite resolution
//! lives in [`crate::face`], which has access to `loca`.

use common::{Cursor, ParseError};

// ─────────────────────────────────────────────────────────────────────────────
// OutlinePoint / Contour / GlyphOutline
// ─────────────────────────────────────────────────────────────────────────────

/// A single point in a glyph outline, in font units (y up).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutlinePoint {
    pub x: i32,
    pub y: i32,
    pub on_curve: bool,
}

/// A closed contour.
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    pub points: Vec<OutlinePoint>,
}

/// The bounding box stored in a glyph header, in font units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct GlyphBounds {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

impl GlyphBounds {
    /// A header box that cannot describe ink: zero or negative extent.
    pub fn is_degenerate(&self) -> bool {
        self.x_min >= self.x_max || self.y_min >= self.y_max
    }
}

/// A glyph outline: contours plus the header bounding box.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphOutline {
    pub contours: Vec<Contour>,
    pub bounds: GlyphBounds,
}

// ─────────────────────────────────────────────────────────────────────────────
// CompositeComponent
// ─────────────────────────────────────────────────────────────────────────────

/// A component of a composite glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositeComponent {
    pub glyph_id: u16,
    /// Offset in font units. Zero when the component is positioned by
    /// point matching, which is not supported.
    pub dx: i32,
    pub dy: i32,
    pub scale_x: f32,
    pub scale_01: f32,
    pub scale_10: f32,
    pub scale_y: f32,
}

impl CompositeComponent {
    fn identity(glyph_id: u16, dx: i32, dy: i32) -> Self {
        Self {
            glyph_id,
            dx,
            dy,
            scale_x: 1.0,
            scale_01: 0.0,
            scale_10: 0.0,
            scale_y: 1.0,
        }
    }

    /// Apply this component's transform and offset to a point of the
    /// referenced glyph.
    pub fn transform(&self, p: OutlinePoint) -> OutlinePoint {
        let x = p.x as f32;
        let y = p.y as f32;
        OutlinePoint {
            x: (self.scale_x * x + self.scale_10 * y).round() as i32 + self.dx,
            y: (self.scale_01 * x + self.scale_y * y).round() as i32 + self.dy,
            on_curve: p.on_curve,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GlyphDesc
// ─────────────────────────────────────────────────────────────────────────────

/// Description of a glyph: empty, simple outline, or composite.
#[derive(Clone, Debug)]
pub enum GlyphDesc {
    /// Glyph has no outline (e.g., space character).
    Empty,
    /// Simple glyph with contour data.
    Simple(GlyphOutline),
    /// Composite glyph referencing other glyphs.
    Composite {
        bounds: GlyphBounds,
        components: Vec<CompositeComponent>,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Flag bits
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) const ON_CURVE_POINT: u8 = 0x01;
const X_SHORT_VECTOR: u8 = 0x02;
const Y_SHORT_VECTOR: u8 = 0x04;
const REPEAT_FLAG: u8 = 0x08;
const X_IS_SAME_OR_POSITIVE_SHORT: u8 = 0x10;
const Y_IS_SAME_OR_POSITIVE_SHORT: u8 = 0x20;

pub(crate) const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
pub(crate) const ARGS_ARE_XY_VALUES: u16 = 0x0002;
const WE_HAVE_A_SCALE: u16 = 0x0008;
pub(crate) const MORE_COMPONENTS: u16 = 0x0020;
const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parse a glyph from its slice of the `glyf` table (as located by `loca`).
pub fn parse_glyph(data: &[u8]) -> Result<GlyphDesc, ParseError> {
    if data.is_empty() {
        return Ok(GlyphDesc::Empty);
    }

    let mut c = Cursor::new(data);
    let num_contours = c.i16()?;
    let bounds = GlyphBounds {
        x_min: c.i16()?,
        y_min: c.i16()?,
        x_max: c.i16()?,
        y_max: c.i16()?,
    };

    if num_contours >= 0 {
        parse_simple_glyph(&mut c, num_contours as u16, bounds)
    } else {
        parse_composite_glyph(&mut c, bounds)
    }
}

fn parse_simple_glyph(
    c: &mut Cursor<'_>,
    num_contours: u16,
    bounds: GlyphBounds,
) -> Result<GlyphDesc, ParseError> {
    if num_contours == 0 {
        return Ok(GlyphDesc::Empty);
    }

    let end_pts = (0..num_contours)
        .map(|_| c.u16())
        .collect::<Result<Vec<_>, _>>()?;
    if end_pts.windows(2).any(|w| w[1] < w[0]) {
        return Err(ParseError::InvalidValue("contour end points not ascending"));
    }
    let num_points = end_pts.last().map_or(0, |&last| last as usize + 1);

    let instruction_len = c.u16()? as usize;
    c.skip(instruction_len)?;

    let mut flags = Vec::with_capacity(num_points);
    while flags.len() < num_points {
        let flag = c.u8()?;
        flags.push(flag);
        if flag & REPEAT_FLAG != 0 {
            let repeat_count = c.u8()? as usize;
            let room = num_points - flags.len();
            flags.extend(std::iter::repeat_n(flag, repeat_count.min(room)));
        }
    }

    let xs = read_coordinates(c, &flags, X_SHORT_VECTOR, X_IS_SAME_OR_POSITIVE_SHORT)?;
    let ys = read_coordinates(c, &flags, Y_SHORT_VECTOR, Y_IS_SAME_OR_POSITIVE_SHORT)?;

    let mut contours = Vec::with_capacity(num_contours as usize);
    let mut start = 0usize;
    for &end in &end_pts {
        let end = end as usize;
        let points = (start..=end)
            .map(|j| OutlinePoint {
                x: xs[j],
                y: ys[j],
                on_curve: flags[j] & ON_CURVE_POINT != 0,
            })
            .collect();
        contours.push(Contour { points });
        start = end + 1;
    }

    Ok(GlyphDesc::Simple(GlyphOutline { contours, bounds }))
}

/// Decode one delta-encoded coordinate array.
fn read_coordinates(
    c: &mut Cursor<'_>,
    flags: &[u8],
    short_bit: u8,
    same_or_positive_bit: u8,
) -> Result<Vec<i32>, ParseError> {
    let mut coords = Vec::with_capacity(flags.len());
    let mut v: i32 = 0;
    for &flag in flags {
        if flag & short_bit != 0 {
            let d = c.u8()? as i32;
            v += if flag & same_or_positive_bit != 0 { d } else { -d };
        } else if flag & same_or_positive_bit == 0 {
            v += c.i16()? as i32;
        }
        coords.push(v);
    }
    Ok(coords)
}

fn parse_composite_glyph(c: &mut Cursor<'_>, bounds: GlyphBounds) -> Result<GlyphDesc, ParseError> {
    let mut components = Vec::new();

    loop {
        let flags = c.u16()?;
        let glyph_id = c.u16()?;

        let (arg1, arg2) = if flags & ARG_1_AND_2_ARE_WORDS != 0 {
            (c.i16()? as i32, c.i16()? as i32)
        } else {
            (c.i8()? as i32, c.i8()? as i32)
        };
        let (dx, dy) = if flags & ARGS_ARE_XY_VALUES != 0 {
            (arg1, arg2)
        } else {
            // point numbers for anchor matching
            (0, 0)
        };

        let mut comp = CompositeComponent::identity(glyph_id, dx, dy);

        if flags & WE_HAVE_A_SCALE != 0 {
            let scale = c.f2dot14()?;
            comp.scale_x = scale;
            comp.scale_y = scale;
        } else if flags & WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            comp.scale_x = c.f2dot14()?;
            comp.scale_y = c.f2dot14()?;
        } else if flags & WE_HAVE_A_TWO_BY_TWO != 0 {
            comp.scale_x = c.f2dot14()?;
            comp.scale_01 = c.f2dot14()?;
            comp.scale_10 = c.f2dot14()?;
            comp.scale_y = c.f2dot14()?;
        }

        components.push(comp);

        if flags & MORE_COMPONENTS == 0 {
            break;
        }
    }

    Ok(GlyphDesc::Composite { bounds, components })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn push_i16(data: &mut Vec<u8>, v: i16) {
        data.extend_from_slice(&v.to_be_bytes());
    }

    #[test]
    fn empty_glyph() {
        assert!(matches!(parse_glyph(&[]), Ok(GlyphDesc::Empty)));
    }

    #[test]
    fn degenerate_bounds() {
        assert!(GlyphBounds::default().is_degenerate());
        let b = GlyphBounds { x_min: 0, y_min: 0, x_max: 10, y_max: 10 };
        assert!(!b.is_degenerate());
        let flat = GlyphBounds { x_min: 0, y_min: 5, x_max: 10, y_max: 5 };
        assert!(flat.is_degenerate());
    }

    #[test]
    fn composite_component_transform() {
        let mut comp = CompositeComponent::identity(3, 100, -50);
        let p = OutlinePoint { x: 10, y: 20, on_curve: false };
        assert_eq!(comp.transform(p), OutlinePoint { x: 110, y: -30, on_curve: false });

        comp.scale_x = 0.5;
        comp.scale_y = 2.0;
        assert_eq!(comp.transform(p), OutlinePoint { x: 105, y: -10, on_curve: false });
    }

    #[test]
    fn simple_glyph_triangle() {
        // one contour, three on-curve points: (0,0), (500,0), (250,500)
        let mut data = Vec::new();
        push_i16(&mut data, 1);
        for v in [0, 0, 500, 500] {
            push_i16(&mut data, v);
        }
        data.extend_from_slice(&2u16.to_be_bytes()); // endPtsOfContours[0]
        data.extend_from_slice(&0u16.to_be_bytes()); // instructionLength
        data.push(ON_CURVE_POINT | X_IS_SAME_OR_POSITIVE_SHORT | Y_IS_SAME_OR_POSITIVE_SHORT);
        data.push(ON_CURVE_POINT | Y_IS_SAME_OR_POSITIVE_SHORT);
        data.push(ON_CURVE_POINT);
        push_i16(&mut data, 500);
        push_i16(&mut data, -250);
        push_i16(&mut data, 500);

        let GlyphDesc::Simple(outline) = parse_glyph(&data).unwrap() else {
            panic!("expected Simple glyph");
        };
        assert_eq!(outline.bounds.x_max, 500);
        let pts = &outline.contours[0].points;
        assert_eq!(pts.len(), 3);
        assert_eq!(pts[1], OutlinePoint { x: 500, y: 0, on_curve: true });
        assert_eq!(pts[2], OutlinePoint { x: 250, y: 500, on_curve: true });
    }

    #[test]
    fn simple_glyph_short_vectors_and_repeat() {
        // one contour, four points, flags repeated, short positive/negative deltas
        let mut data = Vec::new();
        push_i16(&mut data, 1);
        for v in [0, 0, 10, 10] {
            push_i16(&mut data, v);
        }
        data.extend_from_slice(&3u16.to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes());
        let flag = ON_CURVE_POINT | X_SHORT_VECTOR | Y_SHORT_VECTOR;
        data.push(flag | REPEAT_FLAG);
        data.push(3);
        // x: +0 +10 -0 -10 encoded as short magnitudes with sign from flags (all negative)
        data.extend_from_slice(&[0, 10, 0, 10]);
        data.extend_from_slice(&[0, 0, 10, 0]);

        let GlyphDesc::Simple(outline) = parse_glyph(&data).unwrap() else {
            panic!("expected Simple glyph");
        };
        let xs: Vec<i32> = outline.contours[0].points.iter().map(|p| p.x).collect();
        let ys: Vec<i32> = outline.contours[0].points.iter().map(|p| p.y).collect();
        assert_eq!(xs, vec![0, -10, -10, -20]);
        assert_eq!(ys, vec![0, 0, -10, -10]);
    }

    #[test]
    fn composite_glyph_offsets_and_scale() {
        let mut data = Vec::new();
        push_i16(&mut data, -1);
        for v in [0, 0, 100, 100] {
            push_i16(&mut data, v);
        }
        // component 1: words, xy values, uniform scale 0.5, more components
        data.extend_from_slice(
            &(ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES | WE_HAVE_A_SCALE | MORE_COMPONENTS)
                .to_be_bytes(),
        );
        data.extend_from_slice(&7u16.to_be_bytes());
        push_i16(&mut data, 300);
        push_i16(&mut data, -20);
        push_i16(&mut data, 0x2000);
        // component 2: byte args as point numbers
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&8u16.to_be_bytes());
        data.extend_from_slice(&[1, 2]);

        let GlyphDesc::Composite { bounds, components } = parse_glyph(&data).unwrap() else {
            panic!("expected Composite glyph");
        };
        assert_eq!(bounds.x_max, 100);
        assert_eq!(components.len(), 2);
        assert_eq!((components[0].glyph_id, components[0].dx, components[0].dy), (7, 300, -20));
        assert_eq!(components[0].scale_x, 0.5);
        assert_eq!((components[1].glyph_id, components[1].dx, components[1].dy), (8, 0, 0));
    }

    #[test]
    fn truncated_glyph_is_error() {
        let mut data = Vec::new();
        push_i16(&mut data, 2);
        for v in [0, 0, 10, 10] {
            push_i16(&mut data, v);
        }
        data.extend_from_slice(&3u16.to_be_bytes());
        assert!(parse_glyph(&data).is_err());
    }
}
