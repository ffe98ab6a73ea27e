//! Scanline glyph rasterizer.
//!
//! Converts glyph outlines to 8-bit coverage bitmaps using:
//! - De Casteljau subdivision for quadratic Bézier flattening
//! - Scanline intersection with the non-zero winding fill rule, four
//!   vertical sub-samples per row and exact horizontal span coverage

use crate::glyph::{Contour, GlyphOutline};
use common::{PixelBox, Vec2};

/// Flatness tolerance in pixels for curve subdivision.
const CURVE_TOLERANCE: f32 = 0.25;

/// Subdivision depth cap; 2^16 segments per curve is far past visible.
const MAX_CURVE_DEPTH: u32 = 16;

/// Vertical sub-samples per pixel row.
const SUBSAMPLES: usize = 4;

// ─────────────────────────────────────────────────────────────────────────────
// GlyphBitmap
// ─────────────────────────────────────────────────────────────────────────────

/// An 8-bit coverage bitmap (0 = empty, 255 = fully inked), row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl GlyphBitmap {
    /// A blank bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    /// Coverage at `(x, y)`; 0 outside the bitmap.
    pub fn get(&self, x: i32, y: i32) -> u8 {
        self.index(x, y).map_or(0, |i| self.data[i])
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = u32::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = u32::try_from(y).ok().filter(|&y| y < self.height)?;
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Tight box around every non-zero pixel, `None` if nothing is inked.
    pub fn ink_bounds(&self) -> Option<PixelBox> {
        let w = self.width as usize;
        if w == 0 {
            return None;
        }
        let mut bounds: Option<PixelBox> = None;
        for (y, row) in self.data.chunks_exact(w).enumerate() {
            let Some(first) = row.iter().position(|&v| v != 0) else {
                continue;
            };
            let last = row.iter().rposition(|&v| v != 0).unwrap_or(first);
            let (x0, x1, y) = (first as i32, last as i32 + 1, y as i32);
            bounds = Some(match bounds {
                None => PixelBox::new(x0, y, x1, y + 1),
                Some(b) => PixelBox::new(b.x0.min(x0), b.y0, b.x1.max(x1), y + 1),
            });
        }
        bounds
    }

    /// Copy of the region `area`; pixels outside the source read as 0.
    pub fn crop(&self, area: PixelBox) -> GlyphBitmap {
        let mut out = GlyphBitmap::new(area.width() as u32, area.height() as u32);
        for y in 0..area.height() {
            for x in 0..area.width() {
                if let Some(i) = out.index(x, y) {
                    out.data[i] = self.get(area.x0 + x, area.y0 + y);
                }
            }
        }
        out
    }

    /// Set one pixel; writes outside the bitmap are dropped.
    pub fn set(&mut self, x: i32, y: i32, value: u8) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = value;
        }
    }

    /// Overwrite this bitmap with `src` placed at `(x, y)`, clipping at the edges.
    pub fn paste(&mut self, src: &GlyphBitmap, x: i32, y: i32) {
        for sy in 0..src.height as i32 {
            for sx in 0..src.width as i32 {
                self.set(x + sx, y + sy, src.get(sx, sy));
            }
        }
    }
}

impl core::fmt::Debug for GlyphBitmap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "GlyphBitmap {}x{}", self.width, self.height)?;
        for row in self.data.chunks(self.width.max(1) as usize) {
            let line: String = row
                .iter()
                .map(|&v| match v {
                    0 => '.',
                    1..=127 => '+',
                    _ => '#',
                })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transform
// ─────────────────────────────────────────────────────────────────────────────

/// Maps font units (y up) to bitmap pixels (y down).
///
/// `(dx, dy)` is the pen position: where the glyph origin on the baseline
/// lands in the bitmap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: f32,
    pub dx: f32,
    pub dy: f32,
}

impl Transform {
    pub fn new(scale: f32, dx: f32, dy: f32) -> Self {
        Self { scale, dx, dy }
    }

    #[inline]
    pub fn apply(&self, x: i32, y: i32) -> Vec2 {
        Vec2::new(x as f32 * self.scale + self.dx, self.dy - y as f32 * self.scale)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bézier flattening
// ─────────────────────────────────────────────────────────────────────────────

/// Flatten a quadratic Bézier curve (p0, p1_control, p2) into line segments.
///
/// Uses recursive De Casteljau subdivision until the control point is within
/// `tolerance` pixels of the chord midpoint. Pushes every point after `p0`,
/// ending with `p2`.
pub fn flatten_quad_bezier(p0: Vec2, p1: Vec2, p2: Vec2, tolerance: f32, output: &mut Vec<Vec2>) {
    flatten_quad_recursive(p0, p1, p2, tolerance, MAX_CURVE_DEPTH, output);
}

fn flatten_quad_recursive(p0: Vec2, p1: Vec2, p2: Vec2, tolerance: f32, depth: u32, output: &mut Vec<Vec2>) {
    if depth == 0 || p1.distance_sq(p0.midpoint(p2)) <= tolerance * tolerance {
        output.push(p2);
        return;
    }

    // Subdivide at t=0.5
    let p01 = p0.midpoint(p1);
    let p12 = p1.midpoint(p2);
    let p012 = p01.midpoint(p12);

    flatten_quad_recursive(p0, p01, p012, tolerance, depth - 1, output);
    flatten_quad_recursive(p012, p12, p2, tolerance, depth - 1, output);
}

// ─────────────────────────────────────────────────────────────────────────────
// Outline → Edges
// ─────────────────────────────────────────────────────────────────────────────

/// A non-horizontal line segment with `y0 < y1`, remembering its original
/// direction for winding.
#[derive(Clone, Copy, Debug)]
struct Edge {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    winding: i32,
}

impl Edge {
    fn new(a: Vec2, b: Vec2) -> Option<Self> {
        if a.y == b.y {
            return None;
        }
        let (top, bottom, winding) = if a.y < b.y { (a, b, 1) } else { (b, a, -1) };
        Some(Edge {
            x0: top.x,
            y0: top.y,
            x1: bottom.x,
            y1: bottom.y,
            winding,
        })
    }

    #[inline]
    fn x_at(&self, y: f32) -> f32 {
        self.x0 + (y - self.y0) / (self.y1 - self.y0) * (self.x1 - self.x0)
    }
}

/// Flatten one contour into a closed polyline in pixel space.
///
/// TrueType convention: two consecutive off-curve points have an implicit
/// on-curve point at their midpoint. A contour with no on-curve point at all
/// starts at the midpoint of its last and first points.
fn flatten_contour(contour: &Contour, t: &Transform) -> Vec<Vec2> {
    let pts: Vec<(Vec2, bool)> = contour
        .points
        .iter()
        .map(|p| (t.apply(p.x, p.y), p.on_curve))
        .collect();
    let n = pts.len();
    if n == 0 {
        return Vec::new();
    }

    let (start, start_idx) = match pts.iter().position(|p| p.1) {
        Some(i) => (pts[i].0, i),
        None => (pts[n - 1].0.midpoint(pts[0].0), n - 1),
    };

    let mut out = vec![start];
    let mut current = start;
    let mut control: Option<Vec2> = None;

    for k in 1..=n {
        let (p, on_curve) = pts[(start_idx + k) % n];
        if on_curve {
            match control.take() {
                Some(c) => flatten_quad_bezier(current, c, p, CURVE_TOLERANCE, &mut out),
                None => out.push(p),
            }
            current = p;
        } else {
            if let Some(c) = control {
                let mid = c.midpoint(p);
                flatten_quad_bezier(current, c, mid, CURVE_TOLERANCE, &mut out);
                current = mid;
            }
            control = Some(p);
        }
    }

    // close
    if let Some(c) = control {
        flatten_quad_bezier(current, c, start, CURVE_TOLERANCE, &mut out);
    } else if current != start {
        out.push(start);
    }
    out
}

fn outline_to_edges(outline: &GlyphOutline, t: &Transform) -> Vec<Edge> {
    outline
        .contours
        .iter()
        .flat_map(|contour| {
            let poly = flatten_contour(contour, t);
            poly.windows(2)
                .filter_map(|w| Edge::new(w[0], w[1]))
                .collect::<Vec<_>>()
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Rasterization
// ─────────────────────────────────────────────────────────────────────────────

/// Fill `outline` into `target` under transform `t`.
///
/// Coverage is computed per row from four sub-scanlines; each pixel keeps the
/// larger of its existing value and the new coverage, so repeated draws never
/// darken overlapping ink twice.
pub fn fill_outline(outline: &GlyphOutline, t: &Transform, target: &mut GlyphBitmap) {
    let edges = outline_to_edges(outline, t);
    if edges.is_empty() || target.width == 0 {
        return;
    }

    let width = target.width as usize;
    let y_min = edges.iter().map(|e| e.y0).fold(f32::INFINITY, f32::min);
    let y_max = edges.iter().map(|e| e.y1).fold(f32::NEG_INFINITY, f32::max);
    let row_start = (y_min.floor().max(0.0) as u32).min(target.height);
    let row_end = (y_max.ceil().max(0.0) as u32).min(target.height);

    let mut accum = vec![0f32; width];
    let mut crossings: Vec<(f32, i32)> = Vec::new();
    let weight = 1.0 / SUBSAMPLES as f32;

    for row in row_start..row_end {
        accum.fill(0.0);

        for s in 0..SUBSAMPLES {
            let scan_y = row as f32 + (s as f32 + 0.5) * weight;

            crossings.clear();
            crossings.extend(
                edges
                    .iter()
                    .filter(|e| scan_y >= e.y0 && scan_y < e.y1)
                    .map(|e| (e.x_at(scan_y), e.winding)),
            );
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            let mut span_start = 0.0;
            for &(x, dir) in &crossings {
                let was_inside = winding != 0;
                winding += dir;
                match (was_inside, winding != 0) {
                    (false, true) => span_start = x,
                    (true, false) => add_span(&mut accum, span_start, x, weight),
                    _ => {}
                }
            }
        }

        let base = row as usize * width;
        for (dst, &cov) in target.data[base..base + width].iter_mut().zip(&accum) {
            let v = (cov.min(1.0) * 255.0).round() as u8;
            *dst = (*dst).max(v);
        }
    }
}

/// Add `weight` × horizontal overlap of `[x_start, x_end)` to each pixel.
fn add_span(accum: &mut [f32], x_start: f32, x_end: f32, weight: f32) {
    let w = accum.len() as f32;
    let x_start = x_start.clamp(0.0, w);
    let x_end = x_end.clamp(0.0, w);
    if x_end <= x_start {
        return;
    }

    let first = x_start.floor() as usize;
    let last = (x_end.ceil() as usize).min(accum.len());
    for (col, cell) in accum.iter_mut().enumerate().take(last).skip(first) {
        let left = x_start.max(col as f32);
        let right = x_end.min(col as f32 + 1.0);
        if right > left {
            *cell += (right - left) * weight;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
