//! Stroke rasterization primitives.
//!
//! Everything here writes opaque pixels straight into the canvas buffer.
//! Thick strokes are built from two primitives: a filled disc (round caps,
//! round joins) stamped densely along a segment, and an axis-aligned filled
//! band (square caps) for rectangle edges.  Pixel coordinates are treated as
//! pixel centres, so a width-1 stroke through an integral position covers
//! exactly that pixel's row or column.

use egui::Pos2;
use image::{Rgba, RgbaImage};

/// Fill a solid disc centred at (cx, cy).  `radius` is clamped up to 0.5 so
/// a width-1 pen still leaves a mark.
pub fn fill_disc(img: &mut RgbaImage, cx: f32, cy: f32, radius: f32, color: Rgba<u8>) {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return;
    }
    let r = radius.max(0.5);
    let r_sq = r * r;

    let min_x = ((cx - r).floor() as i64).max(0);
    let max_x = ((cx + r).ceil() as i64).min(w as i64 - 1);
    let min_y = ((cy - r).floor() as i64).max(0);
    let max_y = ((cy + r).ceil() as i64).min(h as i64 - 1);
    if min_x > max_x || min_y > max_y {
        return;
    }

    for y in min_y..=max_y {
        let dy = y as f32 - cy;
        for x in min_x..=max_x {
            let dx = x as f32 - cx;
            if dx * dx + dy * dy <= r_sq {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Fill the axis-aligned half-open region `[x0, x1) × [y0, y1)` (pixel-centre
/// coordinates), clipped to the buffer.  Half-open intervals keep an N-wide
/// band exactly N pixels thick.
pub fn fill_span(img: &mut RgbaImage, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba<u8>) {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return;
    }
    let min_x = (x0.ceil() as i64).max(0);
    let max_x = ((x1.ceil() as i64) - 1).min(w as i64 - 1);
    let min_y = (y0.ceil() as i64).max(0);
    let max_y = ((y1.ceil() as i64) - 1).min(h as i64 - 1);
    if min_x > max_x || min_y > max_y {
        return;
    }

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            img.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// Stroke a straight segment with round caps and joins by stamping discs at
/// sub-pixel spacing along it (dense stepping keeps thin strokes gap-free).
pub fn stamp_line(img: &mut RgbaImage, from: Pos2, to: Pos2, width: u32, color: Rgba<u8>) {
    let radius = width as f32 / 2.0;
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let distance = (dx * dx + dy * dy).sqrt();

    if distance < 0.1 {
        // Degenerate segment: a single cap
        fill_disc(img, from.x, from.y, radius, color);
        return;
    }

    let steps = distance.ceil() as usize;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        fill_disc(img, from.x + dx * t, from.y + dy * t, radius, color);
    }
}

/// Stroke the outline of the rectangle spanned by two opposite corners.
/// Corners are normalized to a non-negative width/height rectangle; edges are
/// drawn as axis-aligned bands, which gives square caps and filled corners.
pub fn stroke_rect(img: &mut RgbaImage, a: Pos2, b: Pos2, width: u32, color: Rgba<u8>) {
    // Half-open [c - half, c + half) bands keep an N-wide edge exactly N
    // pixels thick; the 0.5 floor keeps a width-1 edge one pixel thick.
    let half = (width as f32 / 2.0).max(0.5);

    let min_x = a.x.min(b.x);
    let max_x = a.x.max(b.x);
    let min_y = a.y.min(b.y);
    let max_y = a.y.max(b.y);

    // Top and bottom edges, extended by half a width so corners close up
    fill_span(img, min_x - half, min_y - half, max_x + half, min_y + half, color);
    fill_span(img, min_x - half, max_y - half, max_x + half, max_y + half, color);
    // Left and right edges
    fill_span(img, min_x - half, min_y - half, min_x + half, max_y + half, color);
    fill_span(img, max_x - half, min_y - half, max_x + half, max_y + half, color);
}

/// Vertex positions for a regular polygon: vertex `i` sits at
/// `center + radius * (cos(i·2π/n − angle), sin(i·2π/n − angle))`.
pub fn polygon_vertices(center: Pos2, radius: f32, sides: u32, angle: f32) -> Vec<Pos2> {
    let n = sides.max(1);
    let mut vertices = Vec::with_capacity(n as usize);
    for i in 0..n {
        let theta = i as f32 * std::f32::consts::TAU / n as f32 - angle;
        vertices.push(Pos2::new(
            center.x + radius * theta.cos(),
            center.y + radius * theta.sin(),
        ));
    }
    vertices
}

/// Stroke a closed polygon through `vertices` in order.
pub fn stroke_polygon(img: &mut RgbaImage, vertices: &[Pos2], width: u32, color: Rgba<u8>) {
    if vertices.len() < 2 {
        if let Some(v) = vertices.first() {
            fill_disc(img, v.x, v.y, width as f32 / 2.0, color);
        }
        return;
    }
    for i in 0..vertices.len() {
        let from = vertices[i];
        let to = vertices[(i + 1) % vertices.len()];
        stamp_line(img, from, to, width, color);
    }
}

/// Stroke a full circle of the given radius by stamping discs along the arc.
pub fn stroke_circle(img: &mut RgbaImage, center: Pos2, radius: f32, width: u32, color: Rgba<u8>) {
    let pen_radius = width as f32 / 2.0;
    if radius < 0.5 {
        fill_disc(img, center.x, center.y, pen_radius, color);
        return;
    }

    // Step so consecutive stamps are at most ~1px apart on the circumference
    let steps = (std::f32::consts::TAU * radius).ceil().max(8.0) as usize;
    for i in 0..steps {
        let theta = i as f32 * std::f32::consts::TAU / steps as f32;
        fill_disc(
            img,
            center.x + radius * theta.cos(),
            center.y + radius * theta.sin(),
            pen_radius,
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn blank(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, WHITE)
    }

    #[test]
    fn disc_covers_center_and_respects_radius() {
        let mut img = blank(20, 20);
        fill_disc(&mut img, 10.0, 10.0, 3.0, BLACK);
        assert_eq!(*img.get_pixel(10, 10), BLACK);
        assert_eq!(*img.get_pixel(13, 10), BLACK);
        assert_eq!(*img.get_pixel(14, 10), WHITE);
        assert_eq!(*img.get_pixel(10, 6), WHITE);
    }

    #[test]
    fn disc_clips_at_buffer_edges() {
        let mut img = blank(10, 10);
        fill_disc(&mut img, 0.0, 0.0, 4.0, BLACK);
        fill_disc(&mut img, 9.0, 9.0, 4.0, BLACK);
        assert_eq!(*img.get_pixel(0, 0), BLACK);
        assert_eq!(*img.get_pixel(9, 9), BLACK);
    }

    #[test]
    fn width_one_line_marks_both_endpoints() {
        let mut img = blank(30, 30);
        stamp_line(&mut img, pos2(2.0, 2.0), pos2(25.0, 17.0), 1, BLACK);
        assert_eq!(*img.get_pixel(2, 2), BLACK);
        assert_eq!(*img.get_pixel(25, 17), BLACK);
    }

    #[test]
    fn horizontal_line_has_no_gaps() {
        let mut img = blank(40, 10);
        stamp_line(&mut img, pos2(3.0, 5.0), pos2(36.0, 5.0), 1, BLACK);
        for x in 3..=36 {
            assert_eq!(*img.get_pixel(x, 5), BLACK, "gap at x={}", x);
        }
    }

    #[test]
    fn zero_length_line_stamps_a_dot() {
        let mut img = blank(10, 10);
        stamp_line(&mut img, pos2(4.0, 4.0), pos2(4.0, 4.0), 1, BLACK);
        assert_eq!(*img.get_pixel(4, 4), BLACK);
    }

    #[test]
    fn rect_outline_is_closed_and_interior_untouched() {
        let mut img = blank(40, 40);
        stroke_rect(&mut img, pos2(30.0, 25.0), pos2(5.0, 8.0), 1, BLACK);
        // All four edges present regardless of corner order
        for x in 5..=30 {
            assert_eq!(*img.get_pixel(x, 8), BLACK, "top edge at x={}", x);
            assert_eq!(*img.get_pixel(x, 25), BLACK, "bottom edge at x={}", x);
        }
        for y in 8..=25 {
            assert_eq!(*img.get_pixel(5, y), BLACK, "left edge at y={}", y);
            assert_eq!(*img.get_pixel(30, y), BLACK, "right edge at y={}", y);
        }
        // Interior stays background
        assert_eq!(*img.get_pixel(17, 16), WHITE);
    }

    #[test]
    fn square_vertices_land_on_axes() {
        // radius 10 square, no rotation: (+r, 0), (0, +r), (-r, 0), (0, -r)
        let v = polygon_vertices(pos2(10.0, 10.0), 10.0, 4, 0.0);
        let expected = [(20.0, 10.0), (10.0, 20.0), (0.0, 10.0), (10.0, 0.0)];
        for (got, want) in v.iter().zip(expected.iter()) {
            assert!((got.x - want.0).abs() < 1e-3, "{:?} vs {:?}", got, want);
            assert!((got.y - want.1).abs() < 1e-3, "{:?} vs {:?}", got, want);
        }
    }

    #[test]
    fn rotated_triangle_respects_angle_sign() {
        // angle is subtracted, so a positive angle rotates vertex 0 upward
        // (negative y) in image coordinates.
        let v = polygon_vertices(pos2(0.0, 0.0), 10.0, 3, std::f32::consts::FRAC_PI_2);
        assert!((v[0].x - 0.0).abs() < 1e-3);
        assert!((v[0].y + 10.0).abs() < 1e-3);
    }

    #[test]
    fn circle_stroke_stays_on_ring() {
        let mut img = blank(60, 60);
        stroke_circle(&mut img, pos2(30.0, 30.0), 20.0, 1, BLACK);
        // On-ring points painted
        assert_eq!(*img.get_pixel(50, 30), BLACK);
        assert_eq!(*img.get_pixel(10, 30), BLACK);
        assert_eq!(*img.get_pixel(30, 50), BLACK);
        assert_eq!(*img.get_pixel(30, 10), BLACK);
        // Center untouched
        assert_eq!(*img.get_pixel(30, 30), WHITE);
    }
}
