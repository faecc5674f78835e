//! Scanline flood fill.
//!
//! Repaints the region of pixels 4-connected to the seed whose color equals
//! the color sampled at the seed.  Each unit of work is one scanline span:
//! walk left from the seed painting matching pixels, walk right from one past
//! the seed, then inspect the rows directly above and below every column the
//! walks covered and queue the neighbors that still match the target color.
//! The queue is an explicit stack of span seeds, so fill depth is bounded by
//! heap memory rather than the call stack; seeds are re-checked against the
//! target when popped because an earlier span may already have painted them.

use image::{Rgba, RgbaImage};

/// Flood-fill starting at `(seed_x, seed_y)` with `fill`.  Returns the
/// bounding box of painted pixels as `(min_x, min_y, max_x, max_y)`, or
/// `None` when nothing changed (seed out of bounds, or target == fill —
/// repainting a region with its own color must be a no-op, not a hang).
pub fn flood_fill(
    img: &mut RgbaImage,
    seed_x: u32,
    seed_y: u32,
    fill: Rgba<u8>,
) -> Option<(u32, u32, u32, u32)> {
    let (w, h) = img.dimensions();
    if seed_x >= w || seed_y >= h {
        return None;
    }

    // Capture the target before any mutation
    let target = *img.get_pixel(seed_x, seed_y);
    if target == fill {
        return None;
    }

    let mut bbox: Option<(u32, u32, u32, u32)> = None;
    let mut expand = |x: u32, y: u32| {
        bbox = Some(match bbox {
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            None => (x, y, x, y),
        });
    };

    let mut spans: Vec<(u32, u32)> = vec![(seed_x, seed_y)];

    while let Some((sx, sy)) = spans.pop() {
        // A previously processed span may have painted this seed already
        if *img.get_pixel(sx, sy) != target {
            continue;
        }

        // Walk left from the seed (inclusive), painting while matching.
        // `left` ends one column beyond the leftmost painted pixel.
        let mut left = sx as i64;
        while left >= 0 && *img.get_pixel(left as u32, sy) == target {
            img.put_pixel(left as u32, sy, fill);
            expand(left as u32, sy);
            left -= 1;
        }

        // Walk right from one past the seed under the same rule; `right`
        // ends one column beyond the rightmost painted pixel.
        let mut right = sx as i64 + 1;
        while right < w as i64 && *img.get_pixel(right as u32, sy) == target {
            img.put_pixel(right as u32, sy, fill);
            expand(right as u32, sy);
            right += 1;
        }

        // Queue span seeds above and below every column strictly between the
        // walk bounds, but only where the neighbor still matches the target.
        // Rows outside the buffer are skipped.
        for x in (left + 1)..right {
            let x = x as u32;
            if sy > 0 && *img.get_pixel(x, sy - 1) == target {
                spans.push((x, sy - 1));
            }
            if sy + 1 < h && *img.get_pixel(x, sy + 1) == target {
                spans.push((x, sy + 1));
            }
        }
    }

    bbox
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::shapes;
    use egui::pos2;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn blank(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, WHITE)
    }

    #[test]
    fn fills_whole_buffer_from_any_seed() {
        let mut img = blank(16, 12);
        let bbox = flood_fill(&mut img, 7, 3, RED);
        assert_eq!(bbox, Some((0, 0, 15, 11)));
        for p in img.pixels() {
            assert_eq!(*p, RED);
        }
    }

    #[test]
    fn fill_is_contained_by_a_stroked_rectangle() {
        let mut img = blank(40, 40);
        shapes::stroke_rect(&mut img, pos2(8.0, 8.0), pos2(30.0, 28.0), 1, BLACK);
        flood_fill(&mut img, 15, 15, RED);

        // Interior fully repainted
        for y in 9..28 {
            for x in 9..30 {
                assert_eq!(*img.get_pixel(x, y), RED, "interior at ({}, {})", x, y);
            }
        }
        // Border untouched
        for x in 8..=30 {
            assert_eq!(*img.get_pixel(x, 8), BLACK);
            assert_eq!(*img.get_pixel(x, 28), BLACK);
        }
        // Exterior untouched
        assert_eq!(*img.get_pixel(0, 0), WHITE);
        assert_eq!(*img.get_pixel(39, 39), WHITE);
        assert_eq!(*img.get_pixel(7, 15), WHITE);
    }

    #[test]
    fn filling_with_the_target_color_is_a_noop() {
        let mut img = blank(10, 10);
        let before = img.clone();
        let bbox = flood_fill(&mut img, 5, 5, WHITE);
        assert_eq!(bbox, None);
        assert_eq!(img.as_raw(), before.as_raw());
    }

    #[test]
    fn out_of_bounds_seed_is_rejected() {
        let mut img = blank(10, 10);
        assert_eq!(flood_fill(&mut img, 10, 0, RED), None);
        assert_eq!(flood_fill(&mut img, 0, 99, RED), None);
    }

    #[test]
    fn fill_flows_through_a_one_pixel_gap() {
        // Vertical wall with a single hole at y=5
        let mut img = blank(20, 11);
        for y in 0..11 {
            if y != 5 {
                img.put_pixel(10, y, BLACK);
            }
        }
        flood_fill(&mut img, 2, 2, RED);
        // Both sides of the wall filled
        assert_eq!(*img.get_pixel(2, 2), RED);
        assert_eq!(*img.get_pixel(10, 5), RED);
        assert_eq!(*img.get_pixel(15, 2), RED);
        assert_eq!(*img.get_pixel(19, 10), RED);
        // Wall itself untouched
        assert_eq!(*img.get_pixel(10, 4), BLACK);
        assert_eq!(*img.get_pixel(10, 6), BLACK);
    }

    #[test]
    fn fill_does_not_cross_diagonal_barrier() {
        // Fill is 4-connected, so an 8-connected diagonal wall is tight
        let mut img = blank(8, 8);
        for i in 0..8 {
            img.put_pixel(i, i, BLACK);
        }
        flood_fill(&mut img, 7, 0, RED);
        // Above-diagonal region filled, below-diagonal untouched
        assert_eq!(*img.get_pixel(7, 0), RED);
        assert_eq!(*img.get_pixel(4, 2), RED);
        assert_eq!(*img.get_pixel(0, 7), WHITE);
        assert_eq!(*img.get_pixel(2, 5), WHITE);
    }

    #[test]
    fn fill_replaces_only_matching_color() {
        let mut img = blank(10, 10);
        img.put_pixel(4, 4, BLACK);
        flood_fill(&mut img, 0, 0, RED);
        assert_eq!(*img.get_pixel(4, 4), BLACK);
        assert_eq!(*img.get_pixel(0, 0), RED);
    }

    #[test]
    fn single_pixel_region() {
        // Isolated white pixel surrounded by black
        let mut img = RgbaImage::from_pixel(3, 3, BLACK);
        img.put_pixel(1, 1, WHITE);
        let bbox = flood_fill(&mut img, 1, 1, RED);
        assert_eq!(bbox, Some((1, 1, 1, 1)));
        assert_eq!(*img.get_pixel(1, 1), RED);
        assert_eq!(*img.get_pixel(0, 1), BLACK);
    }

    #[test]
    fn deep_serpentine_region_does_not_exhaust_the_stack() {
        // A tall comb with alternating walls forces one span per row;
        // the explicit work stack must absorb the depth.
        let w = 64u32;
        let h = 512u32;
        let mut img = blank(w, h);
        for y in (1..h).step_by(2) {
            let gap_left = (y / 2) % 2 == 0;
            for x in 0..w {
                let in_gap = if gap_left { x == 0 } else { x == w - 1 };
                if !in_gap {
                    img.put_pixel(x, y, BLACK);
                }
            }
        }
        flood_fill(&mut img, 5, 0, RED);
        assert_eq!(*img.get_pixel(5, 0), RED);
        // Last open row reached through the serpentine path
        assert_eq!(*img.get_pixel(5, h - 2), RED);
    }
}
