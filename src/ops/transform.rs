//! Whole-buffer transforms: resize and crop-erase.

use image::{Rgba, RgbaImage};

/// Build a `new_w`×`new_h` buffer filled with `background` and copy the
/// overlapping region of `src` into its top-left origin.  Content past the
/// new bounds is truncated; new area is left as background.  The caller
/// swaps the result in atomically, so `src` is never half-mutated.
pub fn resized(src: &RgbaImage, new_w: u32, new_h: u32, background: Rgba<u8>) -> RgbaImage {
    let mut out = RgbaImage::from_pixel(new_w, new_h, background);

    let copy_w = src.width().min(new_w) as usize;
    let copy_h = src.height().min(new_h);
    if copy_w == 0 || copy_h == 0 {
        return out;
    }

    // Row-wise copies on the raw buffers; both are tightly packed RGBA8
    let src_stride = src.width() as usize * 4;
    let dst_stride = new_w as usize * 4;
    let byte_len = copy_w * 4;
    let src_raw = src.as_raw();
    let dst_raw = out.as_mut();
    for y in 0..copy_h as usize {
        let src_start = y * src_stride;
        let dst_start = y * dst_stride;
        dst_raw[dst_start..dst_start + byte_len]
            .copy_from_slice(&src_raw[src_start..src_start + byte_len]);
    }
    out
}

/// Erase everything outside the rectangle `[left, right) × [top, bottom)`
/// to `background`: top strip, left strip, bottom strip, right strip.  The
/// interior is untouched and the buffer keeps its dimensions.
pub fn erase_outside(
    img: &mut RgbaImage,
    left: u32,
    top: u32,
    right: u32,
    bottom: u32,
    background: Rgba<u8>,
) {
    let (w, h) = img.dimensions();
    for y in 0..h {
        for x in 0..w {
            if y < top || y >= bottom || x < left || x >= right {
                img.put_pixel(x, y, background);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    #[test]
    fn grow_pads_with_background() {
        let src = RgbaImage::from_pixel(4, 4, BLUE);
        let out = resized(&src, 8, 6, WHITE);
        assert_eq!(out.dimensions(), (8, 6));
        assert_eq!(*out.get_pixel(3, 3), BLUE);
        assert_eq!(*out.get_pixel(4, 0), WHITE);
        assert_eq!(*out.get_pixel(0, 4), WHITE);
        assert_eq!(*out.get_pixel(7, 5), WHITE);
    }

    #[test]
    fn shrink_truncates_content() {
        let mut src = RgbaImage::from_pixel(8, 8, WHITE);
        src.put_pixel(1, 1, BLUE);
        src.put_pixel(7, 7, BLUE);
        let out = resized(&src, 4, 4, WHITE);
        assert_eq!(out.dimensions(), (4, 4));
        assert_eq!(*out.get_pixel(1, 1), BLUE);
        // (7,7) content is gone with the truncated area
        let blue_count = out.pixels().filter(|p| **p == BLUE).count();
        assert_eq!(blue_count, 1);
    }

    #[test]
    fn same_size_copy_is_identical() {
        let mut src = RgbaImage::from_pixel(5, 5, WHITE);
        src.put_pixel(2, 3, BLUE);
        let out = resized(&src, 5, 5, WHITE);
        assert_eq!(out.as_raw(), src.as_raw());
    }

    #[test]
    fn erase_outside_keeps_interior_and_dimensions() {
        let mut img = RgbaImage::from_pixel(10, 10, BLUE);
        erase_outside(&mut img, 3, 2, 7, 8, WHITE);
        assert_eq!(img.dimensions(), (10, 10));
        // Interior intact
        for y in 2..8 {
            for x in 3..7 {
                assert_eq!(*img.get_pixel(x, y), BLUE);
            }
        }
        // All four strips erased
        assert_eq!(*img.get_pixel(0, 0), WHITE);
        assert_eq!(*img.get_pixel(9, 9), WHITE);
        assert_eq!(*img.get_pixel(2, 5), WHITE);
        assert_eq!(*img.get_pixel(7, 5), WHITE);
        assert_eq!(*img.get_pixel(5, 1), WHITE);
        assert_eq!(*img.get_pixel(5, 8), WHITE);
    }
}
