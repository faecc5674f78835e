//! Text rasterization onto the canvas buffer.
//!
//! Glyphs are laid out on a single baseline with kerning, outlined with
//! `ab_glyph`, and blended into the buffer by coverage.  System fonts are
//! located through `font-kit`.

use ab_glyph::{Font, FontArc, GlyphId, ScaleFont, point};
use image::{Rgba, RgbaImage};

/// Rasterize `text` with its baseline starting at `(origin_x, origin_y)`.
/// No wrapping; glyphs falling outside the buffer are clipped away.  Returns
/// the bounding box of painted pixels as `(min_x, min_y, max_x, max_y)`.
pub fn draw_text(
    img: &mut RgbaImage,
    origin_x: f32,
    origin_y: f32,
    text: &str,
    font: &FontArc,
    font_size: f32,
    color: Rgba<u8>,
) -> Option<(u32, u32, u32, u32)> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 || text.is_empty() {
        return None;
    }

    let scaled = font.as_scaled(font_size);

    // Lay out the line: pen advances by h_advance plus pairwise kerning
    let mut caret = 0.0f32;
    let mut prev_glyph: Option<GlyphId> = None;
    let mut glyphs: Vec<(GlyphId, f32)> = Vec::with_capacity(text.chars().count());
    for ch in text.chars() {
        let gid = font.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            caret += scaled.kern(prev, gid);
        }
        glyphs.push((gid, caret));
        caret += scaled.h_advance(gid);
        prev_glyph = Some(gid);
    }

    let mut bbox: Option<(u32, u32, u32, u32)> = None;

    for &(gid, x_offset) in &glyphs {
        let glyph = gid.with_scale_and_position(
            font_size,
            point(origin_x + x_offset, origin_y),
        );
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue; // whitespace and glyphs without outlines
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|px, py, coverage| {
            if coverage <= 0.001 {
                return;
            }
            let x = bounds.min.x as i64 + px as i64;
            let y = bounds.min.y as i64 + py as i64;
            if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
                return;
            }
            let (x, y) = (x as u32, y as u32);
            blend_pixel(img, x, y, color, coverage.min(1.0));
            bbox = Some(match bbox {
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                None => (x, y, x, y),
            });
        });
    }

    bbox
}

/// Coverage blend over an opaque canvas: the result keeps alpha 255.
fn blend_pixel(img: &mut RgbaImage, x: u32, y: u32, color: Rgba<u8>, coverage: f32) {
    let dst = img.get_pixel_mut(x, y);
    for c in 0..3 {
        let src = color.0[c] as f32;
        let old = dst.0[c] as f32;
        dst.0[c] = (src * coverage + old * (1.0 - coverage)).round() as u8;
    }
    dst.0[3] = 255;
}

/// Enumerate system font family names, sorted and deduplicated.
pub fn enumerate_system_fonts() -> Vec<String> {
    match font_kit::source::SystemSource::new().all_families() {
        Ok(mut families) => {
            families.sort();
            families.dedup();
            families
        }
        Err(_) => {
            #[cfg(target_os = "linux")]
            {
                vec!["Liberation Sans".to_string(), "DejaVu Sans".to_string()]
            }
            #[cfg(not(target_os = "linux"))]
            {
                vec!["Arial".to_string(), "Times New Roman".to_string()]
            }
        }
    }
}

/// Load the regular weight of a font family from the system.
/// Returns `None` if the family cannot be found or its data fails to load.
pub fn load_system_font(family: &str) -> Option<FontArc> {
    use font_kit::family_name::FamilyName;
    use font_kit::properties::Properties;
    use font_kit::source::SystemSource;

    let source = SystemSource::new();
    let handle = source
        .select_best_match(&[FamilyName::Title(family.to_string())], &Properties::new())
        .ok()?;

    let font_data = handle.load().ok()?;
    let font_data_copy = font_data.copy_font_data()?;
    let bytes: Vec<u8> = (*font_data_copy).clone();
    FontArc::try_from_vec(bytes).ok()
}
