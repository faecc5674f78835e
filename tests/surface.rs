//! End-to-end tests for the canvas surface: persistence round-trips and the
//! modified-flag lifecycle across save and load.

use egui::pos2;
use image::Rgba;

use easel::canvas::{BACKGROUND, CanvasSurface, SurfaceError, Tool};

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

fn temp_path(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("easel_tests");
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(format!("{}_{}", std::process::id(), name))
}

// ============================================================================
// SAVE / LOAD ROUND-TRIP
// ============================================================================

#[test]
fn png_round_trip_is_pixel_identical_and_clears_modified() {
    let path = temp_path("round_trip.png");

    let mut surface = CanvasSurface::with_size(64, 48);
    surface.set_pen_color(RED);
    surface.stroke_line(pos2(5.0, 5.0), pos2(60.0, 40.0));
    surface.stroke_rect(pos2(10.0, 10.0), pos2(40.0, 30.0));
    assert!(surface.is_modified());

    surface.save_to(&path).unwrap();
    assert!(!surface.is_modified());
    let saved_pixels = surface.image().clone();

    // Dirty the canvas again, then load the file back
    surface.stroke_line(pos2(0.0, 0.0), pos2(63.0, 0.0));
    assert!(surface.is_modified());

    surface.load_from(&path).unwrap();
    assert!(!surface.is_modified());
    assert_eq!(surface.image().as_raw(), saved_pixels.as_raw());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn bmp_round_trip_preserves_content() {
    let path = temp_path("round_trip.bmp");

    let mut surface = CanvasSurface::with_size(20, 20);
    surface.set_pen_color(RED);
    surface.stroke_line(pos2(3.0, 3.0), pos2(16.0, 16.0));
    surface.save_to(&path).unwrap();
    let saved_pixels = surface.image().clone();

    let mut other = CanvasSurface::new();
    other.load_from(&path).unwrap();
    assert_eq!(other.image().as_raw(), saved_pixels.as_raw());
    assert_eq!(other.width(), 20);
    assert_eq!(other.height(), 20);

    let _ = std::fs::remove_file(&path);
}

// ============================================================================
// FAILURE LEAVES STATE UNTOUCHED
// ============================================================================

#[test]
fn loading_garbage_reports_decode_failure_and_keeps_buffer() {
    let path = temp_path("garbage.png");
    std::fs::write(&path, b"this is not an image").unwrap();

    let mut surface = CanvasSurface::with_size(10, 10);
    surface.set_pen_color(RED);
    surface.stroke_line(pos2(0.0, 0.0), pos2(9.0, 9.0));
    let before = surface.image().clone();

    let result = surface.load_from(&path);
    assert!(matches!(result, Err(SurfaceError::Decode(_))));
    // Buffer and modified flag unchanged by the failed load
    assert_eq!(surface.image().as_raw(), before.as_raw());
    assert!(surface.is_modified());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn saving_with_unknown_extension_fails_and_keeps_modified() {
    let path = temp_path("bad.xyz");

    let mut surface = CanvasSurface::with_size(10, 10);
    surface.stroke_line(pos2(0.0, 0.0), pos2(9.0, 9.0));

    let result = surface.save_to(&path);
    assert!(matches!(result, Err(SurfaceError::Encode(_))));
    assert!(surface.is_modified());
}

#[test]
fn loading_a_missing_file_is_a_decode_failure() {
    let mut surface = CanvasSurface::new();
    let result = surface.load_from(std::path::Path::new("/nonexistent/easel/missing.png"));
    assert!(matches!(result, Err(SurfaceError::Decode(_))));
}

// ============================================================================
// MODIFIED FLAG LIFECYCLE
// ============================================================================

#[test]
fn every_mutating_operation_sets_the_modified_flag() {
    let ops: Vec<(&str, Box<dyn Fn(&mut CanvasSurface)>)> = vec![
        ("line", Box::new(|s| s.stroke_line(pos2(1.0, 1.0), pos2(9.0, 9.0)))),
        ("rect", Box::new(|s| s.stroke_rect(pos2(1.0, 1.0), pos2(9.0, 9.0)))),
        ("circle", Box::new(|s| s.stroke_circle(pos2(10.0, 10.0), pos2(14.0, 10.0)))),
        ("polygon", Box::new(|s| {
            s.configure_polygon(5, 0).unwrap();
            s.stroke_polygon(pos2(10.0, 10.0), pos2(10.0, 4.0));
        })),
        ("fill", Box::new(|s| {
            s.set_pen_color(RED);
            s.flood_fill(pos2(10.0, 10.0));
        })),
        ("crop", Box::new(|s| {
            s.crop_to(pos2(2.0, 2.0), pos2(12.0, 12.0)).unwrap();
        })),
        ("resize", Box::new(|s| s.resize_to(30, 30))),
    ];

    for (name, op) in ops {
        let mut surface = CanvasSurface::with_size(20, 20);
        assert!(!surface.is_modified(), "{}: fresh canvas must be clean", name);
        op(&mut surface);
        assert!(surface.is_modified(), "{}: operation must set the flag", name);
    }
}

#[test]
fn save_clears_the_flag_after_each_kind_of_mutation() {
    let path = temp_path("flag_clear.png");

    let mut surface = CanvasSurface::with_size(16, 16);
    surface.stroke_line(pos2(2.0, 2.0), pos2(14.0, 14.0));
    surface.save_to(&path).unwrap();
    assert!(!surface.is_modified());

    surface.set_pen_color(RED);
    surface.set_tool(Tool::Fill);
    surface.pointer_pressed(pos2(1.0, 14.0), true);
    surface.pointer_released(pos2(1.0, 14.0));
    assert!(surface.is_modified());
    surface.save_to(&path).unwrap();
    assert!(!surface.is_modified());

    let _ = std::fs::remove_file(&path);
}

// ============================================================================
// FILL PROPERTIES THROUGH THE SURFACE
// ============================================================================

#[test]
fn fill_with_matching_color_changes_nothing() {
    let mut surface = CanvasSurface::with_size(16, 16);
    // Canvas is all background; filling with background is a no-op
    surface.set_pen_color(BACKGROUND);
    let before = surface.image().clone();
    surface.flood_fill(pos2(8.0, 8.0));
    assert_eq!(surface.image().as_raw(), before.as_raw());
    assert!(!surface.is_modified());
}

#[test]
fn fill_outside_the_buffer_is_ignored() {
    let mut surface = CanvasSurface::with_size(16, 16);
    surface.set_pen_color(RED);
    surface.flood_fill(pos2(-3.0, 8.0));
    surface.flood_fill(pos2(8.0, 400.0));
    assert!(!surface.is_modified());
}
