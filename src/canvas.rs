//! The canvas surface: one mutable pixel buffer plus the current draw state.
//!
//! `CanvasSurface` owns the raster content and every operation that mutates
//! it.  The controller (`app`) feeds it pointer events and dialog-collected
//! parameters; the surface tracks the modified flag for save prompts and
//! accumulates a dirty rectangle the controller uses to refresh the display
//! texture.  Parameters arriving from dialogs are re-validated here — the
//! surface does not trust the boundary.

use std::path::Path;

use egui::{Pos2, Rect, pos2, vec2};
use image::{Rgba, RgbaImage};

use crate::io;
use crate::log_warn;
use crate::ops::{fill, print, shapes, text, transform};

use ab_glyph::FontArc;

/// Canvas dimensions on startup and after File > New.
pub const DEFAULT_CANVAS_SIZE: (u32, u32) = (400, 400);

/// The canvas background; also the eraser color.
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

pub const MIN_PEN_WIDTH: u32 = 1;
pub const MAX_PEN_WIDTH: u32 = 50;

pub const MIN_POLYGON_SIDES: u32 = 3;
pub const MAX_POLYGON_SIDES: u32 = 10;

/// Crop selections with an area below this many pixel-units are treated as
/// accidental and ignored.
pub const MIN_CROP_AREA: f32 = 25.0;

// ============================================================================
// TOOLS
// ============================================================================

/// The active drawing tool.  Closed set — every dispatch site matches
/// exhaustively, so an unknown tool cannot reach drawing code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Pen,
    Line,
    Rect,
    Polygon,
    Circle,
    Fill,
    Crop,
    Text,
}

impl Tool {
    pub fn label(&self) -> &'static str {
        match self {
            Tool::Pen => "Pen",
            Tool::Line => "Line",
            Tool::Rect => "Rectangle",
            Tool::Polygon => "Polygon",
            Tool::Circle => "Circle",
            Tool::Fill => "Fill",
            Tool::Crop => "Crop",
            Tool::Text => "Text",
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Error type for surface operations.
#[derive(Debug)]
pub enum SurfaceError {
    /// Loading failed: malformed or unsupported file.  Buffer unchanged.
    Decode(String),
    /// Saving failed: unwritable path or unsupported format.  State unchanged.
    Encode(String),
    /// Crop selection below the minimum area; ignored without buffer change.
    InvalidSelection,
    /// A dialog-supplied parameter was outside its valid range.
    ParameterOutOfRange(&'static str),
}

impl std::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceError::Decode(e) => write!(f, "Decode error: {}", e),
            SurfaceError::Encode(e) => write!(f, "Encode error: {}", e),
            SurfaceError::InvalidSelection => write!(f, "Selection too small"),
            SurfaceError::ParameterOutOfRange(what) => {
                write!(f, "Parameter out of range: {}", what)
            }
        }
    }
}

/// Outcome of a pointer release.  Most tools commit directly; the text tool
/// needs the controller to collect a string and font first.
#[derive(Debug, PartialEq)]
pub enum ToolCommit {
    Committed,
    /// The controller should open the text dialog anchored at this point.
    TextRequested(Pos2),
}

// ============================================================================
// CANVAS SURFACE
// ============================================================================

pub struct CanvasSurface {
    image: RgbaImage,

    tool: Tool,
    pen_color: Rgba<u8>,
    /// Pen color saved across eraser use, restored by `reset_color`.
    saved_color: Rgba<u8>,
    pen_width: u32,
    polygon_sides: u32,
    /// Polygon rotation in radians (entered as degrees in the dialog).
    polygon_angle: f32,

    /// Anchor recorded at pointer-down; for the pen it advances per segment.
    last_point: Pos2,
    drawing: bool,

    modified: bool,
    /// Accumulated region needing redisplay; taken by the controller.
    dirty: Option<Rect>,
}

impl Default for CanvasSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasSurface {
    pub fn new() -> Self {
        let (w, h) = DEFAULT_CANVAS_SIZE;
        Self::with_size(w, h)
    }

    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, BACKGROUND),
            tool: Tool::Pen,
            pen_color: Rgba([0, 0, 0, 255]),
            saved_color: Rgba([0, 0, 0, 255]),
            pen_width: 1,
            polygon_sides: 3,
            polygon_angle: 0.0,
            last_point: Pos2::ZERO,
            drawing: false,
            modified: false,
            dirty: None,
        }
    }

    // ---- accessors ----------------------------------------------------------

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn pen_color(&self) -> Rgba<u8> {
        self.pen_color
    }

    pub fn pen_width(&self) -> u32 {
        self.pen_width
    }

    pub fn polygon_sides(&self) -> u32 {
        self.polygon_sides
    }

    pub fn polygon_angle(&self) -> f32 {
        self.polygon_angle
    }

    /// Take the accumulated dirty rectangle, clamped to the buffer bounds.
    pub fn take_dirty(&mut self) -> Option<Rect> {
        let bounds = Rect::from_min_size(
            Pos2::ZERO,
            vec2(self.width() as f32, self.height() as f32),
        );
        self.dirty.take().map(|r| r.intersect(bounds))
    }

    // ---- draw state ---------------------------------------------------------

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.reset_color();
    }

    pub fn set_pen_color(&mut self, color: Rgba<u8>) {
        self.pen_color = color;
        self.saved_color = color;
    }

    /// Pen width is clamped into `[MIN_PEN_WIDTH, MAX_PEN_WIDTH]`; the dialog
    /// enforces the range but the surface does not rely on it.
    pub fn set_pen_width(&mut self, width: u32) {
        self.pen_width = width.clamp(MIN_PEN_WIDTH, MAX_PEN_WIDTH);
    }

    /// Eraser: a background-colored pen.  The saved color is kept so the next
    /// tool change restores it.
    pub fn set_eraser(&mut self) {
        self.pen_color = BACKGROUND;
        self.tool = Tool::Pen;
    }

    /// Restore the pen color after the eraser borrowed it.
    pub fn reset_color(&mut self) {
        self.pen_color = self.saved_color;
    }

    /// Commit polygon parameters and select the polygon tool.  Both values
    /// must be in range or nothing changes: sides in [3, 10], angle in
    /// [0, 360] degrees (stored in radians).
    pub fn configure_polygon(&mut self, sides: u32, angle_degrees: u32) -> Result<(), SurfaceError> {
        if !(MIN_POLYGON_SIDES..=MAX_POLYGON_SIDES).contains(&sides) {
            return Err(SurfaceError::ParameterOutOfRange("polygon sides"));
        }
        if angle_degrees > 360 {
            return Err(SurfaceError::ParameterOutOfRange("polygon angle"));
        }
        self.polygon_sides = sides;
        self.polygon_angle = (angle_degrees as f32).to_radians();
        self.tool = Tool::Polygon;
        self.reset_color();
        Ok(())
    }

    // ---- stroke lifecycle ---------------------------------------------------

    /// Pointer-down: only the primary button starts a stroke.
    pub fn pointer_pressed(&mut self, pos: Pos2, primary: bool) {
        if primary {
            self.last_point = pos;
            self.drawing = true;
        }
    }

    /// Pointer-move: the pen commits freehand segments as it goes; every
    /// other tool waits for the release.
    pub fn pointer_moved(&mut self, pos: Pos2) {
        if self.drawing && self.tool == Tool::Pen {
            self.stroke_line(self.last_point, pos);
            self.last_point = pos;
        }
    }

    /// Pointer-up: commit the active tool from the anchor to the release
    /// position, then end the stroke.
    pub fn pointer_released(&mut self, pos: Pos2) -> ToolCommit {
        if !self.drawing {
            return ToolCommit::Committed;
        }
        self.drawing = false;

        match self.tool {
            Tool::Pen | Tool::Line => self.stroke_line(self.last_point, pos),
            Tool::Rect => self.stroke_rect(self.last_point, pos),
            Tool::Polygon => self.stroke_polygon(self.last_point, pos),
            Tool::Circle => self.stroke_circle(self.last_point, pos),
            Tool::Fill => self.flood_fill(pos),
            Tool::Crop => {
                if let Err(SurfaceError::InvalidSelection) = self.crop_to(self.last_point, pos) {
                    // Too-small selections are ignored, not surfaced
                    log_warn!("crop selection below {} pixel-units ignored", MIN_CROP_AREA);
                }
            }
            Tool::Text => return ToolCommit::TextRequested(pos),
        }
        ToolCommit::Committed
    }

    // ---- drawing operations -------------------------------------------------

    /// Margin added around a stroke's dirty rectangle: half the pen width for
    /// the stroke body plus a little slack for the caps.
    fn stroke_pad(&self) -> f32 {
        (self.pen_width / 2 + 2) as f32
    }

    /// Straight segment with round caps, pen width and color.
    pub fn stroke_line(&mut self, from: Pos2, to: Pos2) {
        shapes::stamp_line(&mut self.image, from, to, self.pen_width, self.pen_color);
        self.modified = true;
        self.mark_dirty(Rect::from_two_pos(from, to).expand(self.stroke_pad()));
    }

    /// Rectangle outline through two opposite corners, square caps.
    pub fn stroke_rect(&mut self, from: Pos2, to: Pos2) {
        shapes::stroke_rect(&mut self.image, from, to, self.pen_width, self.pen_color);
        self.modified = true;
        self.mark_dirty(Rect::from_two_pos(from, to).expand(self.stroke_pad()));
    }

    /// Regular polygon centred on `center`, radius out to `radius_point`,
    /// using the configured side count and rotation.
    pub fn stroke_polygon(&mut self, center: Pos2, radius_point: Pos2) {
        let radius = center.distance(radius_point);
        let vertices =
            shapes::polygon_vertices(center, radius, self.polygon_sides, self.polygon_angle);
        shapes::stroke_polygon(&mut self.image, &vertices, self.pen_width, self.pen_color);
        self.modified = true;
        let reach = 2.0 * (radius + self.stroke_pad());
        self.mark_dirty(Rect::from_center_size(center, vec2(reach, reach)));
    }

    /// Full circle centred on `center` through `edge_point`.
    pub fn stroke_circle(&mut self, center: Pos2, edge_point: Pos2) {
        let radius = center.distance(edge_point);
        shapes::stroke_circle(&mut self.image, center, radius, self.pen_width, self.pen_color);
        self.modified = true;
        let reach = 2.0 * (radius + self.stroke_pad());
        self.mark_dirty(Rect::from_center_size(center, vec2(reach, reach)));
    }

    /// Flood-fill the region connected to `seed` with the pen color.
    pub fn flood_fill(&mut self, seed: Pos2) {
        let x = seed.x.round();
        let y = seed.y.round();
        if x < 0.0 || y < 0.0 {
            return;
        }
        if let Some((x0, y0, x1, y1)) =
            fill::flood_fill(&mut self.image, x as u32, y as u32, self.pen_color)
        {
            self.modified = true;
            self.mark_dirty(
                Rect::from_min_max(pos2(x0 as f32, y0 as f32), pos2(x1 as f32 + 1.0, y1 as f32 + 1.0))
                    .expand(2.0),
            );
        }
    }

    /// Render a line of text with its baseline starting at `pos`.
    pub fn place_text(&mut self, pos: Pos2, content: &str, font: &FontArc, font_size: f32) {
        if let Some((x0, y0, x1, y1)) = text::draw_text(
            &mut self.image,
            pos.x,
            pos.y,
            content,
            font,
            font_size,
            self.pen_color,
        ) {
            self.modified = true;
            self.mark_dirty(
                Rect::from_min_max(pos2(x0 as f32, y0 as f32), pos2(x1 as f32 + 1.0, y1 as f32 + 1.0))
                    .expand(2.0),
            );
        }
    }

    /// Erase everything outside the rectangle spanned by the two corners.
    /// The buffer keeps its dimensions — only the exterior is blanked.
    /// Selections with an area under `MIN_CROP_AREA` are rejected.
    pub fn crop_to(&mut self, from: Pos2, to: Pos2) -> Result<(), SurfaceError> {
        let sel_w = (from.x - to.x).abs();
        let sel_h = (from.y - to.y).abs();
        if sel_w * sel_h < MIN_CROP_AREA {
            return Err(SurfaceError::InvalidSelection);
        }

        let (w, h) = self.image.dimensions();
        let left = from.x.min(to.x).round().clamp(0.0, w as f32) as u32;
        let right = from.x.max(to.x).round().clamp(0.0, w as f32) as u32;
        let top = from.y.min(to.y).round().clamp(0.0, h as f32) as u32;
        let bottom = from.y.max(to.y).round().clamp(0.0, h as f32) as u32;

        transform::erase_outside(&mut self.image, left, top, right, bottom, BACKGROUND);
        self.modified = true;
        self.mark_all_dirty();
        Ok(())
    }

    /// Replace the buffer with a resized copy: old content lands at the new
    /// buffer's top-left, truncated or padded with background as needed.
    /// Resizing to the current dimensions is a no-op — the buffer and the
    /// modified flag are left exactly as they are.
    pub fn resize_to(&mut self, new_width: u32, new_height: u32) {
        if (new_width, new_height) == self.image.dimensions() {
            return;
        }
        self.image = transform::resized(&self.image, new_width, new_height, BACKGROUND);
        self.modified = true;
        self.mark_all_dirty();
    }

    // ---- persistence --------------------------------------------------------

    /// Replace the buffer with an already-decoded image and mark it clean.
    pub fn load_image(&mut self, img: RgbaImage) {
        self.image = img;
        self.modified = false;
        self.mark_all_dirty();
    }

    /// Load from disk, replacing the buffer wholesale.  On decode failure the
    /// buffer is untouched and the error is reported to the caller.
    pub fn load_from(&mut self, path: &Path) -> Result<(), SurfaceError> {
        let img = io::load_image_file(path)?;
        self.load_image(img);
        Ok(())
    }

    /// Persist the buffer to disk; the format follows the file extension.
    /// Clears the modified flag on success, leaves all state unchanged on
    /// failure.
    pub fn save_to(&mut self, path: &Path) -> Result<(), SurfaceError> {
        io::save_image_file(&self.image, path)?;
        self.modified = false;
        Ok(())
    }

    /// Hand the current buffer to the OS print pipeline.
    pub fn print(&self) -> Result<(), String> {
        print::print_image(&self.image)
    }

    // ---- dirty tracking -----------------------------------------------------

    fn mark_dirty(&mut self, rect: Rect) {
        self.dirty = Some(match self.dirty {
            Some(existing) => existing.union(rect),
            None => rect,
        });
    }

    fn mark_all_dirty(&mut self) {
        self.mark_dirty(Rect::from_min_size(
            Pos2::ZERO,
            vec2(self.width() as f32, self.height() as f32),
        ));
    }
}
