//! Modal parameter dialogs.
//!
//! Each dialog is a small state struct with a `show` method returning a
//! `DialogResult`.  The controller keeps at most one dialog open at a time
//! and reads the struct's fields back when `Ok` is returned; a cancelled
//! dialog commits nothing.

use egui::{Align2, Context, Pos2};

use crate::canvas::{
    MAX_PEN_WIDTH, MAX_POLYGON_SIDES, MIN_PEN_WIDTH, MIN_POLYGON_SIDES,
};
use crate::ops::text::enumerate_system_fonts;

/// Outcome of showing a modal dialog for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogResult {
    /// Still open — show again next frame.
    Pending,
    Ok,
    Cancel,
}

fn modal<'a>(title: &'a str) -> egui::Window<'a> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
}

fn ok_cancel_row(ui: &mut egui::Ui, result: &mut DialogResult) {
    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui.button("OK").clicked() {
            *result = DialogResult::Ok;
        }
        if ui.button("Cancel").clicked() {
            *result = DialogResult::Cancel;
        }
    });
}

// ============================================================================
// PEN WIDTH
// ============================================================================

pub struct PenWidthDialog {
    pub width: u32,
}

impl PenWidthDialog {
    pub fn new(width: u32) -> Self {
        Self { width }
    }

    pub fn show(&mut self, ctx: &Context) -> DialogResult {
        let mut result = DialogResult::Pending;
        modal("Pen Width").show(ctx, |ui| {
            ui.label("Select pen width:");
            ui.add(egui::Slider::new(&mut self.width, MIN_PEN_WIDTH..=MAX_PEN_WIDTH));
            ok_cancel_row(ui, &mut result);
        });
        result
    }
}

// ============================================================================
// PEN COLOR
// ============================================================================

pub struct PenColorDialog {
    pub color: [u8; 3],
}

impl PenColorDialog {
    pub fn new(color: [u8; 3]) -> Self {
        Self { color }
    }

    pub fn show(&mut self, ctx: &Context) -> DialogResult {
        let mut result = DialogResult::Pending;
        modal("Pen Color").show(ctx, |ui| {
            ui.label("Select pen color:");
            ui.color_edit_button_srgb(&mut self.color);
            ok_cancel_row(ui, &mut result);
        });
        result
    }
}

// ============================================================================
// POLYGON PARAMETERS
// ============================================================================

/// Side count and rotation for the polygon tool.  Values are committed
/// together on OK only — closing the dialog any other way discards both.
pub struct PolygonDialog {
    pub sides: u32,
    pub angle_degrees: u32,
}

impl PolygonDialog {
    pub fn new(sides: u32, angle_degrees: u32) -> Self {
        Self { sides, angle_degrees }
    }

    pub fn show(&mut self, ctx: &Context) -> DialogResult {
        let mut result = DialogResult::Pending;
        modal("Polygon Tool").show(ctx, |ui| {
            ui.label("Select number of sides:");
            ui.add(egui::Slider::new(
                &mut self.sides,
                MIN_POLYGON_SIDES..=MAX_POLYGON_SIDES,
            ));
            ui.label("Select the angle (degrees):");
            ui.add(egui::Slider::new(&mut self.angle_degrees, 0..=360));
            ok_cancel_row(ui, &mut result);
        });
        result
    }
}

// ============================================================================
// CANVAS RESIZE
// ============================================================================

pub struct ResizeDialog {
    pub width: u32,
    pub height: u32,
}

impl ResizeDialog {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn show(&mut self, ctx: &Context) -> DialogResult {
        let mut result = DialogResult::Pending;
        modal("Resize Canvas").show(ctx, |ui| {
            egui::Grid::new("resize_grid").show(ui, |ui| {
                ui.label("New width:");
                ui.add(egui::DragValue::new(&mut self.width).clamp_range(1..=8192));
                ui.end_row();
                ui.label("New height:");
                ui.add(egui::DragValue::new(&mut self.height).clamp_range(1..=8192));
                ui.end_row();
            });
            ok_cancel_row(ui, &mut result);
        });
        result
    }
}

// ============================================================================
// TEXT INSERTION
// ============================================================================

/// Collects the string, font family and size for the text tool.  The anchor
/// is the canvas position of the pointer release that opened the dialog.
pub struct TextDialog {
    pub anchor: Pos2,
    pub text: String,
    pub family: String,
    pub font_size: f32,
    families: Vec<String>,
}

impl TextDialog {
    pub fn new(anchor: Pos2) -> Self {
        let families = enumerate_system_fonts();
        let family = families.first().cloned().unwrap_or_default();
        Self {
            anchor,
            text: String::new(),
            family,
            font_size: 16.0,
            families,
        }
    }

    pub fn show(&mut self, ctx: &Context) -> DialogResult {
        let mut result = DialogResult::Pending;
        modal("Insert Text").show(ctx, |ui| {
            ui.label("Text:");
            ui.text_edit_singleline(&mut self.text);

            ui.label("Font:");
            egui::ComboBox::from_id_source("text_font_family")
                .selected_text(self.family.clone())
                .show_ui(ui, |ui| {
                    for family in &self.families {
                        ui.selectable_value(&mut self.family, family.clone(), family);
                    }
                });

            ui.label("Size:");
            ui.add(egui::DragValue::new(&mut self.font_size).clamp_range(6.0..=144.0));

            ok_cancel_row(ui, &mut result);
        });
        // An empty string has nothing to commit
        if result == DialogResult::Ok && self.text.is_empty() {
            return DialogResult::Cancel;
        }
        result
    }
}

// ============================================================================
// UNSAVED CHANGES
// ============================================================================

/// Choice from the "unsaved changes" prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnsavedChoice {
    Pending,
    Save,
    Discard,
    Cancel,
}

pub struct UnsavedChangesDialog;

impl UnsavedChangesDialog {
    pub fn show(&mut self, ctx: &Context) -> UnsavedChoice {
        let mut choice = UnsavedChoice::Pending;
        modal("Unsaved Changes").show(ctx, |ui| {
            ui.label("The image has been modified.");
            ui.label("Do you want to save your changes?");
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    choice = UnsavedChoice::Save;
                }
                if ui.button("Discard").clicked() {
                    choice = UnsavedChoice::Discard;
                }
                if ui.button("Cancel").clicked() {
                    choice = UnsavedChoice::Cancel;
                }
            });
        });
        choice
    }
}

// ============================================================================
// ABOUT
// ============================================================================

pub struct AboutDialog;

impl AboutDialog {
    /// Returns true while the dialog stays open.
    pub fn show(&mut self, ctx: &Context) -> bool {
        let mut open = true;
        modal("About Easel").show(ctx, |ui| {
            ui.label("Easel is a small raster paint application.");
            ui.label("Freehand drawing, shapes, flood fill, text, crop and resize.");
            ui.add_space(8.0);
            if ui.button("Close").clicked() {
                open = false;
            }
        });
        open
    }
}
