//! Application controller: window chrome, menus, dialogs, and the pointer
//! event loop.  All real work happens in [`crate::canvas::CanvasSurface`];
//! this layer collects parameters and forwards them.

use std::sync::Arc;

use eframe::egui;
use egui::{
    Color32, ColorImage, ImageData, Pos2, Rect, TextureFilter, TextureHandle, TextureOptions,
    pos2, vec2,
};
use image::Rgba;

use crate::canvas::{CanvasSurface, Tool, ToolCommit};
use crate::components::dialogs::{
    AboutDialog, DialogResult, PenColorDialog, PenWidthDialog, PolygonDialog, ResizeDialog,
    TextDialog, UnsavedChangesDialog, UnsavedChoice,
};
use crate::io::FileHandler;
use crate::ops::text::load_system_font;
use crate::{log_err, log_info, log_warn};

/// Action deferred behind the unsaved-changes prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PendingAction {
    NewCanvas,
    OpenFile,
    Quit,
}

/// Modal dialog system (at most one open at a time).
enum ActiveDialog {
    None,
    PenWidth(PenWidthDialog),
    PenColor(PenColorDialog),
    Polygon(PolygonDialog),
    Resize(ResizeDialog),
    Text(TextDialog),
    Unsaved(UnsavedChangesDialog),
    About(AboutDialog),
}

pub struct PaintApp {
    surface: CanvasSurface,
    file_handler: FileHandler,

    /// Display texture mirroring the canvas buffer.
    texture: Option<TextureHandle>,

    active_dialog: ActiveDialog,
    pending_action: Option<PendingAction>,
    /// Set once the user has confirmed exit, so the next close goes through.
    force_close: bool,
}

impl PaintApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            surface: CanvasSurface::new(),
            file_handler: FileHandler::new(),
            texture: None,
            active_dialog: ActiveDialog::None,
            pending_action: None,
            force_close: false,
        }
    }

    // ---- texture sync -------------------------------------------------------

    fn texture_options() -> TextureOptions {
        TextureOptions {
            magnification: TextureFilter::Nearest,
            minification: TextureFilter::Nearest,
            ..Default::default()
        }
    }

    /// Push changed canvas pixels to the display texture.  A full upload
    /// happens on the first frame and whenever the buffer was replaced;
    /// otherwise only the dirty region is sent.
    fn sync_texture(&mut self, ctx: &egui::Context) {
        let w = self.surface.width() as usize;
        let h = self.surface.height() as usize;
        let dirty = self.surface.take_dirty();

        let needs_full = match &self.texture {
            None => true,
            Some(tex) => tex.size() != [w, h],
        };

        if needs_full {
            let full = ColorImage::from_rgba_unmultiplied([w, h], self.surface.image().as_raw());
            let image_data = ImageData::Color(Arc::new(full));
            match &mut self.texture {
                Some(tex) => tex.set(image_data, Self::texture_options()),
                None => {
                    self.texture =
                        Some(ctx.load_texture("canvas", image_data, Self::texture_options()));
                }
            }
            return;
        }

        let Some(rect) = dirty else { return };
        let x0 = rect.min.x.floor().max(0.0) as usize;
        let y0 = rect.min.y.floor().max(0.0) as usize;
        let x1 = (rect.max.x.ceil() as usize).min(w);
        let y1 = (rect.max.y.ceil() as usize).min(h);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        // Partial upload — only the dirty region crosses to the GPU
        let rw = x1 - x0;
        let rh = y1 - y0;
        let raw = self.surface.image().as_raw();
        let mut region = Vec::with_capacity(rw * rh);
        for y in y0..y1 {
            let row_start = (y * w + x0) * 4;
            for px in raw[row_start..row_start + rw * 4].chunks_exact(4) {
                region.push(Color32::from_rgba_unmultiplied(px[0], px[1], px[2], px[3]));
            }
        }
        let region_image = ColorImage { size: [rw, rh], pixels: region };
        if let Some(tex) = &mut self.texture {
            tex.set_partial(
                [x0, y0],
                ImageData::Color(Arc::new(region_image)),
                Self::texture_options(),
            );
        }
    }

    // ---- file actions -------------------------------------------------------

    fn do_new(&mut self) {
        self.surface = CanvasSurface::new();
        self.file_handler.current_path = None;
        self.texture = None; // force a full re-upload
        log_info!("new canvas");
    }

    fn do_open(&mut self) {
        let Some(path) = self.file_handler.pick_open_path() else {
            return;
        };
        match self.surface.load_from(&path) {
            Ok(()) => {
                log_info!("opened {}", path.display());
                self.file_handler.current_path = Some(path);
                self.texture = None;
            }
            Err(e) => log_err!("failed to open {}: {}", path.display(), e),
        }
    }

    /// Save to the current path, or fall through to Save As.  Returns true
    /// on success so the unsaved-changes flow knows whether to proceed.
    fn do_save(&mut self) -> bool {
        match self.file_handler.current_path.clone() {
            Some(path) => match self.surface.save_to(&path) {
                Ok(()) => {
                    log_info!("saved {}", path.display());
                    true
                }
                Err(e) => {
                    log_err!("failed to save {}: {}", path.display(), e);
                    false
                }
            },
            None => self.do_save_as(),
        }
    }

    fn do_save_as(&mut self) -> bool {
        let Some(path) = self.file_handler.pick_save_path() else {
            return false;
        };
        match self.surface.save_to(&path) {
            Ok(()) => {
                log_info!("saved {}", path.display());
                self.file_handler.current_path = Some(path);
                true
            }
            Err(e) => {
                log_err!("failed to save {}: {}", path.display(), e);
                false
            }
        }
    }

    fn do_print(&mut self) {
        match self.surface.print() {
            Ok(()) => log_info!("canvas handed to print pipeline"),
            Err(e) => log_err!("print failed: {}", e),
        }
    }

    /// Run `action` now, or stash it behind the unsaved-changes prompt.
    fn confirm_then(&mut self, action: PendingAction) {
        if self.surface.is_modified() {
            self.pending_action = Some(action);
            self.active_dialog = ActiveDialog::Unsaved(UnsavedChangesDialog);
        } else {
            self.run_action(action);
        }
    }

    fn run_action(&mut self, action: PendingAction) {
        match action {
            PendingAction::NewCanvas => self.do_new(),
            PendingAction::OpenFile => self.do_open(),
            PendingAction::Quit => self.force_close = true,
        }
    }

    // ---- menus --------------------------------------------------------------

    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New").clicked() {
                        ui.close_menu();
                        self.confirm_then(PendingAction::NewCanvas);
                    }
                    if ui.button("Open…").clicked() {
                        ui.close_menu();
                        self.confirm_then(PendingAction::OpenFile);
                    }
                    ui.separator();
                    if ui.button("Save").clicked() {
                        ui.close_menu();
                        self.do_save();
                    }
                    if ui.button("Save As…").clicked() {
                        ui.close_menu();
                        self.do_save_as();
                    }
                    ui.separator();
                    if ui.button("Print").clicked() {
                        ui.close_menu();
                        self.do_print();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ui.close_menu();
                        self.confirm_then(PendingAction::Quit);
                    }
                });

                ui.menu_button("Tools", |ui| {
                    for tool in [Tool::Pen, Tool::Line, Tool::Rect, Tool::Circle] {
                        if ui
                            .selectable_label(self.surface.tool() == tool, tool.label())
                            .clicked()
                        {
                            ui.close_menu();
                            self.surface.set_tool(tool);
                        }
                    }
                    if ui
                        .selectable_label(self.surface.tool() == Tool::Polygon, "Polygon…")
                        .clicked()
                    {
                        ui.close_menu();
                        self.active_dialog = ActiveDialog::Polygon(PolygonDialog::new(
                            self.surface.polygon_sides(),
                            self.surface.polygon_angle().to_degrees().round() as u32,
                        ));
                    }
                    for tool in [Tool::Fill, Tool::Crop, Tool::Text] {
                        if ui
                            .selectable_label(self.surface.tool() == tool, tool.label())
                            .clicked()
                        {
                            ui.close_menu();
                            self.surface.set_tool(tool);
                        }
                    }
                    ui.separator();
                    if ui.button("Eraser").clicked() {
                        ui.close_menu();
                        self.surface.set_eraser();
                    }
                });

                ui.menu_button("Options", |ui| {
                    if ui.button("Pen Color…").clicked() {
                        ui.close_menu();
                        let c = self.surface.pen_color();
                        self.active_dialog =
                            ActiveDialog::PenColor(PenColorDialog::new([c.0[0], c.0[1], c.0[2]]));
                    }
                    if ui.button("Pen Width…").clicked() {
                        ui.close_menu();
                        self.active_dialog =
                            ActiveDialog::PenWidth(PenWidthDialog::new(self.surface.pen_width()));
                    }
                    if ui.button("Resize Canvas…").clicked() {
                        ui.close_menu();
                        self.active_dialog = ActiveDialog::Resize(ResizeDialog::new(
                            self.surface.width(),
                            self.surface.height(),
                        ));
                    }
                });

                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        ui.close_menu();
                        self.active_dialog = ActiveDialog::About(AboutDialog);
                    }
                });
            });
        });
    }

    // ---- canvas widget ------------------------------------------------------

    fn show_canvas(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                let size = vec2(self.surface.width() as f32, self.surface.height() as f32);
                let (canvas_rect, response) =
                    ui.allocate_exact_size(size, egui::Sense::click_and_drag());

                if let Some(tex) = &self.texture
                    && ui.is_rect_visible(canvas_rect)
                {
                    ui.painter().image(
                        tex.id(),
                        canvas_rect,
                        Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                        Color32::WHITE,
                    );
                }

                // While a modal dialog is up the canvas doesn't take strokes
                if !matches!(self.active_dialog, ActiveDialog::None) {
                    return;
                }

                let to_canvas =
                    |p: Pos2| pos2(p.x - canvas_rect.min.x, p.y - canvas_rect.min.y);

                if response.drag_started_by(egui::PointerButton::Primary)
                    && let Some(p) = response.interact_pointer_pos()
                {
                    self.surface.pointer_pressed(to_canvas(p), true);
                }
                if response.dragged_by(egui::PointerButton::Primary)
                    && let Some(p) = response.interact_pointer_pos()
                {
                    self.surface.pointer_moved(to_canvas(p));
                }
                if response.drag_released()
                    && let Some(p) = response.interact_pointer_pos()
                {
                    if let ToolCommit::TextRequested(anchor) =
                        self.surface.pointer_released(to_canvas(p))
                    {
                        self.active_dialog = ActiveDialog::Text(TextDialog::new(anchor));
                    }
                }
            });
        });
    }

    // ---- dialogs ------------------------------------------------------------

    fn show_active_dialog(&mut self, ctx: &egui::Context) {
        let mut dialog = std::mem::replace(&mut self.active_dialog, ActiveDialog::None);

        match &mut dialog {
            ActiveDialog::None => return,

            ActiveDialog::PenWidth(dlg) => match dlg.show(ctx) {
                DialogResult::Ok => {
                    self.surface.set_pen_width(dlg.width);
                    return;
                }
                DialogResult::Cancel => return,
                DialogResult::Pending => {}
            },

            ActiveDialog::PenColor(dlg) => match dlg.show(ctx) {
                DialogResult::Ok => {
                    let [r, g, b] = dlg.color;
                    self.surface.set_pen_color(Rgba([r, g, b, 255]));
                    return;
                }
                DialogResult::Cancel => return,
                DialogResult::Pending => {}
            },

            ActiveDialog::Polygon(dlg) => match dlg.show(ctx) {
                DialogResult::Ok => {
                    // Committed atomically; the surface re-validates the range
                    if let Err(e) = self.surface.configure_polygon(dlg.sides, dlg.angle_degrees) {
                        log_warn!("polygon configuration rejected: {}", e);
                    }
                    return;
                }
                DialogResult::Cancel => return,
                DialogResult::Pending => {}
            },

            ActiveDialog::Resize(dlg) => match dlg.show(ctx) {
                DialogResult::Ok => {
                    self.surface.resize_to(dlg.width, dlg.height);
                    self.texture = None; // dimensions changed: full re-upload
                    return;
                }
                DialogResult::Cancel => return,
                DialogResult::Pending => {}
            },

            ActiveDialog::Text(dlg) => match dlg.show(ctx) {
                DialogResult::Ok => {
                    match load_system_font(&dlg.family) {
                        Some(font) => {
                            self.surface
                                .place_text(dlg.anchor, &dlg.text, &font, dlg.font_size);
                        }
                        None => log_err!("font \"{}\" could not be loaded", dlg.family),
                    }
                    return;
                }
                DialogResult::Cancel => return,
                DialogResult::Pending => {}
            },

            ActiveDialog::Unsaved(dlg) => match dlg.show(ctx) {
                UnsavedChoice::Save => {
                    let saved = self.do_save();
                    if let Some(action) = self.pending_action.take()
                        && saved
                    {
                        self.run_action(action);
                    }
                    return;
                }
                UnsavedChoice::Discard => {
                    if let Some(action) = self.pending_action.take() {
                        self.run_action(action);
                    }
                    return;
                }
                UnsavedChoice::Cancel => {
                    self.pending_action = None;
                    return;
                }
                UnsavedChoice::Pending => {}
            },

            ActiveDialog::About(dlg) => {
                if !dlg.show(ctx) {
                    return;
                }
            }
        }

        // Still open — put it back for the next frame
        self.active_dialog = dialog;
    }
}

impl eframe::App for PaintApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Window title carries the file name and a dirty marker
        {
            let name = self
                .file_handler
                .current_path
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "untitled".to_string());
            let star = if self.surface.is_modified() { "*" } else { "" };
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!(
                "Easel - {}{}",
                name, star
            )));
        }

        // Intercept the OS window-close button while changes are unsaved
        if ctx.input(|i| i.viewport().close_requested())
            && !self.force_close
            && self.surface.is_modified()
        {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.confirm_then(PendingAction::Quit);
        }
        if self.force_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        // Upload pending pixel changes before the canvas draws this frame
        self.sync_texture(ctx);

        self.show_menu_bar(ctx);
        self.show_canvas(ctx);
        self.show_active_dialog(ctx);
    }
}
