//! File loading and saving.
//!
//! Decoding goes through `image::open`, which sniffs the format from the
//! file content.  Encoding follows the file extension; PNG and JPEG use
//! their explicit encoders (JPEG has no alpha channel, so the buffer is
//! flattened to RGB first), every other supported extension goes through
//! `DynamicImage::save`.  Failures are reported to the caller — the canvas
//! state is only touched on success.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, RgbaImage};
use rfd::FileDialog;

use crate::canvas::SurfaceError;

/// Extensions offered in the open dialog (decoders available in the codec
/// layer).
pub const OPEN_EXTENSIONS: &[&str] =
    &["png", "jpg", "jpeg", "bmp", "webp", "tga", "ico", "tiff", "tif"];

/// Extensions offered in the save dialog (encoders available).
pub const SAVE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tga", "ico", "tiff", "tif"];

const JPEG_QUALITY: u8 = 90;

/// Decode an image file into an RGBA buffer.
pub fn load_image_file(path: &Path) -> Result<RgbaImage, SurfaceError> {
    match image::open(path) {
        Ok(img) => Ok(img.to_rgba8()),
        Err(e) => Err(SurfaceError::Decode(e.to_string())),
    }
}

/// Encode `img` to `path`; the format follows the file extension.
pub fn save_image_file(img: &RgbaImage, path: &Path) -> Result<(), SurfaceError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let encode_err = |e: String| SurfaceError::Encode(e);

    match ext.as_str() {
        "png" => {
            let file = File::create(path).map_err(|e| encode_err(e.to_string()))?;
            let mut writer = BufWriter::new(file);
            let encoder = PngEncoder::new(&mut writer);
            #[allow(deprecated)]
            encoder
                .encode(img.as_raw(), img.width(), img.height(), image::ColorType::Rgba8)
                .map_err(|e| encode_err(e.to_string()))?;
        }
        "jpg" | "jpeg" => {
            // JPEG doesn't support alpha, convert to RGB
            let rgb_image = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
            let file = File::create(path).map_err(|e| encode_err(e.to_string()))?;
            let mut writer = BufWriter::new(file);
            let mut encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
            encoder
                .encode(
                    rgb_image.as_raw(),
                    rgb_image.width(),
                    rgb_image.height(),
                    image::ColorType::Rgb8,
                )
                .map_err(|e| encode_err(e.to_string()))?;
        }
        "bmp" | "tga" | "ico" | "tiff" | "tif" => {
            DynamicImage::ImageRgba8(img.clone())
                .save(path)
                .map_err(|e| encode_err(e.to_string()))?;
        }
        other => {
            return Err(SurfaceError::Encode(format!(
                "unsupported save format: \"{}\"",
                other
            )));
        }
    }
    Ok(())
}

/// Tracks the current file path so Save can skip the dialog after the first
/// Save As / Open.
pub struct FileHandler {
    pub current_path: Option<PathBuf>,
}

impl Default for FileHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl FileHandler {
    pub fn new() -> Self {
        Self { current_path: None }
    }

    /// Returns true if there's a current file path (file has been saved before)
    pub fn has_current_path(&self) -> bool {
        self.current_path.is_some()
    }

    /// Show the native open dialog.
    pub fn pick_open_path(&self) -> Option<PathBuf> {
        FileDialog::new()
            .add_filter("Images", OPEN_EXTENSIONS)
            .add_filter("All Files", &["*"])
            .pick_file()
    }

    /// Show the native save dialog, pre-filled with the current file name.
    pub fn pick_save_path(&self) -> Option<PathBuf> {
        let mut dialog = FileDialog::new()
            .add_filter("Images", SAVE_EXTENSIONS)
            .add_filter("All Files", &["*"]);
        if let Some(current) = &self.current_path {
            if let Some(name) = current.file_name() {
                dialog = dialog.set_file_name(&*name.to_string_lossy());
            }
            if let Some(dir) = current.parent() {
                dialog = dialog.set_directory(dir);
            }
        } else {
            dialog = dialog.set_file_name("untitled.png");
        }
        dialog.save_file()
    }
}
