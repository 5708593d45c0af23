//! I/O helpers at the edge of the pipeline.
//!
//! - `load_rgb_image`: read a PNG/JPEG/etc. into an owned RGB buffer.
//! - `save_rgb_image`: write an owned RGB buffer to disk.
//! - `save_mask`: write a binary mask as a black/white PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{Mask, RgbImageBuf};
use image::{GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to 8-bit RGB.
pub fn load_rgb_image(path: &Path) -> Result<RgbImageBuf, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    Ok(RgbImageBuf::from(img))
}

/// Save an RGB buffer; the format follows the file extension.
pub fn save_rgb_image(buffer: &RgbImageBuf, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let image = buffer
        .clone()
        .into_rgb_image()
        .ok_or_else(|| "Failed to create image buffer".to_string())?;
    image
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save a binary mask with on-pixels rendered white.
pub fn save_mask(mask: &Mask, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(mask.w as u32, mask.h as u32);
    for y in 0..mask.h {
        for x in 0..mask.w {
            let v = if mask.get(x, y) { 255 } else { 0 };
            out.put_pixel(x as u32, y as u32, Luma([v]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
