//! Measurement text burned into the rendered frame.

use super::OverlayParams;
use crate::error::LaneError;
use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

static BUNDLED_FONT: &[u8] = include_bytes!("../../assets/DejaVuSansMono.ttf");

/// Parsed TrueType/OpenType font shared by every rendered frame.
#[derive(Clone)]
pub struct OverlayFont(Arc<FontVec>);

impl OverlayFont {
    /// DejaVu Sans Mono, shipped with the crate.
    pub fn bundled() -> Result<Self, LaneError> {
        Self::from_bytes(BUNDLED_FONT.to_vec())
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, LaneError> {
        FontVec::try_from_vec(bytes)
            .map(|font| Self(Arc::new(font)))
            .map_err(|e| LaneError::config("overlay.font_path", format!("unusable font: {e}")))
    }

    pub fn load(path: &Path) -> Result<Self, LaneError> {
        let bytes = std::fs::read(path).map_err(|e| {
            LaneError::config(
                "overlay.font_path",
                format!("cannot read {}: {e}", path.display()),
            )
        })?;
        Self::from_bytes(bytes)
    }
}

impl fmt::Debug for OverlayFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OverlayFont")
    }
}

/// Draw `lines` top to bottom starting at `params.text_origin`.
pub fn draw_lines(
    canvas: &mut RgbImage,
    lines: &[String],
    params: &OverlayParams,
    font: &OverlayFont,
) {
    let scale = PxScale::from(params.text_height);
    let (x0, y0) = params.text_origin;
    for (i, line) in lines.iter().enumerate() {
        let y = y0 + i * params.line_spacing;
        draw_text_mut(
            canvas,
            Rgb(params.text_color),
            x0 as i32,
            y as i32,
            scale,
            font.0.as_ref(),
            line,
        );
    }
}
