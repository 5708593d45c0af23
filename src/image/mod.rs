pub mod f32;
pub mod io;
pub mod mask;
pub mod rgb;
pub mod traits;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::mask::Mask;
pub use self::rgb::{ImageRgb8, RgbImageBuf};
pub use self::traits::{ImageView, ImageViewMut, Rows};
pub use self::u8::ImageU8;

use crate::error::LaneError;
use serde::{Deserialize, Serialize};

/// Whether an operation expects a color frame (and converts it to gray
/// itself) or an already single-channel frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImgType {
    Color,
    Gray,
}

/// Input frame handed to the extractor. Owned by the caller.
#[derive(Clone, Copy, Debug)]
pub enum Frame<'a> {
    Rgb(ImageRgb8<'a>),
    Gray(ImageU8<'a>),
}

impl<'a> Frame<'a> {
    pub fn width(&self) -> usize {
        match self {
            Frame::Rgb(img) => img.w,
            Frame::Gray(img) => img.w,
        }
    }

    pub fn height(&self) -> usize {
        match self {
            Frame::Rgb(img) => img.h,
            Frame::Gray(img) => img.h,
        }
    }

    pub fn img_type(&self) -> ImgType {
        match self {
            Frame::Rgb(_) => ImgType::Color,
            Frame::Gray(_) => ImgType::Gray,
        }
    }

    /// Intensity plane for gradient operators. `Color` converts an RGB frame,
    /// `Gray` passes a single-channel frame through; any other pairing is
    /// rejected.
    pub fn intensity(&self, img_type: ImgType) -> Result<ImageF32, LaneError> {
        match (img_type, self) {
            (ImgType::Color, Frame::Rgb(rgb)) => Ok(crate::color::rgb_to_gray(rgb)),
            (ImgType::Gray, Frame::Gray(gray)) => Ok(ImageF32::from_u8(gray)),
            (requested, frame) => Err(LaneError::ChannelMismatch {
                requested,
                found: frame.img_type(),
            }),
        }
    }

    /// RGB view required by the color-channel thresholds.
    pub fn rgb(&self) -> Result<&ImageRgb8<'a>, LaneError> {
        match self {
            Frame::Rgb(rgb) => Ok(rgb),
            Frame::Gray(_) => Err(LaneError::ChannelMismatch {
                requested: ImgType::Color,
                found: ImgType::Gray,
            }),
        }
    }
}
