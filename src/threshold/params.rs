use crate::edges::MAX_KERNEL_SIZE;
use crate::error::LaneError;
use crate::image::ImgType;
use serde::{Deserialize, Serialize};

/// Inclusive `[low, high]` band.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBand<T> {
    pub low: T,
    pub high: T,
}

impl<T: PartialOrd + Copy> ThresholdBand<T> {
    pub fn new(low: T, high: T) -> Self {
        Self { low, high }
    }

    #[inline]
    pub fn contains(&self, v: T) -> bool {
        v >= self.low && v <= self.high
    }

    pub fn is_valid(&self) -> bool {
        self.low <= self.high
    }
}

/// Which cues the extractor runs and with which bands.
///
/// `None` disables a cue. Defaults enable the absolute x-gradient (30..=255)
/// and the saturation channel (130..=255) with a 5-tap kernel on color input.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorParams {
    /// Sobel aperture (odd, 1..=31).
    pub sobel_kernel: usize,
    /// Whether gradient cues convert a color frame or take a gray one as-is.
    pub img_type: ImgType,
    pub abs_x: Option<ThresholdBand<u8>>,
    pub abs_y: Option<ThresholdBand<u8>>,
    pub magnitude: Option<ThresholdBand<u8>>,
    /// Band on `atan2(|gy|, |gx|)` in radians, within [0, π/2].
    pub direction: Option<ThresholdBand<f32>>,
    pub saturation: Option<ThresholdBand<u8>>,
    /// Hue band in the halved 0..180 scale.
    pub hue: Option<ThresholdBand<u8>>,
}

impl Default for ExtractorParams {
    fn default() -> Self {
        Self {
            sobel_kernel: 5,
            img_type: ImgType::Color,
            abs_x: Some(ThresholdBand::new(30, 255)),
            abs_y: None,
            magnitude: None,
            direction: None,
            saturation: Some(ThresholdBand::new(130, 255)),
            hue: None,
        }
    }
}

impl ExtractorParams {
    pub fn validate(&self) -> Result<(), LaneError> {
        if self.sobel_kernel % 2 == 0 || self.sobel_kernel > MAX_KERNEL_SIZE {
            return Err(LaneError::config(
                "extractor.sobel_kernel",
                format!("must be odd and within 1..={MAX_KERNEL_SIZE}"),
            ));
        }
        let bands = [
            ("extractor.abs_x", self.abs_x.map(|b| b.is_valid())),
            ("extractor.abs_y", self.abs_y.map(|b| b.is_valid())),
            ("extractor.magnitude", self.magnitude.map(|b| b.is_valid())),
            ("extractor.direction", self.direction.map(|b| b.is_valid())),
            ("extractor.saturation", self.saturation.map(|b| b.is_valid())),
            ("extractor.hue", self.hue.map(|b| b.is_valid())),
        ];
        for (field, valid) in bands {
            if valid == Some(false) {
                return Err(LaneError::config(field, "low bound exceeds high bound"));
            }
        }
        Ok(())
    }
}
