//! Gradient-based lane cues.
use super::ThresholdBand;
use crate::edges::{sobel, sobel_gradients, Axis};
use crate::error::LaneError;
use crate::image::{Frame, ImageF32, ImgType, Mask};
use log::debug;

/// Rescale a non-negative response plane to 0..=255 by its own maximum,
/// truncating like an 8-bit cast. `None` when the maximum is zero or not
/// finite, i.e. the frame carries no usable gradient.
pub fn scale_to_u8(plane: &ImageF32) -> Option<Vec<u8>> {
    let max = plane.max_value();
    if !(max.is_finite() && max > 0.0) {
        return None;
    }
    let k = 255.0 / max;
    Some(
        plane
            .data
            .iter()
            .map(|&v| (v * k).clamp(0.0, 255.0) as u8)
            .collect(),
    )
}

fn band_mask(w: usize, h: usize, scaled: Option<Vec<u8>>, band: ThresholdBand<u8>) -> Mask {
    match scaled {
        Some(values) => Mask {
            w,
            h,
            data: values.iter().map(|&v| band.contains(v) as u8).collect(),
        },
        None => {
            debug!("gradient response is flat ({w}x{h}); returning empty mask");
            Mask::new(w, h)
        }
    }
}

/// Threshold the absolute Sobel derivative along one axis.
pub fn abs_sobel_thresh(
    frame: &Frame<'_>,
    axis: Axis,
    sobel_kernel: usize,
    thresh: ThresholdBand<u8>,
    img_type: ImgType,
) -> Result<Mask, LaneError> {
    let gray = frame.intensity(img_type)?;
    let mut d = sobel(&gray, axis, sobel_kernel)?;
    for v in d.data.iter_mut() {
        *v = v.abs();
    }
    Ok(band_mask(d.w, d.h, scale_to_u8(&d), thresh))
}

/// Threshold the combined-axis gradient magnitude.
pub fn mag_sobel_thresh(
    frame: &Frame<'_>,
    sobel_kernel: usize,
    mag_thresh: ThresholdBand<u8>,
    img_type: ImgType,
) -> Result<Mask, LaneError> {
    let gray = frame.intensity(img_type)?;
    let grad = sobel_gradients(&gray, sobel_kernel)?;
    Ok(band_mask(grad.mag.w, grad.mag.h, scale_to_u8(&grad.mag), mag_thresh))
}

/// Threshold the gradient direction `atan2(|gy|, |gx|)`, in radians.
///
/// The angle is not rescaled, so a flat frame reads as direction 0 everywhere.
pub fn dir_threshold(
    frame: &Frame<'_>,
    sobel_kernel: usize,
    thresh: ThresholdBand<f32>,
    img_type: ImgType,
) -> Result<Mask, LaneError> {
    let gray = frame.intensity(img_type)?;
    let grad = sobel_gradients(&gray, sobel_kernel)?;
    let data = grad
        .gx
        .data
        .iter()
        .zip(&grad.gy.data)
        .map(|(&gx, &gy)| thresh.contains(gy.abs().atan2(gx.abs())) as u8)
        .collect();
    Ok(Mask {
        w: gray.w,
        h: gray.h,
        data,
    })
}
