//! Binary lane-feature extraction.
//!
//! Every operation is a pure function of a frame and its parameters and
//! returns a fresh [`Mask`]. Bands are inclusive on both ends.
//!
//! - [`gradient`]: absolute single-axis Sobel, Sobel magnitude and Sobel
//!   direction thresholds. Responses are rescaled to 0..=255 by the frame's
//!   own maximum; a flat frame (maximum 0) yields an all-zero mask.
//! - [`color`]: saturation and hue thresholds in HLS space.
//! - [`extract_lane_mask`] runs the cues selected in [`ExtractorParams`] and
//!   combines them.

pub mod color;
pub mod gradient;
mod params;

pub use color::{h_channel_threshold, s_channel_threshold, ChannelMask};
pub use gradient::{abs_sobel_thresh, dir_threshold, mag_sobel_thresh};
pub use params::{ExtractorParams, ThresholdBand};

use crate::error::LaneError;
use crate::image::{Frame, Mask};
use log::debug;
use serde::Serialize;

/// On-pixel counts per cue, for diagnostics.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CueCounts {
    pub abs_x: Option<usize>,
    pub abs_y: Option<usize>,
    pub magnitude: Option<usize>,
    pub direction: Option<usize>,
    pub saturation: Option<usize>,
    pub hue: Option<usize>,
    pub combined: usize,
}

/// Combined lane mask and the per-cue statistics that produced it.
#[derive(Clone, Debug)]
pub struct Extraction {
    pub mask: Mask,
    pub counts: CueCounts,
}

fn fold_and(acc: Option<Mask>, next: &Mask) -> Option<Mask> {
    Some(match acc {
        Some(m) => m.intersect(next),
        None => next.clone(),
    })
}

/// Run the enabled cues and combine them: gradient cues are intersected,
/// color cues are intersected, and the two groups are unioned.
pub fn extract_lane_mask(
    frame: &Frame<'_>,
    params: &ExtractorParams,
) -> Result<Extraction, LaneError> {
    params.validate()?;
    let (w, h) = (frame.width(), frame.height());
    let mut counts = CueCounts::default();
    let kernel = params.sobel_kernel;
    let img_type = params.img_type;

    let mut gradient_mask: Option<Mask> = None;
    if let Some(band) = params.abs_x {
        let m = abs_sobel_thresh(frame, crate::edges::Axis::X, kernel, band, img_type)?;
        counts.abs_x = Some(m.count_nonzero());
        gradient_mask = fold_and(gradient_mask, &m);
    }
    if let Some(band) = params.abs_y {
        let m = abs_sobel_thresh(frame, crate::edges::Axis::Y, kernel, band, img_type)?;
        counts.abs_y = Some(m.count_nonzero());
        gradient_mask = fold_and(gradient_mask, &m);
    }
    if let Some(band) = params.magnitude {
        let m = mag_sobel_thresh(frame, kernel, band, img_type)?;
        counts.magnitude = Some(m.count_nonzero());
        gradient_mask = fold_and(gradient_mask, &m);
    }
    if let Some(band) = params.direction {
        let m = dir_threshold(frame, kernel, band, img_type)?;
        counts.direction = Some(m.count_nonzero());
        gradient_mask = fold_and(gradient_mask, &m);
    }

    let mut color_mask: Option<Mask> = None;
    if let Some(band) = params.saturation {
        let ChannelMask { mask, .. } = s_channel_threshold(frame, band)?;
        counts.saturation = Some(mask.count_nonzero());
        color_mask = fold_and(color_mask, &mask);
    }
    if let Some(band) = params.hue {
        let ChannelMask { mask, .. } = h_channel_threshold(frame, band)?;
        counts.hue = Some(mask.count_nonzero());
        color_mask = fold_and(color_mask, &mask);
    }

    let mask = match (gradient_mask, color_mask) {
        (Some(g), Some(c)) => g.union(&c),
        (Some(g), None) => g,
        (None, Some(c)) => c,
        (None, None) => Mask::new(w, h),
    };
    counts.combined = mask.count_nonzero();
    debug!(
        "extract_lane_mask w={} h={} on_pixels={}",
        w, h, counts.combined
    );
    Ok(Extraction { mask, counts })
}
