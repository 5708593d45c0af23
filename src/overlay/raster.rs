//! Saturating weighted blend of the overlay layer onto the frame.

use crate::error::LaneError;
use crate::image::{ImageRgb8, RgbImageBuf};
use rayon::prelude::*;

/// `clamp(round(base·α + overlay·β))` per channel.
pub fn add_weighted(
    base: &ImageRgb8<'_>,
    alpha: f64,
    overlay: &RgbImageBuf,
    beta: f64,
) -> Result<RgbImageBuf, LaneError> {
    if (base.w, base.h) != (overlay.w, overlay.h) {
        return Err(LaneError::ShapeMismatch {
            what: "overlay layer",
            expected: (base.w, base.h),
            found: (overlay.w, overlay.h),
        });
    }
    let mut out = RgbImageBuf::new(base.w, base.h);
    let row_len = 3 * base.w.max(1);
    out.data
        .par_chunks_mut(row_len)
        .zip(overlay.data.par_chunks(row_len))
        .enumerate()
        .for_each(|(y, (dst, over))| {
            let src = base.row_bytes(y);
            for ((d, &s), &o) in dst.iter_mut().zip(src).zip(over) {
                let v = s as f64 * alpha + o as f64 * beta;
                *d = v.round().clamp(0.0, 255.0) as u8;
            }
        });
    Ok(out)
}
