use crate::image::{Mask, RgbImageBuf};
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use nalgebra::Matrix3;

/// Rasters that can be resampled through a homography.
pub trait Warp: Sized {
    /// `(width, height)`
    fn size(&self) -> (usize, usize);

    /// Produce an `output_size` raster where source pixel `p` lands at
    /// `projection · p`. Output pixels with no source read as zero.
    fn warp(&self, projection: &Projection, output_size: (usize, usize)) -> Self;
}

/// Row-major `f32` projection for `m`, or `None` when `m` is not invertible
/// or has a zero bottom-right entry.
pub(crate) fn projection_from(m: &Matrix3<f64>) -> Option<Projection> {
    if m.determinant() == 0.0 || m[(2, 2)] == 0.0 {
        return None;
    }
    let mut entries = [0f32; 9];
    for (i, v) in entries.iter_mut().enumerate() {
        *v = m[(i / 3, i % 3)] as f32;
    }
    if !entries.iter().all(|v| v.is_finite()) {
        return None;
    }
    Projection::from_matrix(entries)
}

impl Warp for Mask {
    fn size(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    fn warp(&self, projection: &Projection, (w, h): (usize, usize)) -> Self {
        let scaled = self.data.iter().map(|&v| if v != 0 { 255 } else { 0 }).collect();
        let mut out = GrayImage::new(w as u32, h as u32);
        if let Some(src) = GrayImage::from_raw(self.w as u32, self.h as u32, scaled) {
            if self.w > 0 && self.h > 0 {
                warp_into(&src, projection, Interpolation::Bilinear, Luma([0]), &mut out);
            }
        }
        // Bilinear edges are grey; keep the pixels that are mostly on.
        let data = out.into_raw().into_iter().map(|v| (v >= 128) as u8).collect();
        Mask { w, h, data }
    }
}

impl Warp for RgbImageBuf {
    fn size(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    fn warp(&self, projection: &Projection, (w, h): (usize, usize)) -> Self {
        let mut out = RgbImage::new(w as u32, h as u32);
        if let Some(src) = self.clone().into_rgb_image() {
            if self.w > 0 && self.h > 0 {
                warp_into(&src, projection, Interpolation::Bilinear, Rgb([0, 0, 0]), &mut out);
            }
        }
        RgbImageBuf::from(out)
    }
}
