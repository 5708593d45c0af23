#![allow(dead_code)]

use lane_geometry::image::{Mask, RgbImageBuf};
use lane_geometry::rectify::PerspectiveMapping;

pub const ASPHALT: [u8; 3] = [100, 100, 100];
pub const PAINT: [u8; 3] = [255, 220, 0];

/// Bird's-eye mask with one-pixel vertical stripes at each of `xs`.
pub fn stripe_mask(width: usize, height: usize, xs: &[usize]) -> Mask {
    Mask::from_fn(width, height, |x, _| xs.contains(&x))
}

/// Bird's-eye mask with one on-pixel per row for each curve `x = f(y)`.
pub fn curve_mask(width: usize, height: usize, curves: &[&dyn Fn(f64) -> f64]) -> Mask {
    let mut mask = Mask::new(width, height);
    for f in curves {
        for y in 0..height {
            let x = f(y as f64).round();
            if x >= 0.0 && (x as usize) < width {
                mask.set(x as usize, y, true);
            }
        }
    }
    mask
}

/// Camera-view road frame whose painted lines become vertical stripes of
/// half-width `half_width` at bird's-eye columns `lane_xs`.
pub fn road_frame(
    mapping: &PerspectiveMapping,
    width: usize,
    height: usize,
    horizon: usize,
    lane_xs: &[f64],
    half_width: f64,
) -> RgbImageBuf {
    let mut frame = RgbImageBuf::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let mut px = ASPHALT;
            if y >= horizon {
                if let Some([bx, _]) = mapping.to_birdseye([x as f64, y as f64]) {
                    if lane_xs.iter().any(|&lx| (bx - lx).abs() <= half_width) {
                        px = PAINT;
                    }
                }
            }
            frame.put(x, y, px);
        }
    }
    frame
}

/// Uniform frame with no lane features at all.
pub fn flat_frame(width: usize, height: usize) -> RgbImageBuf {
    let mut frame = RgbImageBuf::new(width, height);
    for px in frame.data.chunks_exact_mut(3) {
        px.copy_from_slice(&ASPHALT);
    }
    frame
}
