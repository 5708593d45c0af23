//! Sobel derivatives with a configurable aperture.
//!
//! The derivative along one axis is a separable correlation: a binomial
//! smoothing kernel of length `ksize` across the axis and a binomial
//! derivative kernel (binomial of length `ksize - 2` convolved with
//! `[-1, 0, 1]`) along it. `ksize == 1` is the bare central difference with
//! no smoothing.
//!
//! Borders are reflected without repeating the edge sample (`gfedcb|abcdefgh|gfedcba`).
//!
//! Complexity: O(W·H·ksize) per axis; memory: one scratch plane.
use crate::error::LaneError;
use crate::image::{ImageF32, ImageView, ImageViewMut};

/// Largest accepted aperture.
pub const MAX_KERNEL_SIZE: usize = 31;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Per‑pixel gradient buffers.
#[derive(Clone, Debug)]
pub struct Grad {
    /// Horizontal derivative
    pub gx: ImageF32,
    /// Vertical derivative
    pub gy: ImageF32,
    /// Euclidean magnitude per pixel: `sqrt(gx^2 + gy^2)`
    pub mag: ImageF32,
}

fn binomial(len: usize) -> Vec<f32> {
    let mut row = vec![1.0f32];
    for _ in 1..len {
        let mut next = vec![1.0f32; row.len() + 1];
        for i in 1..row.len() {
            next[i] = row[i - 1] + row[i];
        }
        row = next;
    }
    row
}

fn kernels(ksize: usize) -> (Vec<f32>, Vec<f32>) {
    if ksize == 1 {
        return (vec![1.0], vec![-1.0, 0.0, 1.0]);
    }
    let smooth = binomial(ksize);
    let base = binomial(ksize - 2);
    let mut deriv = vec![0.0f32; ksize];
    for (i, &b) in base.iter().enumerate() {
        deriv[i] -= b;
        deriv[i + 2] += b;
    }
    (smooth, deriv)
}

#[inline]
fn reflect101(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let mut j = i.rem_euclid(period);
    if j >= len as isize {
        j = period - j;
    }
    j as usize
}

fn correlate_rows(src: &ImageF32, kernel: &[f32]) -> ImageF32 {
    let mut out = ImageF32::new(src.w, src.h);
    let r = (kernel.len() / 2) as isize;
    for y in 0..src.h {
        let row = src.row(y);
        let dst = out.row_mut(y);
        for (x, d) in dst.iter_mut().enumerate() {
            let mut acc = 0.0;
            for (k, &kv) in kernel.iter().enumerate() {
                acc += kv * row[reflect101(x as isize + k as isize - r, src.w)];
            }
            *d = acc;
        }
    }
    out
}

fn correlate_cols(src: &ImageF32, kernel: &[f32]) -> ImageF32 {
    let mut out = ImageF32::new(src.w, src.h);
    let r = (kernel.len() / 2) as isize;
    for y in 0..src.h {
        let dst = out.row_mut(y);
        for (k, &kv) in kernel.iter().enumerate() {
            if kv == 0.0 {
                continue;
            }
            let row = src.row(reflect101(y as isize + k as isize - r, src.h));
            for (d, &s) in dst.iter_mut().zip(row) {
                *d += kv * s;
            }
        }
    }
    out
}

fn check_kernel(ksize: usize) -> Result<(), LaneError> {
    if ksize % 2 == 0 || ksize > MAX_KERNEL_SIZE {
        return Err(LaneError::config(
            "sobel_kernel",
            format!("kernel size must be odd and within 1..={MAX_KERNEL_SIZE}, got {ksize}"),
        ));
    }
    Ok(())
}

/// First derivative along `axis` with aperture `ksize`.
pub fn sobel(l: &ImageF32, axis: Axis, ksize: usize) -> Result<ImageF32, LaneError> {
    check_kernel(ksize)?;
    if l.w == 0 || l.h == 0 {
        return Ok(ImageF32::new(l.w, l.h));
    }
    let (smooth, deriv) = kernels(ksize);
    Ok(match axis {
        Axis::X => correlate_cols(&correlate_rows(l, &deriv), &smooth),
        Axis::Y => correlate_rows(&correlate_cols(l, &deriv), &smooth),
    })
}

/// Both first derivatives and their magnitude.
pub fn sobel_gradients(l: &ImageF32, ksize: usize) -> Result<Grad, LaneError> {
    let gx = sobel(l, Axis::X, ksize)?;
    let gy = sobel(l, Axis::Y, ksize)?;
    let mut mag = ImageF32::new(l.w, l.h);
    for ((m, &x), &y) in mag.data.iter_mut().zip(&gx.data).zip(&gy.data) {
        *m = (x * x + y * y).sqrt();
    }
    Ok(Grad { gx, gy, mag })
}
