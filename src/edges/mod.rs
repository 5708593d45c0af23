//! Image derivatives for the gradient-based lane cues.
//!
//! - Sobel derivatives of any odd aperture (1..=31) built from separable
//!   binomial kernels, with reflect-101 borders.
//! - A [`Grad`] bundle holding `gx`, `gy` and the Euclidean magnitude.

pub mod grad;

pub use grad::{sobel, sobel_gradients, Axis, Grad, MAX_KERNEL_SIZE};
