//! Owned binary mask (one byte per pixel, values 0 or 1).
//!
//! Every thresholding operation produces a fresh mask; callers combine cues
//! with [`Mask::union`] and [`Mask::intersect`].

use super::ImageView;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl Mask {
    /// All-zero mask of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0; w * h],
        }
    }

    /// Build a mask from a per-pixel predicate over a plane of the same size.
    pub fn from_fn(w: usize, h: usize, mut on: impl FnMut(usize, usize) -> bool) -> Self {
        let mut mask = Self::new(w, h);
        for y in 0..h {
            for x in 0..w {
                if on(x, y) {
                    mask.data[y * w + x] = 1;
                }
            }
        }
        mask
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.w + x] != 0
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        self.data[y * self.w + x] = on as u8;
    }

    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Pixel-wise OR. Panics if sizes differ.
    pub fn union(&self, other: &Mask) -> Mask {
        self.zip_with(other, |a, b| a | b)
    }

    /// Pixel-wise AND. Panics if sizes differ.
    pub fn intersect(&self, other: &Mask) -> Mask {
        self.zip_with(other, |a, b| a & b)
    }

    fn zip_with(&self, other: &Mask, op: impl Fn(bool, bool) -> bool) -> Mask {
        assert_eq!(
            (self.w, self.h),
            (other.w, other.h),
            "mask dimensions must agree"
        );
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| op(a != 0, b != 0) as u8)
            .collect();
        Mask {
            w: self.w,
            h: self.h,
            data,
        }
    }
}

impl ImageView for Mask {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.w
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.w..(y + 1) * self.w]
    }
}
