//! Interleaved 8-bit RGB images: a borrowed view for input frames and an
//! owned buffer for rendered output.

use image::RgbImage;

/// Borrowed interleaved RGB view. `stride` counts bytes between rows.
#[derive(Clone, Copy, Debug)]
pub struct ImageRgb8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize,
    pub data: &'a [u8],
}

impl<'a> ImageRgb8<'a> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [u8; 3] {
        let i = y * self.stride + 3 * x;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn row_bytes(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + 3 * self.w]
    }
}

/// Owned, tightly packed RGB buffer (`3 * w` bytes per row).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbImageBuf {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl RgbImageBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0; 3 * w * h],
        }
    }

    pub fn from_raw(w: usize, h: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == 3 * w * h).then_some(Self { w, h, data })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [u8; 3] {
        let i = 3 * (y * self.w + x);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn put(&mut self, x: usize, y: usize, px: [u8; 3]) {
        let i = 3 * (y * self.w + x);
        self.data[i..i + 3].copy_from_slice(&px);
    }

    pub fn as_view(&self) -> ImageRgb8<'_> {
        ImageRgb8 {
            w: self.w,
            h: self.h,
            stride: 3 * self.w,
            data: &self.data,
        }
    }

    /// Hand the pixels to the `image` crate for drawing or resampling.
    pub fn into_rgb_image(self) -> Option<RgbImage> {
        RgbImage::from_raw(self.w as u32, self.h as u32, self.data)
    }
}

impl From<RgbImage> for RgbImageBuf {
    fn from(img: RgbImage) -> Self {
        Self {
            w: img.width() as usize,
            h: img.height() as usize,
            data: img.into_raw(),
        }
    }
}
