//! Color-space conversions on interleaved RGB frames.
//!
//! Both conversions follow the common 8-bit conventions so thresholds tuned
//! elsewhere carry over unchanged: gray uses BT.601 luma weights, and HLS
//! stores hue halved into [0, 180) with lightness and saturation in [0, 255].

use crate::image::{ImageF32, ImageRgb8};

/// Owned single 8-bit channel split out of a color frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Channel {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

/// Selector for one HLS plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HlsChannel {
    Hue,
    Lightness,
    Saturation,
}

/// Luma conversion, rounded to integer intensities like an 8-bit pipeline.
pub fn rgb_to_gray(rgb: &ImageRgb8<'_>) -> ImageF32 {
    let mut out = ImageF32::new(rgb.w, rgb.h);
    for y in 0..rgb.h {
        let src = rgb.row_bytes(y);
        let dst = &mut out.data[y * rgb.w..(y + 1) * rgb.w];
        for (d, px) in dst.iter_mut().zip(src.chunks_exact(3)) {
            let v = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
            *d = v.round();
        }
    }
    out
}

/// Convert one RGB pixel to 8-bit `[h, l, s]`.
pub fn hls_pixel(r: u8, g: u8, b: u8) -> [u8; 3] {
    let (r, g, b) = (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    let vmax = r.max(g).max(b);
    let vmin = r.min(g).min(b);
    let l = 0.5 * (vmax + vmin);
    let diff = vmax - vmin;
    let (mut h, s) = if diff <= f32::EPSILON {
        (0.0, 0.0)
    } else {
        let s = if l < 0.5 {
            diff / (vmax + vmin)
        } else {
            diff / (2.0 - vmax - vmin)
        };
        let h = if vmax == r {
            60.0 * (g - b) / diff
        } else if vmax == g {
            120.0 + 60.0 * (b - r) / diff
        } else {
            240.0 + 60.0 * (r - g) / diff
        };
        (h, s)
    };
    if h < 0.0 {
        h += 360.0;
    }
    // Hue wraps: 359.x/2 rounds to 180, which is the same angle as 0.
    let h8 = (h * 0.5).round() as u32 % 180;
    [
        h8 as u8,
        (l * 255.0).round().clamp(0.0, 255.0) as u8,
        (s * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}

/// Extract a single HLS plane from an RGB frame.
pub fn hls_channel(rgb: &ImageRgb8<'_>, channel: HlsChannel) -> Channel {
    let idx = match channel {
        HlsChannel::Hue => 0,
        HlsChannel::Lightness => 1,
        HlsChannel::Saturation => 2,
    };
    let mut data = Vec::with_capacity(rgb.w * rgb.h);
    for y in 0..rgb.h {
        data.extend(
            rgb.row_bytes(y)
                .chunks_exact(3)
                .map(|px| hls_pixel(px[0], px[1], px[2])[idx]),
        );
    }
    Channel {
        w: rgb.w,
        h: rgb.h,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hls_of_primaries() {
        assert_eq!(hls_pixel(255, 0, 0), [0, 128, 255]);
        assert_eq!(hls_pixel(0, 255, 0), [60, 128, 255]);
        assert_eq!(hls_pixel(0, 0, 255), [120, 128, 255]);
    }

    #[test]
    fn hls_of_grays_has_no_saturation() {
        for v in [0u8, 17, 128, 255] {
            let [h, l, s] = hls_pixel(v, v, v);
            assert_eq!((h, s), (0, 0));
            assert_eq!(l, v);
        }
    }

    #[test]
    fn yellow_lane_paint_is_saturated() {
        // Typical yellow marking under daylight.
        let [h, _, s] = hls_pixel(230, 200, 60);
        assert!((15..=35).contains(&h), "hue={h}");
        assert!(s > 130, "saturation={s}");
    }

    #[test]
    fn gray_uses_luma_weights() {
        let data = [255u8, 0, 0, 0, 255, 0, 0, 0, 255];
        let img = ImageRgb8 {
            w: 3,
            h: 1,
            stride: 9,
            data: &data,
        };
        let gray = rgb_to_gray(&img);
        assert_eq!(gray.data, vec![76.0, 150.0, 29.0]);
    }
}
