//! Histogram-seeded sliding-window search for lane-boundary pixels.
//!
//! Algorithm
//! 1. Column histogram over the bottom half of the bird's-eye mask; the
//!    strongest column in each half seeds the left and right boundary.
//! 2. The mask is cut into `nwindows` bands of `H / nwindows` rows, walked
//!    from the bottom band upwards.
//! 3. In each band a window of `[x - margin, x + margin)` around each
//!    boundary's current estimate collects on-pixels.
//! 4. A window holding more than `minpix` pixels recentres its boundary on
//!    their mean x; otherwise the estimate carries over unchanged.
//!
//! The current `(left, right)` estimates carry from one band to the next.

use crate::error::LaneError;
use crate::image::{ImageView, Mask};
use log::debug;
use serde::{Deserialize, Serialize};

/// Sliding-window search parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlidingWindowParams {
    /// Number of horizontal bands (>= 1, <= frame height).
    pub nwindows: usize,
    /// Half-width of each search window in pixels.
    pub margin: usize,
    /// A window must hold strictly more pixels than this to recentre.
    pub minpix: usize,
}

impl Default for SlidingWindowParams {
    fn default() -> Self {
        Self {
            nwindows: 9,
            margin: 100,
            minpix: 50,
        }
    }
}

impl SlidingWindowParams {
    pub fn validate(&self, height: usize) -> Result<(), LaneError> {
        if self.nwindows < 1 {
            return Err(LaneError::config("locator.nwindows", "must be at least 1"));
        }
        if self.nwindows > height {
            return Err(LaneError::config(
                "locator.nwindows",
                format!("{} bands do not fit in {height} rows", self.nwindows),
            ));
        }
        if self.margin == 0 {
            return Err(LaneError::config("locator.margin", "must be positive"));
        }
        Ok(())
    }
}

/// One on-pixel of the bird's-eye mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Pixel {
    pub x: usize,
    pub y: usize,
}

/// Search window placed for one boundary in one band.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchWindow {
    /// Inclusive left edge (may be negative near the image border).
    pub x_low: i64,
    /// Exclusive right edge.
    pub x_high: i64,
    pub found: usize,
    pub recentred: bool,
}

/// Both windows of one band, bottom band first.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BandTrace {
    /// Inclusive top row.
    pub y_low: usize,
    /// Exclusive bottom row.
    pub y_high: usize,
    pub left: SearchWindow,
    pub right: SearchWindow,
}

/// Pixels attributed to each boundary plus the search trace.
#[derive(Clone, Debug, Default)]
pub struct LanePixels {
    pub left: Vec<Pixel>,
    pub right: Vec<Pixel>,
    pub left_base: usize,
    pub right_base: usize,
    pub bands: Vec<BandTrace>,
}

/// Column sums of the mask over rows `[H/2, H)`.
pub fn bottom_half_histogram(mask: &Mask) -> Vec<u32> {
    let mut hist = vec![0u32; mask.w];
    for y in mask.h / 2..mask.h {
        for (bin, &v) in hist.iter_mut().zip(mask.row(y)) {
            *bin += (v != 0) as u32;
        }
    }
    hist
}

/// First index of the maximum, or 0 for an empty slice.
fn argmax(values: &[u32]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Starting x for the left and right boundaries.
pub fn histogram_seeds(hist: &[u32]) -> (usize, usize) {
    let mid = hist.len() / 2;
    let left = argmax(&hist[..mid]);
    let right = mid + argmax(&hist[mid..]);
    (left, right)
}

/// Collect the on-pixels of `rows` (indexed by y) inside `[x_low, x_high)`.
fn collect_window(
    on_by_row: &[Vec<usize>],
    y_low: usize,
    y_high: usize,
    x_low: i64,
    x_high: i64,
    out: &mut Vec<Pixel>,
) -> (usize, usize) {
    let mut count = 0usize;
    let mut sum_x = 0usize;
    for (y, xs) in on_by_row.iter().enumerate().take(y_high).skip(y_low) {
        for &x in xs {
            let xi = x as i64;
            if xi >= x_low && xi < x_high {
                out.push(Pixel { x, y });
                count += 1;
                sum_x += x;
            }
        }
    }
    (count, sum_x)
}

fn place_window(
    on_by_row: &[Vec<usize>],
    band: (usize, usize),
    current: usize,
    params: &SlidingWindowParams,
    out: &mut Vec<Pixel>,
) -> (SearchWindow, usize) {
    let x_low = current as i64 - params.margin as i64;
    let x_high = current as i64 + params.margin as i64;
    let (found, sum_x) = collect_window(on_by_row, band.0, band.1, x_low, x_high, out);
    let recentred = found > params.minpix;
    let next = if recentred { sum_x / found } else { current };
    (
        SearchWindow {
            x_low,
            x_high,
            found,
            recentred,
        },
        next,
    )
}

/// Find the left and right boundary pixels of a bird's-eye mask.
///
/// `expected` is the configured `(width, height)`; a mask of any other size
/// is rejected rather than searched with mismatched row indices.
pub fn locate_lane_pixels(
    mask: &Mask,
    params: &SlidingWindowParams,
    expected: (usize, usize),
) -> Result<LanePixels, LaneError> {
    if (mask.w, mask.h) != expected {
        return Err(LaneError::ShapeMismatch {
            what: "bird's-eye mask",
            expected,
            found: (mask.w, mask.h),
        });
    }
    params.validate(mask.h)?;

    let hist = bottom_half_histogram(mask);
    let (left_base, right_base) = histogram_seeds(&hist);

    let on_by_row: Vec<Vec<usize>> = (0..mask.h)
        .map(|y| {
            mask.row(y)
                .iter()
                .enumerate()
                .filter(|(_, &v)| v != 0)
                .map(|(x, _)| x)
                .collect()
        })
        .collect();

    let band_height = mask.h / params.nwindows;
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut bands = Vec::with_capacity(params.nwindows);

    let (mut lx, mut rx) = (left_base, right_base);
    for window in 0..params.nwindows {
        let y_low = mask.h - (window + 1) * band_height;
        let y_high = mask.h - window * band_height;
        let (left_win, next_l) = place_window(&on_by_row, (y_low, y_high), lx, params, &mut left);
        let (right_win, next_r) =
            place_window(&on_by_row, (y_low, y_high), rx, params, &mut right);
        bands.push(BandTrace {
            y_low,
            y_high,
            left: left_win,
            right: right_win,
        });
        lx = next_l;
        rx = next_r;
    }

    debug!(
        "locate_lane_pixels bases=({}, {}) left={} right={} bands={}",
        left_base,
        right_base,
        left.len(),
        right.len(),
        bands.len()
    );

    Ok(LanePixels {
        left,
        right,
        left_base,
        right_base,
        bands,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stripe_mask(w: usize, h: usize, xs: &[usize]) -> Mask {
        Mask::from_fn(w, h, |x, _| xs.contains(&x))
    }

    #[test]
    fn histogram_counts_bottom_half_only() {
        let mask = Mask::from_fn(4, 6, |x, y| x == 1 || (x == 2 && y < 3));
        assert_eq!(bottom_half_histogram(&mask), vec![0, 3, 0, 0]);
    }

    #[test]
    fn argmax_prefers_first_peak() {
        assert_eq!(argmax(&[1, 5, 5, 2]), 1);
        assert_eq!(argmax(&[0, 0, 0]), 0);
    }

    #[test]
    fn empty_right_half_seeds_at_midpoint() {
        let mask = stripe_mask(200, 100, &[40]);
        let params = SlidingWindowParams {
            nwindows: 5,
            margin: 20,
            minpix: 5,
        };
        let pixels = locate_lane_pixels(&mask, &params, (200, 100)).unwrap();
        assert!((100..200).contains(&pixels.right_base));
        assert!(pixels.right.is_empty());
        assert_eq!(pixels.left_base, 40);
        assert_eq!(pixels.left.len(), 100);
    }

    #[test]
    fn window_follows_a_drifting_line() {
        // Line drifts 30 px to the right over the height; margin 20 would
        // lose it without recentring.
        let (w, h) = (400, 300);
        let mask = Mask::from_fn(w, h, |x, y| {
            let centre = 130 - (y as i64 * 30 / h as i64) as usize;
            x + 2 >= centre && x <= centre + 2
        });
        let params = SlidingWindowParams {
            nwindows: 10,
            margin: 20,
            minpix: 10,
        };
        let pixels = locate_lane_pixels(&mask, &params, (w, h)).unwrap();
        assert_eq!(pixels.left.len(), mask.count_nonzero());
        assert!(pixels.bands.iter().all(|b| b.left.recentred));
    }

    #[test]
    fn empty_band_carries_the_last_estimate_upward() {
        // Bottom band at x=50, middle band empty, top band at x=60.
        let (w, h) = (200, 30);
        let mask = Mask::from_fn(w, h, |x, y| match y {
            20..=29 => x == 50,
            0..=9 => x == 60,
            _ => false,
        });
        let params = SlidingWindowParams {
            nwindows: 3,
            margin: 20,
            minpix: 5,
        };
        let pixels = locate_lane_pixels(&mask, &params, (w, h)).unwrap();
        let lows: Vec<i64> = pixels.bands.iter().map(|b| b.left.x_low).collect();
        let found: Vec<usize> = pixels.bands.iter().map(|b| b.left.found).collect();
        assert_eq!(lows, vec![30, 30, 30]);
        assert_eq!(found, vec![10, 0, 10]);
        assert!(!pixels.bands[1].left.recentred);
        assert_eq!(pixels.left.len(), 20);
    }

    #[test]
    fn minpix_boundary_is_strict() {
        // Five pixels per window in the bottom band.
        let (w, h) = (100, 10);
        let mask = Mask::from_fn(w, h, |x, y| y >= 5 && (x == 20 || x == 60));
        let params = SlidingWindowParams {
            nwindows: 2,
            margin: 30,
            minpix: 5,
        };
        let pixels = locate_lane_pixels(&mask, &params, (w, h)).unwrap();
        assert_eq!((pixels.left_base, pixels.right_base), (20, 60));
        let bottom = pixels.bands[0];
        assert_eq!((bottom.left.found, bottom.right.found), (5, 5));
        assert!(!bottom.left.recentred && !bottom.right.recentred);

        let params = SlidingWindowParams { minpix: 4, ..params };
        let pixels = locate_lane_pixels(&mask, &params, (w, h)).unwrap();
        assert!(pixels.bands[0].left.recentred && pixels.bands[0].right.recentred);
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let mask = Mask::new(10, 10);
        let zero = SlidingWindowParams {
            nwindows: 0,
            ..Default::default()
        };
        assert!(matches!(
            locate_lane_pixels(&mask, &zero, (10, 10)),
            Err(LaneError::InvalidConfig { .. })
        ));
        assert!(matches!(
            locate_lane_pixels(&mask, &SlidingWindowParams::default(), (12, 10)),
            Err(LaneError::ShapeMismatch { .. })
        ));
    }
}
