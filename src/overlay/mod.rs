//! Lane-area overlay: fill the region between both boundaries in the
//! bird's-eye view, warp it back onto the camera frame, blend, and burn in
//! the measurements.

pub mod raster;
pub mod text;

pub use raster::add_weighted;
pub use text::{draw_lines, OverlayFont};

use crate::error::LaneError;
use crate::fit::LaneCurve;
use crate::geometry::LaneMeasurement;
use crate::image::{ImageRgb8, RgbImageBuf};
use crate::rectify::derectify;
use crate::types::LaneEstimate;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;
use log::debug;
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayParams {
    pub fill_color: [u8; 3],
    /// Weight of the warped lane fill.
    pub overlay_weight: f64,
    /// Weight of the original frame.
    pub base_weight: f64,
    pub text_color: [u8; 3],
    /// Top-left corner of the first text line.
    pub text_origin: (usize, usize),
    /// Glyph height in pixels.
    pub text_height: f32,
    pub line_spacing: usize,
    /// TrueType/OpenType font for the text; the bundled DejaVu Sans Mono
    /// when unset.
    pub font_path: Option<PathBuf>,
    /// Add a warning line when either boundary used the fallback curve.
    pub flag_degraded: bool,
}

impl Default for OverlayParams {
    fn default() -> Self {
        Self {
            fill_color: [0, 255, 0],
            overlay_weight: 0.3,
            base_weight: 1.0,
            text_color: [255, 255, 255],
            text_origin: (50, 50),
            text_height: 40.0,
            line_spacing: 50,
            font_path: None,
            flag_degraded: true,
        }
    }
}

impl OverlayParams {
    pub fn validate(&self) -> Result<(), LaneError> {
        let weight_ok = |v: f64| v.is_finite() && v >= 0.0;
        if !weight_ok(self.overlay_weight) || !weight_ok(self.base_weight) {
            return Err(LaneError::config(
                "overlay",
                "blend weights must be finite and non-negative",
            ));
        }
        if !(self.text_height.is_finite() && self.text_height > 0.0) {
            return Err(LaneError::config(
                "overlay.text_height",
                "must be a positive number of pixels",
            ));
        }
        Ok(())
    }
}

/// Text burned into the frame, one entry per line.
pub fn overlay_lines(
    measurement: &LaneMeasurement,
    degraded: bool,
    params: &OverlayParams,
) -> Vec<String> {
    let mut lines = vec![
        format!("Radius of Curvature = {:.2}(m)", measurement.radius_m),
        format!(
            "Offset from Center = {:.2}(m)",
            measurement.offset.magnitude_m
        ),
    ];
    if degraded && params.flag_degraded {
        lines.push("LOW CONFIDENCE FIT".to_string());
    }
    lines
}

/// Closed ring: left boundary top to bottom, then right boundary bottom to top.
pub fn lane_ring(left: &LaneCurve, right: &LaneCurve) -> Vec<[f64; 2]> {
    let down = left.ploty.iter().zip(&left.fitx).map(|(&y, &x)| [x, y]);
    let up = right
        .ploty
        .iter()
        .zip(&right.fitx)
        .rev()
        .map(|(&y, &x)| [x, y]);
    down.chain(up).collect()
}

/// Integer polygon for `ring` with repeated vertices removed, clipped to a
/// range `i32` holds comfortably. Non-finite vertices are skipped.
fn polygon_points(ring: &[[f64; 2]]) -> Vec<Point<i32>> {
    const LIMIT: f64 = 1.0e6;
    let mut points: Vec<Point<i32>> = Vec::with_capacity(ring.len());
    for &[x, y] in ring {
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        let p = Point::new(
            x.round().clamp(-LIMIT, LIMIT) as i32,
            y.round().clamp(-LIMIT, LIMIT) as i32,
        );
        if points.last() != Some(&p) {
            points.push(p);
        }
    }
    // The ring closes implicitly.
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

/// Bird's-eye layer with the lane area painted in `color`.
fn lane_layer(
    w: usize,
    h: usize,
    left: &LaneCurve,
    right: &LaneCurve,
    color: [u8; 3],
) -> RgbImage {
    let mut layer = RgbImage::new(w as u32, h as u32);
    let points = polygon_points(&lane_ring(left, right));
    if points.len() < 3 {
        debug!("overlay: lane ring collapsed to {} vertices", points.len());
        return layer;
    }
    draw_polygon_mut(&mut layer, &points, Rgb(color));
    layer
}

/// Render the lane overlay of `estimate` onto `frame`.
///
/// `inverse` maps bird's-eye coordinates back to the camera view. The
/// curves are expected in a bird's-eye raster with the frame's size. Text
/// is drawn only when a `font` is given.
pub fn render_overlay(
    frame: &ImageRgb8<'_>,
    inverse: &Matrix3<f64>,
    estimate: &LaneEstimate,
    params: &OverlayParams,
    font: Option<&OverlayFont>,
) -> Result<RgbImageBuf, LaneError> {
    let (w, h) = (frame.w, frame.h);
    let layer = lane_layer(
        w,
        h,
        estimate.left.curve(),
        estimate.right.curve(),
        params.fill_color,
    );
    let layer = derectify(&RgbImageBuf::from(layer), inverse, (w, h))?;
    let out = add_weighted(frame, params.base_weight, &layer, params.overlay_weight)?;

    let lines = overlay_lines(&estimate.measurement, estimate.degraded, params);
    let Some(font) = font else {
        debug!("overlay: no font configured, {} text lines skipped", lines.len());
        return Ok(out);
    };
    let mut canvas = out.into_rgb_image().ok_or_else(|| {
        LaneError::config("overlay", "blended frame does not match its dimensions")
    })?;
    draw_lines(&mut canvas, &lines, params, font);
    Ok(RgbImageBuf::from(canvas))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::FitOutcome;
    use crate::geometry::{LateralOffset, OffsetSide};

    fn measurement() -> LaneMeasurement {
        LaneMeasurement {
            radius_m: 1234.567,
            left_radius_m: 1234.567,
            right_radius_m: 987.0,
            offset: LateralOffset {
                magnitude_m: 0.0529,
                lane_center_px: 650.0,
                image_center_px: 640.0,
                side: OffsetSide::Left,
            },
        }
    }

    #[test]
    fn lines_use_two_decimals() {
        let lines = overlay_lines(&measurement(), false, &OverlayParams::default());
        assert_eq!(
            lines,
            vec![
                "Radius of Curvature = 1234.57(m)".to_string(),
                "Offset from Center = 0.05(m)".to_string(),
            ]
        );
    }

    #[test]
    fn degraded_frames_get_a_warning_line() {
        let params = OverlayParams::default();
        assert_eq!(overlay_lines(&measurement(), true, &params).len(), 3);
        let quiet = OverlayParams {
            flag_degraded: false,
            ..params
        };
        assert_eq!(overlay_lines(&measurement(), true, &quiet).len(), 2);
    }

    #[test]
    fn ring_walks_left_down_then_right_up() {
        let left = LaneCurve::from_coeffs([0.0, 0.0, 10.0], 4);
        let right = LaneCurve::from_coeffs([0.0, 0.0, 30.0], 4);
        let ring = lane_ring(&left, &right);
        assert_eq!(ring.len(), 8);
        assert_eq!(ring[0], [10.0, 0.0]);
        assert_eq!(ring[3], [10.0, 3.0]);
        assert_eq!(ring[4], [30.0, 3.0]);
        assert_eq!(ring[7], [30.0, 0.0]);
    }

    #[test]
    fn closing_and_repeated_vertices_are_dropped() {
        let ring = [
            [10.0, 0.0],
            [10.2, 0.4],
            [10.0, 5.0],
            [30.0, 5.0],
            [30.0, 0.0],
            [10.0, 0.0],
        ];
        let points = polygon_points(&ring);
        assert_eq!(
            points,
            vec![
                Point::new(10, 0),
                Point::new(10, 5),
                Point::new(30, 5),
                Point::new(30, 0),
            ]
        );
        assert!(polygon_points(&[[f64::NAN, 0.0], [1.0, 1.0]]).len() < 3);
    }

    #[test]
    fn lane_layer_paints_between_the_curves() {
        let left = LaneCurve::from_coeffs([0.0, 0.0, 10.0], 20);
        let right = LaneCurve::from_coeffs([0.0, 0.0, 30.0], 20);
        let layer = lane_layer(40, 20, &left, &right, [0, 255, 0]);
        assert_eq!(layer.get_pixel(20, 10).0, [0, 255, 0]);
        assert_eq!(layer.get_pixel(5, 10).0, [0, 0, 0]);
        assert_eq!(layer.get_pixel(35, 10).0, [0, 0, 0]);
    }

    fn straight_estimate(h: usize, left_x: f64, right_x: f64) -> LaneEstimate {
        LaneEstimate {
            left: FitOutcome::Fitted {
                curve: LaneCurve::from_coeffs([0.0, 0.0, left_x], h),
            },
            right: FitOutcome::Fitted {
                curve: LaneCurve::from_coeffs([0.0, 0.0, right_x], h),
            },
            measurement: measurement(),
            degraded: false,
            latency_ms: 0.0,
        }
    }

    fn render_dark_frame(params: &OverlayParams, font: Option<&OverlayFont>) -> RgbImageBuf {
        let (w, h) = (200usize, 120usize);
        let base = vec![20u8; 3 * w * h];
        let frame = ImageRgb8 {
            w,
            h,
            stride: 3 * w,
            data: &base,
        };
        let estimate = straight_estimate(h, 60.0, 140.0);
        render_overlay(&frame, &Matrix3::identity(), &estimate, params, font).unwrap()
    }

    #[test]
    fn identity_mapping_tints_only_the_lane_area() {
        let out = render_dark_frame(&OverlayParams::default(), None);
        let inside = out.get(100, 100);
        assert_eq!(inside[0], 20);
        assert!(inside[1] > 90, "green channel {}", inside[1]);
        assert_eq!(out.get(20, 100), [20, 20, 20]);
        assert_eq!(out.get(180, 100), [20, 20, 20]);
    }

    #[test]
    fn text_is_drawn_near_the_origin_with_a_font() {
        let font = OverlayFont::bundled().unwrap();
        let params = OverlayParams {
            text_origin: (4, 4),
            text_height: 16.0,
            line_spacing: 20,
            ..OverlayParams::default()
        };
        let plain = render_dark_frame(&params, None);
        let labelled = render_dark_frame(&params, Some(&font));
        let mut changed = 0;
        for y in 0..plain.h {
            for x in 0..plain.w {
                if plain.get(x, y) != labelled.get(x, y) {
                    assert!(y < 4 + 2 * 20 + 16, "text reached row {y}");
                    changed += 1;
                }
            }
        }
        assert!(changed > 50, "only {changed} pixels changed");
    }
}
