//! Physical lane measurements from fitted curves: radius of curvature and
//! lateral offset of the camera from lane center.
//!
//! Both are computed from one frame's curves only.

use crate::error::LaneError;
use crate::fit::LaneCurve;
use serde::{Deserialize, Serialize};

/// Which boundary the reported radius is taken from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boundary {
    Left,
    Right,
}

/// Pixel-to-meter scale and the fixed evaluation row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    /// Meters per pixel along x (lane width 3.7 m spans ~700 px).
    pub xm_per_pix: f64,
    /// Meters per pixel along y (~30 m of road over 720 rows).
    pub ym_per_pix: f64,
    /// Near-field row where the offset is measured.
    pub eval_row: usize,
    pub curvature_boundary: Boundary,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            xm_per_pix: 3.7 / 700.0,
            ym_per_pix: 30.0 / 720.0,
            eval_row: 700,
            curvature_boundary: Boundary::Left,
        }
    }
}

impl Calibration {
    pub fn validate(&self, height: usize) -> Result<(), LaneError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.xm_per_pix) || !positive(self.ym_per_pix) {
            return Err(LaneError::config(
                "calibration",
                "meters-per-pixel factors must be positive and finite",
            ));
        }
        if self.eval_row >= height {
            return Err(LaneError::config(
                "calibration.eval_row",
                format!("row {} is outside a {height}-row frame", self.eval_row),
            ));
        }
        Ok(())
    }
}

/// Which side of the lane center the camera sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetSide {
    Left,
    Right,
    Centered,
}

/// Unsigned offset from lane center plus the pixel positions it came from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LateralOffset {
    pub magnitude_m: f64,
    pub lane_center_px: f64,
    pub image_center_px: f64,
    pub side: OffsetSide,
}

/// Per-frame geometry.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneMeasurement {
    /// Radius of the configured boundary, meters.
    pub radius_m: f64,
    pub left_radius_m: f64,
    pub right_radius_m: f64,
    pub offset: LateralOffset,
}

/// Radius of curvature at the curve's middle sample, in meters.
///
/// Derivatives come from centered finite differences on the metric-scaled
/// curve around index `len / 2`. A straight curve returns `f64::INFINITY`.
pub fn radius_of_curvature(curve: &LaneCurve, cal: &Calibration) -> Result<f64, LaneError> {
    let n = curve.len();
    if n < 3 || curve.fitx.len() != n {
        return Err(LaneError::ShapeMismatch {
            what: "lane curve samples",
            expected: (3, 1),
            found: (n, 1),
        });
    }
    let i = n / 2;
    let x = |k: usize| curve.fitx[k] * cal.xm_per_pix;
    let y = |k: usize| curve.ploty[k] * cal.ym_per_pix;
    let dy = y(i + 1) - y(i - 1);
    let h = 0.5 * dy;
    let d1 = (x(i + 1) - x(i - 1)) / dy;
    let d2 = (x(i + 1) - 2.0 * x(i) + x(i - 1)) / (h * h);
    Ok((1.0 + d1 * d1).powf(1.5) / d2.abs())
}

/// Distance of the image center from the midpoint between both boundaries,
/// evaluated at `cal.eval_row`.
pub fn lateral_offset(
    left: &LaneCurve,
    right: &LaneCurve,
    image_width: usize,
    cal: &Calibration,
) -> Result<LateralOffset, LaneError> {
    for curve in [left, right] {
        if cal.eval_row >= curve.len() {
            return Err(LaneError::ShapeMismatch {
                what: "lane curve rows",
                expected: (1, cal.eval_row + 1),
                found: (1, curve.len()),
            });
        }
    }
    let row = cal.eval_row as f64;
    let lane_center_px = 0.5 * (left.x_at(row) + right.x_at(row));
    let image_center_px = image_width as f64 / 2.0;
    let delta = image_center_px - lane_center_px;
    let side = if delta > 0.0 {
        OffsetSide::Right
    } else if delta < 0.0 {
        OffsetSide::Left
    } else {
        OffsetSide::Centered
    };
    Ok(LateralOffset {
        magnitude_m: delta.abs() * cal.xm_per_pix,
        lane_center_px,
        image_center_px,
        side,
    })
}

/// Both radii and the offset for one frame.
pub fn measure_lane(
    left: &LaneCurve,
    right: &LaneCurve,
    image_width: usize,
    cal: &Calibration,
) -> Result<LaneMeasurement, LaneError> {
    let left_radius_m = radius_of_curvature(left, cal)?;
    let right_radius_m = radius_of_curvature(right, cal)?;
    let radius_m = match cal.curvature_boundary {
        Boundary::Left => left_radius_m,
        Boundary::Right => right_radius_m,
    };
    let offset = lateral_offset(left, right, image_width, cal)?;
    Ok(LaneMeasurement {
        radius_m,
        left_radius_m,
        right_radius_m,
        offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_matches_hand_computation() {
        let left = LaneCurve::from_coeffs([0.0, 0.0, 300.0], 720);
        let right = LaneCurve::from_coeffs([0.0, 0.0, 1000.0], 720);
        let cal = Calibration::default();
        let off = lateral_offset(&left, &right, 1280, &cal).unwrap();
        let expected = ((300.0 + 1000.0) / 2.0 - 640.0f64).abs() * 3.7 / 700.0;
        assert!((off.magnitude_m - expected).abs() < 1e-12);
        assert!((off.magnitude_m - 0.052857).abs() < 1e-5);
        assert_eq!(off.lane_center_px, 650.0);
        assert_eq!(off.side, OffsetSide::Left);
    }

    #[test]
    fn radius_decreases_as_curvature_grows() {
        let cal = Calibration::default();
        let radii: Vec<f64> = [1e-5, 5e-5, 1e-4, 5e-4, 1e-3, 2e-3]
            .iter()
            .map(|&a| {
                let curve = LaneCurve::from_coeffs([a, 0.0, 300.0], 720);
                radius_of_curvature(&curve, &cal).unwrap()
            })
            .collect();
        assert!(
            radii.windows(2).all(|w| w[1] < w[0]),
            "radii not decreasing: {radii:?}"
        );
    }

    #[test]
    fn radius_matches_closed_form_for_parabola() {
        // x = a·y² in meters has R = (1 + (2aY)²)^1.5 / |2a|.
        let cal = Calibration::default();
        let a_px = 3e-4;
        let curve = LaneCurve::from_coeffs([a_px, 0.0, 0.0], 720);
        let a_m = a_px * cal.xm_per_pix / (cal.ym_per_pix * cal.ym_per_pix);
        let y_m = 360.0 * cal.ym_per_pix;
        let expected = (1.0 + (2.0 * a_m * y_m).powi(2)).powf(1.5) / (2.0 * a_m).abs();
        let got = radius_of_curvature(&curve, &cal).unwrap();
        assert!((got - expected).abs() / expected < 1e-6, "{got} vs {expected}");
    }

    #[test]
    fn straight_line_has_unbounded_radius() {
        let curve = LaneCurve::from_coeffs([0.0, 0.02, 300.0], 720);
        let r = radius_of_curvature(&curve, &Calibration::default()).unwrap();
        assert!(r > 1e6);
    }

    #[test]
    fn short_curve_is_rejected() {
        let curve = LaneCurve::from_coeffs([0.0, 0.0, 1.0], 2);
        assert!(radius_of_curvature(&curve, &Calibration::default()).is_err());
        let left = LaneCurve::from_coeffs([0.0, 0.0, 1.0], 600);
        assert!(lateral_offset(&left, &left, 1280, &Calibration::default()).is_err());
    }
}
