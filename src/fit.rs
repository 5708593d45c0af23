//! Second-degree curve fitting for lane boundaries.
//!
//! Boundaries are fitted as `x = a·y² + b·y + c` with y as the independent
//! variable: in the bird's-eye view lane lines run close to vertical, where
//! `y(x)` would have an unbounded slope.
//!
//! A fit needs at least three distinct pixels and a non-singular system.
//! Otherwise the fitter substitutes the fallback coefficients `[1, 1, 0]` and
//! reports why through [`FitOutcome::Fallback`], so a frame degrades instead
//! of aborting.

use crate::locator::Pixel;
use log::warn;
use nalgebra::{Matrix3, Vector3};
use serde::Serialize;
use std::collections::HashSet;

/// Coefficients substituted when a boundary cannot be fitted.
pub const FALLBACK_COEFFS: [f64; 3] = [1.0, 1.0, 0.0];

const MIN_POINTS: usize = 3;

/// Fitted (or fallback) boundary resampled at every row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LaneCurve {
    /// `[a, b, c]` for `x = a·y² + b·y + c`, pixel units.
    pub coeffs: [f64; 3],
    /// Strictly increasing rows `0, 1, …, H-1`.
    pub ploty: Vec<f64>,
    /// `x(y)` for each entry of `ploty`.
    pub fitx: Vec<f64>,
}

impl LaneCurve {
    /// Sample the polynomial at every integer row of an `height`-row frame.
    pub fn from_coeffs(coeffs: [f64; 3], height: usize) -> Self {
        let ploty: Vec<f64> = (0..height).map(|y| y as f64).collect();
        let fitx = ploty.iter().map(|&y| eval(&coeffs, y)).collect();
        Self {
            coeffs,
            ploty,
            fitx,
        }
    }

    /// Evaluate the polynomial at an arbitrary row.
    #[inline]
    pub fn x_at(&self, y: f64) -> f64 {
        eval(&self.coeffs, y)
    }

    pub fn len(&self) -> usize {
        self.ploty.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ploty.is_empty()
    }
}

#[inline]
fn eval(c: &[f64; 3], y: f64) -> f64 {
    (c[0] * y + c[1]) * y + c[2]
}

/// Why a boundary fell back to [`FALLBACK_COEFFS`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum FitError {
    InsufficientPoints { found: usize, minimum: usize },
    Singular,
}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitError::InsufficientPoints { found, minimum } => {
                write!(f, "insufficient points ({found} < {minimum})")
            }
            FitError::Singular => write!(f, "normal equations are singular"),
        }
    }
}

impl std::error::Error for FitError {}

/// Result of fitting one boundary.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum FitOutcome {
    Fitted { curve: LaneCurve },
    Fallback { curve: LaneCurve, reason: FitError },
}

impl FitOutcome {
    pub fn curve(&self) -> &LaneCurve {
        match self {
            FitOutcome::Fitted { curve } | FitOutcome::Fallback { curve, .. } => curve,
        }
    }

    pub fn is_reliable(&self) -> bool {
        matches!(self, FitOutcome::Fitted { .. })
    }

    pub fn fallback_reason(&self) -> Option<FitError> {
        match self {
            FitOutcome::Fitted { .. } => None,
            FitOutcome::Fallback { reason, .. } => Some(*reason),
        }
    }
}

/// Ordinary least-squares fit of `x(y)` over `pixels`.
///
/// Rows are normalised by `scale` before accumulating the normal equations
/// to keep the `y⁴` moments well conditioned; the coefficients are mapped
/// back to pixel units.
pub fn polyfit2(pixels: &[Pixel], scale: f64) -> Result<[f64; 3], FitError> {
    let distinct: HashSet<&Pixel> = pixels.iter().collect();
    if distinct.len() < MIN_POINTS {
        return Err(FitError::InsufficientPoints {
            found: distinct.len(),
            minimum: MIN_POINTS,
        });
    }
    // The quadratic is determined only by three or more distinct rows.
    let rows: HashSet<usize> = pixels.iter().map(|p| p.y).collect();
    if rows.len() < MIN_POINTS {
        return Err(FitError::Singular);
    }
    let s = if scale > 0.0 { scale } else { 1.0 };
    let mut m = [0.0f64; 5];
    let mut rhs = Vector3::zeros();
    for p in pixels {
        let t = p.y as f64 / s;
        let x = p.x as f64;
        let t2 = t * t;
        m[0] += 1.0;
        m[1] += t;
        m[2] += t2;
        m[3] += t2 * t;
        m[4] += t2 * t2;
        rhs[0] += x * t2;
        rhs[1] += x * t;
        rhs[2] += x;
    }
    let normal = Matrix3::new(m[4], m[3], m[2], m[3], m[2], m[1], m[2], m[1], m[0]);
    let sol = normal.lu().solve(&rhs).ok_or(FitError::Singular)?;
    if sol.iter().any(|v| !v.is_finite()) {
        return Err(FitError::Singular);
    }
    Ok([sol[0] / (s * s), sol[1] / s, sol[2]])
}

/// Fit one boundary and resample it over `height` rows, falling back to
/// [`FALLBACK_COEFFS`] when the fit is not possible.
pub fn fit_lane_curve(pixels: &[Pixel], height: usize) -> FitOutcome {
    let scale = height.saturating_sub(1).max(1) as f64;
    match polyfit2(pixels, scale) {
        Ok(coeffs) => FitOutcome::Fitted {
            curve: LaneCurve::from_coeffs(coeffs, height),
        },
        Err(reason) => {
            warn!("lane fit fell back to default curve: {reason}");
            FitOutcome::Fallback {
                curve: LaneCurve::from_coeffs(FALLBACK_COEFFS, height),
                reason,
            }
        }
    }
}
