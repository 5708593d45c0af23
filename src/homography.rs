//! Plane-to-plane homographies from exactly four correspondences.
use crate::error::LaneError;
use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

const EPS: f64 = 1e-12;

/// Solve the 3×3 homography `H` (with `H[2][2] = 1`) mapping each `src[i]`
/// onto `dst[i]`.
///
/// Fails when the correspondence is degenerate (three collinear points or
/// repeated points on either side).
pub fn perspective_from_quad(
    src: &[[f64; 2]; 4],
    dst: &[[f64; 2]; 4],
) -> Result<Matrix3<f64>, LaneError> {
    if src.iter().chain(dst).flatten().any(|v| !v.is_finite()) {
        return Err(LaneError::config(
            "rectifier",
            "correspondence contains non-finite coordinates",
        ));
    }
    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();
    for i in 0..4 {
        let [x, y] = src[i];
        let [u, v] = dst[i];
        let r = 2 * i;
        a[(r, 0)] = x;
        a[(r, 1)] = y;
        a[(r, 2)] = 1.0;
        a[(r, 6)] = -x * u;
        a[(r, 7)] = -y * u;
        b[r] = u;

        a[(r + 1, 3)] = x;
        a[(r + 1, 4)] = y;
        a[(r + 1, 5)] = 1.0;
        a[(r + 1, 6)] = -x * v;
        a[(r + 1, 7)] = -y * v;
        b[r + 1] = v;
    }
    let h = a
        .full_piv_lu()
        .solve(&b)
        .filter(|h| h.iter().all(|v| v.is_finite()))
        .ok_or_else(|| LaneError::config("rectifier", "degenerate point correspondence"))?;
    Ok(Matrix3::new(
        h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0,
    ))
}

/// Map one point through `h`, `None` when it lands on the line at infinity.
#[inline]
pub fn project_point(h: &Matrix3<f64>, p: [f64; 2]) -> Option<[f64; 2]> {
    let v = h * Vector3::new(p[0], p[1], 1.0);
    let w = v[2];
    if !w.is_finite() || w.abs() <= EPS || !v[0].is_finite() || !v[1].is_finite() {
        return None;
    }
    Some([v[0] / w, v[1] / w])
}
