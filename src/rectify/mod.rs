//! Bird's-eye rectification of camera frames and masks.
//!
//! A [`PerspectiveMapping`] is derived once from two fixed quadrilaterals: a
//! trapezoid on the road surface in the camera view and the rectangle it
//! should become in plan view. The forward and inverse matrices are always
//! built together from the same correspondence.
//!
//! [`rectify`] and [`derectify`] resample any [`Warp`] raster through
//! `imageproc`'s bilinear `warp_into`. Pixels that map outside the source
//! read as zero.

mod warp;

pub use warp::Warp;

use crate::error::LaneError;
use crate::homography::{perspective_from_quad, project_point};
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// Four corners of the lane region, named by their position on the road.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoadQuad {
    pub near_left: [f64; 2],
    pub near_right: [f64; 2],
    pub far_left: [f64; 2],
    pub far_right: [f64; 2],
}

impl RoadQuad {
    pub fn corners(&self) -> [[f64; 2]; 4] {
        [self.near_left, self.near_right, self.far_left, self.far_right]
    }

    fn is_finite(&self) -> bool {
        self.corners().iter().flatten().all(|v| v.is_finite())
    }

    fn near_width(&self) -> f64 {
        self.near_right[0] - self.near_left[0]
    }

    fn far_width(&self) -> f64 {
        self.far_right[0] - self.far_left[0]
    }
}

/// Calibration constants of the rectifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectifierParams {
    /// Road trapezoid in the camera view.
    pub src: RoadQuad,
    /// Target rectangle in the bird's-eye view.
    pub dst: RoadQuad,
}

impl Default for RectifierParams {
    fn default() -> Self {
        Self {
            src: RoadQuad {
                near_left: [200.0, 700.0],
                near_right: [1110.0, 700.0],
                far_left: [590.0, 450.0],
                far_right: [690.0, 450.0],
            },
            dst: RoadQuad {
                near_left: [200.0, 700.0],
                near_right: [950.0, 700.0],
                far_left: [200.0, 0.0],
                far_right: [950.0, 0.0],
            },
        }
    }
}

impl RectifierParams {
    /// Reject correspondences that cannot describe a road seen in
    /// perspective: the near edge must be wider than the far edge and lower
    /// in the image, and both quads must keep left left of right.
    pub fn validate(&self) -> Result<(), LaneError> {
        if !self.src.is_finite() || !self.dst.is_finite() {
            return Err(LaneError::config(
                "rectifier",
                "corner coordinates must be finite",
            ));
        }
        let src = &self.src;
        if src.near_width() <= 0.0 || src.far_width() <= 0.0 {
            return Err(LaneError::config(
                "rectifier.src",
                "left corners must lie left of right corners",
            ));
        }
        if src.near_width() <= src.far_width() {
            return Err(LaneError::config(
                "rectifier.src",
                "near-field edge must be wider than far-field edge",
            ));
        }
        let near_y = 0.5 * (src.near_left[1] + src.near_right[1]);
        let far_y = 0.5 * (src.far_left[1] + src.far_right[1]);
        if far_y >= near_y {
            return Err(LaneError::config(
                "rectifier.src",
                "far-field edge must sit higher in the image than the near-field edge",
            ));
        }
        let dst = &self.dst;
        if dst.near_width() <= 0.0 || dst.far_width() <= 0.0 {
            return Err(LaneError::config(
                "rectifier.dst",
                "left corners must lie left of right corners",
            ));
        }
        Ok(())
    }
}

/// Forward (camera → bird's-eye) and inverse homographies.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PerspectiveMapping {
    pub forward: Matrix3<f64>,
    pub inverse: Matrix3<f64>,
}

impl PerspectiveMapping {
    /// Build both matrices from one correspondence. Independent of image
    /// content; compute once and reuse across frames.
    pub fn compute(params: &RectifierParams) -> Result<Self, LaneError> {
        params.validate()?;
        let src = params.src.corners();
        let dst = params.dst.corners();
        let forward = perspective_from_quad(&src, &dst)?;
        let inverse = perspective_from_quad(&dst, &src)?;
        Ok(Self { forward, inverse })
    }

    /// Camera-view point to bird's-eye point.
    pub fn to_birdseye(&self, p: [f64; 2]) -> Option<[f64; 2]> {
        project_point(&self.forward, p)
    }

    /// Bird's-eye point back to the camera view.
    pub fn to_camera(&self, p: [f64; 2]) -> Option<[f64; 2]> {
        project_point(&self.inverse, p)
    }
}

/// Resample `image` into the bird's-eye view. The output keeps the input's
/// width and height.
pub fn rectify<T: Warp>(image: &T, forward: &Matrix3<f64>) -> Result<T, LaneError> {
    let (w, h) = image.size();
    warp_through(image, forward, (w, h))
}

/// Bring bird's-eye content back to the camera view at `output_size`
/// (`(width, height)`).
pub fn derectify<T: Warp>(
    image: &T,
    inverse: &Matrix3<f64>,
    output_size: (usize, usize),
) -> Result<T, LaneError> {
    warp_through(image, inverse, output_size)
}

fn warp_through<T: Warp>(
    image: &T,
    m: &Matrix3<f64>,
    output_size: (usize, usize),
) -> Result<T, LaneError> {
    let projection = warp::projection_from(m)
        .ok_or_else(|| LaneError::config("rectifier", "warp matrix is singular"))?;
    Ok(image.warp(&projection, output_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Mask;

    #[test]
    fn default_mapping_is_consistent() {
        let mapping = PerspectiveMapping::compute(&RectifierParams::default()).unwrap();
        let product = mapping.forward * mapping.inverse;
        let scaled = product / product[(2, 2)];
        assert!((scaled - Matrix3::identity()).abs().max() < 1e-9);
    }

    #[test]
    fn points_round_trip_through_both_directions() {
        let mapping = PerspectiveMapping::compute(&RectifierParams::default()).unwrap();
        for &p in &[[640.0, 600.0], [300.0, 690.0], [600.0, 470.0], [1000.0, 680.0]] {
            let bird = mapping.to_birdseye(p).unwrap();
            let back = mapping.to_camera(bird).unwrap();
            assert!(
                (back[0] - p[0]).abs() < 1e-6 && (back[1] - p[1]).abs() < 1e-6,
                "{p:?} -> {bird:?} -> {back:?}"
            );
        }
    }

    #[test]
    fn inverted_trapezoid_is_rejected() {
        let mut params = RectifierParams::default();
        std::mem::swap(&mut params.src.near_left, &mut params.src.far_left);
        std::mem::swap(&mut params.src.near_right, &mut params.src.far_right);
        assert!(matches!(
            PerspectiveMapping::compute(&params),
            Err(LaneError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn rectify_preserves_size_and_derectify_honours_output_size() {
        let mapping = PerspectiveMapping::compute(&RectifierParams::default()).unwrap();
        let mask = Mask::new(1280, 720);
        let bird = rectify(&mask, &mapping.forward).unwrap();
        assert_eq!((bird.w, bird.h), (1280, 720));
        let back = derectify(&bird, &mapping.inverse, (640, 360)).unwrap();
        assert_eq!((back.w, back.h), (640, 360));
    }

    #[test]
    fn singular_warp_matrix_is_a_config_error() {
        let mask = Mask::new(8, 8);
        assert!(matches!(
            rectify(&mask, &Matrix3::zeros()),
            Err(LaneError::InvalidConfig { .. })
        ));
    }
}
