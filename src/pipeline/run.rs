//! [`LanePipeline`] driving lane estimation end-to-end.
//!
//! Typical usage:
//! ```no_run
//! use lane_geometry::image::{Frame, ImageRgb8};
//! use lane_geometry::{LaneParams, LanePipeline};
//!
//! # fn example(rgb: ImageRgb8) -> Result<(), lane_geometry::LaneError> {
//! let pipeline = LanePipeline::new(LaneParams::default())?;
//! let estimate = pipeline.process(&Frame::Rgb(rgb))?;
//! println!("radius {:.1} m", estimate.measurement.radius_m);
//! let overlay = pipeline.render(&rgb, &estimate)?;
//! # let _ = overlay;
//! # Ok(())
//! # }
//! ```
use super::params::LaneParams;
use crate::diagnostics::{
    ExtractionStage, InputDescriptor, LaneReport, LocatorStage, PipelineTrace,
    RectificationStage, TimingBreakdown,
};
use crate::error::LaneError;
use crate::fit::fit_lane_curve;
use crate::geometry::measure_lane;
use crate::image::{Frame, ImageRgb8, Mask, RgbImageBuf};
use crate::locator::{locate_lane_pixels, LanePixels};
use crate::overlay::{render_overlay, OverlayFont};
use crate::rectify::{rectify, PerspectiveMapping};
use crate::threshold::extract_lane_mask;
use crate::types::LaneEstimate;
use log::debug;
use rayon::prelude::*;
use std::time::Instant;

/// Stateless lane estimator holding validated parameters and the
/// precomputed perspective mapping.
#[derive(Clone, Debug)]
pub struct LanePipeline {
    params: LaneParams,
    mapping: PerspectiveMapping,
    font: OverlayFont,
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

impl LanePipeline {
    /// Validate `params`, compute the perspective mapping and load the
    /// overlay font once.
    pub fn new(params: LaneParams) -> Result<Self, LaneError> {
        params.validate()?;
        let mapping = PerspectiveMapping::compute(&params.rectifier)?;
        let font = match &params.overlay.font_path {
            Some(path) => OverlayFont::load(path)?,
            None => OverlayFont::bundled()?,
        };
        debug!(
            "LanePipeline::new frame={}x{} windows={} margin={} minpix={}",
            params.frame.width,
            params.frame.height,
            params.locator.nwindows,
            params.locator.margin,
            params.locator.minpix
        );
        Ok(Self {
            params,
            mapping,
            font,
        })
    }

    /// Use `font` for overlay text instead of `overlay.font_path`.
    pub fn with_font(mut self, font: OverlayFont) -> Self {
        self.font = font;
        self
    }

    pub fn params(&self) -> &LaneParams {
        &self.params
    }

    pub fn mapping(&self) -> &PerspectiveMapping {
        &self.mapping
    }

    fn expected_size(&self) -> (usize, usize) {
        (self.params.frame.width, self.params.frame.height)
    }

    fn check_size(&self, what: &'static str, found: (usize, usize)) -> Result<(), LaneError> {
        let expected = self.expected_size();
        if found != expected {
            return Err(LaneError::ShapeMismatch {
                what,
                expected,
                found,
            });
        }
        Ok(())
    }

    /// Camera frame to lane estimate (extraction through measurement).
    pub fn process(&self, frame: &Frame<'_>) -> Result<LaneEstimate, LaneError> {
        self.process_with_diagnostics(frame)
            .map(|report| report.estimate)
    }

    /// Estimate from an already rectified binary mask, skipping extraction
    /// and rectification.
    pub fn process_birdseye(&self, mask: &Mask) -> Result<LaneEstimate, LaneError> {
        let start = Instant::now();
        let pixels = locate_lane_pixels(mask, &self.params.locator, self.expected_size())?;
        let mut estimate = self.estimate_from_pixels(&pixels)?;
        estimate.latency_ms = elapsed_ms(start);
        Ok(estimate)
    }

    /// Run every stage and keep a trace of what each one produced.
    pub fn process_with_diagnostics(&self, frame: &Frame<'_>) -> Result<LaneReport, LaneError> {
        self.check_size("input frame", (frame.width(), frame.height()))?;
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();

        let start = Instant::now();
        let extraction = extract_lane_mask(frame, &self.params.extractor)?;
        let extract_ms = elapsed_ms(start);
        timings.push("extract", extract_ms);

        let start = Instant::now();
        let birdseye_mask = rectify(&extraction.mask, &self.mapping.forward)?;
        let rectify_ms = elapsed_ms(start);
        timings.push("rectify", rectify_ms);

        let start = Instant::now();
        let pixels =
            locate_lane_pixels(&birdseye_mask, &self.params.locator, self.expected_size())?;
        let locate_ms = elapsed_ms(start);
        timings.push("locate", locate_ms);

        let start = Instant::now();
        let mut estimate = self.estimate_from_pixels(&pixels)?;
        timings.push("fit+measure", elapsed_ms(start));

        timings.total_ms = elapsed_ms(total_start);
        estimate.latency_ms = timings.total_ms;
        debug!(
            "LanePipeline::process mask={} birdseye={} left={} right={} degraded={} total_ms={:.3}",
            extraction.counts.combined,
            birdseye_mask.count_nonzero(),
            pixels.left.len(),
            pixels.right.len(),
            estimate.degraded,
            timings.total_ms
        );

        let trace = PipelineTrace {
            input: InputDescriptor {
                width: frame.width(),
                height: frame.height(),
                img_type: frame.img_type(),
            },
            timings,
            extraction: Some(ExtractionStage {
                counts: extraction.counts,
                elapsed_ms: extract_ms,
            }),
            rectification: Some(RectificationStage {
                forward: self.mapping.forward,
                birdseye_on_pixels: birdseye_mask.count_nonzero(),
                elapsed_ms: rectify_ms,
            }),
            locator: LocatorStage {
                left_base: pixels.left_base,
                right_base: pixels.right_base,
                left_pixels: pixels.left.len(),
                right_pixels: pixels.right.len(),
                bands: pixels.bands,
                elapsed_ms: locate_ms,
            },
        };
        Ok(LaneReport {
            estimate,
            trace,
            birdseye_mask,
        })
    }

    /// Process independent frames in parallel; results keep input order.
    pub fn process_batch(&self, frames: &[Frame<'_>]) -> Vec<Result<LaneEstimate, LaneError>> {
        frames.par_iter().map(|frame| self.process(frame)).collect()
    }

    /// Draw the lane area and measurements of `estimate` onto `frame`.
    pub fn render(
        &self,
        frame: &ImageRgb8<'_>,
        estimate: &LaneEstimate,
    ) -> Result<RgbImageBuf, LaneError> {
        self.check_size("overlay frame", (frame.w, frame.h))?;
        render_overlay(
            frame,
            &self.mapping.inverse,
            estimate,
            &self.params.overlay,
            Some(&self.font),
        )
    }

    fn estimate_from_pixels(&self, pixels: &LanePixels) -> Result<LaneEstimate, LaneError> {
        let height = self.params.frame.height;
        let left = fit_lane_curve(&pixels.left, height);
        let right = fit_lane_curve(&pixels.right, height);
        let measurement = measure_lane(
            left.curve(),
            right.curve(),
            self.params.frame.width,
            &self.params.calibration,
        )?;
        let degraded = !(left.is_reliable() && right.is_reliable());
        Ok(LaneEstimate {
            left,
            right,
            measurement,
            degraded,
            latency_ms: 0.0,
        })
    }
}
