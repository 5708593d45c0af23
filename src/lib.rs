#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod pipeline;
pub mod types;

// Stage modules, usable on their own.
pub mod color;
pub mod edges;
pub mod fit;
pub mod geometry;
pub mod homography;
pub mod locator;
pub mod overlay;
pub mod rectify;
pub mod threshold;

// CLI configuration shared by the demo binary.
pub mod config;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::LaneError;
pub use crate::pipeline::{FrameGeometry, LaneParams, LanePipeline};
pub use crate::types::LaneEstimate;

pub use crate::diagnostics::{LaneReport, PipelineTrace};

pub use crate::fit::{FitError, FitOutcome, LaneCurve};
pub use crate::geometry::{Calibration, LaneMeasurement, LateralOffset};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use lane_geometry::prelude::*;
///
/// # fn main() -> Result<(), LaneError> {
/// let (w, h) = (1280usize, 720usize);
/// let mask = Mask::new(w, h);
/// let pipeline = LanePipeline::new(LaneParams::default())?;
/// let estimate = pipeline.process_birdseye(&mask)?;
/// println!("degraded={} radius_m={:.1}", estimate.degraded, estimate.measurement.radius_m);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{Frame, ImageRgb8, ImageU8, Mask};
    pub use crate::{LaneError, LaneEstimate, LaneParams, LanePipeline};
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    pub use crate::fit::{fit_lane_curve, polyfit2};
    pub use crate::geometry::{lateral_offset, measure_lane, radius_of_curvature};
    pub use crate::locator::{locate_lane_pixels, LanePixels, SlidingWindowParams};
    pub use crate::overlay::{render_overlay, OverlayFont, OverlayParams};
    pub use crate::rectify::{derectify, rectify, PerspectiveMapping, RectifierParams};
    pub use crate::threshold::{
        abs_sobel_thresh, dir_threshold, extract_lane_mask, h_channel_threshold,
        mag_sobel_thresh, s_channel_threshold, ExtractorParams, ThresholdBand,
    };

    pub use crate::diagnostics::{
        ExtractionStage, InputDescriptor, LocatorStage, RectificationStage, StageTiming,
        TimingBreakdown,
    };
}
