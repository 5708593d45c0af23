use crate::diagnostics::TimingBreakdown;
use crate::image::{ImgType, Mask};
use crate::locator::BandTrace;
use crate::threshold::CueCounts;
use crate::types::LaneEstimate;
use nalgebra::Matrix3;
use serde::Serialize;

/// Result produced by [`LanePipeline::process_with_diagnostics`](crate::LanePipeline).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneReport {
    pub estimate: LaneEstimate,
    pub trace: PipelineTrace,
    /// Rectified lane mask the search ran on.
    #[serde(skip)]
    pub birdseye_mask: Mask,
}

/// Stage-by-stage record of one pipeline run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction: Option<ExtractionStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rectification: Option<RectificationStage>,
    pub locator: LocatorStage,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub img_type: ImgType,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionStage {
    pub counts: CueCounts,
    pub elapsed_ms: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RectificationStage {
    pub forward: Matrix3<f64>,
    pub birdseye_on_pixels: usize,
    pub elapsed_ms: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatorStage {
    pub left_base: usize,
    pub right_base: usize,
    pub left_pixels: usize,
    pub right_pixels: usize,
    pub bands: Vec<BandTrace>,
    pub elapsed_ms: f64,
}
