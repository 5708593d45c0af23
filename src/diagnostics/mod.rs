//! Diagnostics data model returned by
//! [`LanePipeline::process_with_diagnostics`](crate::LanePipeline).
//!
//! `LaneReport` bundles the per-frame estimate with a `PipelineTrace` that
//! records what each stage saw and how long it took.

pub mod timing;
pub mod trace;

pub use timing::{StageTiming, TimingBreakdown};
pub use trace::{
    ExtractionStage, InputDescriptor, LaneReport, LocatorStage, PipelineTrace,
    RectificationStage,
};
