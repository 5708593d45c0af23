//! Lane pipeline chaining the per-frame stages.
//!
//! Overview
//! - Extracts a binary lane mask from the camera frame by combining gradient
//!   and color cues.
//! - Rectifies the mask into a bird's-eye view through a fixed homography
//!   computed once from the road trapezoid.
//! - Seeds both boundaries from a bottom-half column histogram and walks a
//!   stack of sliding windows upward, collecting pixels per boundary.
//! - Fits `x = a·y² + b·y + c` per boundary; too few pixels yield a typed
//!   fallback curve and flag the frame as degraded.
//! - Converts the curves into a radius of curvature and a lateral offset.
//! - Optionally renders the lane area and measurements back onto the frame.
//!
//! Modules
//! - [`params`] – configuration aggregated for all stages.
//! - `run` – the [`LanePipeline`] implementation.
//!
//! The pipeline keeps no state between frames; [`LanePipeline::process_batch`]
//! runs independent frames in parallel.

pub mod params;
mod run;

pub use params::{FrameGeometry, LaneParams};
pub use run::LanePipeline;
