//! Structural errors that reject a frame (or a configuration) outright.
//!
//! Numeric degeneracies inside a stage are not errors: a flat gradient
//! response yields an all-zero mask and an under-determined fit yields a
//! fallback curve (see [`crate::fit::FitOutcome`]).

use crate::image::ImgType;

#[derive(Clone, Debug, PartialEq)]
pub enum LaneError {
    /// A parameter or calibration constant is unusable.
    InvalidConfig { field: &'static str, reason: String },
    /// An input's size disagrees with the configured frame geometry.
    ShapeMismatch {
        what: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// The requested conversion mode does not match the frame's channels.
    ChannelMismatch { requested: ImgType, found: ImgType },
}

impl LaneError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        LaneError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for LaneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LaneError::InvalidConfig { field, reason } => {
                write!(f, "invalid configuration `{field}`: {reason}")
            }
            LaneError::ShapeMismatch {
                what,
                expected,
                found,
            } => write!(
                f,
                "{what} has size {}x{}, expected {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
            LaneError::ChannelMismatch { requested, found } => write!(
                f,
                "conversion mode {requested:?} requested on a {found:?} frame"
            ),
        }
    }
}

impl std::error::Error for LaneError {}
