//! Parameter types configuring the pipeline stages.
//!
//! Defaults match a 1280×720 forward camera with the standard road trapezoid.

use crate::error::LaneError;
use crate::geometry::Calibration;
use crate::locator::SlidingWindowParams;
use crate::overlay::OverlayParams;
use crate::rectify::RectifierParams;
use crate::threshold::ExtractorParams;
use serde::{Deserialize, Serialize};

/// Frame size every input must match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameGeometry {
    pub width: usize,
    pub height: usize,
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Pipeline-wide parameters.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneParams {
    pub frame: FrameGeometry,
    pub extractor: ExtractorParams,
    pub rectifier: RectifierParams,
    pub locator: SlidingWindowParams,
    pub calibration: Calibration,
    pub overlay: OverlayParams,
}

impl LaneParams {
    /// Reject structurally invalid settings before any frame is processed.
    pub fn validate(&self) -> Result<(), LaneError> {
        if self.frame.width < 2 || self.frame.height < 3 {
            return Err(LaneError::config(
                "frame",
                format!(
                    "{}x{} is too small to hold two boundaries",
                    self.frame.width, self.frame.height
                ),
            ));
        }
        self.extractor.validate()?;
        self.rectifier.validate()?;
        self.locator.validate(self.frame.height)?;
        self.calibration.validate(self.frame.height)?;
        self.overlay.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(LaneParams::default().validate().is_ok());
    }

    #[test]
    fn more_windows_than_rows_is_rejected() {
        let mut params = LaneParams::default();
        params.locator.nwindows = 721;
        assert!(params.validate().is_err());
    }

    #[test]
    fn eval_row_outside_frame_is_rejected() {
        let mut params = LaneParams::default();
        params.frame.height = 480;
        params.rectifier.src.near_left[1] = 470.0;
        params.rectifier.src.near_right[1] = 470.0;
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("eval_row"), "{err}");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let params: LaneParams =
            serde_json::from_str(r#"{ "locator": { "nwindows": 12 } }"#).unwrap();
        assert_eq!(params.locator.nwindows, 12);
        assert_eq!(params.locator.margin, 100);
        assert_eq!(params.frame, FrameGeometry::default());
    }
}
