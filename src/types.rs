use crate::fit::FitOutcome;
use crate::geometry::LaneMeasurement;
use serde::Serialize;

/// Per-frame lane estimate: both boundary fits and the derived geometry.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneEstimate {
    pub left: FitOutcome,
    pub right: FitOutcome,
    pub measurement: LaneMeasurement,
    /// True when either boundary fell back to the placeholder curve.
    pub degraded: bool,
    pub latency_ms: f64,
}

impl LaneEstimate {
    pub fn is_reliable(&self) -> bool {
        !self.degraded
    }
}
