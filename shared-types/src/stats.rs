use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Aggregate counters shown in the stats bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_validations: u64,
    /// Percentage of runs that produced an outcome
    pub success_rate: f64,
    /// Mean validation time in milliseconds
    pub avg_response_time: u64,
    pub total_saved: f64,
}

impl Default for StatsSnapshot {
    fn default() -> Self {
        Self {
            total_validations: 0,
            success_rate: 100.0,
            avg_response_time: 0,
            total_saved: 0.0,
        }
    }
}
