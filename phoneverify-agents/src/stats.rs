use std::sync::Mutex;

use shared_types::{StatsSnapshot, ValidationOutcome};
use tracing::debug;

use crate::error::PipelineError;

/// Notified by the pipeline once per run
pub trait PipelineObserver: Send + Sync {
    fn on_outcome(&self, outcome: &ValidationOutcome);
    fn on_failure(&self, error: &PipelineError);
}

#[derive(Debug, Default)]
struct Counters {
    completed: u64,
    failed: u64,
    total_response_ms: u64,
    total_saved: f64,
}

/// Process-wide validation counters
#[derive(Debug, Default)]
pub struct ValidationStats {
    counters: Mutex<Counters>,
}

impl ValidationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        let total = counters.completed + counters.failed;
        if total == 0 {
            return StatsSnapshot::default();
        }

        let avg_response_time = if counters.completed == 0 {
            0
        } else {
            (counters.total_response_ms as f64 / counters.completed as f64).round() as u64
        };

        StatsSnapshot {
            total_validations: total,
            success_rate: counters.completed as f64 / total as f64 * 100.0,
            avg_response_time,
            total_saved: counters.total_saved,
        }
    }
}

impl PipelineObserver for ValidationStats {
    fn on_outcome(&self, outcome: &ValidationOutcome) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters.completed += 1;
        counters.total_response_ms += outcome.validation_time;
        counters.total_saved += outcome.cost_saved;
        debug!(completed = counters.completed, "recorded validation outcome");
    }

    fn on_failure(&self, error: &PipelineError) {
        if !error.is_fatal() {
            return;
        }
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters.failed += 1;
        debug!(failed = counters.failed, "recorded validation failure");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{LineType, WhatsappStatus};

    fn outcome(validation_time: u64, cost_saved: f64) -> ValidationOutcome {
        ValidationOutcome {
            phone_number: "5551234567".to_string(),
            country_code: "+1".to_string(),
            country_name: "United States".to_string(),
            carrier: "Verizon".to_string(),
            line_type: LineType::Mobile,
            is_valid: true,
            whatsapp_status: WhatsappStatus::Verified,
            confidence_score: 100,
            cost_saved,
            validation_time,
            retry_count: 0,
        }
    }

    #[test]
    fn test_empty_snapshot() {
        let stats = ValidationStats::new();
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_validations, 0);
        assert_eq!(snapshot.success_rate, 100.0);
    }

    #[test]
    fn test_running_average_and_savings() {
        let stats = ValidationStats::new();
        stats.on_outcome(&outcome(100, 0.0));
        stats.on_outcome(&outcome(200, 0.012));
        stats.on_outcome(&outcome(301, 0.012));

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_validations, 3);
        assert_eq!(snapshot.avg_response_time, 200);
        assert!((snapshot.total_saved - 0.024).abs() < 1e-9);
        assert_eq!(snapshot.success_rate, 100.0);
    }

    #[test]
    fn test_fatal_failures_lower_success_rate() {
        let stats = ValidationStats::new();
        stats.on_outcome(&outcome(100, 0.0));
        stats.on_failure(&PipelineError::Fatal("no api key".to_string()));

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_validations, 2);
        assert_eq!(snapshot.success_rate, 50.0);
        assert_eq!(snapshot.avg_response_time, 100);
    }

    #[test]
    fn test_rejected_requests_are_not_counted() {
        let stats = ValidationStats::new();
        let err = PipelineError::from(extractors::RequestValidationError::NoDigits);
        stats.on_failure(&err);
        assert_eq!(stats.snapshot().total_validations, 0);
    }
}
