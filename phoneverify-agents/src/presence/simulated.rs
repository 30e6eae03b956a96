use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use extractors::NormalizedRequest;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared_types::LineType;

use super::{PresenceChecker, PresenceResult};
use crate::classifier::ClassificationResult;
use crate::error::PresenceCheckError;

fn presence_probability(line_type: LineType) -> f64 {
    match line_type {
        LineType::Mobile => 0.85,
        LineType::Voip => 0.40,
        LineType::Landline => 0.05,
    }
}

/// Seedable stand-in for a presence-check service
pub struct SimulatedPresenceChecker {
    rng: Mutex<StdRng>,
    failure_rate: f64,
}

impl SimulatedPresenceChecker {
    pub fn new(seed: Option<u64>, failure_rate: f64) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
            // NaN survives clamp and would panic in gen_bool
            failure_rate: if failure_rate.is_nan() {
                0.0
            } else {
                failure_rate.clamp(0.0, 1.0)
            },
        }
    }
}

#[async_trait]
impl PresenceChecker for SimulatedPresenceChecker {
    async fn check(
        &self,
        _request: &NormalizedRequest,
        classification: &ClassificationResult,
    ) -> Result<PresenceResult, PresenceCheckError> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        if rng.gen_bool(self.failure_rate) {
            return Err(PresenceCheckError::Simulated(
                "presence service unavailable".to_string(),
            ));
        }

        let probability = presence_probability(classification.line_type);
        Ok(PresenceResult {
            has_whatsapp: rng.gen_bool(probability),
            probability: Some((probability * 100.0).round() as u8),
            reasoning: Some(format!(
                "{} lines carry an account {:.0}% of the time",
                classification.line_type,
                probability * 100.0
            )),
        })
    }
}

/// Returns the same answer on every call and counts calls
pub struct StaticPresenceChecker {
    result: Result<PresenceResult, String>,
    calls: AtomicUsize,
}

impl StaticPresenceChecker {
    pub fn returning(has_whatsapp: bool) -> Self {
        Self {
            result: Ok(PresenceResult {
                has_whatsapp,
                probability: None,
                reasoning: None,
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            result: Err(reason.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PresenceChecker for StaticPresenceChecker {
    async fn check(
        &self,
        _request: &NormalizedRequest,
        _classification: &ClassificationResult,
    ) -> Result<PresenceResult, PresenceCheckError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone().map_err(PresenceCheckError::Simulated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification(line_type: LineType) -> ClassificationResult {
        ClassificationResult {
            line_type,
            ..ClassificationResult::fallback()
        }
    }

    #[tokio::test]
    async fn test_seeded_checker_is_deterministic() {
        let request = extractors::validate_request("5551234567", "+1").unwrap();
        let a = SimulatedPresenceChecker::new(Some(9), 0.0);
        let b = SimulatedPresenceChecker::new(Some(9), 0.0);

        for _ in 0..5 {
            let left = a.check(&request, &classification(LineType::Voip)).await.unwrap();
            let right = b.check(&request, &classification(LineType::Voip)).await.unwrap();
            assert_eq!(left, right);
        }
    }

    #[tokio::test]
    async fn test_reports_line_type_probability() {
        let request = extractors::validate_request("5551234567", "+1").unwrap();
        let checker = SimulatedPresenceChecker::new(Some(9), 0.0);

        let result = checker.check(&request, &classification(LineType::Mobile)).await.unwrap();
        assert_eq!(result.probability, Some(85));
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let request = extractors::validate_request("5551234567", "+1").unwrap();
        let checker = SimulatedPresenceChecker::new(None, 1.0);

        let err = checker.check(&request, &classification(LineType::Mobile)).await.unwrap_err();
        assert!(matches!(err, PresenceCheckError::Simulated(_)));
    }

    #[tokio::test]
    async fn test_nan_failure_rate_never_fails() {
        let request = extractors::validate_request("5551234567", "+1").unwrap();
        let checker = SimulatedPresenceChecker::new(Some(3), f64::NAN);

        for _ in 0..20 {
            assert!(checker.check(&request, &classification(LineType::Mobile)).await.is_ok());
        }
    }
}
