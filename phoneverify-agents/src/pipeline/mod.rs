//! The validation-and-scoring sequence.
//!
//! One run walks the stages below in order, narrating each step into a
//! [`LogTrail`]:
//!
//! ```text
//! Orchestrating -> Classifying -> Deciding -> CheckingPresence -> Scoring -> Done
//! ```
//!
//! Collaborator failures never abort a run. A classifier failure triggers a
//! single fallback to default values and costs one retry; a presence-check
//! failure leaves the status unchecked.

pub mod decision;
pub mod log_trail;
pub mod scoring;

pub use decision::{decide, RoutingDecision, PRESENCE_CHECK_COST};
pub use log_trail::LogTrail;
pub use scoring::ConfidenceComponents;

use std::sync::Arc;
use std::time::{Duration, Instant};

use extractors::NormalizedRequest;
use shared_types::{
    AgentLog, AgentType, ValidationOutcome, ValidationRequest, ValidationResponse, WhatsappStatus,
};
use tracing::{debug, error};

use crate::classifier::{ClassificationResult, Classifier};
use crate::error::PipelineError;
use crate::presence::PresenceChecker;
use crate::stats::PipelineObserver;
use crate::status_board::derive_agent_statuses;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    Orchestrating,
    Classifying,
    Deciding,
    CheckingPresence,
    Scoring,
    Done,
}

/// Outcome plus the narrated steps that produced it
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub outcome: ValidationOutcome,
    pub logs: Vec<AgentLog>,
}

impl From<ValidationReport> for ValidationResponse {
    fn from(report: ValidationReport) -> Self {
        let agents = derive_agent_statuses(&report.logs, true);
        ValidationResponse {
            outcome: report.outcome,
            logs: report.logs,
            agents,
        }
    }
}

struct RunState {
    stage: PipelineStage,
    trail: LogTrail,
    retry_count: u32,
}

impl RunState {
    fn advance(&mut self, next: PipelineStage) {
        debug_assert!(next > self.stage, "stage moved from {:?} to {:?}", self.stage, next);
        debug!(from = ?self.stage, to = ?next, "pipeline stage");
        self.stage = next;
    }
}

pub struct ValidationPipeline {
    classifier: Arc<dyn Classifier>,
    presence_checker: Arc<dyn PresenceChecker>,
    observer: Option<Arc<dyn PipelineObserver>>,
    fallback_delay: Duration,
}

impl ValidationPipeline {
    pub fn new(classifier: Arc<dyn Classifier>, presence_checker: Arc<dyn PresenceChecker>) -> Self {
        Self {
            classifier,
            presence_checker,
            observer: None,
            fallback_delay: Duration::ZERO,
        }
    }

    /// Notified after every run that produced an outcome or failed fatally
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Pause before falling back after a classifier failure
    pub fn with_fallback_delay(mut self, delay: Duration) -> Self {
        self.fallback_delay = delay;
        self
    }

    /// Validates the request, then runs every stage.
    ///
    /// Only request validation can fail here; collaborator failures degrade
    /// the outcome instead.
    pub async fn run(&self, request: &ValidationRequest) -> Result<ValidationReport, PipelineError> {
        let request = extractors::validate_request(&request.phone_number, &request.country_code)?;
        let report = self.execute(&request).await;

        if let Some(observer) = &self.observer {
            observer.on_outcome(&report.outcome);
        }

        Ok(report)
    }

    /// Runs on a separate task so a panicking collaborator surfaces as a
    /// fatal error rather than tearing down the caller.
    pub async fn run_isolated(
        self: Arc<Self>,
        request: ValidationRequest,
    ) -> Result<ValidationReport, PipelineError> {
        let pipeline = self.clone();
        let handle = tokio::spawn(async move { pipeline.run(&request).await });

        match handle.await {
            Ok(result) => result,
            Err(join_error) => {
                error!("Validation task failed: {}", join_error);
                let err = PipelineError::Fatal("validation task failed unexpectedly".to_string());
                self.report_failure(&err);
                Err(err)
            }
        }
    }

    /// Lets callers record fatal errors raised before the pipeline existed
    pub fn report_failure(&self, err: &PipelineError) {
        if let Some(observer) = &self.observer {
            observer.on_failure(err);
        }
    }

    async fn execute(&self, request: &NormalizedRequest) -> ValidationReport {
        let started = Instant::now();
        let display = request.display();
        let mut state = RunState {
            stage: PipelineStage::Orchestrating,
            trail: LogTrail::new(),
            retry_count: 0,
        };

        state.trail.info(
            AgentType::Orchestrator,
            format!("Received validation request for {}", display),
        );
        state
            .trail
            .thinking(AgentType::Orchestrator, "Initializing multi-agent AI pipeline...");

        state.advance(PipelineStage::Classifying);
        let classification = self.classify(request, &mut state).await;

        state.advance(PipelineStage::Deciding);
        state
            .trail
            .thinking(AgentType::Decision, "Analyzing validation results...");
        let routing = decide(classification.line_type);
        if routing.skip_presence_check {
            state.trail.warning(
                AgentType::Decision,
                "DECISION: Landline detected. Skipping WhatsApp check to optimize costs.",
            );
            state.trail.success(
                AgentType::Decision,
                format!(
                    "Cost saved: ${:.3} (WhatsApp API call avoided)",
                    routing.cost_saved
                ),
            );
        } else {
            state.trail.success(
                AgentType::Decision,
                "Mobile/VoIP detected. Proceeding with WhatsApp verification.",
            );
        }

        state.advance(PipelineStage::CheckingPresence);
        let whatsapp_status = if routing.skip_presence_check {
            state
                .trail
                .info(AgentType::Whatsapp, "Check skipped per Decision Agent directive");
            WhatsappStatus::Unchecked
        } else {
            self.check_presence(request, &classification, &mut state).await
        };

        state.advance(PipelineStage::Scoring);
        state.trail.thinking(
            AgentType::Confidence,
            "Computing confidence score using formula: S = (V×0.4) + (W×0.4) + (Q×0.2) - (R×0.05)",
        );
        let components =
            ConfidenceComponents::new(classification.is_valid, whatsapp_status, state.retry_count);
        let confidence_score = components.score();
        state.trail.info(AgentType::Confidence, components.describe());
        state.trail.success(
            AgentType::Confidence,
            format!("Final confidence score: {}/100", confidence_score),
        );

        state.advance(PipelineStage::Done);
        let validation_time = started.elapsed().as_millis() as u64;
        state.trail.success(
            AgentType::Orchestrator,
            format!("Validation complete. Total time: {}ms", validation_time),
        );

        ValidationReport {
            outcome: ValidationOutcome {
                phone_number: request.phone_number.clone(),
                country_code: request.country_code.clone(),
                country_name: classification.country_name,
                carrier: classification.carrier,
                line_type: classification.line_type,
                is_valid: classification.is_valid,
                whatsapp_status,
                confidence_score,
                cost_saved: routing.cost_saved,
                validation_time,
                retry_count: state.retry_count,
            },
            logs: state.trail.into_entries(),
        }
    }

    async fn classify(&self, request: &NormalizedRequest, state: &mut RunState) -> ClassificationResult {
        state
            .trail
            .thinking(AgentType::Validation, "Initiating AI-powered phone validation...");

        match self.classifier.classify(request).await {
            Ok(classification) => {
                state.trail.success(
                    AgentType::Validation,
                    format!("Format check passed. Country: {}", classification.country_name),
                );
                state.trail.success(
                    AgentType::Validation,
                    format!("Carrier lookup: {}", classification.carrier),
                );
                state.trail.success(
                    AgentType::Validation,
                    format!(
                        "Line type detected: {}",
                        classification.line_type.as_str().to_uppercase()
                    ),
                );
                classification
            }
            Err(err) => {
                state.trail.warning(
                    AgentType::Validation,
                    format!("Primary validation failed ({}). Activating Retry Agent.", err),
                );
                state.retry_count += 1;

                state.trail.thinking(
                    AgentType::Retry,
                    "Rate limit or error detected. Attempting fallback...",
                );
                if !self.fallback_delay.is_zero() {
                    tokio::time::sleep(self.fallback_delay).await;
                }
                state
                    .trail
                    .info(AgentType::Retry, "Using cached validation patterns as fallback");

                ClassificationResult::fallback()
            }
        }
    }

    async fn check_presence(
        &self,
        request: &NormalizedRequest,
        classification: &ClassificationResult,
        state: &mut RunState,
    ) -> WhatsappStatus {
        state.trail.thinking(
            AgentType::Whatsapp,
            "Initiating AI-powered WhatsApp presence detection...",
        );

        match self.presence_checker.check(request, classification).await {
            Ok(presence) => {
                if let Some(probability) = presence.probability {
                    state.trail.info(
                        AgentType::Whatsapp,
                        format!("Analysis complete. Probability: {}%", probability),
                    );
                }
                let status = presence.status();
                if status == WhatsappStatus::Verified {
                    state
                        .trail
                        .success(AgentType::Whatsapp, "WhatsApp account VERIFIED ✓");
                } else {
                    state
                        .trail
                        .warning(AgentType::Whatsapp, "No WhatsApp account detected");
                }
                status
            }
            Err(err) => {
                state.trail.warning(
                    AgentType::Whatsapp,
                    format!("WhatsApp check failed ({}), marking as unchecked", err),
                );
                WhatsappStatus::Unchecked
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::StaticClassifier;
    use crate::presence::{PresenceResult, StaticPresenceChecker};
    use crate::stats::ValidationStats;
    use crate::settings::{build_pipeline, LlmSettings, PipelineMode, PipelineSettings};
    use async_trait::async_trait;
    use proptest::prelude::*;
    use shared_types::{supported_countries, LineType, LogStatus};

    const CANONICAL_ORDER: [AgentType; 7] = [
        AgentType::Orchestrator,
        AgentType::Validation,
        AgentType::Retry,
        AgentType::Decision,
        AgentType::Whatsapp,
        AgentType::Confidence,
        AgentType::Orchestrator,
    ];

    fn verizon(line_type: LineType) -> ClassificationResult {
        ClassificationResult {
            is_valid: true,
            country_name: "United States".to_string(),
            carrier: "Verizon".to_string(),
            line_type,
            format_valid: true,
            confidence: 90,
        }
    }

    fn request() -> ValidationRequest {
        ValidationRequest::new("555-123-4567", "+1")
    }

    /// Agent order collapses consecutive duplicates, then must embed into
    /// the canonical order.
    fn assert_agent_order(logs: &[AgentLog]) {
        let mut agents: Vec<AgentType> = logs.iter().map(|l| l.agent).collect();
        agents.dedup();

        let mut cursor = 0;
        for agent in &agents {
            let found = CANONICAL_ORDER[cursor..].iter().position(|a| a == agent);
            match found {
                Some(offset) => cursor += offset + 1,
                None => panic!("agent order {:?} breaks canonical order", agents),
            }
        }
        assert_eq!(agents.first(), Some(&AgentType::Orchestrator));
        assert_eq!(agents.last(), Some(&AgentType::Orchestrator));
    }

    #[tokio::test]
    async fn test_verified_mobile_scores_100() {
        let classifier = Arc::new(StaticClassifier::returning(verizon(LineType::Mobile)));
        let presence = Arc::new(StaticPresenceChecker::returning(true));
        let pipeline = ValidationPipeline::new(classifier, presence.clone());

        let report = pipeline.run(&request()).await.unwrap();
        let outcome = &report.outcome;

        assert_eq!(outcome.phone_number, "5551234567");
        assert_eq!(outcome.country_code, "+1");
        assert_eq!(outcome.carrier, "Verizon");
        assert_eq!(outcome.whatsapp_status, WhatsappStatus::Verified);
        assert_eq!(outcome.confidence_score, 100);
        assert_eq!(outcome.cost_saved, 0.0);
        assert_eq!(outcome.retry_count, 0);
        assert_eq!(presence.calls(), 1);
        assert_agent_order(&report.logs);
    }

    #[tokio::test]
    async fn test_landline_skips_presence_check() {
        let classifier = Arc::new(StaticClassifier::returning(verizon(LineType::Landline)));
        let presence = Arc::new(StaticPresenceChecker::returning(true));
        let pipeline = ValidationPipeline::new(classifier, presence.clone());

        let report = pipeline.run(&request()).await.unwrap();

        assert_eq!(report.outcome.whatsapp_status, WhatsappStatus::Unchecked);
        assert_eq!(report.outcome.cost_saved, 0.012);
        assert_eq!(report.outcome.confidence_score, 80);
        assert_eq!(presence.calls(), 0);

        let decision_logs: Vec<_> = report
            .logs
            .iter()
            .filter(|l| l.agent == AgentType::Decision)
            .map(|l| l.status)
            .collect();
        assert_eq!(
            decision_logs,
            vec![LogStatus::Thinking, LogStatus::Warning, LogStatus::Success]
        );
        assert!(report
            .logs
            .iter()
            .any(|l| l.message == "Cost saved: $0.012 (WhatsApp API call avoided)"));
        assert_agent_order(&report.logs);
    }

    #[tokio::test]
    async fn test_classifier_failure_falls_back_once() {
        let classifier = Arc::new(StaticClassifier::failing("gateway returned 503"));
        let presence = Arc::new(StaticPresenceChecker::returning(true));
        let pipeline = ValidationPipeline::new(classifier.clone(), presence);

        let report = pipeline.run(&request()).await.unwrap();
        let outcome = &report.outcome;

        assert_eq!(classifier.calls(), 1);
        assert_eq!(outcome.retry_count, 1);
        assert_eq!(outcome.country_name, "Unknown");
        assert_eq!(outcome.carrier, "Unknown Carrier");
        assert_eq!(outcome.line_type, LineType::Mobile);
        assert!(outcome.is_valid);
        // V=1, W=1, Q=0.7, R=1
        assert_eq!(outcome.confidence_score, 89);

        assert!(report.logs.iter().any(|l| l.agent == AgentType::Retry));
        assert!(report
            .logs
            .iter()
            .any(|l| l.agent == AgentType::Confidence && l.message == "V=1, W=1.0, Q=0.7, R=1"));
        assert_agent_order(&report.logs);
    }

    #[tokio::test]
    async fn test_presence_failure_is_unchecked_without_retry() {
        let classifier = Arc::new(StaticClassifier::returning(verizon(LineType::Voip)));
        let presence = Arc::new(StaticPresenceChecker::failing("timeout"));
        let pipeline = ValidationPipeline::new(classifier, presence);

        let report = pipeline.run(&request()).await.unwrap();

        assert_eq!(report.outcome.whatsapp_status, WhatsappStatus::Unchecked);
        assert_eq!(report.outcome.retry_count, 0);
        assert_eq!(report.outcome.cost_saved, 0.0);
        assert_eq!(report.outcome.confidence_score, 80);
        assert!(report
            .logs
            .iter()
            .any(|l| l.agent == AgentType::Whatsapp && l.status == LogStatus::Warning));
    }

    #[tokio::test]
    async fn test_not_found_scores_60() {
        let classifier = Arc::new(StaticClassifier::returning(verizon(LineType::Mobile)));
        let presence = Arc::new(StaticPresenceChecker::returning(false));
        let pipeline = ValidationPipeline::new(classifier, presence);

        let report = pipeline.run(&request()).await.unwrap();
        assert_eq!(report.outcome.whatsapp_status, WhatsappStatus::NotFound);
        assert_eq!(report.outcome.confidence_score, 60);
    }

    #[tokio::test]
    async fn test_invalid_request_does_not_run() {
        let classifier = Arc::new(StaticClassifier::returning(verizon(LineType::Mobile)));
        let presence = Arc::new(StaticPresenceChecker::returning(true));
        let pipeline = ValidationPipeline::new(classifier.clone(), presence);

        let err = pipeline
            .run(&ValidationRequest::new("", "+1"))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::RequestValidation(_)));
        assert!(!err.is_fatal());
        assert_eq!(classifier.calls(), 0);
    }

    #[tokio::test]
    async fn test_log_shape_of_clean_run() {
        let classifier = Arc::new(StaticClassifier::returning(verizon(LineType::Mobile)));
        let presence = Arc::new(StaticPresenceChecker::returning(true));
        let pipeline = ValidationPipeline::new(classifier, presence);

        let report = pipeline.run(&request()).await.unwrap();
        let logs = &report.logs;

        assert_eq!(logs[0].message, "Received validation request for +1 5551234567");
        assert_eq!(logs[0].status, LogStatus::Info);

        let last = logs.last().unwrap();
        assert_eq!(last.agent, AgentType::Orchestrator);
        assert_eq!(last.status, LogStatus::Success);
        assert!(last.message.starts_with("Validation complete. Total time: "));

        assert!(logs.iter().all(|l| l.agent != AgentType::Retry));
        assert!(logs.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    struct PanickingClassifier;

    #[async_trait]
    impl Classifier for PanickingClassifier {
        async fn classify(
            &self,
            _request: &NormalizedRequest,
        ) -> Result<ClassificationResult, crate::error::ClassifierError> {
            panic!("lookup table corrupted");
        }
    }

    #[tokio::test]
    async fn test_panicking_collaborator_is_fatal() {
        let stats = Arc::new(ValidationStats::new());
        let pipeline = Arc::new(
            ValidationPipeline::new(
                Arc::new(PanickingClassifier),
                Arc::new(StaticPresenceChecker::returning(true)),
            )
            .with_observer(stats.clone()),
        );

        let err = pipeline.run_isolated(request()).await.unwrap_err();
        assert!(err.is_fatal());

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_validations, 1);
        assert_eq!(snapshot.success_rate, 0.0);
    }

    #[tokio::test]
    async fn test_observer_sees_outcomes() {
        let stats = Arc::new(ValidationStats::new());
        let pipeline = ValidationPipeline::new(
            Arc::new(StaticClassifier::returning(verizon(LineType::Landline))),
            Arc::new(StaticPresenceChecker::returning(true)),
        )
        .with_observer(stats.clone());

        pipeline.run(&request()).await.unwrap();
        pipeline.run(&request()).await.unwrap();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_validations, 2);
        assert!((snapshot.total_saved - 0.024).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_probability_is_logged() {
        struct Probable;

        #[async_trait]
        impl PresenceChecker for Probable {
            async fn check(
                &self,
                _request: &NormalizedRequest,
                _classification: &ClassificationResult,
            ) -> Result<PresenceResult, crate::error::PresenceCheckError> {
                Ok(PresenceResult {
                    has_whatsapp: true,
                    probability: Some(73),
                    reasoning: None,
                })
            }
        }

        let pipeline = ValidationPipeline::new(
            Arc::new(StaticClassifier::returning(verizon(LineType::Mobile))),
            Arc::new(Probable),
        );

        let report = pipeline.run(&request()).await.unwrap();
        assert!(report
            .logs
            .iter()
            .any(|l| l.message == "Analysis complete. Probability: 73%"));
    }

    fn simulated_pipeline(seed: u64, failure_rate: f64) -> ValidationPipeline {
        let settings = PipelineSettings {
            mode: PipelineMode::Simulated,
            seed: Some(seed),
            failure_rate,
            fallback_delay_ms: 0,
        };
        build_pipeline(&settings, &LlmSettings::default(), None).unwrap()
    }

    fn dialing_codes() -> Vec<String> {
        let mut codes: Vec<String> = supported_countries().into_iter().map(|c| c.code).collect();
        codes.push("+999".to_string());
        codes
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn test_simulated_runs_hold_outcome_invariants(
            seed in any::<u64>(),
            failure_rate in prop_oneof![Just(0.5), 0.0f64..=1.0],
            phone in "[0-9]{1,15}",
            country_code in prop::sample::select(dialing_codes()),
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();
            let pipeline = simulated_pipeline(seed, failure_rate);
            let request = ValidationRequest::new(phone, country_code);
            let report = runtime.block_on(pipeline.run(&request)).unwrap();
            let outcome = &report.outcome;

            prop_assert!(outcome.confidence_score <= 100);
            prop_assert!(outcome.retry_count <= 1);

            if outcome.line_type == LineType::Landline {
                prop_assert_eq!(outcome.whatsapp_status, WhatsappStatus::Unchecked);
                prop_assert_eq!(outcome.cost_saved, PRESENCE_CHECK_COST);
            } else {
                prop_assert_eq!(outcome.cost_saved, 0.0);
            }

            if !outcome.is_valid {
                prop_assert!(outcome.confidence_score <= 60);
            }

            assert_agent_order(&report.logs);
        }
    }

    #[tokio::test]
    async fn test_response_carries_agent_statuses() {
        let pipeline = ValidationPipeline::new(
            Arc::new(StaticClassifier::failing("gateway returned 503")),
            Arc::new(StaticPresenceChecker::returning(true)),
        );

        let report = pipeline.run(&request()).await.unwrap();
        let response = ValidationResponse::from(report);

        assert_eq!(response.agents.len(), 6);
        assert!(response
            .agents
            .iter()
            .all(|a| a.status == shared_types::AgentState::Complete));
    }
}
