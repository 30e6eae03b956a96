use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classifier::{Classifier, LlmClassifier, SimulatedClassifier};
use crate::error::PipelineError;
use crate::llm::{ChatCompletionsClient, LlmClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::pipeline::ValidationPipeline;
use crate::presence::{LlmPresenceChecker, PresenceChecker, SimulatedPresenceChecker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineMode {
    #[default]
    Llm,
    Simulated,
}

impl PipelineMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineMode::Llm => "llm",
            PipelineMode::Simulated => "simulated",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PipelineSettings {
    pub mode: PipelineMode,
    /// Seed for the simulated collaborators; random when unset
    pub seed: Option<u64>,
    /// Probability that a simulated collaborator call fails
    pub failure_rate: f64,
    pub fallback_delay_ms: u64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            mode: PipelineMode::Llm,
            seed: None,
            failure_rate: 0.0,
            fallback_delay_ms: 1000,
        }
    }
}

/// Wires collaborators for the configured mode.
///
/// LLM mode needs an API key; its absence is a fatal configuration error.
pub fn build_pipeline(
    pipeline: &PipelineSettings,
    llm: &LlmSettings,
    api_key: Option<&str>,
) -> Result<ValidationPipeline, PipelineError> {
    if !(0.0..=1.0).contains(&pipeline.failure_rate) {
        return Err(PipelineError::Fatal(
            "failure_rate must be between 0 and 1".to_string(),
        ));
    }

    let (classifier, presence_checker): (Arc<dyn Classifier>, Arc<dyn PresenceChecker>) =
        match pipeline.mode {
            PipelineMode::Simulated => {
                // Offset the presence seed so both collaborators don't draw the same stream
                let presence_seed = pipeline.seed.map(|s| s.wrapping_add(1));
                (
                    Arc::new(SimulatedClassifier::new(pipeline.seed, pipeline.failure_rate)),
                    Arc::new(SimulatedPresenceChecker::new(presence_seed, pipeline.failure_rate)),
                )
            }
            PipelineMode::Llm => {
                let api_key = api_key
                    .filter(|k| !k.trim().is_empty())
                    .ok_or_else(|| PipelineError::Fatal("LLM API key not configured".to_string()))?;

                let client: Arc<dyn LlmClient> = Arc::new(
                    ChatCompletionsClient::new(
                        api_key,
                        &llm.base_url,
                        Duration::from_secs(llm.timeout_secs),
                    )
                    .map_err(|e| PipelineError::Fatal(format!("Failed to create LLM client: {}", e)))?,
                );
                (
                    Arc::new(LlmClassifier::new(client.clone(), &llm.model)),
                    Arc::new(LlmPresenceChecker::new(client, &llm.model)),
                )
            }
        };

    info!(mode = pipeline.mode.as_str(), "built validation pipeline");

    Ok(ValidationPipeline::new(classifier, presence_checker)
        .with_fallback_delay(Duration::from_millis(pipeline.fallback_delay_ms)))
}
