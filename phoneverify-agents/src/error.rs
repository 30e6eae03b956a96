use extractors::{JsonExtractionError, RequestValidationError};

use crate::llm::LlmError;

/// Classification failed; the pipeline recovers with fallback values
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("classification service error: {0}")]
    Service(#[from] LlmError),

    #[error("unparseable classification: {0}")]
    InvalidResponse(String),

    #[error("simulated failure: {0}")]
    Simulated(String),
}

impl From<JsonExtractionError> for ClassifierError {
    fn from(err: JsonExtractionError) -> Self {
        ClassifierError::InvalidResponse(err.to_string())
    }
}

/// Presence check failed; the pipeline records the status as unchecked
#[derive(Debug, thiserror::Error)]
pub enum PresenceCheckError {
    #[error("presence service error: {0}")]
    Service(#[from] LlmError),

    #[error("unparseable presence analysis: {0}")]
    InvalidResponse(String),

    #[error("simulated failure: {0}")]
    Simulated(String),
}

impl From<JsonExtractionError> for PresenceCheckError {
    fn from(err: JsonExtractionError) -> Self {
        PresenceCheckError::InvalidResponse(err.to_string())
    }
}

/// Errors that reach the caller of the pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    RequestValidation(#[from] RequestValidationError),

    #[error("{0}")]
    Fatal(String),
}

impl PipelineError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, PipelineError::Fatal(_))
    }
}
