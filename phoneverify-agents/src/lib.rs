//! Phone validation agents.
//!
//! A [`ValidationPipeline`] classifies a number, decides whether a paid
//! presence check is worth making, runs it, and scores the outcome while
//! narrating every step as an agent log.

pub mod classifier;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod presence;
pub mod settings;
pub mod stats;
pub mod status_board;

pub use classifier::{ClassificationResult, Classifier};
pub use error::{ClassifierError, PipelineError, PresenceCheckError};
pub use pipeline::{PipelineStage, ValidationPipeline, ValidationReport};
pub use presence::{PresenceChecker, PresenceResult};
pub use settings::{build_pipeline, LlmSettings, PipelineMode, PipelineSettings};
pub use stats::{PipelineObserver, ValidationStats};
pub use status_board::derive_agent_statuses;
