pub mod llm;
pub mod prompt;
pub mod simulated;

pub use llm::LlmPresenceChecker;
pub use simulated::{SimulatedPresenceChecker, StaticPresenceChecker};

use async_trait::async_trait;
use extractors::NormalizedRequest;
use shared_types::WhatsappStatus;

use crate::classifier::ClassificationResult;
use crate::error::PresenceCheckError;

/// Answer from a presence check that completed
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceResult {
    pub has_whatsapp: bool,
    /// Estimated likelihood, 0-100, when the checker reports one
    pub probability: Option<u8>,
    pub reasoning: Option<String>,
}

impl PresenceResult {
    pub fn status(&self) -> WhatsappStatus {
        if self.has_whatsapp {
            WhatsappStatus::Verified
        } else {
            WhatsappStatus::NotFound
        }
    }
}

/// Determines whether a number has a messaging-app account
#[async_trait]
pub trait PresenceChecker: Send + Sync {
    async fn check(
        &self,
        request: &NormalizedRequest,
        classification: &ClassificationResult,
    ) -> Result<PresenceResult, PresenceCheckError>;
}
