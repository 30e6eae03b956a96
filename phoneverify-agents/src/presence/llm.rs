use std::sync::Arc;

use async_trait::async_trait;
use extractors::{parse_embedded_json, NormalizedRequest};

use super::prompt::{build_presence_prompt, PresenceReply, SYSTEM_PROMPT};
use super::{PresenceChecker, PresenceResult};
use crate::classifier::ClassificationResult;
use crate::error::PresenceCheckError;
use crate::llm::{ChatMessage, CompletionRequest, LlmClient};

const TEMPERATURE: f32 = 0.2;

pub struct LlmPresenceChecker {
    llm_client: Arc<dyn LlmClient>,
    model: String,
}

impl LlmPresenceChecker {
    pub fn new(llm_client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm_client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl PresenceChecker for LlmPresenceChecker {
    async fn check(
        &self,
        request: &NormalizedRequest,
        classification: &ClassificationResult,
    ) -> Result<PresenceResult, PresenceCheckError> {
        let completion = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(build_presence_prompt(request, classification)),
            ],
            temperature: Some(TEMPERATURE),
        };

        let response = self.llm_client.complete(completion).await?;
        let reply: PresenceReply = parse_embedded_json(&response.content)?;

        Ok(PresenceResult {
            has_whatsapp: reply.has_whatsapp,
            probability: reply.probability.map(|p| p.clamp(0.0, 100.0).round() as u8),
            reasoning: reply.reasoning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionResponse, LlmError};
    use shared_types::{LineType, WhatsappStatus};

    struct CannedLlm(&'static str);

    #[async_trait]
    impl LlmClient for CannedLlm {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            assert!(request.messages[1].content.contains("Line Type: mobile"));
            Ok(CompletionResponse {
                content: self.0.to_string(),
                model: None,
            })
        }
    }

    fn classification() -> ClassificationResult {
        ClassificationResult {
            is_valid: true,
            country_name: "Brazil".to_string(),
            carrier: "Vivo".to_string(),
            line_type: LineType::Mobile,
            format_valid: true,
            confidence: 88,
        }
    }

    #[tokio::test]
    async fn test_positive_reply() {
        let checker = LlmPresenceChecker::new(
            Arc::new(CannedLlm(
                r#"{"hasWhatsApp": true, "probability": 92.4, "reasoning": "High penetration"}"#,
            )),
            "google/gemini-2.5-flash",
        );
        let request = extractors::validate_request("11 98765 4321", "+55").unwrap();

        let result = checker.check(&request, &classification()).await.unwrap();
        assert_eq!(result.status(), WhatsappStatus::Verified);
        assert_eq!(result.probability, Some(92));
        assert_eq!(result.reasoning.as_deref(), Some("High penetration"));
    }

    #[tokio::test]
    async fn test_negative_reply() {
        let checker = LlmPresenceChecker::new(
            Arc::new(CannedLlm(r#"Sure: {"hasWhatsApp": false}"#)),
            "google/gemini-2.5-flash",
        );
        let request = extractors::validate_request("11 98765 4321", "+55").unwrap();

        let result = checker.check(&request, &classification()).await.unwrap();
        assert_eq!(result.status(), WhatsappStatus::NotFound);
        assert_eq!(result.probability, None);
    }

    #[tokio::test]
    async fn test_garbage_reply_is_error() {
        let checker = LlmPresenceChecker::new(
            Arc::new(CannedLlm("no idea")),
            "google/gemini-2.5-flash",
        );
        let request = extractors::validate_request("11 98765 4321", "+55").unwrap();

        let err = checker.check(&request, &classification()).await.unwrap_err();
        assert!(matches!(err, PresenceCheckError::InvalidResponse(_)));
    }
}
