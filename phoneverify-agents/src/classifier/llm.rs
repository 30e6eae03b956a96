use std::sync::Arc;

use async_trait::async_trait;
use extractors::{parse_embedded_json, NormalizedRequest};

use super::prompt::{build_classification_prompt, ClassificationReply, SYSTEM_PROMPT};
use super::{parse_line_type, ClassificationResult, Classifier};
use crate::error::ClassifierError;
use crate::llm::{ChatMessage, CompletionRequest, LlmClient};

const TEMPERATURE: f32 = 0.1;

/// Asks a language model to classify the number
pub struct LlmClassifier {
    llm_client: Arc<dyn LlmClient>,
    model: String,
}

impl LlmClassifier {
    pub fn new(llm_client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm_client,
            model: model.into(),
        }
    }
}

impl TryFrom<ClassificationReply> for ClassificationResult {
    type Error = ClassifierError;

    fn try_from(reply: ClassificationReply) -> Result<Self, Self::Error> {
        let line_type = parse_line_type(&reply.line_type).ok_or_else(|| {
            ClassifierError::InvalidResponse(format!("unknown line type '{}'", reply.line_type))
        })?;

        Ok(ClassificationResult {
            is_valid: reply.is_valid,
            country_name: reply.country_name,
            carrier: reply.carrier,
            line_type,
            format_valid: reply.format_valid,
            confidence: reply.confidence.clamp(0.0, 100.0).round() as u8,
        })
    }
}

#[async_trait]
impl Classifier for LlmClassifier {
    async fn classify(&self, request: &NormalizedRequest) -> Result<ClassificationResult, ClassifierError> {
        let completion = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(build_classification_prompt(request)),
            ],
            temperature: Some(TEMPERATURE),
        };

        let response = self.llm_client.complete(completion).await?;
        tracing::debug!("Classification reply: {}", response.content);

        let reply: ClassificationReply = parse_embedded_json(&response.content)?;
        reply.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionResponse, LlmError};
    use shared_types::LineType;
    use std::sync::Mutex;

    struct CannedLlm {
        reply: Mutex<Option<Result<String, LlmError>>>,
        last_request: Mutex<Option<CompletionRequest>>,
    }

    impl CannedLlm {
        fn new(reply: Result<String, LlmError>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                last_request: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LlmClient for CannedLlm {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            *self.last_request.lock().unwrap() = Some(request);
            let content = self.reply.lock().unwrap().take().expect("single call")?;
            Ok(CompletionResponse { content, model: None })
        }
    }

    fn request() -> NormalizedRequest {
        extractors::validate_request("555-123-4567", "+1").unwrap()
    }

    #[tokio::test]
    async fn test_classify_parses_fenced_reply() {
        let llm = Arc::new(CannedLlm::new(Ok(r#"```json
{"isValid": true, "countryName": "United States", "carrier": "Verizon", "lineType": "mobile", "formatValid": true, "confidence": 90}
```"#
            .to_string())));
        let classifier = LlmClassifier::new(llm.clone(), "google/gemini-2.5-flash");

        let result = classifier.classify(&request()).await.unwrap();
        assert_eq!(result.country_name, "United States");
        assert_eq!(result.carrier, "Verizon");
        assert_eq!(result.line_type, LineType::Mobile);
        assert_eq!(result.confidence, 90);

        let sent = llm.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(sent.temperature, Some(0.1));
        assert_eq!(sent.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_classifier_error() {
        let llm = Arc::new(CannedLlm::new(Ok("The number looks fine to me.".to_string())));
        let classifier = LlmClassifier::new(llm, "google/gemini-2.5-flash");

        let err = classifier.classify(&request()).await.unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unknown_line_type_is_classifier_error() {
        let llm = Arc::new(CannedLlm::new(Ok(
            r#"{"isValid": true, "countryName": "US", "carrier": "X", "lineType": "pager"}"#.to_string(),
        )));
        let classifier = LlmClassifier::new(llm, "google/gemini-2.5-flash");

        let err = classifier.classify(&request()).await.unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_service_failure_is_classifier_error() {
        let llm = Arc::new(CannedLlm::new(Err(LlmError::RateLimited)));
        let classifier = LlmClassifier::new(llm, "google/gemini-2.5-flash");

        let err = classifier.classify(&request()).await.unwrap_err();
        assert!(matches!(err, ClassifierError::Service(LlmError::RateLimited)));
    }
}
