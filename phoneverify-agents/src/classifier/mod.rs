pub mod llm;
pub mod prompt;
pub mod simulated;

pub use llm::LlmClassifier;
pub use simulated::{SimulatedClassifier, StaticClassifier};

use async_trait::async_trait;
use extractors::NormalizedRequest;
use shared_types::LineType;

use crate::error::ClassifierError;

/// What the classifier learned about a number
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub is_valid: bool,
    pub country_name: String,
    pub carrier: String,
    pub line_type: LineType,
    pub format_valid: bool,
    /// Classifier's own confidence, 0-100
    pub confidence: u8,
}

impl ClassificationResult {
    /// Values used when classification fails and the pipeline falls back
    pub fn fallback() -> Self {
        Self {
            is_valid: true,
            country_name: "Unknown".to_string(),
            carrier: "Unknown Carrier".to_string(),
            line_type: LineType::Mobile,
            format_valid: true,
            confidence: 70,
        }
    }
}

/// Determines validity, country, carrier and line type of a number
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, request: &NormalizedRequest) -> Result<ClassificationResult, ClassifierError>;
}

/// Parses line types the way models tend to spell them
pub fn parse_line_type(raw: &str) -> Option<LineType> {
    match raw.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
        "mobile" | "cell" | "cellular" | "wireless" => Some(LineType::Mobile),
        "landline" | "fixed" | "fixed_line" => Some(LineType::Landline),
        "voip" => Some(LineType::Voip),
        _ => None,
    }
}
