use extractors::NormalizedRequest;
use schemars::JsonSchema;
use serde::Deserialize;

pub const SYSTEM_PROMPT: &str =
    "You are a phone number validation expert. Always respond with valid JSON only.";

/// Shape the model is asked to return
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationReply {
    /// True if the format looks valid for the country
    pub is_valid: bool,
    /// Country name based on the country code
    pub country_name: String,
    /// Likely carrier name, estimated from the number prefix
    pub carrier: String,
    /// One of "mobile", "landline" or "voip"
    pub line_type: String,
    #[serde(default = "default_format_valid")]
    pub format_valid: bool,
    /// Confidence in this analysis, 0-100
    #[serde(default)]
    pub confidence: f64,
}

fn default_format_valid() -> bool {
    true
}

pub fn build_classification_prompt(request: &NormalizedRequest) -> String {
    let schema = schemars::schema_for!(ClassificationReply);
    let schema_json = serde_json::to_string_pretty(&schema).unwrap_or_default();

    format!(
        r#"Analyze this phone number and provide validation data in JSON format:
Phone: {}

Respond with ONLY a JSON object (no markdown, no explanation) matching this schema:
{}

Guidance:
- isValid: true if the format looks valid for the country
- carrier: can be estimated based on the number prefix
- lineType: estimate "mobile", "landline" or "voip" from the number pattern
- confidence: your confidence in this analysis from 0 to 100"#,
        request.display(),
        schema_json,
    )
}
