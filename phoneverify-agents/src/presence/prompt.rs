use extractors::NormalizedRequest;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::classifier::ClassificationResult;

pub const SYSTEM_PROMPT: &str =
    "You are a WhatsApp presence detection expert. Always respond with valid JSON only.";

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PresenceReply {
    #[serde(rename = "hasWhatsApp", alias = "hasWhatsapp")]
    pub has_whatsapp: bool,
    /// Likelihood from 0 to 100
    #[serde(default)]
    pub probability: Option<f64>,
    /// Brief explanation
    #[serde(default)]
    pub reasoning: Option<String>,
}

pub fn build_presence_prompt(request: &NormalizedRequest, classification: &ClassificationResult) -> String {
    let schema = schemars::schema_for!(PresenceReply);
    let schema_json = serde_json::to_string_pretty(&schema).unwrap_or_default();

    format!(
        r#"Analyze if this phone number likely has WhatsApp:
Phone: {}
Country: {}
Line Type: {}
Carrier: {}

Consider:
- WhatsApp penetration in the country
- Line type (mobile more likely to have WhatsApp)
- Carrier patterns

Respond with ONLY a JSON object matching this schema:
{}"#,
        request.display(),
        classification.country_name,
        classification.line_type,
        classification.carrier,
        schema_json,
    )
}
