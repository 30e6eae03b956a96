use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::agent_log::{AgentLog, AgentStatus};

/// Request to validate a phone number
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub country_code: String,
}

impl ValidationRequest {
    pub fn new(phone_number: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            country_code: country_code.into(),
        }
    }
}

/// Kind of line a number belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    Mobile,
    Landline,
    Voip,
}

impl LineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineType::Mobile => "mobile",
            LineType::Landline => "landline",
            LineType::Voip => "voip",
        }
    }
}

impl std::fmt::Display for LineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the messaging-app presence check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
pub enum WhatsappStatus {
    Verified,
    NotFound,
    Unchecked,
}

impl WhatsappStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WhatsappStatus::Verified => "verified",
            WhatsappStatus::NotFound => "not_found",
            WhatsappStatus::Unchecked => "unchecked",
        }
    }
}

/// Final result of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub phone_number: String,
    pub country_code: String,
    pub country_name: String,
    pub carrier: String,
    pub line_type: LineType,
    pub is_valid: bool,
    pub whatsapp_status: WhatsappStatus,
    pub confidence_score: u8,
    pub cost_saved: f64,
    /// Wall-clock duration of the run in milliseconds
    pub validation_time: u64,
    pub retry_count: u32,
}

/// Response body of `POST /api/validate`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    #[serde(flatten)]
    pub outcome: ValidationOutcome,
    pub logs: Vec<AgentLog>,
    /// Final state of every agent, in panel order
    pub agents: Vec<AgentStatus>,
}

/// Response body when the pipeline fails outright
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub logs: Vec<AgentLog>,
    pub agents: Vec<AgentStatus>,
}
