use serde::{Deserialize, Serialize};

pub mod agent_log;
pub mod country;
pub mod settings;
pub mod stats;
pub mod validation;

pub use agent_log::{AgentLog, AgentState, AgentStatus, AgentType, LogStatus};
pub use country::{find_country, supported_countries, Country};
pub use settings::{ApiKeyConfig, SettingsResponse, UpdateApiKeysRequest};
pub use stats::StatsSnapshot;
pub use validation::{
    LineType, ValidationErrorResponse, ValidationOutcome, ValidationRequest, ValidationResponse,
    WhatsappStatus,
};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
