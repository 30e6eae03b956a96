use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Narrative agent that emitted a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    Orchestrator,
    Validation,
    Decision,
    Retry,
    Whatsapp,
    Confidence,
}

impl AgentType {
    /// All agents in status panel order
    pub const ALL: [AgentType; 6] = [
        AgentType::Orchestrator,
        AgentType::Validation,
        AgentType::Decision,
        AgentType::Retry,
        AgentType::Whatsapp,
        AgentType::Confidence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Orchestrator => "orchestrator",
            AgentType::Validation => "validation",
            AgentType::Decision => "decision",
            AgentType::Retry => "retry",
            AgentType::Whatsapp => "whatsapp",
            AgentType::Confidence => "confidence",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AgentType::Orchestrator => "Orchestrator",
            AgentType::Validation => "Validation",
            AgentType::Decision => "Decision",
            AgentType::Retry => "Retry",
            AgentType::Whatsapp => "WhatsApp",
            AgentType::Confidence => "Confidence",
        }
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Info,
    Success,
    Warning,
    Error,
    Thinking,
}

/// One narrated step of a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct AgentLog {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub agent: AgentType,
    pub message: String,
    pub status: LogStatus,
}

impl AgentLog {
    pub fn new(agent: AgentType, message: impl Into<String>, status: LogStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            agent,
            message: message.into(),
            status,
        }
    }
}

/// Display state of an agent in a status panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    Idle,
    Active,
    Complete,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct AgentStatus {
    pub name: AgentType,
    pub display_name: String,
    pub status: AgentState,
}

impl AgentStatus {
    pub fn idle(name: AgentType) -> Self {
        Self {
            name,
            display_name: name.display_name().to_string(),
            status: AgentState::Idle,
        }
    }
}
