use shared_types::{AgentLog, AgentType, LogStatus};
use tracing::{error, info, warn};

/// Append-only narrative of one run.
///
/// Timestamps never go backwards even if the wall clock does.
#[derive(Debug, Default)]
pub struct LogTrail {
    entries: Vec<AgentLog>,
}

impl LogTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, agent: AgentType, message: impl Into<String>, status: LogStatus) {
        let mut entry = AgentLog::new(agent, message, status);
        if let Some(last) = self.entries.last() {
            if entry.timestamp < last.timestamp {
                entry.timestamp = last.timestamp;
            }
        }

        let tag = agent.as_str().to_uppercase();
        match status {
            LogStatus::Error => error!(agent = %agent, "[{}] {}", tag, entry.message),
            LogStatus::Warning => warn!(agent = %agent, "[{}] {}", tag, entry.message),
            _ => info!(agent = %agent, "[{}] {}", tag, entry.message),
        }

        self.entries.push(entry);
    }

    pub fn info(&mut self, agent: AgentType, message: impl Into<String>) {
        self.push(agent, message, LogStatus::Info);
    }

    pub fn success(&mut self, agent: AgentType, message: impl Into<String>) {
        self.push(agent, message, LogStatus::Success);
    }

    pub fn warning(&mut self, agent: AgentType, message: impl Into<String>) {
        self.push(agent, message, LogStatus::Warning);
    }

    pub fn thinking(&mut self, agent: AgentType, message: impl Into<String>) {
        self.push(agent, message, LogStatus::Thinking);
    }

    pub fn entries(&self) -> &[AgentLog] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<AgentLog> {
        self.entries
    }
}
