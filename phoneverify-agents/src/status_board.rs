use shared_types::{AgentLog, AgentState, AgentStatus, AgentType, LogStatus};

/// Derives the state of every agent from a run's log trail.
///
/// Agents are returned in panel order. An error log pins an agent to
/// `error`; otherwise an agent whose last entry is a success is `complete`
/// and any other agent that logged is `active`. Once `finished`, every
/// agent that logged and did not fail is `complete`.
pub fn derive_agent_statuses(logs: &[AgentLog], finished: bool) -> Vec<AgentStatus> {
    AgentType::ALL
        .iter()
        .map(|&agent| {
            let mut status = AgentStatus::idle(agent);
            status.status = agent_state(logs, agent, finished);
            status
        })
        .collect()
}

fn agent_state(logs: &[AgentLog], agent: AgentType, finished: bool) -> AgentState {
    let mut own = logs.iter().filter(|log| log.agent == agent).peekable();
    if own.peek().is_none() {
        return AgentState::Idle;
    }

    let mut last = LogStatus::Info;
    for log in own {
        if log.status == LogStatus::Error {
            return AgentState::Error;
        }
        last = log.status;
    }

    if finished || last == LogStatus::Success {
        AgentState::Complete
    } else {
        AgentState::Active
    }
}
