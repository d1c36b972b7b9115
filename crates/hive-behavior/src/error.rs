use hive_agent::Role;
use hive_core::AgentId;
use hive_mobility::MobilityError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("agent {0} is not reported by the world")]
    AgentNotFound(AgentId),

    #[error("no behavior configured for role {0}")]
    UnconfiguredRole(Role),

    #[error("movement error: {0}")]
    Mobility(#[from] MobilityError),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
