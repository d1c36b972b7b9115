use hive_core::AgentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("agent {0} is not reported by the world")]
    AgentNotFound(AgentId),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
