use hive_behavior::BehaviorError;
use hive_core::AgentId;
use hive_mobility::MobilityError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("colony configuration error: {0}")]
    Config(String),

    #[error("no memory recorded for agent {0}")]
    UnknownAgent(AgentId),

    #[error("behavior error: {0}")]
    Behavior(#[from] BehaviorError),

    #[error("mobility error: {0}")]
    Mobility(#[from] MobilityError),
}

pub type SimResult<T> = Result<T, SimError>;
