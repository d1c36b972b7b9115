use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("quota parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpawnResult<T> = Result<T, SpawnError>;
