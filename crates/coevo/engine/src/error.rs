/// Errors loading or validating a [`CoEvoConfig`](crate::CoEvoConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors from the co-evolution driver.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("vocabulary alignment failed after {attempts} reseed attempts")]
    AlignmentExhausted { attempts: u32 },
    #[error("no programs left to evaluate")]
    NoPrograms,
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

pub type EngineResult<T> = Result<T, EngineError>;
