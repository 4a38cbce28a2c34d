use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("configuration rejected: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// A loaded value that cannot be used to start the service.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{0} must be set")]
    MissingRequired(&'static str),

    #[error("port must be non-zero")]
    InvalidPort,

    #[error("cannot bind to {0}")]
    InvalidBindAddress(String),

    #[error("request timeout out of range")]
    InvalidTimeout,

    #[error("database url must start with postgres:// or postgresql://")]
    InvalidDatabaseUrl,

    #[error("min_connections is larger than max_connections")]
    InvalidPoolSize,

    #[error("max_connections may not exceed 100")]
    PoolSizeTooLarge,

    #[error("temperature outside 0.0..=2.0")]
    InvalidTemperature,

    #[error("token limits must be positive")]
    InvalidTokenLimit,
}
