use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_error_keeps_the_underlying_cause() {
        let err = AppError::DatabaseError(anyhow::anyhow!("connection refused"));
        assert_eq!(err.to_string(), "Database error: connection refused");
    }

    #[test]
    fn io_errors_become_internal_errors() {
        let err: AppError = std::io::Error::other("address in use").into();
        assert!(matches!(err, AppError::InternalError(_)));
    }
}
