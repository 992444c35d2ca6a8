use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<sqlx::Error> for StatsError {
    fn from(err: sqlx::Error) -> Self {
        StatsError::Repository(err.to_string())
    }
}

/// Rejects years that cannot belong to any season
pub fn validate_year(year: i32) -> Result<(), StatsError> {
    if year < 0 {
        return Err(StatsError::InvalidParameter(format!(
            "year must not be negative, got {}",
            year
        )));
    }
    Ok(())
}
