use thiserror::Error;

#[derive(Error, Debug)]
pub enum CensusError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid quarter '{value}': {reason}")]
    InvalidQuarter { value: String, reason: String },
}

impl CensusError {
    /// Message safe to surface to API clients.
    pub fn user_friendly_message(&self) -> String {
        match self {
            CensusError::InvalidQuarter { reason, .. } => reason.clone(),
            CensusError::ConfigValidationError { field, .. }
            | CensusError::InvalidConfigValueError { field, .. }
            | CensusError::MissingConfigError { field } => {
                format!("Configuration problem with '{}'", field)
            }
            _ => "Internal error".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CensusError>;
