/// Error types for one Meteobridge poll cycle
///
/// Every variant is recoverable: the poll loop logs it, skips the cycle and
/// leaves the previously published driver values in place.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Not configured: {0}")]
    Configuration(String),

    #[error("Unable to reach Meteobridge: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Meteobridge answered with HTTP status {0}")]
    HttpStatus(u16),

    #[error("Expected {expected} template fields, received {actual}")]
    FieldCount { expected: usize, actual: usize },

    #[error("Invalid outdoor temperature value: '{0}'")]
    InvalidTemperature(String),
}

impl BridgeError {
    /// True when the cycle was skipped because address or password is missing.
    pub fn is_configuration(&self) -> bool {
        matches!(self, BridgeError::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
