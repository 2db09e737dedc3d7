//! CLI-specific error types
//!
//! Errors here end the process. Per-line call failures are not CLI
//! errors; they are written to stdout as error responses.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::registry::RegistryError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Malformed command-line argument
    InvalidArgument,
    /// Input line is not valid JSON
    InvalidRequest,
    /// Service declaration rejected
    RegistryError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "FIRE_CLI_CONFIG_ERROR",
            Self::IoError => "FIRE_CLI_IO_ERROR",
            Self::InvalidArgument => "FIRE_CLI_INVALID_ARGUMENT",
            Self::InvalidRequest => "FIRE_CLI_INVALID_REQUEST",
            Self::RegistryError => "FIRE_CLI_REGISTRY_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Invalid argument
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidArgument, msg)
    }

    /// Invalid request line
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidRequest, msg)
    }

    /// Whether processing can continue with the next input line
    pub fn is_recoverable(&self) -> bool {
        self.code == CliErrorCode::InvalidRequest
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<RegistryError> for CliError {
    fn from(e: RegistryError) -> Self {
        Self::new(CliErrorCode::RegistryError, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::invalid_argument("--extra must be a JSON object");
        assert_eq!(
            err.to_string(),
            "FIRE_CLI_INVALID_ARGUMENT: --extra must be a JSON object"
        );
    }

    #[test]
    fn test_from_config_error() {
        let err: CliError = ConfigError::from(serde_json::from_str::<u8>("x").unwrap_err()).into();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
        assert!(err.message().starts_with("Invalid config JSON"));
    }
}
