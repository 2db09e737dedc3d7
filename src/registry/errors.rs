//! # Registry Errors

use thiserror::Error;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Service {service} declares field '{field}' more than once")]
    DuplicateField {
        service: &'static str,
        field: &'static str,
    },

    #[error("Registry cache lock poisoned")]
    Poisoned,

    #[error("Registry cache holds a mismatched entry for {0}")]
    TypeMismatch(&'static str),
}

impl RegistryError {
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::DuplicateField { .. } => "FIRE_REGISTRY_DUPLICATE_FIELD",
            RegistryError::Poisoned | RegistryError::TypeMismatch(_) => "FIRE_REGISTRY_INTERNAL",
        }
    }
}
