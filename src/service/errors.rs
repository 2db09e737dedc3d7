//! Service call errors
//!
//! Error codes:
//! - FIRE_VALIDATION_FAILED: input rejected by one or more fields
//! - FIRE_UNKNOWN_PARAMETER: input key with no declared field
//! - FIRE_FIELD_IMMUTABLE: a slot was written before binding
//! - FIRE_HOOK_FAILED: `pre_fire` or `fire` returned an error
//! - FIRE_ALREADY_CALLED: `call()` on a used unit
//! - FIRE_REGISTRY_FAILED: the service's declaration was rejected
//! - FIRE_LIFECYCLE_VIOLATION: internal state machine violation
//! - FIRE_SKIPPED: carried by `SkipError`; never returned as an `Err`

use std::fmt;

use thiserror::Error;

use super::state::{LifecycleError, LifecycleState};
use crate::field::{ModificationError, ValidationErrors};
use crate::registry::RegistryError;

/// Service-level error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorCode {
    FireValidationFailed,
    FireUnknownParameter,
    FireFieldImmutable,
    FireHookFailed,
    FireAlreadyCalled,
    FireRegistryFailed,
    FireLifecycleViolation,
    FireSkipped,
}

impl ServiceErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ServiceErrorCode::FireValidationFailed => "FIRE_VALIDATION_FAILED",
            ServiceErrorCode::FireUnknownParameter => "FIRE_UNKNOWN_PARAMETER",
            ServiceErrorCode::FireFieldImmutable => "FIRE_FIELD_IMMUTABLE",
            ServiceErrorCode::FireHookFailed => "FIRE_HOOK_FAILED",
            ServiceErrorCode::FireAlreadyCalled => "FIRE_ALREADY_CALLED",
            ServiceErrorCode::FireRegistryFailed => "FIRE_REGISTRY_FAILED",
            ServiceErrorCode::FireLifecycleViolation => "FIRE_LIFECYCLE_VIOLATION",
            ServiceErrorCode::FireSkipped => "FIRE_SKIPPED",
        }
    }
}

impl fmt::Display for ServiceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Raised by `pre_fire` to end a call without firing.
///
/// A skip is a normal outcome: `call` reports it as
/// `CallOutcome::Skipped`, never as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct SkipError {
    reason: String,
}

impl SkipError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn code(&self) -> ServiceErrorCode {
        ServiceErrorCode::FireSkipped
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Unknown parameter: {0} provided")]
    UnknownParameter(String),

    #[error(transparent)]
    Modification(#[from] ModificationError),

    #[error("pre_fire failed: {0}")]
    PreFire(#[source] anyhow::Error),

    #[error("fire failed: {0}")]
    Fire(#[source] anyhow::Error),

    #[error("Service already called (state: {state})")]
    AlreadyCalled { state: LifecycleState },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Result type for service calls
pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn code(&self) -> ServiceErrorCode {
        match self {
            ServiceError::Validation(_) => ServiceErrorCode::FireValidationFailed,
            ServiceError::UnknownParameter(_) => ServiceErrorCode::FireUnknownParameter,
            ServiceError::Modification(_) => ServiceErrorCode::FireFieldImmutable,
            ServiceError::PreFire(_) | ServiceError::Fire(_) => ServiceErrorCode::FireHookFailed,
            ServiceError::AlreadyCalled { .. } => ServiceErrorCode::FireAlreadyCalled,
            ServiceError::Registry(_) => ServiceErrorCode::FireRegistryFailed,
            ServiceError::Lifecycle(_) => ServiceErrorCode::FireLifecycleViolation,
        }
    }

    /// Field failures, when this is a validation error
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            ServiceError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// The hook's own error, when `pre_fire` or `fire` failed
    pub fn hook_error(&self) -> Option<&anyhow::Error> {
        match self {
            ServiceError::PreFire(err) | ServiceError::Fire(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Validation(errors)
    }
}
