//! Field error types
//!
//! Error codes:
//! - FIRE_VALIDATION_FAILED: a raw value was rejected by a field
//! - FIRE_FIELD_IMMUTABLE: a frozen value was written again
//! - FIRE_FIELD_UNBOUND: a value was read before it was bound

use std::fmt;

use thiserror::Error;

/// Field-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorCode {
    /// Raw value rejected during coercion or validation
    FireValidationFailed,
    /// Write attempted on a frozen value
    FireFieldImmutable,
    /// Read attempted before the value was bound
    FireFieldUnbound,
}

impl FieldErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            FieldErrorCode::FireValidationFailed => "FIRE_VALIDATION_FAILED",
            FieldErrorCode::FireFieldImmutable => "FIRE_FIELD_IMMUTABLE",
            FieldErrorCode::FireFieldUnbound => "FIRE_FIELD_UNBOUND",
        }
    }
}

impl fmt::Display for FieldErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A raw value failed coercion or validation.
///
/// `field` is the declared field name, or an element path such as
/// `grid[1][0]` when the failure happened inside a list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Field \"{field}\": {message}")]
pub struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Required value missing or null
    pub fn required(field: impl Into<String>) -> Self {
        Self::new(field, "Required field cannot be empty")
    }

    /// Raw value is not of the expected JSON shape
    pub fn type_mismatch(field: impl Into<String>, expected: &str) -> Self {
        Self::new(field, format!("Not of {} type", expected))
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> FieldErrorCode {
        FieldErrorCode::FireValidationFailed
    }
}

/// One or more validation failures, in field declaration order.
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    first: ValidationError,
    rest: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Builds from a list, returning `None` when it is empty
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        let mut iter = errors.into_iter();
        let first = iter.next()?;
        Some(Self {
            first,
            rest: iter.collect(),
        })
    }

    /// The first failure encountered
    pub fn first(&self) -> &ValidationError {
        &self.first
    }

    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    /// Always false; kept for the `len`/`is_empty` pairing
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }

    /// Names of every rejected field
    pub fn fields(&self) -> Vec<&str> {
        self.iter().map(ValidationError::field).collect()
    }

    /// Whether a given field appears among the failures
    pub fn contains_field(&self, field: &str) -> bool {
        self.iter().any(|e| e.field() == field)
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            first: error,
            rest: Vec::new(),
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first)?;
        for error in &self.rest {
            write!(f, "; {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A frozen field value was written a second time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Attempt to change field: {field}")]
pub struct ModificationError {
    field: String,
}

impl ModificationError {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn code(&self) -> FieldErrorCode {
        FieldErrorCode::FireFieldImmutable
    }
}

/// A field value was read before a call bound it, or the field is
/// optional and received no value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnboundFieldError {
    #[error("Field has not been bound yet")]
    NotBound,

    #[error("Field \"{0}\" has no value")]
    Empty(String),
}

impl UnboundFieldError {
    pub fn code(&self) -> FieldErrorCode {
        FieldErrorCode::FireFieldUnbound
    }
}

/// Result type for field validation
pub type ValidationResult<T> = Result<T, ValidationError>;
