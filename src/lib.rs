//! fireservice - declarative input validation for units of work
//!
//! A service declares typed fields; a `Unit` validates raw JSON input
//! against them, freezes the native values onto the service and runs
//! the `pre_fire` / `fire` / `post_fire` hooks.

pub mod cli;
pub mod config;
pub mod field;
pub mod observability;
pub mod registry;
pub mod service;

/// Everything needed to declare and call a service
pub mod prelude {
    pub use crate::config::{ServiceConfig, UnknownParameters, ValidationMode};
    pub use crate::field::{
        validator, validators, BooleanField, CharacterField, DateField, DateTimeField, DictField,
        EmailField, Field, FieldKind, FloatField, Frozen, IntegerField, ListField,
        ModificationError, NumericField, StringField, UnboundFieldError, ValidationError,
        ValidationErrors, ValidationResult,
    };
    pub use crate::registry::{FieldInfo, FieldSet};
    pub use crate::service::{
        CallOutcome, Extras, Interrupt, LifecycleState, PreFire, Service, ServiceError,
        ServiceResult, SkipError, Unit,
    };
}
