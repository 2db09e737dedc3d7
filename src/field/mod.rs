//! Field subsystem
//!
//! A field is a declared, typed input slot. Declaring one fixes how a raw
//! JSON value is coerced into a native Rust value and which checks it must
//! pass. Validated values are stored in write-once `Frozen<T>` slots on
//! the service instance.
//!
//! # Design Principles
//!
//! - Blueprints are immutable and shared per service type
//! - No implicit coercion between JSON shapes
//! - Defaults are trusted and bypass validation
//! - Kind checks always run before extensions and user validators
//! - Composite fields validate element-wise, first failure wins

mod errors;
mod frozen;
mod kinds;
mod list;
mod types;
pub mod validators;

pub use errors::{
    FieldErrorCode, ModificationError, UnboundFieldError, ValidationError, ValidationErrors,
    ValidationResult,
};
pub use frozen::{Frozen, UNNAMED_FIELD};
pub use kinds::{
    BooleanField, BooleanKind, CharacterField, CharacterKind, DateField, DateKind, DateTimeField,
    DateTimeKind, DictField, DictKind, EmailField, EmailKind, FloatField, FloatKind, IntegerField,
    IntegerKind, NumericField, NumericKind, StringField, StringKind, DATE_FORMAT,
};
pub use list::{ListField, ListKind};
pub use types::{validator, Field, FieldKind, Validator};
