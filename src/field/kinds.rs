//! Built-in scalar field kinds
//!
//! Supported kinds:
//! - integer: `i64`, JSON integers only
//! - numeric: `f64`, any JSON number
//! - float: `f64`, JSON floats only
//! - boolean: `bool`
//! - character: `char`, a string of exactly one character
//! - string: `String` with optional length bounds
//! - email: `String` shaped like `local@domain.tld`
//! - date: `chrono::NaiveDate` from `YYYY-MM-DD`
//! - datetime: `chrono::DateTime<FixedOffset>` from RFC 3339
//! - dict: a JSON object, kept as `serde_json::Map`
//!
//! No implicit coercion between JSON shapes: `"5"` is not an integer.

use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDate};
use regex::Regex;
use serde_json::{Map, Value};

use super::errors::{ValidationError, ValidationResult};
use super::types::{Field, FieldKind};
use super::validators::{check_interval, check_length};

/// Lax email shape: something, `@`, something, `.`, something.
const EMAIL_PATTERN: &str = r"^[^@]+@[^@]+\.[^@]+$";

/// Date format accepted by `DateKind`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegerKind {
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
}

impl FieldKind for IntegerKind {
    type Value = i64;

    fn type_name(&self) -> &'static str {
        "int"
    }

    fn coerce(&self, name: &str, raw: &Value) -> ValidationResult<i64> {
        raw.as_i64()
            .ok_or_else(|| ValidationError::type_mismatch(name, self.type_name()))
    }

    fn check(&self, name: &str, value: &i64) -> ValidationResult<()> {
        check_interval(name, value, self.min_value.as_ref(), self.max_value.as_ref())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumericKind {
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

impl FieldKind for NumericKind {
    type Value = f64;

    fn type_name(&self) -> &'static str {
        "numeric"
    }

    fn coerce(&self, name: &str, raw: &Value) -> ValidationResult<f64> {
        raw.as_f64()
            .ok_or_else(|| ValidationError::type_mismatch(name, self.type_name()))
    }

    fn check(&self, name: &str, value: &f64) -> ValidationResult<()> {
        check_interval(name, value, self.min_value.as_ref(), self.max_value.as_ref())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FloatKind {
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

impl FieldKind for FloatKind {
    type Value = f64;

    fn type_name(&self) -> &'static str {
        "float"
    }

    fn coerce(&self, name: &str, raw: &Value) -> ValidationResult<f64> {
        // Integers are rejected even though they convert losslessly
        if !raw.is_f64() {
            return Err(ValidationError::type_mismatch(name, self.type_name()));
        }
        raw.as_f64()
            .ok_or_else(|| ValidationError::type_mismatch(name, self.type_name()))
    }

    fn check(&self, name: &str, value: &f64) -> ValidationResult<()> {
        check_interval(name, value, self.min_value.as_ref(), self.max_value.as_ref())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BooleanKind;

impl FieldKind for BooleanKind {
    type Value = bool;

    fn type_name(&self) -> &'static str {
        "bool"
    }

    fn coerce(&self, name: &str, raw: &Value) -> ValidationResult<bool> {
        raw.as_bool()
            .ok_or_else(|| ValidationError::type_mismatch(name, self.type_name()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterKind;

impl FieldKind for CharacterKind {
    type Value = char;

    fn type_name(&self) -> &'static str {
        "char"
    }

    fn coerce(&self, name: &str, raw: &Value) -> ValidationResult<char> {
        let s = raw
            .as_str()
            .ok_or_else(|| ValidationError::type_mismatch(name, "str"))?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ValidationError::new(
                name,
                format!("Should have length: 1 but has length: {}", s.chars().count()),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringKind {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

impl FieldKind for StringKind {
    type Value = String;

    fn type_name(&self) -> &'static str {
        "str"
    }

    fn coerce(&self, name: &str, raw: &Value) -> ValidationResult<String> {
        raw.as_str()
            .map(str::to_string)
            .ok_or_else(|| ValidationError::type_mismatch(name, self.type_name()))
    }

    fn check(&self, name: &str, value: &String) -> ValidationResult<()> {
        check_length(name, value.chars().count(), self.min_length, self.max_length)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmailKind;

fn email_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}

impl FieldKind for EmailKind {
    type Value = String;

    fn type_name(&self) -> &'static str {
        "email"
    }

    fn coerce(&self, name: &str, raw: &Value) -> ValidationResult<String> {
        raw.as_str()
            .map(str::to_string)
            .ok_or_else(|| ValidationError::type_mismatch(name, "str"))
    }

    fn check(&self, name: &str, value: &String) -> ValidationResult<()> {
        match email_pattern() {
            Some(pattern) if pattern.is_match(value) => Ok(()),
            _ => Err(ValidationError::new(name, "Not a valid email")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateKind;

impl FieldKind for DateKind {
    type Value = NaiveDate;

    fn type_name(&self) -> &'static str {
        "date"
    }

    fn coerce(&self, name: &str, raw: &Value) -> ValidationResult<NaiveDate> {
        raw.as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
            .ok_or_else(|| ValidationError::type_mismatch(name, self.type_name()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateTimeKind;

impl FieldKind for DateTimeKind {
    type Value = DateTime<FixedOffset>;

    fn type_name(&self) -> &'static str {
        "datetime"
    }

    fn coerce(&self, name: &str, raw: &Value) -> ValidationResult<DateTime<FixedOffset>> {
        raw.as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .ok_or_else(|| ValidationError::type_mismatch(name, self.type_name()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DictKind;

impl FieldKind for DictKind {
    type Value = Map<String, Value>;

    fn type_name(&self) -> &'static str {
        "dict"
    }

    fn coerce(&self, name: &str, raw: &Value) -> ValidationResult<Map<String, Value>> {
        raw.as_object()
            .cloned()
            .ok_or_else(|| ValidationError::type_mismatch(name, self.type_name()))
    }
}

pub type IntegerField = Field<IntegerKind>;
pub type NumericField = Field<NumericKind>;
pub type FloatField = Field<FloatKind>;
pub type BooleanField = Field<BooleanKind>;
pub type CharacterField = Field<CharacterKind>;
pub type StringField = Field<StringKind>;
pub type EmailField = Field<EmailKind>;
pub type DateField = Field<DateKind>;
pub type DateTimeField = Field<DateTimeKind>;
pub type DictField = Field<DictKind>;

impl Field<IntegerKind> {
    pub fn min_value(self, min: i64) -> Self {
        self.map_kind(|k| k.min_value = Some(min))
    }

    pub fn max_value(self, max: i64) -> Self {
        self.map_kind(|k| k.max_value = Some(max))
    }
}

impl Field<NumericKind> {
    pub fn min_value(self, min: f64) -> Self {
        self.map_kind(|k| k.min_value = Some(min))
    }

    pub fn max_value(self, max: f64) -> Self {
        self.map_kind(|k| k.max_value = Some(max))
    }
}

impl Field<FloatKind> {
    pub fn min_value(self, min: f64) -> Self {
        self.map_kind(|k| k.min_value = Some(min))
    }

    pub fn max_value(self, max: f64) -> Self {
        self.map_kind(|k| k.max_value = Some(max))
    }
}

impl Field<StringKind> {
    pub fn min_length(self, min: usize) -> Self {
        self.map_kind(|k| k.min_length = Some(min))
    }

    pub fn max_length(self, max: usize) -> Self {
        self.map_kind(|k| k.max_length = Some(max))
    }
}
