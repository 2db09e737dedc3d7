//! Reusable validators
//!
//! Each constructor returns a `Validator<T>` that can be attached to any
//! field with a matching value type via `Field::validator_arc`. The
//! `check_*` functions are the same checks in direct-call form, used by
//! the built-in field kinds.

use std::fmt::Display;

use regex::Regex;
use serde_json::{Map, Value};

use super::errors::{ValidationError, ValidationResult};
use super::types::{validator, Validator};

/// Values with a meaningful length.
pub trait HasLength {
    fn length(&self) -> usize;
}

impl HasLength for String {
    fn length(&self) -> usize {
        self.chars().count()
    }
}

impl<T> HasLength for Vec<T> {
    fn length(&self) -> usize {
        self.len()
    }
}

impl HasLength for Map<String, Value> {
    fn length(&self) -> usize {
        self.len()
    }
}

/// Rejects values outside `[min, max]`. Either bound may be open.
pub fn check_interval<T>(name: &str, value: &T, min: Option<&T>, max: Option<&T>) -> ValidationResult<()>
where
    T: PartialOrd + Display,
{
    if let Some(min) = min {
        if value < min {
            return Err(ValidationError::new(
                name,
                format!("Given value: {} is less than min: {}", value, min),
            ));
        }
    }
    if let Some(max) = max {
        if value > max {
            return Err(ValidationError::new(
                name,
                format!("Given value: {} is greater than max: {}", value, max),
            ));
        }
    }
    Ok(())
}

/// Rejects lengths outside `[min_length, max_length]`.
pub fn check_length(
    name: &str,
    length: usize,
    min_length: Option<usize>,
    max_length: Option<usize>,
) -> ValidationResult<()> {
    if let Some(min) = min_length {
        if length < min {
            return Err(ValidationError::new(
                name,
                format!("Provided length: {} is less than min length: {}", length, min),
            ));
        }
    }
    if let Some(max) = max_length {
        if length > max {
            return Err(ValidationError::new(
                name,
                format!("Provided length: {} is greater than max length: {}", length, max),
            ));
        }
    }
    Ok(())
}

pub fn interval<T>(min: Option<T>, max: Option<T>) -> Validator<T>
where
    T: PartialOrd + Display + Send + Sync + 'static,
{
    validator(move |name, value: &T| check_interval(name, value, min.as_ref(), max.as_ref()))
}

pub fn length<T>(min_length: Option<usize>, max_length: Option<usize>) -> Validator<T>
where
    T: HasLength + 'static,
{
    validator(move |name, value: &T| check_length(name, value.length(), min_length, max_length))
}

/// Requires the string to match `pattern`. Anchor it with `^...$` to
/// match the whole value.
pub fn matches(pattern: Regex) -> Validator<String> {
    validator(move |name, value: &String| {
        if !pattern.is_match(value) {
            return Err(ValidationError::new(
                name,
                format!("Does not match pattern: {}", pattern.as_str()),
            ));
        }
        Ok(())
    })
}

/// Restricts the value to a fixed set.
pub fn one_of<T>(allowed: Vec<T>) -> Validator<T>
where
    T: PartialEq + Display + Send + Sync + 'static,
{
    validator(move |name, value: &T| {
        if allowed.contains(value) {
            return Ok(());
        }
        let choices: Vec<String> = allowed.iter().map(|a| a.to_string()).collect();
        Err(ValidationError::new(
            name,
            format!("Given value: {} is not one of: {}", value, choices.join(", ")),
        ))
    })
}
