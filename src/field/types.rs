//! Field blueprint and the kind abstraction
//!
//! A `Field<K>` is declared once per service type and shared by every
//! instance. Validation of a raw value runs in a fixed order:
//!
//! 1. absent or null input resolves to `required` / `default`
//! 2. kind coercion into the native value
//! 3. kind built-in check, then extension validators
//! 4. user validators, first failure wins
//!
//! Defaults are trusted and never pass through steps 2-4.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::errors::{ValidationError, ValidationResult};

/// A validator callable, given the field name and the coerced value.
pub type Validator<T> = Arc<dyn Fn(&str, &T) -> ValidationResult<()> + Send + Sync>;

/// Wraps a closure into a shareable `Validator`.
pub fn validator<T, F>(check: F) -> Validator<T>
where
    F: Fn(&str, &T) -> ValidationResult<()> + Send + Sync + 'static,
{
    Arc::new(check)
}

/// The type-specific half of a field: coercion plus built-in checks.
pub trait FieldKind: Clone + fmt::Debug + Send + Sync + 'static {
    /// Native value produced by a successful validation
    type Value: Clone + fmt::Debug + Send + Sync + 'static;

    /// Type name for error messages and registry listings
    fn type_name(&self) -> &'static str;

    /// Converts a raw value into the native type, rejecting mismatches.
    fn coerce(&self, name: &str, raw: &Value) -> ValidationResult<Self::Value>;

    /// Built-in check run on every coerced value (ranges, lengths, formats).
    fn check(&self, _name: &str, _value: &Self::Value) -> ValidationResult<()> {
        Ok(())
    }
}

/// A declared input field.
pub struct Field<K: FieldKind> {
    kind: K,
    required: bool,
    default: Option<K::Value>,
    extensions: Vec<Validator<K::Value>>,
    validators: Vec<Validator<K::Value>>,
}

impl<K: FieldKind + Default> Field<K> {
    /// Creates a required field of the given kind with no validators.
    pub fn new() -> Self {
        Self::with_kind(K::default())
    }
}

impl<K: FieldKind + Default> Default for Field<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: FieldKind> Field<K> {
    pub fn with_kind(kind: K) -> Self {
        Self {
            kind,
            required: true,
            default: None,
            extensions: Vec::new(),
            validators: Vec::new(),
        }
    }

    /// Marks the field as optional. Absent input then binds no value.
    pub fn not_required(mut self) -> Self {
        self.required = false;
        self
    }

    /// Sets the value bound when the input omits this field.
    ///
    /// A field with a default is never required.
    pub fn with_default(mut self, value: K::Value) -> Self {
        self.required = false;
        self.default = Some(value);
        self
    }

    /// Appends a user validator, run after all built-in checks.
    pub fn validator<F>(mut self, check: F) -> Self
    where
        F: Fn(&str, &K::Value) -> ValidationResult<()> + Send + Sync + 'static,
    {
        self.validators.push(Arc::new(check));
        self
    }

    /// Appends an already-built validator.
    pub fn validator_arc(mut self, check: Validator<K::Value>) -> Self {
        self.validators.push(check);
        self
    }

    /// Extends the built-in check of this field's kind.
    ///
    /// Extensions run after the kind check and before user validators,
    /// so a derived field type always rejects whatever its base rejects.
    pub fn extend_default<F>(mut self, check: F) -> Self
    where
        F: Fn(&str, &K::Value) -> ValidationResult<()> + Send + Sync + 'static,
    {
        self.extensions.push(Arc::new(check));
        self
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub(crate) fn map_kind(mut self, update: impl FnOnce(&mut K)) -> Self {
        update(&mut self.kind);
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&K::Value> {
        self.default.as_ref()
    }

    /// Validates a raw input value for the field `name`.
    ///
    /// `raw` is `None` when the input did not contain the key. Returns
    /// `Ok(None)` only for an optional field without a default.
    pub fn validate(&self, name: &str, raw: Option<&Value>) -> ValidationResult<Option<K::Value>> {
        match raw {
            None | Some(Value::Null) => {
                if self.required {
                    return Err(ValidationError::required(name));
                }
                Ok(self.default.clone())
            }
            Some(raw) => self.validate_present(name, raw).map(Some),
        }
    }

    /// Coerces and validates a value known to be present.
    pub fn validate_present(&self, name: &str, raw: &Value) -> ValidationResult<K::Value> {
        let value = self.kind.coerce(name, raw)?;
        self.default_validator(name, &value)?;
        for check in &self.validators {
            check(name, &value)?;
        }
        Ok(value)
    }

    /// Built-in kind check followed by the extensions, in order.
    pub fn default_validator(&self, name: &str, value: &K::Value) -> ValidationResult<()> {
        self.kind.check(name, value)?;
        for check in &self.extensions {
            check(name, value)?;
        }
        Ok(())
    }
}

impl<K: FieldKind> Clone for Field<K> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            required: self.required,
            default: self.default.clone(),
            extensions: self.extensions.clone(),
            validators: self.validators.clone(),
        }
    }
}

impl<K: FieldKind> fmt::Debug for Field<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("default", &self.default)
            .field("extensions", &self.extensions.len())
            .field("validators", &self.validators.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Accepts any JSON string, rejects the literal "bad".
    #[derive(Debug, Clone, Default)]
    struct Word;

    impl FieldKind for Word {
        type Value = String;

        fn type_name(&self) -> &'static str {
            "word"
        }

        fn coerce(&self, name: &str, raw: &Value) -> ValidationResult<String> {
            raw.as_str()
                .map(str::to_string)
                .ok_or_else(|| ValidationError::type_mismatch(name, "str"))
        }

        fn check(&self, name: &str, value: &String) -> ValidationResult<()> {
            if value == "bad" {
                return Err(ValidationError::new(name, "bad word"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_required_field_absent_fails() {
        let field: Field<Word> = Field::new();
        let err = field.validate("w", None).unwrap_err();
        assert_eq!(err.field(), "w");
        assert_eq!(err.message(), "Required field cannot be empty");
    }

    #[test]
    fn test_null_is_treated_as_absent() {
        let field: Field<Word> = Field::new();
        assert!(field.validate("w", Some(&Value::Null)).is_err());

        let optional: Field<Word> = Field::new().not_required();
        assert_eq!(optional.validate("w", Some(&Value::Null)).unwrap(), None);
    }

    #[test]
    fn test_default_is_not_validated() {
        // "bad" would fail the kind check, but defaults are trusted
        let field: Field<Word> = Field::new().with_default("bad".into());
        assert!(!field.is_required());
        assert_eq!(field.validate("w", None).unwrap(), Some("bad".to_string()));
    }

    #[test]
    fn test_type_mismatch() {
        let field: Field<Word> = Field::new();
        let err = field.validate("w", Some(&json!(3))).unwrap_err();
        assert_eq!(err.message(), "Not of str type");
    }

    #[test]
    fn test_check_order_base_extension_user() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();

        let field: Field<Word> = Field::new()
            .extend_default(|name, value: &String| {
                if value.len() < 3 {
                    return Err(ValidationError::new(name, "too short"));
                }
                Ok(())
            })
            .validator(move |_, _| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });

        // kind check wins first
        let err = field.validate("w", Some(&json!("bad"))).unwrap_err();
        assert_eq!(err.message(), "bad word");

        // extension rejects before user validators run
        let err = field.validate("w", Some(&json!("ok"))).unwrap_err();
        assert_eq!(err.message(), "too short");
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(field.validate("w", Some(&json!("fine"))).unwrap().as_deref(), Some("fine"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_first_user_validator_failure_stops() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();

        let field: Field<Word> = Field::new()
            .validator(|name, _| Err(ValidationError::new(name, "first")))
            .validator(move |_, _| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });

        let err = field.validate("w", Some(&json!("word"))).unwrap_err();
        assert_eq!(err.message(), "first");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_blueprint_is_reusable() {
        let field: Field<Word> = Field::new();
        assert_eq!(field.validate("a", Some(&json!("one"))).unwrap().as_deref(), Some("one"));
        assert_eq!(field.validate("b", Some(&json!("two"))).unwrap().as_deref(), Some("two"));
        assert!(field.validate("c", None).is_err());
    }
}
