//! Field declaration and the per-type field registry
//!
//! A service lists its fields in `Service::declare` through a `FieldSet`.
//! Each entry pairs a name and a `Field<K>` blueprint with an accessor for
//! the instance's `Frozen` slot. The resulting `FieldRegistry` keeps
//! declaration order, which is also validation order.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::ValidationMode;
use crate::field::{Field, FieldKind, Frozen, ModificationError, ValidationErrors, ValidationResult};
use crate::observability::Event;
use crate::service::Service;

use super::errors::{RegistryError, RegistryResult};

/// Accessor from a service instance to one of its slots
pub type SlotAccessor<S, T> = fn(&S) -> &Frozen<T>;

/// A validated value waiting to be frozen onto an instance
pub(crate) type Pending<S> = Box<dyn FnOnce(&S) -> Result<(), ModificationError>>;

/// Description of one declared field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldInfo {
    pub name: &'static str,
    pub type_name: &'static str,
    pub required: bool,
    pub has_default: bool,
}

pub(crate) trait Binding<S>: Send + Sync {
    fn name(&self) -> &'static str;

    fn info(&self) -> FieldInfo;

    /// Whether this field's slot on `service` was already written.
    fn is_frozen(&self, service: &S) -> bool;

    /// Validates the raw value without touching any instance.
    fn prepare(&self, raw: Option<&Value>) -> ValidationResult<Pending<S>>;
}

struct FieldBinding<S, K: FieldKind> {
    name: &'static str,
    field: Field<K>,
    slot: SlotAccessor<S, K::Value>,
}

impl<S: 'static, K: FieldKind> Binding<S> for FieldBinding<S, K> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn info(&self) -> FieldInfo {
        FieldInfo {
            name: self.name,
            type_name: self.field.type_name(),
            required: self.field.is_required(),
            has_default: self.field.default_value().is_some(),
        }
    }

    fn is_frozen(&self, service: &S) -> bool {
        (self.slot)(service).is_frozen()
    }

    fn prepare(&self, raw: Option<&Value>) -> ValidationResult<Pending<S>> {
        let value = self.field.validate(self.name, raw)?;
        let slot = self.slot;
        let name = self.name;
        Ok(Box::new(move |service: &S| slot(service).freeze(name, value)))
    }
}

/// Builder handed to `Service::declare`.
pub struct FieldSet<S> {
    bindings: Vec<Arc<dyn Binding<S>>>,
    duplicate: Option<&'static str>,
}

impl<S: 'static> FieldSet<S> {
    pub(crate) fn new() -> Self {
        Self {
            bindings: Vec::new(),
            duplicate: None,
        }
    }

    /// Declares a field bound to the slot returned by `slot`.
    ///
    /// ```ignore
    /// fields.field("user_id", IntegerField::new().min_value(1), |s| &s.user_id);
    /// ```
    pub fn field<K: FieldKind>(
        &mut self,
        name: &'static str,
        field: Field<K>,
        slot: SlotAccessor<S, K::Value>,
    ) -> &mut Self {
        if self.bindings.iter().any(|b| b.name() == name) {
            self.duplicate.get_or_insert(name);
            return self;
        }
        self.bindings.push(Arc::new(FieldBinding { name, field, slot }));
        self
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Ordered, read-only field list for one service type.
pub struct FieldRegistry<S> {
    service: &'static str,
    bindings: Vec<Arc<dyn Binding<S>>>,
}

impl<S: Service> FieldRegistry<S> {
    /// Runs `S::declare` and freezes the result.
    pub(crate) fn build() -> RegistryResult<Self> {
        let service = S::name();
        let mut set = FieldSet::new();
        S::declare(&mut set);

        if let Some(field) = set.duplicate {
            tracing::error!(
                event = Event::RegistryRejected.as_str(),
                service,
                field,
                "duplicate field declaration"
            );
            return Err(RegistryError::DuplicateField { service, field });
        }

        tracing::debug!(
            event = Event::RegistryDiscovered.as_str(),
            service,
            fields = set.bindings.len(),
            "field registry built"
        );

        Ok(Self {
            service,
            bindings: set.bindings,
        })
    }
}

impl<S: 'static> FieldRegistry<S> {
    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Field names in declaration order
    pub fn names(&self) -> Vec<&'static str> {
        self.bindings.iter().map(|b| b.name()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.iter().any(|b| b.name() == name)
    }

    /// Field descriptions in declaration order
    pub fn fields(&self) -> Vec<FieldInfo> {
        self.bindings.iter().map(|b| b.info()).collect()
    }

    /// First input key that matches no declared field
    pub fn unknown_parameter<'a>(&self, input: &'a Map<String, Value>) -> Option<&'a str> {
        input
            .keys()
            .find(|key| !self.contains(key))
            .map(String::as_str)
    }

    /// Validates every field against `input` in declaration order.
    ///
    /// Nothing is frozen here; on success the returned values are handed
    /// to `freeze`.
    pub(crate) fn validate(
        &self,
        input: &Map<String, Value>,
        mode: ValidationMode,
    ) -> Result<Vec<Pending<S>>, ValidationErrors> {
        let mut pending = Vec::with_capacity(self.bindings.len());
        let mut errors = Vec::new();

        for binding in &self.bindings {
            match binding.prepare(input.get(binding.name())) {
                Ok(value) => pending.push(value),
                Err(error) => {
                    if mode == ValidationMode::FailFast {
                        return Err(error.into());
                    }
                    errors.push(error);
                }
            }
        }

        match ValidationErrors::from_vec(errors) {
            Some(errors) => Err(errors),
            None => Ok(pending),
        }
    }

    /// First declared field whose slot on `service` is already written
    pub fn frozen_field(&self, service: &S) -> Option<&'static str> {
        self.bindings
            .iter()
            .find(|b| b.is_frozen(service))
            .map(|b| b.name())
    }

    /// Writes every pending value, or none of them when any slot is
    /// already frozen.
    pub(crate) fn freeze(&self, service: &S, pending: Vec<Pending<S>>) -> Result<(), ModificationError> {
        if let Some(field) = self.frozen_field(service) {
            return Err(ModificationError::new(field));
        }
        for value in pending {
            value(service)?;
        }
        Ok(())
    }
}
