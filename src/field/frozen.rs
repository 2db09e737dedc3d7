//! Write-once field slots
//!
//! A `Frozen<T>` lives on a service instance and receives the field's
//! validated value exactly once. Reads are free; a second write of any
//! kind fails with `ModificationError`.
//!
//! An optional field that received no input is still frozen, as empty,
//! so it cannot be written after the call either.

use std::fmt;
use std::sync::OnceLock;

use super::errors::{ModificationError, UnboundFieldError};

/// Field name reported for a slot written only through `Frozen::assign`
pub const UNNAMED_FIELD: &str = "<assigned outside a call>";

struct Slot<T> {
    field: Option<String>,
    value: Option<T>,
}

pub struct Frozen<T> {
    cell: OnceLock<Slot<T>>,
}

impl<T> Frozen<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// The bound value, if any.
    pub fn get(&self) -> Option<&T> {
        self.cell.get().and_then(|slot| slot.value.as_ref())
    }

    /// The bound value, or an error usable with `?` inside hooks.
    pub fn value(&self) -> Result<&T, UnboundFieldError> {
        match self.cell.get() {
            None => Err(UnboundFieldError::NotBound),
            Some(Slot {
                value: Some(value), ..
            }) => Ok(value),
            Some(Slot { field, value: None }) => Err(UnboundFieldError::Empty(
                field.clone().unwrap_or_default(),
            )),
        }
    }

    /// Whether the slot has been written, with or without a value.
    pub fn is_frozen(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Field name recorded when the slot was bound by a call.
    pub fn field(&self) -> Option<&str> {
        self.cell.get().and_then(|slot| slot.field.as_deref())
    }

    /// Writes a value from outside a call.
    ///
    /// Fails once the slot is frozen. A slot written this way before a
    /// call makes that call fail with `ModificationError`.
    ///
    /// A slot only learns its field name when a call binds it. If the
    /// earlier write was also an `assign`, the error names the field
    /// `UNNAMED_FIELD`.
    pub fn assign(&self, value: T) -> Result<(), ModificationError> {
        let slot = Slot {
            field: None,
            value: Some(value),
        };
        self.cell
            .set(slot)
            .map_err(|_| ModificationError::new(self.field().unwrap_or(UNNAMED_FIELD)))
    }

    pub(crate) fn freeze(&self, field: &str, value: Option<T>) -> Result<(), ModificationError> {
        let slot = Slot {
            field: Some(field.to_string()),
            value,
        };
        self.cell
            .set(slot)
            .map_err(|_| ModificationError::new(field))
    }
}

impl<T> Default for Frozen<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Frozen<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            None => write!(f, "Frozen(<unbound>)"),
            Some(slot) => f.debug_tuple("Frozen").field(&slot.value).finish(),
        }
    }
}
