//! Composite list field
//!
//! `ListKind<K>` validates a JSON array by running the inner `Field<K>`
//! on every element. Inner fields may themselves be lists, so
//! `ListField<ListKind<CharacterKind>>` accepts `[["a", "b"], ["c"]]`.
//! Nesting depth is fixed by the declared type.
//!
//! Element failures are reported with their path (`grid[1][0]`) and stop
//! validation of the whole list.

use serde_json::Value;

use super::errors::{ValidationError, ValidationResult};
use super::types::{Field, FieldKind};
use super::validators::check_length;

#[derive(Debug, Clone)]
pub struct ListKind<K: FieldKind> {
    item: Field<K>,
    min_length: Option<usize>,
    max_length: Option<usize>,
}

impl<K: FieldKind> ListKind<K> {
    pub fn new(item: Field<K>) -> Self {
        Self {
            item,
            min_length: None,
            max_length: None,
        }
    }

    pub fn item(&self) -> &Field<K> {
        &self.item
    }
}

/// Path of the element at `index` inside the list named `name`
fn element_path(name: &str, index: usize) -> String {
    format!("{}[{}]", name, index)
}

impl<K: FieldKind> FieldKind for ListKind<K> {
    type Value = Vec<K::Value>;

    fn type_name(&self) -> &'static str {
        "list"
    }

    fn coerce(&self, name: &str, raw: &Value) -> ValidationResult<Vec<K::Value>> {
        let elements = raw
            .as_array()
            .ok_or_else(|| ValidationError::type_mismatch(name, "list or tuple"))?;

        let mut values = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            let path = element_path(name, index);
            match self.item.validate(&path, Some(element))? {
                Some(value) => values.push(value),
                // An optional inner field without a default leaves a hole
                None => return Err(ValidationError::required(path)),
            }
        }
        Ok(values)
    }

    fn check(&self, name: &str, value: &Vec<K::Value>) -> ValidationResult<()> {
        check_length(name, value.len(), self.min_length, self.max_length)
    }
}

pub type ListField<K> = Field<ListKind<K>>;

impl<K: FieldKind> Field<ListKind<K>> {
    /// A required list whose elements are validated by `item`.
    pub fn of(item: Field<K>) -> Self {
        Field::with_kind(ListKind::new(item))
    }

    pub fn min_length(self, min: usize) -> Self {
        self.map_kind(|k| k.min_length = Some(min))
    }

    pub fn max_length(self, max: usize) -> Self {
        self.map_kind(|k| k.max_length = Some(max))
    }
}
