//! Field registry
//!
//! Each service type is declared once per process. The first `discover`
//! call for a type runs `Service::declare` and caches the resulting
//! `FieldRegistry`; later calls, from any thread, share the same `Arc`.
//!
//! # Principles
//!
//! 1. Declaration order is validation order
//! 2. A registry is immutable once built
//! 3. A rejected declaration is never cached

mod errors;
mod fields;

pub use errors::{RegistryError, RegistryResult};
pub use fields::{FieldInfo, FieldRegistry, FieldSet, SlotAccessor};

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use crate::service::Service;

type CachedRegistry = Arc<dyn Any + Send + Sync>;

static REGISTRIES: OnceLock<RwLock<HashMap<TypeId, CachedRegistry>>> = OnceLock::new();

fn registries() -> &'static RwLock<HashMap<TypeId, CachedRegistry>> {
    REGISTRIES.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Returns the field registry for `S`, building it on first use.
pub fn discover<S: Service>() -> RegistryResult<Arc<FieldRegistry<S>>> {
    let key = TypeId::of::<S>();

    {
        let cache = registries().read().map_err(|_| RegistryError::Poisoned)?;
        if let Some(entry) = cache.get(&key) {
            return downcast::<S>(Arc::clone(entry));
        }
    }

    // Built outside the lock; a concurrent builder may win the insert below.
    let built: CachedRegistry = Arc::new(FieldRegistry::<S>::build()?);

    let entry = {
        let mut cache = registries().write().map_err(|_| RegistryError::Poisoned)?;
        Arc::clone(cache.entry(key).or_insert(built))
    };
    downcast::<S>(entry)
}

fn downcast<S: Service>(entry: CachedRegistry) -> RegistryResult<Arc<FieldRegistry<S>>> {
    entry
        .downcast::<FieldRegistry<S>>()
        .map_err(|_| RegistryError::TypeMismatch(S::name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Frozen, IntegerField};
    use std::sync::atomic::{AtomicUsize, Ordering};

    static DECLARED: AtomicUsize = AtomicUsize::new(0);

    struct Counted {
        n: Frozen<i64>,
    }

    impl Service for Counted {
        type Output = ();

        fn declare(fields: &mut FieldSet<Self>) {
            DECLARED.fetch_add(1, Ordering::SeqCst);
            fields.field("n", IntegerField::new(), |s| &s.n);
        }
    }

    #[test]
    fn test_discover_builds_once() {
        let first = discover::<Counted>().unwrap();
        let second = discover::<Counted>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(DECLARED.load(Ordering::SeqCst), 1);
        assert_eq!(first.names(), vec!["n"]);
    }

    static REJECTED: AtomicUsize = AtomicUsize::new(0);

    struct Broken {
        n: Frozen<i64>,
    }

    impl Service for Broken {
        type Output = ();

        fn declare(fields: &mut FieldSet<Self>) {
            REJECTED.fetch_add(1, Ordering::SeqCst);
            fields
                .field("n", IntegerField::new(), |s| &s.n)
                .field("n", IntegerField::new(), |s| &s.n);
        }
    }

    #[test]
    fn test_rejected_declaration_not_cached() {
        assert!(discover::<Broken>().is_err());
        assert!(discover::<Broken>().is_err());
        assert_eq!(REJECTED.load(Ordering::SeqCst), 2);
    }
}
