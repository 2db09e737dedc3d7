//! Services and their execution units
//!
//! A service is a plain struct with one `Frozen<T>` slot per declared
//! field plus whatever private state its hooks need. A `Unit` wraps one
//! instance and runs exactly one call through the lifecycle:
//!
//! 1. Validate the input against the registry; freeze every value at once
//! 2. `pre_fire`, which may skip
//! 3. `fire`
//! 4. `post_fire`, whose return value is the call's output
//!
//! # Principles
//!
//! - One unit, one call
//! - Nothing is frozen unless every field validated
//! - `post_fire` runs whenever validation succeeded

mod errors;
mod state;
mod unit;

pub use errors::{ServiceError, ServiceErrorCode, ServiceResult, SkipError};
pub use state::{LifecycleError, LifecycleResult, LifecycleState};
pub use unit::Unit;

use serde_json::{Map, Value};

use crate::registry::FieldSet;

/// Runtime-only keyword data passed to `fire`, never validated
pub type Extras = Map<String, Value>;

/// What `pre_fire` decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreFire {
    Proceed,
    Skip(SkipError),
}

impl PreFire {
    pub fn skip(reason: impl Into<String>) -> Self {
        PreFire::Skip(SkipError::new(reason))
    }
}

/// Why `fire` did not complete, as seen by `post_fire`
#[derive(Debug)]
pub enum Interrupt {
    Skip(SkipError),
    Failure(anyhow::Error),
}

impl Interrupt {
    pub fn is_skip(&self) -> bool {
        matches!(self, Interrupt::Skip(_))
    }

    pub fn into_error(self) -> anyhow::Error {
        match self {
            Interrupt::Skip(skip) => skip.into(),
            Interrupt::Failure(err) => err,
        }
    }
}

impl std::fmt::Display for Interrupt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interrupt::Skip(skip) => write!(f, "skipped: {}", skip),
            Interrupt::Failure(err) => write!(f, "{}", err),
        }
    }
}

/// Successful result of `Unit::call`
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome<O> {
    /// `fire` ran; holds the `post_fire` output
    Fired(O),
    /// `pre_fire` skipped; `fire` never ran
    Skipped { reason: SkipError, output: O },
}

impl<O> CallOutcome<O> {
    pub fn is_fired(&self) -> bool {
        matches!(self, CallOutcome::Fired(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, CallOutcome::Skipped { .. })
    }

    pub fn output(&self) -> &O {
        match self {
            CallOutcome::Fired(output) | CallOutcome::Skipped { output, .. } => output,
        }
    }

    pub fn into_output(self) -> O {
        match self {
            CallOutcome::Fired(output) | CallOutcome::Skipped { output, .. } => output,
        }
    }
}

/// A declaratively validated unit of work.
///
/// ```ignore
/// #[derive(Default)]
/// struct Crawler {
///     user_id: Frozen<i64>,
/// }
///
/// impl Service for Crawler {
///     type Output = ();
///
///     fn declare(fields: &mut FieldSet<Self>) {
///         fields.field("user_id", IntegerField::new().min_value(1), |s| &s.user_id);
///     }
///
///     fn fire(&mut self, _extras: &Extras) -> anyhow::Result<()> {
///         println!("crawling for {}", self.user_id.value()?);
///         Ok(())
///     }
/// }
/// ```
pub trait Service: Sized + 'static {
    /// Value returned by `post_fire`
    type Output: Default;

    /// Declares the fields, in validation order.
    fn declare(fields: &mut FieldSet<Self>);

    /// Name used in logs and errors
    fn name() -> &'static str {
        std::any::type_name::<Self>()
    }

    fn pre_fire(&mut self) -> anyhow::Result<PreFire> {
        Ok(PreFire::Proceed)
    }

    fn fire(&mut self, _extras: &Extras) -> anyhow::Result<()> {
        Ok(())
    }

    /// Always runs once validation succeeded. `fired` is true only when
    /// `fire` returned `Ok`; otherwise `interrupt` says why.
    fn post_fire(&mut self, _fired: bool, _interrupt: Option<&Interrupt>) -> Self::Output {
        Self::Output::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pre_fire_skip() {
        assert_eq!(
            PreFire::skip("done already"),
            PreFire::Skip(SkipError::new("done already"))
        );
    }

    #[test]
    fn test_interrupt_into_error() {
        let skip = Interrupt::Skip(SkipError::new("nothing to do"));
        assert!(skip.is_skip());
        let err = skip.into_error();
        assert!(err.downcast_ref::<SkipError>().is_some());

        let failure = Interrupt::Failure(anyhow::anyhow!("boom"));
        assert!(!failure.is_skip());
        assert_eq!(failure.to_string(), "boom");
        assert_eq!(failure.into_error().to_string(), "boom");
    }

    #[test]
    fn test_call_outcome_output() {
        let fired = CallOutcome::Fired(3);
        assert!(fired.is_fired());
        assert_eq!(*fired.output(), 3);

        let skipped = CallOutcome::Skipped {
            reason: SkipError::new("no"),
            output: 0,
        };
        assert!(skipped.is_skipped());
        assert_eq!(skipped.into_output(), 0);
    }
}
