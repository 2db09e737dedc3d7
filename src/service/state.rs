//! Unit lifecycle state machine
//!
//! - States are explicit and enumerable
//! - Every transition goes through `transition`, never by assignment
//! - Anything not listed below is forbidden
//!
//! ```text
//! Created -> Validating -> Validated -> PreFire -> Firing -> Fired -> PostFire -> Done
//!                       -> ValidationFailed -> Done
//!                                         PreFire -> Skipped -> PostFire
//!                                         PreFire -> PostFire       (pre_fire error)
//!                                                    Firing -> PostFire (fire error)
//! ```

use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    /// Unit built, not yet called
    Created,
    Validating,
    /// All fields valid and frozen
    Validated,
    ValidationFailed,
    /// Running `pre_fire`
    PreFire,
    /// Running `fire`
    Firing,
    Fired,
    /// `pre_fire` asked to skip
    Skipped,
    /// Running `post_fire`
    PostFire,
    /// Terminal
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("forbidden transition: {from} -> {to}")]
    ForbiddenTransition {
        from: LifecycleState,
        to: LifecycleState,
    },
}

/// Result type for lifecycle transitions
pub type LifecycleResult<T> = Result<T, LifecycleError>;

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Validating => "VALIDATING",
            Self::Validated => "VALIDATED",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::PreFire => "PRE_FIRE",
            Self::Firing => "FIRING",
            Self::Fired => "FIRED",
            Self::Skipped => "SKIPPED",
            Self::PostFire => "POST_FIRE",
            Self::Done => "DONE",
        }
    }

    /// Whether `self -> next` is an allowed transition.
    pub fn can_transition(self, next: LifecycleState) -> bool {
        use LifecycleState::*;

        matches!(
            (self, next),
            (Created, Validating)
                | (Validating, Validated)
                | (Validating, ValidationFailed)
                | (Validated, PreFire)
                | (PreFire, Firing)
                | (PreFire, Skipped)
                | (PreFire, PostFire)
                | (Firing, Fired)
                | (Firing, PostFire)
                | (Fired, PostFire)
                | (Skipped, PostFire)
                | (PostFire, Done)
                | (ValidationFailed, Done)
        )
    }

    /// Returns `next` if the transition is allowed.
    pub fn transition(self, next: LifecycleState) -> LifecycleResult<LifecycleState> {
        if self.can_transition(next) {
            Ok(next)
        } else {
            Err(LifecycleError::ForbiddenTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
