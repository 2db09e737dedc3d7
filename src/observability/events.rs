//! Observable events
//!
//! Every log line emitted by the crate carries one of these as its
//! `event` field, so log consumers can match on a stable name instead of
//! the free-form message.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Service config file loaded
    ConfigLoaded,

    // Registry
    /// Field registry built for a service type
    RegistryDiscovered,
    /// Service declared the same field twice
    RegistryRejected,

    // Lifecycle
    /// `call()` entered
    CallBegin,
    /// Input validated and frozen
    ValidationComplete,
    /// Input rejected
    ValidationFailed,
    /// Input valid, but a slot was written before the call
    BindRejected,
    /// Lifecycle state changed
    StateTransition,
    /// `pre_fire` asked to skip
    FireSkipped,
    /// `pre_fire` returned an error
    PreFireFailed,
    /// `fire` completed
    FireComplete,
    /// `fire` returned an error
    FireFailed,
    /// `post_fire` returned; the call is done
    CallComplete,
}

impl Event {
    /// Returns the event name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::RegistryDiscovered => "REGISTRY_DISCOVERED",
            Event::RegistryRejected => "REGISTRY_REJECTED",
            Event::CallBegin => "CALL_BEGIN",
            Event::ValidationComplete => "VALIDATION_COMPLETE",
            Event::ValidationFailed => "VALIDATION_FAILED",
            Event::BindRejected => "BIND_REJECTED",
            Event::StateTransition => "STATE_TRANSITION",
            Event::FireSkipped => "FIRE_SKIPPED",
            Event::PreFireFailed => "PRE_FIRE_FAILED",
            Event::FireComplete => "FIRE_COMPLETE",
            Event::FireFailed => "FIRE_FAILED",
            Event::CallComplete => "CALL_COMPLETE",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::CallBegin.as_str(), "CALL_BEGIN");
        assert_eq!(Event::FireSkipped.as_str(), "FIRE_SKIPPED");
        assert_eq!(format!("{}", Event::ValidationFailed), "VALIDATION_FAILED");
    }
}
