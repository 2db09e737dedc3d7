//! Execution unit
//!
//! Owns one service instance and drives its single call through the
//! lifecycle state machine.

use std::ops::Deref;

use serde_json::Value;
use uuid::Uuid;

use super::errors::{ServiceError, ServiceResult};
use super::state::{LifecycleResult, LifecycleState};
use super::{CallOutcome, Extras, Interrupt, PreFire, Service};
use crate::config::{ServiceConfig, UnknownParameters};
use crate::field::{ValidationError, ValidationErrors};
use crate::observability::Event;
use crate::registry::{self, FieldRegistry};

/// Field name reported when the input itself is not an object
const ROOT: &str = "$root";

/// A service instance plus the state of its one call.
///
/// Dereferences to the service, so frozen values read as
/// `unit.user_id.get()`.
pub struct Unit<S: Service> {
    service: S,
    config: ServiceConfig,
    state: LifecycleState,
    history: Vec<LifecycleState>,
}

impl<S: Service> Unit<S> {
    pub fn new(service: S) -> Self {
        Self::with_config(service, ServiceConfig::default())
    }

    pub fn with_config(service: S, config: ServiceConfig) -> Self {
        Self {
            service,
            config,
            state: LifecycleState::Created,
            history: vec![LifecycleState::Created],
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Every state visited so far, starting with `Created`
    pub fn history(&self) -> &[LifecycleState] {
        &self.history
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn into_inner(self) -> S {
        self.service
    }

    /// Runs the call with no extras.
    pub fn call(&mut self, input: &Value) -> ServiceResult<CallOutcome<S::Output>> {
        self.call_with(input, &Extras::new())
    }

    /// Validates `input`, freezes it onto the service and runs the hooks.
    ///
    /// `extras` reach `fire` untouched. A unit can be called once; later
    /// calls fail with `AlreadyCalled` and change nothing.
    pub fn call_with(
        &mut self,
        input: &Value,
        extras: &Extras,
    ) -> ServiceResult<CallOutcome<S::Output>> {
        if self.state != LifecycleState::Created {
            return Err(ServiceError::AlreadyCalled { state: self.state });
        }

        let span = tracing::info_span!(
            "service_call",
            service = S::name(),
            call_id = %Uuid::new_v4()
        );
        let _enter = span.enter();
        tracing::debug!(event = Event::CallBegin.as_str(), "call begin");

        // A rejected declaration leaves the unit in Created.
        let registry = registry::discover::<S>()?;

        self.advance(LifecycleState::Validating)?;
        if let Err(err) = self.bind(&registry, input) {
            let event = match err {
                ServiceError::Modification(_) => Event::BindRejected,
                _ => Event::ValidationFailed,
            };
            tracing::info!(
                event = event.as_str(),
                code = err.code().code(),
                error = %err,
                "input rejected"
            );
            self.advance(LifecycleState::ValidationFailed)?;
            self.advance(LifecycleState::Done)?;
            return Err(err);
        }
        self.advance(LifecycleState::Validated)?;
        tracing::debug!(
            event = Event::ValidationComplete.as_str(),
            fields = registry.len(),
            "input validated"
        );

        self.advance(LifecycleState::PreFire)?;
        match self.service.pre_fire() {
            Ok(PreFire::Proceed) => {}
            Ok(PreFire::Skip(reason)) => {
                tracing::info!(
                    event = Event::FireSkipped.as_str(),
                    reason = reason.reason(),
                    "fire skipped"
                );
                self.advance(LifecycleState::Skipped)?;
                let output = self.finish(false, Some(&Interrupt::Skip(reason.clone())))?;
                return Ok(CallOutcome::Skipped { reason, output });
            }
            Err(err) => {
                tracing::warn!(
                    event = Event::PreFireFailed.as_str(),
                    error = %err,
                    "pre_fire failed"
                );
                let interrupt = Interrupt::Failure(err);
                self.finish(false, Some(&interrupt))?;
                return Err(ServiceError::PreFire(interrupt.into_error()));
            }
        }

        self.advance(LifecycleState::Firing)?;
        match self.service.fire(extras) {
            Ok(()) => {
                tracing::debug!(event = Event::FireComplete.as_str(), "fire complete");
                self.advance(LifecycleState::Fired)?;
                let output = self.finish(true, None)?;
                Ok(CallOutcome::Fired(output))
            }
            Err(err) => {
                tracing::warn!(event = Event::FireFailed.as_str(), error = %err, "fire failed");
                let interrupt = Interrupt::Failure(err);
                self.finish(false, Some(&interrupt))?;
                Err(ServiceError::Fire(interrupt.into_error()))
            }
        }
    }

    fn bind(&self, registry: &FieldRegistry<S>, input: &Value) -> ServiceResult<()> {
        let map = input
            .as_object()
            .ok_or_else(|| ValidationErrors::from(ValidationError::type_mismatch(ROOT, "dict")))?;

        if self.config.unknown_parameters == UnknownParameters::Reject {
            if let Some(key) = registry.unknown_parameter(map) {
                return Err(ServiceError::UnknownParameter(key.to_string()));
            }
        }

        let pending = registry.validate(map, self.config.validation_mode)?;
        registry.freeze(&self.service, pending)?;
        Ok(())
    }

    fn finish(&mut self, fired: bool, interrupt: Option<&Interrupt>) -> ServiceResult<S::Output> {
        self.advance(LifecycleState::PostFire)?;
        let output = self.service.post_fire(fired, interrupt);
        self.advance(LifecycleState::Done)?;
        tracing::debug!(event = Event::CallComplete.as_str(), fired, "call complete");
        Ok(output)
    }

    fn advance(&mut self, next: LifecycleState) -> LifecycleResult<()> {
        let from = self.state;
        self.state = from.transition(next)?;
        self.history.push(next);
        tracing::trace!(
            event = Event::StateTransition.as_str(),
            from = from.as_str(),
            to = next.as_str(),
            "state transition"
        );
        Ok(())
    }
}

impl<S: Service + Default> Default for Unit<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: Service> Deref for Unit<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.service
    }
}
