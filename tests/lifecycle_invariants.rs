//! Lifecycle Invariant Tests
//!
//! Tests for the unit call lifecycle:
//! - Invalid input never reaches a hook
//! - Skip reroutes to post_fire and is not an error
//! - Hook failures are observed by post_fire, then propagated
//! - Frozen values cannot be written after a call
//! - A unit is called at most once

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use fireservice::prelude::*;
use serde_json::json;

// =============================================================================
// Helper Services
// =============================================================================

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum Seen {
    #[default]
    Nothing,
    Fired,
    Skip,
    Failure,
}

#[derive(Default)]
struct Counters {
    pre_fire: AtomicUsize,
    fire: AtomicUsize,
    post_fire: AtomicUsize,
}

impl Counters {
    fn get(&self) -> (usize, usize, usize) {
        (
            self.pre_fire.load(Ordering::SeqCst),
            self.fire.load(Ordering::SeqCst),
            self.post_fire.load(Ordering::SeqCst),
        )
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum Plan {
    #[default]
    Proceed,
    Skip,
    FailPreFire,
    FailFire,
}

#[derive(Default)]
struct Crawler {
    user_id: Frozen<i64>,
    page_name: Frozen<String>,
    counters: Arc<Counters>,
    plan: Plan,
    extras_seen: Option<Extras>,
}

impl Crawler {
    fn with_plan(plan: Plan) -> (Self, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let service = Self {
            counters: Arc::clone(&counters),
            plan,
            ..Self::default()
        };
        (service, counters)
    }
}

impl Service for Crawler {
    type Output = (bool, Seen, String);

    fn declare(fields: &mut FieldSet<Self>) {
        fields
            .field("user_id", IntegerField::new().min_value(1), |s| &s.user_id)
            .field("page_name", StringField::new(), |s| &s.page_name);
    }

    fn pre_fire(&mut self) -> anyhow::Result<PreFire> {
        self.counters.pre_fire.fetch_add(1, Ordering::SeqCst);
        match self.plan {
            Plan::Skip => Ok(PreFire::skip("already done")),
            Plan::FailPreFire => anyhow::bail!("pre_fire exploded"),
            _ => Ok(PreFire::Proceed),
        }
    }

    fn fire(&mut self, extras: &Extras) -> anyhow::Result<()> {
        self.counters.fire.fetch_add(1, Ordering::SeqCst);
        self.extras_seen = Some(extras.clone());
        if self.plan == Plan::FailFire {
            anyhow::bail!("fire exploded");
        }
        Ok(())
    }

    fn post_fire(&mut self, fired: bool, interrupt: Option<&Interrupt>) -> Self::Output {
        self.counters.post_fire.fetch_add(1, Ordering::SeqCst);
        let seen = match interrupt {
            None => Seen::Fired,
            Some(Interrupt::Skip(_)) => Seen::Skip,
            Some(Interrupt::Failure(_)) => Seen::Failure,
        };
        let message = interrupt.map(|i| i.to_string()).unwrap_or_default();
        (fired, seen, message)
    }
}

fn about_page(user_id: i64) -> serde_json::Value {
    json!({"user_id": user_id, "page_name": "about.html"})
}

// =============================================================================
// Validation Gate Tests
// =============================================================================

/// Valid input is frozen as native values and fire runs exactly once.
#[test]
fn test_valid_input_fires_once() {
    let (service, counters) = Crawler::with_plan(Plan::Proceed);
    let mut unit = Unit::new(service);

    let outcome = unit.call(&about_page(1)).unwrap();

    assert_eq!(outcome, CallOutcome::Fired((true, Seen::Fired, String::new())));
    assert_eq!(unit.user_id.get(), Some(&1i64));
    assert_eq!(unit.page_name.get().map(String::as_str), Some("about.html"));
    assert_eq!(counters.get(), (1, 1, 1));
}

/// A value below min_value fails on that field and no hook runs.
#[test]
fn test_invalid_input_runs_no_hook() {
    let (service, counters) = Crawler::with_plan(Plan::Proceed);
    let mut unit = Unit::new(service);

    let err = unit.call(&about_page(0)).unwrap_err();

    let errors = err.validation_errors().expect("validation error");
    assert_eq!(errors.first().field(), "user_id");
    assert_eq!(errors.first().message(), "Given value: 0 is less than min: 1");
    assert_eq!(counters.get(), (0, 0, 0));
    assert!(!unit.user_id.is_frozen());
    assert!(!unit.page_name.is_frozen());
}

/// Every omitted required field is reported by name.
#[test]
fn test_missing_required_field() {
    for (input, missing) in [
        (json!({"page_name": "about.html"}), "user_id"),
        (json!({"user_id": 3}), "page_name"),
        (json!({"user_id": 3, "page_name": null}), "page_name"),
    ] {
        let (service, counters) = Crawler::with_plan(Plan::Proceed);
        let mut unit = Unit::new(service);

        let err = unit.call(&input).unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert_eq!(errors.first().field(), missing);
        assert_eq!(errors.first().message(), "Required field cannot be empty");
        assert_eq!(counters.get(), (0, 0, 0));
    }
}

/// Fail-fast mode reports only the first declared failure.
#[test]
fn test_fail_fast_reports_one_error() {
    let mut unit = Unit::new(Crawler::default());
    let err = unit.call(&json!({"user_id": "x"})).unwrap_err();
    assert_eq!(err.validation_errors().unwrap().len(), 1);
}

/// Collect-all mode reports every failure in declaration order.
#[test]
fn test_collect_all_reports_every_error() {
    let mut unit = Unit::with_config(Crawler::default(), ServiceConfig::collect_all());
    let err = unit.call(&json!({"user_id": "x"})).unwrap_err();

    let errors = err.validation_errors().unwrap();
    assert_eq!(errors.fields(), vec!["user_id", "page_name"]);
    assert_eq!(errors.first().message(), "Not of int type");
}

/// Unknown keys are rejected by default and ignored on request.
#[test]
fn test_unknown_parameters() {
    let input = json!({"user_id": 1, "page_name": "a.html", "zzz": true});

    let mut strict = Unit::new(Crawler::default());
    let err = strict.call(&input).unwrap_err();
    assert!(matches!(err, ServiceError::UnknownParameter(ref key) if key == "zzz"));
    assert_eq!(err.code().code(), "FIRE_UNKNOWN_PARAMETER");

    let config = ServiceConfig::default().with_unknown_parameters(UnknownParameters::Ignore);
    let mut lenient = Unit::with_config(Crawler::default(), config);
    assert!(lenient.call(&input).unwrap().is_fired());
}

// =============================================================================
// Skip Tests
// =============================================================================

/// Skip bypasses fire, reaches post_fire once, and is not an error.
#[test]
fn test_skip_reroutes_to_post_fire() {
    let (service, counters) = Crawler::with_plan(Plan::Skip);
    let mut unit = Unit::new(service);

    let outcome = unit.call(&about_page(1)).unwrap();

    match outcome {
        CallOutcome::Skipped { reason, output } => {
            assert_eq!(reason, SkipError::new("already done"));
            assert_eq!(output, (false, Seen::Skip, "skipped: already done".to_string()));
        }
        other => panic!("expected skip, got {:?}", other),
    }
    assert_eq!(counters.get(), (1, 0, 1));
    assert_eq!(unit.state(), LifecycleState::Done);
}

// =============================================================================
// Hook Failure Tests
// =============================================================================

/// A fire error is seen by post_fire, then returned.
#[test]
fn test_fire_error_observed_then_propagated() {
    let (service, counters) = Crawler::with_plan(Plan::FailFire);
    let mut unit = Unit::new(service);

    let err = unit.call(&about_page(1)).unwrap_err();

    assert!(matches!(err, ServiceError::Fire(_)));
    assert_eq!(err.hook_error().unwrap().to_string(), "fire exploded");
    assert_eq!(counters.get(), (1, 1, 1));
}

/// A pre_fire error skips fire but still runs post_fire.
#[test]
fn test_pre_fire_error_runs_post_fire() {
    let (service, counters) = Crawler::with_plan(Plan::FailPreFire);
    let mut unit = Unit::new(service);

    let err = unit.call(&about_page(1)).unwrap_err();

    assert!(matches!(err, ServiceError::PreFire(_)));
    assert_eq!(counters.get(), (1, 0, 1));
    assert_eq!(
        unit.history(),
        &[
            LifecycleState::Created,
            LifecycleState::Validating,
            LifecycleState::Validated,
            LifecycleState::PreFire,
            LifecycleState::PostFire,
            LifecycleState::Done,
        ]
    );
}

/// Extras reach fire untouched.
#[test]
fn test_extras_passed_to_fire() {
    let mut unit = Unit::new(Crawler::default());
    let mut extras = Extras::new();
    extras.insert("depth".into(), json!(2));

    unit.call_with(&about_page(5), &extras).unwrap();

    assert_eq!(unit.service().extras_seen.as_ref(), Some(&extras));
}

// =============================================================================
// Immutability Tests
// =============================================================================

/// Frozen values reject writes and keep their validated value.
#[test]
fn test_write_after_call_fails() {
    let mut unit = Unit::new(Crawler::default());
    unit.call(&about_page(7)).unwrap();

    let err = unit.user_id.assign(8).unwrap_err();
    assert_eq!(err, ModificationError::new("user_id"));
    assert_eq!(err.to_string(), "Attempt to change field: user_id");
    assert_eq!(unit.user_id.get(), Some(&7));
}

/// A slot written before the call makes binding fail.
#[test]
fn test_preassigned_slot_rejected() {
    let service = Crawler::default();
    service.user_id.assign(9).unwrap();

    let mut unit = Unit::new(service);
    let err = unit.call(&about_page(1)).unwrap_err();

    assert!(matches!(err, ServiceError::Modification(_)));
    assert_eq!(unit.user_id.get(), Some(&9));
}

/// A taken later slot leaves the earlier slots unwritten and runs no hook.
#[test]
fn test_preassigned_later_slot_freezes_nothing() {
    let (service, counters) = Crawler::with_plan(Plan::Proceed);
    service.page_name.assign("index.html".into()).unwrap();

    let mut unit = Unit::new(service);
    let err = unit.call(&about_page(1)).unwrap_err();

    match err {
        ServiceError::Modification(ref modification) => {
            assert_eq!(modification.field(), "page_name")
        }
        other => panic!("expected a modification error, got {other:?}"),
    }
    assert!(!unit.user_id.is_frozen());
    assert_eq!(unit.page_name.get().map(String::as_str), Some("index.html"));
    assert_eq!(unit.state(), LifecycleState::Done);
    assert_eq!(counters.get(), (0, 0, 0));
}

// =============================================================================
// Single-Call Tests
// =============================================================================

/// A second call fails without validating or touching values.
#[test]
fn test_second_call_rejected() {
    let (service, counters) = Crawler::with_plan(Plan::Proceed);
    let mut unit = Unit::new(service);
    unit.call(&about_page(1)).unwrap();

    let err = unit.call(&about_page(0)).unwrap_err();

    assert!(matches!(
        err,
        ServiceError::AlreadyCalled {
            state: LifecycleState::Done
        }
    ));
    assert_eq!(unit.user_id.get(), Some(&1));
    assert_eq!(counters.get(), (1, 1, 1));
}

/// A unit that failed validation cannot be retried either.
#[test]
fn test_failed_unit_not_reusable() {
    let mut unit = Unit::new(Crawler::default());
    assert!(unit.call(&about_page(0)).is_err());
    let err = unit.call(&about_page(1)).unwrap_err();
    assert_eq!(err.code().code(), "FIRE_ALREADY_CALLED");
}

/// Units of the same service type hold independent values.
#[test]
fn test_units_are_independent() {
    let mut first = Unit::new(Crawler::default());
    let mut second = Unit::new(Crawler::default());

    first.call(&about_page(1)).unwrap();
    second.call(&about_page(2)).unwrap();

    assert_eq!(first.user_id.get(), Some(&1));
    assert_eq!(second.user_id.get(), Some(&2));
}
