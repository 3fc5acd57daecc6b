//! Tests for the component container
//!
//! # Test Coverage
//!
//! - Last-write-wins registration for instances and types
//! - Idempotent injection
//! - Cycle detection across three components
//! - Slot resolution by name, then by type
//! - Type fallback after a name is rebound to a different type
//! - Trait-object components and named slots through `#[derive(Inject)]`

use std::sync::Arc;

use brrtmvc::ioc::{ComponentType, Container, ContainerError, Inject, Slots};

trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

#[derive(Default)]
struct FixedClock;

impl Inject for FixedClock {}

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        42
    }
}

struct ManualClock(u64);

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.0
    }
}

#[derive(Default, Inject)]
struct Report {
    #[inject]
    clock: Option<Arc<dyn Clock>>,
    #[inject(name = "title")]
    heading: Option<Arc<String>>,
    untouched: u32,
}

#[derive(Debug, Default, Inject)]
struct CycleA {
    #[inject(name = "b")]
    b: Option<Arc<CycleB>>,
}

#[derive(Debug, Default, Inject)]
struct CycleB {
    #[inject(name = "c")]
    c: Option<Arc<CycleC>>,
}

#[derive(Debug, Default, Inject)]
struct CycleC {
    #[inject(name = "a")]
    a: Option<Arc<CycleA>>,
}

#[test]
fn test_last_registration_wins() {
    let container = Container::new();
    container.add_instance("title", "first".to_string());
    container.add_instance("title", "second".to_string());
    assert_eq!(
        container.get::<String>("title").unwrap().as_deref().map(String::as_str),
        Some("second")
    );

    container.add_type("clock", ComponentType::provides::<dyn Clock, FixedClock>(|c| c));
    container.add_shared::<dyn Clock>("clock", Arc::new(ManualClock(7)));
    assert_eq!(container.get::<dyn Clock>("clock").unwrap().unwrap().now(), 7);
    assert_eq!(container.len(), 2);
}

#[test]
fn test_inject_is_idempotent() {
    let container = Container::new();
    container.add_instance("title", "Daily".to_string());
    container.add_shared::<dyn Clock>("clock", Arc::new(ManualClock(3)));

    let mut report = Report {
        untouched: 9,
        ..Report::default()
    };
    container.inject(&mut report).unwrap();
    let first_clock = report.clock.clone().unwrap();
    let first_heading = report.heading.clone().unwrap();

    container.inject(&mut report).unwrap();
    assert!(Arc::ptr_eq(&first_clock, report.clock.as_ref().unwrap()));
    assert!(Arc::ptr_eq(&first_heading, report.heading.as_ref().unwrap()));
    assert_eq!(report.untouched, 9);
}

#[test]
fn test_three_component_cycle_is_reported() {
    let container = Container::new();
    container.add_type("a", ComponentType::of::<CycleA>());
    container.add_type("b", ComponentType::of::<CycleB>());
    container.add_type("c", ComponentType::of::<CycleC>());

    let err = container.get::<CycleA>("a").unwrap_err();
    assert_eq!(
        err,
        ContainerError::CyclicDependency {
            chain: vec!["a".into(), "b".into(), "c".into(), "a".into()]
        }
    );
    assert_eq!(err.to_string(), "cyclic dependency: a -> b -> c -> a");

    // the construction stack is unwound, so a fresh lookup reports the same cycle
    let again = container.get::<CycleB>("b").unwrap_err();
    assert!(matches!(again, ContainerError::CyclicDependency { ref chain } if chain.first().map(String::as_str) == Some("b")));
}

#[test]
fn test_slot_falls_back_to_type() {
    let container = Container::new();
    container.add_type(
        "system-clock",
        ComponentType::provides::<dyn Clock, FixedClock>(|c| c),
    );

    let mut report = Report::default();
    container.inject(&mut report).unwrap();
    assert_eq!(report.clock.as_ref().map(|c| c.now()), Some(42));
    assert!(report.heading.is_none());
}

#[test]
fn test_type_fallback_survives_rebinding_to_another_type() {
    let container = Container::new();
    container.add_instance("a", "alpha".to_string());
    container.add_instance("b", "beta".to_string());
    container.add_instance("b", 5u32);

    let mut report = Report::default();
    container.inject(&mut report).unwrap();
    assert_eq!(report.heading.as_deref().map(String::as_str), Some("alpha"));
    assert_eq!(container.get_by_type::<u32>().unwrap().as_deref(), Some(&5));

    // once no binding provides String, the fallback finds nothing
    container.add_instance("a", 7u64);
    assert!(container.get_by_type::<String>().unwrap().is_none());
    assert_eq!(container.get_by_type::<u64>().unwrap().as_deref(), Some(&7));
}

#[test]
fn test_rebinding_same_name_moves_it_to_most_recent() {
    let container = Container::new();
    container.add_instance("first", "one".to_string());
    container.add_instance("second", "two".to_string());
    container.add_instance("first", "uno".to_string());
    assert_eq!(
        container.get_by_type::<String>().unwrap().as_deref().map(String::as_str),
        Some("uno")
    );
}

#[test]
fn test_name_takes_precedence_over_type() {
    let container = Container::new();
    container.add_instance("title", "by name".to_string());
    container.add_instance("other", "by type".to_string());

    let mut report = Report::default();
    container.inject(&mut report).unwrap();
    assert_eq!(report.heading.as_deref().map(String::as_str), Some("by name"));
}

#[test]
fn test_require_reports_unresolved_slot() {
    struct NeedsClock {
        clock: Option<Arc<dyn Clock>>,
    }

    impl Inject for NeedsClock {
        fn inject(&mut self, slots: &Slots<'_>) -> Result<(), ContainerError> {
            self.clock = Some(slots.require::<dyn Clock>("clock")?);
            Ok(())
        }
    }

    let container = Container::new();
    let mut target = NeedsClock { clock: None };
    let err = container.inject(&mut target).unwrap_err();
    assert!(matches!(err, ContainerError::Unresolved { ref slot, .. } if slot == "clock"));
    assert!(target.clock.is_none());
}

#[test]
fn test_factory_resolves_its_own_dependencies() {
    let container = Container::new();
    container.add_instance("seed", 5u64);
    container.add_type(
        "manual",
        ComponentType::from_fn(|c: &Container| {
            let seed = c.get::<u64>("seed")?.map(|s| *s).unwrap_or_default();
            Ok(seed * 2)
        }),
    );
    assert_eq!(container.get::<u64>("manual").unwrap().as_deref(), Some(&10));
}
