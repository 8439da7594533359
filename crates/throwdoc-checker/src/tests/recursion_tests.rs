use super::*;

#[test]
fn profile_custom_limits() {
    let p = RecursionProfile::Custom {
        max_depth: 7,
        max_iterations: 42,
    };
    assert_eq!(p.max_depth(), 7);
    assert_eq!(p.max_iterations(), 42);
}

#[test]
fn basic_enter_leave() {
    let mut guard = RecursionGuard::new(10, 100);
    assert_eq!(guard.enter(1u32), RecursionResult::Entered);
    assert_eq!(guard.depth(), 1);
    assert!(guard.is_visiting(&1));
    assert!(guard.is_active());

    guard.leave(1);
    assert_eq!(guard.depth(), 0);
    assert!(!guard.is_visiting(&1));
    assert!(!guard.is_active());
}

#[test]
fn in_progress_is_ordered_outermost_first() {
    let mut guard = RecursionGuard::new(10, 100);
    guard.enter(1u32);
    guard.enter(2u32);
    guard.enter(3u32);
    assert_eq!(guard.in_progress(), &[1, 2, 3]);

    guard.leave(3);
    guard.leave(2);
    guard.leave(1);
}

#[test]
fn cycle_detected_on_same_key() {
    let mut guard = RecursionGuard::new(10, 100);
    assert_eq!(guard.enter(1u32), RecursionResult::Entered);
    assert_eq!(guard.enter(2u32), RecursionResult::Entered);
    assert_eq!(guard.enter(1u32), RecursionResult::Cycle);

    // Cycle does NOT increase depth but is recorded as a cut.
    assert_eq!(guard.depth(), 2);
    assert!(guard.was_cut());

    guard.leave(2);
    guard.leave(1);
}

#[test]
fn clear_cut_returns_previous_state() {
    let mut guard = RecursionGuard::new(10, 100);
    guard.enter(1u32);
    assert!(guard.enter(1u32).is_cycle());
    assert!(guard.clear_cut());
    assert!(!guard.was_cut());
    guard.restore_cut(false);
    assert!(!guard.was_cut());
    guard.restore_cut(true);
    assert!(guard.was_cut());
    guard.leave(1);
}

#[test]
fn depth_limit() {
    let mut guard = RecursionGuard::new(2, 100);
    assert!(guard.enter(1u32).is_entered());
    assert!(guard.enter(2u32).is_entered());
    assert_eq!(guard.enter(3u32), RecursionResult::DepthExceeded);
    guard.leave(2);
    guard.leave(1);
}

#[test]
fn iteration_limit() {
    let mut guard = RecursionGuard::new(10, 2);
    assert!(guard.enter(1u32).is_entered());
    guard.leave(1);
    assert!(guard.enter(1u32).is_entered());
    guard.leave(1);
    assert!(guard.enter(1u32).is_exceeded());
}

#[test]
fn scope_runs_and_leaves() {
    let mut guard = RecursionGuard::new(10, 100);
    let result = guard.scope(5u32, |inner| {
        assert!(inner.is_visiting(&5));
        inner.scope(5u32, |_| ()).unwrap_err()
    });
    assert_eq!(result, Ok(RecursionResult::Cycle));
    assert!(!guard.is_active());
}

#[test]
fn depth_counter_limits() {
    let mut counter = DepthCounter::new(1);
    assert!(counter.enter());
    assert!(!counter.enter());
    assert!(counter.is_exceeded());
    counter.leave();
    assert_eq!(counter.depth(), 0);
}
