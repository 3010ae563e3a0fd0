//! Timing tests for the poller

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::Duration;

use super::*;
use crate::Error;

#[tokio::test]
async fn test_wait_succeeds_once_predicate_holds() {
    let timer = Timer::new(Duration::from_millis(50));
    let start = Instant::now();

    let outcome = timer
        .wait(Duration::from_secs(2), || async move {
            Ok(start.elapsed() >= Duration::from_millis(500))
        })
        .await;

    let elapsed = start.elapsed();
    assert!(outcome.satisfied);
    assert!(elapsed >= Duration::from_millis(500), "returned early: {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(2), "returned late: {:?}", elapsed);
}

#[tokio::test]
async fn test_wait_times_out_at_deadline() {
    let timer = Timer::new(Duration::from_millis(100));
    let start = Instant::now();

    let outcome = timer.wait(Duration::from_secs(2), || async { Ok(false) }).await;

    let elapsed = start.elapsed();
    assert!(!outcome.satisfied);
    assert!(elapsed >= Duration::from_secs(2), "gave up early: {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(2500), "overshot deadline: {:?}", elapsed);
}

#[tokio::test]
async fn test_errors_count_as_pending() {
    let timer = Timer::new(Duration::from_millis(10));
    let calls = Arc::new(AtomicU32::new(0));

    let outcome = timer
        .wait(Duration::from_secs(1), || {
            let calls = calls.clone();
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 3 {
                    Err(Error::unknown_object("not yet"))
                } else {
                    Ok(true)
                }
            }
        })
        .await;

    assert!(outcome.satisfied);
    assert_eq!(outcome.attempts, 4);
    assert!(outcome.last_error.is_none());
}

#[tokio::test]
async fn test_last_diagnostic_is_kept() {
    let timer = Timer::new(Duration::from_millis(10));

    let outcome = timer
        .wait(Duration::from_millis(50), || async {
            Err(Error::object_disabled("object is disabled {id: \"go\"}"))
        })
        .await;

    assert!(!outcome.satisfied);
    assert!(outcome.attempts >= 2);
    assert_eq!(
        outcome.diagnostic().as_deref(),
        Some("Object disabled: object is disabled {id: \"go\"}")
    );
}

#[tokio::test]
async fn test_poll_returns_value_and_keeps_error_until_replaced() {
    let timer = Timer::new(Duration::from_millis(10));
    let calls = Arc::new(AtomicU32::new(0));

    let outcome = timer
        .poll(Duration::from_secs(1), || {
            let calls = calls.clone();
            async move {
                match calls.fetch_add(1, Ordering::SeqCst) {
                    0 => Err(Error::unknown_object("unable to locate element, using {id: \"x\"}")),
                    1 => Ok(None),
                    n => Ok(Some(n)),
                }
            }
        })
        .await;

    assert!(outcome.satisfied);
    assert_eq!(outcome.value, Some(2));
    assert_eq!(outcome.attempts, 3);

    let outcome = timer
        .poll::<u32, _, _>(Duration::from_millis(30), || async {
            Err(Error::unknown_object("unable to locate element"))
        })
        .await;
    assert!(outcome.value.is_none());
    assert!(outcome.diagnostic().unwrap().contains("unable to locate element"));
}

#[tokio::test]
async fn test_zero_timeout_checks_once() {
    let timer = Timer::default();
    let outcome = timer.wait(Duration::ZERO, || async { Ok(false) }).await;

    assert!(!outcome.satisfied);
    assert_eq!(outcome.attempts, 1);
}

#[test]
fn test_condition_names() {
    assert_eq!(Condition::NotPresent.to_string(), "not present");
    assert_eq!(Interaction::Writable.condition(), Condition::Writable);
    assert!(Interaction::Present < Interaction::Writable);
}
