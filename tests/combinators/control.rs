//! Control-Flow Combinator Tests
//!
//! retry, timeout and delay against the tokio clock.

use crate::*;
use settle::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Body that fails `failures` times before succeeding with the call count
fn flaky(
    ctx: &Context,
    calls: &Arc<AtomicUsize>,
    failures: usize,
) -> impl FnMut() -> Cell<usize> + Send + 'static {
    let ctx = Arc::clone(ctx);
    let calls = Arc::clone(calls);
    move || {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        Promise::with_work(&ctx, move |resolver| {
            if n <= failures {
                resolver.fail(Error::msg(format!("attempt {} failed", n)));
            } else {
                resolver.settle(n);
            }
            Ok(())
        })
        .cell()
    }
}

// =============================================================================
// RETRY
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_retry_recovers_after_two_failures() {
    let ctx = concurrent();
    let calls = Arc::new(AtomicUsize::new(0));
    let result = retry(&ctx, RetryPolicy::new(3), flaky(&ctx, &calls, 2));

    assert_eq!(settled(result).await.unwrap(), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_retry_exhaustion_reports_last_error() {
    let ctx = concurrent();
    let calls = Arc::new(AtomicUsize::new(0));
    let result = retry(&ctx, RetryPolicy::new(2), flaky(&ctx, &calls, usize::MAX));

    let err = settled(result).await.unwrap_err();
    assert_eq!(err.to_string(), "attempt 3 failed");
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_retry_panicking_body_fails() {
    let ctx = concurrent();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let result: Cell<u32> = retry(&ctx, RetryPolicy::new(1), move || {
        counter.fetch_add(1, Ordering::SeqCst);
        panic!("retry body bug")
    });

    let err = settled(result).await.unwrap_err();
    assert!(err.is_panic());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_retry_spaces_attempts() {
    let ctx = concurrent();
    let calls = Arc::new(AtomicUsize::new(0));
    let policy = RetryPolicy::new(2).with_delay(Duration::from_millis(25));
    let started = Instant::now();

    let result = retry(&ctx, policy, flaky(&ctx, &calls, 2));
    assert_eq!(settled(result).await.unwrap(), 3);
    assert!(started.elapsed() >= Duration::from_millis(50));
}

// =============================================================================
// TIMEOUT
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_timeout_on_late_cell() {
    let ctx = concurrent();
    let promise: Promise<u32> = Promise::new();
    settle_after(promise.resolver(), Duration::from_millis(500), 1);

    let limited = promise.cell().timeout(&ctx, Duration::from_millis(20));
    let err = settled(limited).await.unwrap_err();
    assert!(err.is_timeout());
    assert!(matches!(
        err.as_future_error(),
        Some(FutureError::Timeout(d)) if *d == Duration::from_millis(20)
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_timeout_on_early_cell() {
    let ctx = concurrent();
    let promise: Promise<u32> = Promise::new();
    settle_after(promise.resolver(), Duration::from_millis(5), 11);

    let limited = promise.cell().timeout(&ctx, Duration::from_millis(500));
    assert_eq!(settled(limited).await.unwrap(), 11);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_retry_with_timeout_per_attempt() {
    let ctx = concurrent();
    let calls = Arc::new(AtomicUsize::new(0));
    let body_ctx = Arc::clone(&ctx);
    let counter = Arc::clone(&calls);

    // First attempt hangs and times out, second answers promptly
    let result = retry(&ctx, RetryPolicy::new(1), move || {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        let promise: Promise<&'static str> = Promise::new();
        if n > 0 {
            promise.settle("answered");
        }
        promise.cell().timeout(&body_ctx, Duration::from_millis(20))
    });
    assert_eq!(settled(result).await.unwrap(), "answered");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// =============================================================================
// DELAY
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_delay_postpones_outcome() {
    let ctx = concurrent();
    let started = Instant::now();
    let delayed = Cell::<u32>::succeeded(3).delay(&ctx, Duration::from_millis(30));
    assert_eq!(settled(delayed).await.unwrap(), 3);
    assert!(started.elapsed() >= Duration::from_millis(30));
}
