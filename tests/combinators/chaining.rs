//! Chaining Combinator Tests

use crate::*;
use settle::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// =============================================================================
// MAP / FLAT_MAP
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_pipeline_of_maps() {
    let ctx = concurrent();
    let promise: Promise<u32> = Promise::new();
    let result = promise
        .cell()
        .map(&ctx, |v| Ok(v + 1))
        .map(&ctx, |v| Ok(v * 10))
        .map(&ctx, |v| Ok(format!("#{}", v)));

    settle_after(promise.resolver(), Duration::from_millis(5), 4);
    assert_eq!(settled(result).await.unwrap(), "#50");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failing_map_never_succeeds() {
    let ctx = concurrent();
    let result = Cell::<u32>::succeeded(1)
        .map(&ctx, |_| Err::<u32, _>(Error::msg("bad input")))
        .map(&ctx, |v| Ok(v + 1));
    let err = settled(result).await.unwrap_err();
    assert_eq!(err.to_string(), "bad input");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_panicking_map_fails_chain() {
    let ctx = concurrent();
    let result = Cell::<u32>::succeeded(1)
        .map(&ctx, |_| -> std::result::Result<u32, Error> { panic!("map bug") })
        .map(&ctx, |v| Ok(v + 1));
    let err = settled(result).await.unwrap_err();
    assert!(err.is_panic());
    assert!(err.to_string().contains("map bug"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_flat_map_follows_inner_work() {
    let ctx = concurrent();
    let inner_ctx = Arc::clone(&ctx);
    let result = Cell::<u32>::succeeded(6).flat_map(&ctx, move |v| {
        let inner = Promise::with_work(&inner_ctx, move |resolver| {
            settle_after(resolver, Duration::from_millis(10), v * 7);
            Ok(())
        });
        Ok(inner.cell())
    });
    assert_eq!(settled(result).await.unwrap(), 42);
}

// =============================================================================
// RECOVER / VALIDATE
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_recover_after_failed_chain() {
    let ctx = concurrent();
    let result = Cell::<u32>::failed(Error::msg("offline"))
        .map(&ctx, |v| Ok(v * 2))
        .recover(&ctx, |e| {
            assert_eq!(e.to_string(), "offline");
            Ok(Cell::succeeded(0))
        })
        .map(&ctx, |v| Ok(v + 1));
    assert_eq!(settled(result).await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_validate_rejects() {
    let ctx = concurrent();
    let result = Cell::<i64>::succeeded(-3).validate(&ctx, |v| Ok(*v >= 0));
    assert!(settled(result).await.unwrap_err().is_validation_failed());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_validate_accepts() {
    let ctx = concurrent();
    let result = Cell::<i64>::succeeded(3).validate(&ctx, |v| Ok(*v >= 0));
    assert_eq!(settled(result).await.unwrap(), 3);
}

// =============================================================================
// INSPECT / ALWAYS
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_inspect_and_always_side_effects() {
    let ctx = concurrent();
    let seen = Arc::new(AtomicUsize::new(0));
    let cleanups = Arc::new(AtomicUsize::new(0));

    let s = Arc::clone(&seen);
    let c = Arc::clone(&cleanups);
    let result = Cell::<usize>::succeeded(5)
        .inspect(&ctx, move |v| {
            s.store(*v, Ordering::SeqCst);
            Ok(())
        })
        .always(&ctx, move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

    assert_eq!(settled(result).await.unwrap(), 5);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(seen.load(Ordering::SeqCst), 5);
    assert_eq!(cleanups.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_finally_runs_on_failure() {
    let ctx = concurrent();
    let (tx, rx) = tokio::sync::oneshot::channel();
    let result = Cell::<u8>::failed(Error::msg("x")).finally(&ctx, move || {
        let _ = tx.send(());
    });
    tokio::time::timeout(SETTLE_LIMIT, rx).await.unwrap().unwrap();
    assert!(settled(result).await.is_err());
}
