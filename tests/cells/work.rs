//! Promise Work Tests
//!
//! `Promise::with_work` runs the producer on a context and captures early
//! errors and panics as failures.

use crate::*;
use settle::{Error, Promise};
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_work_settles_through_resolver() {
    let ctx = concurrent();
    let promise: Promise<u32, Error> = Promise::with_work(&ctx, |resolver| {
        resolver.settle(40 + 2);
        Ok(())
    });
    assert_eq!(settled(promise.cell()).await.unwrap(), 42);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_work_may_settle_later() {
    let ctx = concurrent();
    let promise: Promise<&'static str, Error> = Promise::with_work(&ctx, |resolver| {
        settle_after(resolver, Duration::from_millis(10), "deferred");
        Ok(())
    });
    assert_eq!(settled(promise.cell()).await.unwrap(), "deferred");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_work_error_fails_cell() {
    let ctx = concurrent();
    let promise: Promise<u32, Error> = Promise::with_work(&ctx, |_resolver| Err(Error::msg("refused")));
    assert_eq!(settled(promise.cell()).await.unwrap_err().to_string(), "refused");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_work_panic_fails_cell() {
    let ctx = concurrent();
    let promise: Promise<u32, Error> = Promise::with_work(&ctx, |_resolver| panic!("worker exploded"));
    let err = settled(promise.cell()).await.unwrap_err();
    assert!(err.is_panic());
    assert!(err.to_string().contains("worker exploded"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_void_promise() {
    let promise = Promise::<(), Error>::done();
    assert!(settled(promise.cell()).await.is_ok());

    let pending: Promise<(), Error> = Promise::new();
    assert!(pending.resolve());
    assert!(!pending.resolve());
}
