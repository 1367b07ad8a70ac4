//! Adapter Tests
//!
//! Callback-style APIs completing on their own threads.

use crate::*;
use settle::{wrap_optional, wrap_result, Cell, Error, OptionalCallback};
use std::thread;
use std::time::Duration;

/// A legacy lookup answering from a background thread
fn legacy_lookup(key: &'static str, done: OptionalCallback<u32, Error>) {
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(5));
        match key {
            "known" => done(Some(1), None),
            "broken" => done(None, None),
            _ => done(None, Some(Error::msg(format!("no such key: {}", key)))),
        }
    });
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_wrap_optional_value() {
    let ctx = concurrent();
    let cell: Cell<u32> = wrap_optional(&ctx, |done| legacy_lookup("known", done));
    assert_eq!(settled(cell).await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_wrap_optional_error() {
    let ctx = concurrent();
    let cell: Cell<u32> = wrap_optional(&ctx, |done| legacy_lookup("missing", done));
    assert_eq!(settled(cell).await.unwrap_err().to_string(), "no such key: missing");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_wrap_optional_malformed() {
    let ctx = concurrent();
    let cell: Cell<u32> = wrap_optional(&ctx, |done| legacy_lookup("broken", done));
    assert!(settled(cell).await.unwrap_err().is_malformed_input());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_wrap_result_from_thread() {
    let ctx = concurrent();
    let cell: Cell<String> = wrap_result(&ctx, |done| {
        thread::spawn(move || done(Ok("from thread".to_string())));
    });
    assert_eq!(settled(cell).await.unwrap(), "from thread");
}
