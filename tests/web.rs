//! Browser tests. Run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use std::time::Duration;

use gfinder::utils::dom::bytes_to_blob;
use gfinder::utils::{Deadline, RaceResult, race_until, race_with_timeout};
use gfinder::{AnchorDownload, SaveTarget, browser_client, init_logging};
use js_sys::{Date, Promise};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_blob_keeps_size_and_type() {
    let blob = bytes_to_blob(b"hello", Some("text/plain")).unwrap();
    assert_eq!(blob.size(), 5.0);
    assert_eq!(blob.type_(), "text/plain");
}

#[wasm_bindgen_test]
fn test_anchor_download_removes_anchor() {
    init_logging();
    let target = AnchorDownload::new();

    let url = target.create_object_url(b"data", None).unwrap();
    assert!(url.starts_with("blob:"));
    target.trigger_save(&url, "data.bin").unwrap();
    target.revoke_object_url(url);

    let document = web_sys::window().unwrap().document().unwrap();
    assert!(document.query_selector("a[download]").unwrap().is_none());
}

#[wasm_bindgen_test]
async fn test_race_resolved_promise_wins() {
    let promise = Promise::resolve(&JsValue::from_str("done"));
    match race_with_timeout(promise, 1000).await {
        RaceResult::Completed(value) => assert_eq!(value.as_string().as_deref(), Some("done")),
        other => panic!("unexpected race result: {other:?}"),
    }
}

#[wasm_bindgen_test]
async fn test_race_pending_promise_times_out() {
    let pending = Promise::new(&mut |_, _| {});
    assert!(matches!(
        race_with_timeout(pending, 10).await,
        RaceResult::TimedOut
    ));
}

#[wasm_bindgen_test]
fn test_browser_client_uses_embedded_config() {
    let client = browser_client().unwrap();
    assert_eq!(client.http().config().timeout(), Duration::from_secs(60));
}

/// Promise resolving to `value` after `ms` milliseconds.
fn resolve_after(ms: i32, value: &str) -> Promise {
    let value = JsValue::from_str(value);
    Promise::new(&mut |resolve, _| {
        let _ = web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_1(&resolve, ms, &value);
    })
}

#[wasm_bindgen_test]
async fn test_deadline_bounds_both_stages() {
    let started = Date::now();
    let deadline = Deadline::after(Duration::from_millis(200));

    // Headers arrive late but inside the budget.
    match race_until(resolve_after(150, "headers"), deadline).await {
        RaceResult::Completed(value) => assert_eq!(value.as_string().as_deref(), Some("headers")),
        other => panic!("unexpected race result: {other:?}"),
    }

    // The body only gets what is left, not a fresh 200 ms.
    let pending = Promise::new(&mut |_, _| {});
    assert!(matches!(race_until(pending, deadline).await, RaceResult::TimedOut));

    let elapsed = Date::now() - started;
    assert!(elapsed < 300.0, "took {elapsed} ms against a 200 ms deadline");
}

#[wasm_bindgen_test]
fn test_deadline_remaining_never_negative() {
    let deadline = Deadline::after(Duration::ZERO);
    assert_eq!(deadline.remaining_ms(), 0);
    assert!(Deadline::after(Duration::from_secs(60)).remaining_ms() <= 60_000);
}
