//! Fetch API transport with timeout support.
//!
//! Implements [`Transport`] on `window.fetch`. One deadline bounds the whole
//! exchange: headers and body share the request's timeout, and a request
//! that misses it is aborted.

use std::time::Duration;

use js_sys::{Array, Date, Promise, Uint8Array};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AbortController, AbortSignal, FormData, Headers, Request, RequestInit, RequestMode, Response,
    Window,
};

use gfinder_core::transport::{
    FormPart, HttpRequest, HttpResponse, MultipartForm, RequestBody, Transport, TransportError,
};

use super::dom::{bytes_to_blob, js_message};

// =============================================================================
// Promise Racing Utilities
// =============================================================================

/// Result of a promise race with timeout.
#[derive(Debug)]
pub enum RaceResult {
    /// The promise completed before timeout.
    Completed(JsValue),
    /// Timeout occurred before promise completed.
    TimedOut,
    /// Promise rejected with an error.
    Error(String),
}

/// Race a promise against a timeout.
///
/// The timeout promise resolves to `undefined`, so a promise that itself
/// resolves to `undefined` is indistinguishable from a timeout. Fetch
/// promises never do.
pub async fn race_with_timeout(promise: Promise, timeout_ms: i32) -> RaceResult {
    let Some(window) = web_sys::window() else {
        return RaceResult::Error("Window not available".to_string());
    };

    let timeout_promise = Promise::new(&mut |resolve, _| {
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout_ms);
    });

    let race_array = Array::new();
    race_array.push(&promise);
    race_array.push(&timeout_promise);
    let race_promise = Promise::race(&race_array);

    match JsFuture::from(race_promise).await {
        Ok(result) => {
            if result.is_undefined() {
                RaceResult::TimedOut
            } else {
                RaceResult::Completed(result)
            }
        }
        Err(e) => RaceResult::Error(js_message(&e)),
    }
}

/// Fixed point in time every stage of a request must finish by.
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    at_ms: f64,
}

impl Deadline {
    /// Deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            at_ms: Date::now() + timeout.as_millis() as f64,
        }
    }

    /// Milliseconds left, zero once passed.
    pub fn remaining_ms(&self) -> i32 {
        (self.at_ms - Date::now()).clamp(0.0, f64::from(i32::MAX)) as i32
    }
}

/// Race a promise against whatever time is left before `deadline`.
pub async fn race_until(promise: Promise, deadline: Deadline) -> RaceResult {
    race_with_timeout(promise, deadline.remaining_ms()).await
}

// =============================================================================
// Transport
// =============================================================================

/// [`Transport`] backed by the browser Fetch API.
#[derive(Clone, Copy, Debug, Default)]
pub struct FetchTransport;

impl FetchTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let window = web_sys::window()
            .ok_or_else(|| TransportError::Construction("Browser window not available".into()))?;
        let controller = AbortController::new().map_err(construction)?;
        let fetch_request = build_request(&request, &controller.signal())?;
        let deadline = Deadline::after(request.timeout);

        let result = exchange(&window, &fetch_request, deadline).await;
        if matches!(result, Err(TransportError::TimedOut)) {
            controller.abort();
        }
        result
    }
}

async fn exchange(
    window: &Window,
    fetch_request: &Request,
    deadline: Deadline,
) -> Result<HttpResponse, TransportError> {
    let resp: Response = match race_until(window.fetch_with_request(fetch_request), deadline).await {
        RaceResult::TimedOut => return Err(TransportError::TimedOut),
        RaceResult::Error(msg) => return Err(TransportError::NoResponse(msg)),
        RaceResult::Completed(result) => result
            .dyn_into()
            .map_err(|_| TransportError::NoResponse("Invalid response object".into()))?,
    };

    let status = resp.status();
    let headers = collect_headers(&resp.headers());
    let buffer_promise = resp
        .array_buffer()
        .map_err(|e| TransportError::NoResponse(js_message(&e)))?;

    let body = match race_until(buffer_promise, deadline).await {
        RaceResult::TimedOut => return Err(TransportError::TimedOut),
        RaceResult::Error(msg) => return Err(TransportError::NoResponse(msg)),
        RaceResult::Completed(buffer) => Uint8Array::new(&buffer).to_vec(),
    };

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

fn construction(e: JsValue) -> TransportError {
    TransportError::Construction(js_message(&e))
}

fn build_request(request: &HttpRequest, signal: &AbortSignal) -> Result<Request, TransportError> {
    let opts = RequestInit::new();
    opts.set_method(request.method.as_str());
    opts.set_mode(RequestMode::Cors);
    opts.set_signal(Some(signal));

    let is_multipart = matches!(request.body, RequestBody::Multipart(_));
    let headers = Headers::new().map_err(construction)?;
    for (name, value) in &request.headers {
        // FormData sets its own content type with the boundary.
        if is_multipart && name.eq_ignore_ascii_case("content-type") {
            continue;
        }
        headers.set(name, value).map_err(construction)?;
    }
    opts.set_headers(&headers);

    match &request.body {
        RequestBody::Empty => {}
        RequestBody::Json(text) => opts.set_body(&JsValue::from_str(text)),
        RequestBody::Multipart(form) => opts.set_body(&form_data(form)?),
    }

    Request::new_with_str_and_init(&request.url, &opts).map_err(construction)
}

fn form_data(form: &MultipartForm) -> Result<FormData, TransportError> {
    let data = FormData::new().map_err(construction)?;
    for part in form.parts() {
        match part {
            FormPart::Text { name, value } => data.append_with_str(name, value),
            FormPart::File {
                name,
                filename,
                content_type,
                bytes,
            } => {
                let blob = bytes_to_blob(bytes, content_type.as_deref()).map_err(construction)?;
                data.append_with_blob_and_filename(name, &blob, filename)
            }
        }
        .map_err(construction)?;
    }
    Ok(data)
}

fn collect_headers(headers: &Headers) -> Vec<(String, String)> {
    let Ok(Some(entries)) = js_sys::try_iter(headers) else {
        return Vec::new();
    };
    entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let pair: Array = entry.dyn_into().ok()?;
            Some((pair.get(0).as_string()?, pair.get(1).as_string()?))
        })
        .collect()
}
