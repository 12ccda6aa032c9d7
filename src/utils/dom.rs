//! DOM and Web API utility functions.
//!
//! Provides the browser [`SaveTarget`]: a `Blob`, an object URL and a hidden
//! `<a download>` element that is clicked once and removed.

use js_sys::{Array, Uint8Array};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, Document, HtmlAnchorElement, Url, Window};

use gfinder_core::{SaveError, SaveTarget};

/// Get the browser window object.
#[inline]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Get the current document.
#[inline]
pub fn document() -> Option<Document> {
    window()?.document()
}

/// Best-effort message from a thrown JS value.
pub fn js_message(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| "Unknown error".to_string())
}

/// Copy bytes into a `Blob` with an optional MIME type.
pub fn bytes_to_blob(bytes: &[u8], content_type: Option<&str>) -> Result<Blob, JsValue> {
    let parts = Array::new();
    parts.push(&Uint8Array::from(bytes));

    let options = BlobPropertyBag::new();
    if let Some(content_type) = content_type {
        options.set_type(content_type);
    }
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

// =============================================================================
// Anchor Download
// =============================================================================

/// Saves files through a synthetic anchor click.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnchorDownload;

impl AnchorDownload {
    pub fn new() -> Self {
        Self
    }
}

impl SaveTarget for AnchorDownload {
    type ObjectUrl = String;

    fn create_object_url(
        &self,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> Result<String, SaveError> {
        let blob = bytes_to_blob(bytes, content_type).map_err(|e| SaveError::Blob(js_message(&e)))?;
        Url::create_object_url_with_blob(&blob).map_err(|e| SaveError::Blob(js_message(&e)))
    }

    fn trigger_save(&self, url: &String, filename: &str) -> Result<(), SaveError> {
        let trigger = |e: JsValue| SaveError::Trigger(js_message(&e));

        let document =
            document().ok_or_else(|| SaveError::Unavailable("Document not available".into()))?;
        let body = document
            .body()
            .ok_or_else(|| SaveError::Unavailable("Document has no body".into()))?;

        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(trigger)?
            .dyn_into()
            .map_err(|_| SaveError::Trigger("Created element is not an anchor".into()))?;
        anchor.set_attribute("style", "display: none").map_err(trigger)?;
        anchor.set_href(url);
        anchor.set_download(filename);

        body.append_child(&anchor).map_err(trigger)?;
        anchor.click();
        anchor.remove();
        Ok(())
    }

    fn revoke_object_url(&self, url: String) {
        if let Err(e) = Url::revoke_object_url(&url) {
            warn!(url = %url, error = %js_message(&e), "failed to revoke object URL");
        }
    }
}
