//! Browser bindings.
//!
//! Provides:
//! - [`FetchTransport`] - `window.fetch` transport with timeout racing
//! - [`AnchorDownload`] - blob + object URL + anchor click save target

pub mod dom;
mod fetch;

pub use dom::AnchorDownload;
pub use fetch::{Deadline, FetchTransport, RaceResult, race_until, race_with_timeout};
