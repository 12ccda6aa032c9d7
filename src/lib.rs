//! # gfinder
//!
//! Browser client for a remote hierarchical file store.
//!
//! Re-exports the platform-independent client from `gfinder-core` and, on
//! `wasm32`, binds it to the browser:
//!
//! - [`FetchTransport`] sends requests through `window.fetch`
//! - [`AnchorDownload`] saves downloads through a blob URL and an anchor click
//! - [`init_logging`] routes panics and `tracing` events to the console

pub mod config;

#[cfg(target_arch = "wasm32")]
pub mod utils;

pub use gfinder_core::*;

#[cfg(target_arch = "wasm32")]
pub use utils::{AnchorDownload, FetchTransport};

/// File client wired to the Fetch API.
#[cfg(target_arch = "wasm32")]
pub type BrowserClient = FileClient<FetchTransport>;

/// Build a [`BrowserClient`] from the embedded configuration.
#[cfg(target_arch = "wasm32")]
pub fn browser_client() -> std::result::Result<BrowserClient, ConfigError> {
    Ok(FileClient::new(config::client_config()?, FetchTransport::new()))
}

/// Install the panic hook and the console `tracing` subscriber.
///
/// Safe to call more than once.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    static INIT: std::sync::Once = std::sync::Once::new();

    INIT.call_once(|| {
        console_error_panic_hook::set_once();

        let mut builder = tracing_wasm::WASMLayerConfigBuilder::new();
        builder
            .set_max_level(config::LOG_LEVEL)
            .set_console_config(tracing_wasm::ConsoleConfig::ReportWithoutConsoleColor);
        tracing_wasm::set_as_global_default_with_config(builder.build());
    });
}
