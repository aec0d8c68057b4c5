//! WebAssembly entry point.

use wasm_bindgen::prelude::*;

use crate::{App, AppConfig};

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub async fn run_wasm() {
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to initialize logger: {e}").into());
    }

    log::info!("Starting Pasteboard (WASM)");

    if let Err(e) = App::run(AppConfig::default()).await {
        log::error!("Pasteboard exited with an error: {e}");
    }
}
