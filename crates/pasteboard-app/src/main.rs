//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() {
    env_logger::init();
    log::info!("Starting Pasteboard");

    let config = pasteboard_app::AppConfig::from_env();
    if let Err(e) = pollster::block_on(pasteboard_app::App::run(config)) {
        log::error!("Pasteboard exited with an error: {e}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    eprintln!("Native feature not enabled. Use `cargo run --features native`");
}
