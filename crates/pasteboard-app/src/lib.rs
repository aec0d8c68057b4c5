//! Pasteboard Application
//!
//! The application shell: windowing, GPU surface, egui overlay and the
//! platform glue for clipboard paste and file upload.

mod app;
mod config;
mod error;
mod file_ops;
mod input_map;
mod shortcuts;
mod ui;

pub use app::App;
pub use config::{AppConfig, CONFIG_ENV_VAR};
pub use error::AppError;
pub use shortcuts::{Shortcut, ShortcutRegistry};
pub use ui::{UiAction, UiState, UiView, render_ui};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
