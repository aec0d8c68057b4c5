//! Application errors.

use pasteboard_render::RendererError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("Surface error: {0}")]
    Surface(String),
    #[error(transparent)]
    Renderer(#[from] RendererError),
    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Cannot read config: {0}")]
    Io(#[from] std::io::Error),
}
