//! Pasteboard Render Library
//!
//! Renderer abstraction for the Pasteboard canvas. The default implementation
//! uses Vello for drawing and Parley for text layout.

mod renderer;

#[cfg(feature = "vello-renderer")]
mod text_layout;
#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{RenderContext, Renderer, RendererError};

#[cfg(feature = "vello-renderer")]
pub use text_layout::ParleyMeasure;
#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
