//! Pasteboard Core Library
//!
//! Platform-agnostic document model and interaction logic for the Pasteboard
//! canvas editor: images and text boxes on a pannable, zoomable canvas.

pub mod camera;
pub mod canvas;
pub mod deferred;
pub mod editor;
pub mod error;
pub mod input;
pub mod rubber_band;
pub mod selection;
pub mod shapes;
pub mod style;
pub mod text_edit;
pub mod text_measure;
pub mod widget;

pub use camera::Camera;
pub use canvas::{Canvas, CanvasDocument};
pub use deferred::{DeferredAction, DeferredQueue};
pub use editor::Editor;
pub use error::ImportError;
pub use input::InputState;
pub use rubber_band::RubberBand;
pub use selection::Selection;
pub use style::StyleControls;
pub use text_edit::{InlineTextEditor, TextOverlay};
pub use text_measure::{ApproximateMeasure, TextMeasure};
pub use widget::{Anchor, BoundBoxPolicy, Transformer};
