//! Transform widget drawn over the selection.
//!
//! The widget owns no nodes. It is bound to the current selection and
//! exposes the anchors that can be dragged to resize it.

mod anchor;
mod transformer;

pub use anchor::{Anchor, Handle, HANDLE_HIT_TOLERANCE, HANDLE_SIZE};
pub use transformer::{BoundBoxPolicy, MIN_BOX_SIZE, ResizeState, Transformer};
