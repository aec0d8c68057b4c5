//! Two-phase deferred actions.
//!
//! Handlers record an action while an input event is being dispatched; the
//! editor runs the queue once the whole dispatch (including the synthesized
//! click) has completed.

/// Work postponed until the current dispatch finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Hide the settled rubber band so the click that followed it has seen it.
    HideRubberBand,
    /// Start listening for clicks outside the open text field.
    ArmOutsideClick,
}

#[derive(Debug, Clone, Default)]
pub struct DeferredQueue {
    pending: Vec<DeferredAction>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: DeferredAction) {
        self.pending.push(action);
    }

    /// Drain pending actions in the order they were recorded.
    pub fn take(&mut self) -> Vec<DeferredAction> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_preserves_order_and_empties() {
        let mut queue = DeferredQueue::new();
        queue.push(DeferredAction::ArmOutsideClick);
        queue.push(DeferredAction::HideRubberBand);
        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.take(),
            vec![DeferredAction::ArmOutsideClick, DeferredAction::HideRubberBand]
        );
        assert!(queue.is_empty());
        assert!(queue.take().is_empty());
    }
}
