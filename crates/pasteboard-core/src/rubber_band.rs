//! Rubber-band selection rectangle drawn by dragging on empty canvas.

use kurbo::{Point, Rect};

/// Drags smaller than this in both dimensions count as clicks (world units).
pub const SELECTION_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum BandState {
    #[default]
    Idle,
    Dragging { start: Point, current: Point },
    /// Released after a real drag; stays visible until the deferred hide runs.
    Settling { rect: Rect },
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BandRelease {
    /// No drag was in progress.
    None,
    /// Below the threshold: plain click semantics.
    Click,
    /// Select everything intersecting this world rect.
    Select(Rect),
}

#[derive(Debug, Clone, Default)]
pub struct RubberBand {
    state: BandState,
}

impl RubberBand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a drag at a world point with a zero-size rectangle.
    pub fn begin(&mut self, start: Point) {
        self.state = BandState::Dragging { start, current: start };
    }

    pub fn update(&mut self, point: Point) {
        if let BandState::Dragging { current, .. } = &mut self.state {
            *current = point;
        }
    }

    pub fn release(&mut self) -> BandRelease {
        let BandState::Dragging { start, current } = self.state else {
            return BandRelease::None;
        };
        let rect = Rect::from_points(start, current);
        if rect.width() < SELECTION_THRESHOLD && rect.height() < SELECTION_THRESHOLD {
            self.state = BandState::Idle;
            BandRelease::Click
        } else {
            self.state = BandState::Settling { rect };
            BandRelease::Select(rect)
        }
    }

    /// Hide the rectangle. Runs after the click that follows a release.
    pub fn hide(&mut self) {
        self.state = BandState::Idle;
    }

    /// True between a selecting release and the deferred hide.
    pub fn suppresses_click(&self) -> bool {
        matches!(self.state, BandState::Settling { .. })
    }

    /// Visible rectangle in world coordinates.
    pub fn rect(&self) -> Option<Rect> {
        match self.state {
            BandState::Idle => None,
            BandState::Dragging { start, current } => Some(Rect::from_points(start, current)),
            BandState::Settling { rect } => Some(rect),
        }
    }
}
