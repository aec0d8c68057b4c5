//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Vec2};

/// Zoom factor applied per wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 1.1;

/// Camera manages the view transform applied to the whole stage.
///
/// It handles panning (translation) and zooming (scaling) operations,
/// converting between screen coordinates and world coordinates.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Current translation offset (pan)
    pub offset: Vec2,
    /// Current uniform zoom level (1.0 = 100%)
    pub zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.01,
            max_zoom: 100.0,
        }
    }
}

impl Camera {
    /// Create a new camera with the identity view.
    pub fn new() -> Self {
        Self::default()
    }

    /// World to screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Screen to world transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Zoom the camera, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let world_point = self.screen_to_world(screen_point);
        self.zoom = new_zoom;

        // Reposition so world_point maps back onto screen_point
        self.offset = Vec2::new(
            screen_point.x - world_point.x * new_zoom,
            screen_point.y - world_point.y * new_zoom,
        );
    }

    /// Apply one wheel event at the pointer.
    ///
    /// Positive `delta_y` (wheel down) zooms out by [`WHEEL_ZOOM_STEP`], negative zooms in.
    pub fn zoom_wheel(&mut self, screen_point: Point, delta_y: f64) {
        if delta_y > 0.0 {
            self.zoom_at(screen_point, 1.0 / WHEEL_ZOOM_STEP);
        } else if delta_y < 0.0 {
            self.zoom_at(screen_point, WHEEL_ZOOM_STEP);
        }
    }

    /// Reset to scale 1 and no pan.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }

    /// Whether [`Camera::reset`] would change anything.
    pub fn is_reset(&self) -> bool {
        self.offset == Vec2::ZERO && self.zoom == 1.0
    }

    /// Zoom as a whole percentage for display.
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera() {
        let camera = Camera::new();
        assert_eq!(camera.offset, Vec2::ZERO);
        assert!((camera.zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_with_offset_and_zoom() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(50.0, 100.0);
        camera.zoom = 2.0;
        let world = camera.screen_to_world(Point::new(150.0, 300.0));
        assert!((world.x - 50.0).abs() < 1e-10);
        assert!((world.y - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(30.0, -20.0);
        camera.zoom = 1.5;

        let original = Point::new(123.0, 456.0);
        let back = camera.world_to_screen(camera.screen_to_world(original));
        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_wheel_keeps_pointer_anchored() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(-40.0, 25.0);
        let pointer = Point::new(317.0, 211.0);

        for delta in [-120.0, -120.0, 53.0, -1.0, 240.0, 240.0, 240.0] {
            let before = camera.screen_to_world(pointer);
            camera.zoom_wheel(pointer, delta);
            let after = camera.screen_to_world(pointer);
            assert!((before.x - after.x).abs() < 1e-9);
            assert!((before.y - after.y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_wheel_direction() {
        let mut camera = Camera::new();
        camera.zoom_wheel(Point::ZERO, -1.0);
        assert!((camera.zoom - 1.1).abs() < 1e-12);

        camera.zoom_wheel(Point::ZERO, 1.0);
        camera.zoom_wheel(Point::ZERO, 1.0);
        assert!((camera.zoom - 1.0 / 1.1).abs() < 1e-12);

        let zoom = camera.zoom;
        camera.zoom_wheel(Point::ZERO, 0.0);
        assert!((camera.zoom - zoom).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset() {
        let mut camera = Camera::new();
        camera.zoom_wheel(Point::new(10.0, 10.0), -1.0);
        camera.offset += Vec2::new(10.0, 20.0);
        assert!(!camera.is_reset());
        camera.reset();
        assert!(camera.is_reset());
        assert_eq!(camera.offset, Vec2::ZERO);
        assert!((camera.zoom - 1.0).abs() < f64::EPSILON);
        assert_eq!(camera.zoom_percent(), 100);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut camera = Camera::new();
        camera.zoom_at(Point::ZERO, 1e-6);
        assert!((camera.zoom - camera.min_zoom).abs() < f64::EPSILON);

        camera.zoom_at(Point::ZERO, 1e9);
        assert!((camera.zoom - camera.max_zoom).abs() < f64::EPSILON);
    }
}
