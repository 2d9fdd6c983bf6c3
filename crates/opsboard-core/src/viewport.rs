//! Viewport module for pan/zoom transforms.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum allowed zoom level.
pub const MIN_ZOOM: f64 = 0.1;

/// Maximum allowed zoom level.
pub const MAX_ZOOM: f64 = 5.0;

/// Multiplier applied by the keyboard/button zoom step.
pub const ZOOM_STEP: f64 = 1.2;

/// Zoom factor contributed per unit of wheel delta.
const WHEEL_ZOOM_RATE: f64 = 0.001;

/// Viewport manages the view transform for the board.
///
/// It handles panning (translation) and zooming (scaling) operations,
/// converting between screen coordinates and world coordinates. Gestures
/// freeze a copy of it at press time so mid-gesture camera changes cannot
/// skew their anchor math.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
    /// Current translation offset (pan), in screen pixels
    pub pan: Vec2,
    /// Current zoom level (1.0 = 100%)
    pub zoom: f64,
    /// Size of the viewport in screen pixels
    pub size: Size,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Size::ZERO)
    }
}

impl Viewport {
    /// Create a viewport with the world origin centered on screen.
    pub fn new(size: Size) -> Self {
        Self {
            pan: Vec2::new(size.width / 2.0, size.height / 2.0),
            zoom: 1.0,
            size,
        }
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts world coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to world coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.pan)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Center of the viewport in screen coordinates.
    pub fn center(&self) -> Point {
        Point::new(self.size.width / 2.0, self.size.height / 2.0)
    }

    /// World-space rectangle currently on screen, for minimap-style
    /// observers. Derived on demand, never stored.
    pub fn visible_world_rect(&self) -> Rect {
        Rect::from_points(
            self.screen_to_world(Point::ZERO),
            self.screen_to_world(Point::new(self.size.width, self.size.height)),
        )
    }

    /// Record a new viewport size. The pan is left alone; only the initial
    /// construction centers the origin.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Pan the viewport by a delta in screen coordinates.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Pan so the given world point lands at the screen center, keeping zoom.
    pub fn pan_to(&mut self, world_point: Point) {
        let center = self.center();
        self.pan = Vec2::new(
            center.x - world_point.x * self.zoom,
            center.y - world_point.y * self.zoom,
        );
    }

    /// Zoom the viewport, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        // Convert screen point to world before zoom
        let world_point = self.screen_to_world(screen_point);

        // Apply new zoom
        self.zoom = new_zoom;

        // Adjust pan so world_point stays at screen_point
        let new_screen = self.world_to_screen(world_point);
        let correction = Vec2::new(
            screen_point.x - new_screen.x,
            screen_point.y - new_screen.y,
        );
        self.pan += correction;
    }

    /// Step zoom in about the viewport center.
    pub fn zoom_in(&mut self) {
        self.zoom_at(self.center(), ZOOM_STEP);
    }

    /// Step zoom out about the viewport center.
    pub fn zoom_out(&mut self) {
        self.zoom_at(self.center(), 1.0 / ZOOM_STEP);
    }

    /// Apply a wheel zoom anchored at the cursor. Positive delta zooms out.
    pub fn wheel_zoom(&mut self, screen_point: Point, delta_y: f64) {
        self.zoom_at(screen_point, 1.0 - delta_y * WHEEL_ZOOM_RATE);
    }

    /// Reset to 100% zoom with the world origin centered.
    pub fn reset(&mut self) {
        self.pan = Vec2::new(self.size.width / 2.0, self.size.height / 2.0);
        self.zoom = 1.0;
    }
}
