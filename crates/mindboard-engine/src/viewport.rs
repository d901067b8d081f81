//! Viewport and coordinate transformation for the board.
//!
//! Handles conversion between pixel coordinates (screen space) and world
//! coordinates (board space). Manages zoom and pan and exposes the
//! currently visible world rectangle, which drives the per-frame
//! visibility query.

use serde::{Deserialize, Serialize};

use crate::model::Point;
use crate::spatial_index::Bounds;
use mindboard_core::constants::{MAX_ZOOM, MIN_ZOOM};

/// Represents the viewport transformation state (zoom and pan).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    canvas_width: f64,
    canvas_height: f64,
}

impl Viewport {
    /// Creates a new viewport with initial canvas dimensions.
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            canvas_width,
            canvas_height,
        }
    }

    /// Gets the canvas width in pixels.
    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    /// Gets the canvas height in pixels.
    pub fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    /// Sets the canvas dimensions (typically called when the window
    /// resizes).
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    /// Gets the current zoom level (1.0 = 100%).
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level, clamped to the engine's zoom range.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    /// Zooms in by one step.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * 1.2);
    }

    /// Zooms out by one step.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / 1.2);
    }

    /// Resets zoom to 100%.
    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
    }

    /// Gets the pan offset (X, pixels).
    pub fn pan_x(&self) -> f64 {
        self.pan_x
    }

    /// Gets the pan offset (Y, pixels).
    pub fn pan_y(&self) -> f64 {
        self.pan_y
    }

    /// Sets the pan offset.
    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan_x = x;
        self.pan_y = y;
    }

    /// Pans by a delta amount.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Resets pan to origin.
    pub fn reset_pan(&mut self) {
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    /// Resets zoom and pan.
    pub fn reset(&mut self) {
        self.reset_zoom();
        self.reset_pan();
    }

    /// Converts pixel coordinates to world coordinates.
    ///
    /// ```text
    /// world = (pixel - pan) / zoom
    /// ```
    pub fn pixel_to_world(&self, pixel_x: f64, pixel_y: f64) -> Point {
        Point::new(
            (pixel_x - self.pan_x) / self.zoom,
            (pixel_y - self.pan_y) / self.zoom,
        )
    }

    /// Converts world coordinates to pixel coordinates.
    pub fn world_to_pixel(&self, world_x: f64, world_y: f64) -> (f64, f64) {
        (
            world_x * self.zoom + self.pan_x,
            world_y * self.zoom + self.pan_y,
        )
    }

    /// The world rectangle currently covered by the canvas.
    pub fn visible_world_bounds(&self) -> Bounds {
        let top_left = self.pixel_to_world(0.0, 0.0);
        let bottom_right = self.pixel_to_world(self.canvas_width, self.canvas_height);
        Bounds::new(top_left.x, top_left.y, bottom_right.x, bottom_right.y)
    }

    /// Fits the given world bounds into the canvas with per-edge padding,
    /// centering the content.
    pub fn fit_to_bounds(&mut self, bounds: &Bounds, padding: f64) {
        let content_w = bounds.width().max(1e-6);
        let content_h = bounds.height().max(1e-6);
        let avail_w = (self.canvas_width - 2.0 * padding).max(1.0);
        let avail_h = (self.canvas_height - 2.0 * padding).max(1.0);

        self.set_zoom((avail_w / content_w).min(avail_h / content_h));

        let (cx, cy) = bounds.center();
        self.pan_x = self.canvas_width / 2.0 - cx * self.zoom;
        self.pan_y = self.canvas_height / 2.0 - cy * self.zoom;
    }

    /// Zooms so the given world point stays under the canvas center.
    pub fn zoom_to_point(&mut self, world_point: &Point, zoom: f64) {
        self.set_zoom(zoom);
        self.center_on_point(world_point);
    }

    /// Centers the canvas on a world point without changing zoom.
    pub fn center_on_point(&mut self, point: &Point) {
        self.pan_x = self.canvas_width / 2.0 - point.x * self.zoom;
        self.pan_y = self.canvas_height / 2.0 - point.y * self.zoom;
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1200.0, 800.0)
    }
}
