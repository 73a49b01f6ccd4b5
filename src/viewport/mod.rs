//! Camera and world/screen mapping.
//!
//! ```text
//! screen = (world - camera) * zoom + surface / 2
//! world  = (screen - surface / 2) / zoom + camera
//! ```
//!
//! Surface dimensions are in logical pixels: physical pixels divided by the
//! device pixel ratio.

mod camera;
mod command;

pub use camera::{CameraState, CameraTransition};
pub use command::ViewCommand;

use crate::error::{Result, SketchError};
use crate::types::{BoundingBox2D, Point, Vector2};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning values for camera behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Fraction of the surface the fitted box may occupy.
    pub fit_margin: f64,
    /// Smallest box span used by fitting, in world units.
    pub fit_epsilon: f64,
    /// Hover hit-test radius in logical pixels.
    pub hit_radius_px: f64,
    /// Factor used by zoom in / zoom out commands.
    pub zoom_step: f64,
    /// Factor used by modifier + wheel zoom.
    pub wheel_zoom_step: f64,
    /// Duration of animated camera moves.
    pub transition_ms: u64,
}

impl ViewportConfig {
    /// Reject values the camera math cannot work with.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
            ("fit_margin", self.fit_margin),
            ("fit_epsilon", self.fit_epsilon),
            ("hit_radius_px", self.hit_radius_px),
            ("zoom_step", self.zoom_step),
            ("wheel_zoom_step", self.wheel_zoom_step),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(SketchError::Custom(format!("viewport.{} must be finite", name)));
            }
        }
        if self.min_zoom <= 0.0 || self.min_zoom > self.max_zoom {
            return Err(SketchError::Custom(format!(
                "viewport zoom range {}..{} must satisfy 0 < min_zoom <= max_zoom",
                self.min_zoom, self.max_zoom
            )));
        }
        for (name, value) in [
            ("fit_margin", self.fit_margin),
            ("fit_epsilon", self.fit_epsilon),
            ("zoom_step", self.zoom_step),
            ("wheel_zoom_step", self.wheel_zoom_step),
        ] {
            if value <= 0.0 {
                return Err(SketchError::Custom(format!(
                    "viewport.{} must be positive, found {}",
                    name, value
                )));
            }
        }
        if self.hit_radius_px < 0.0 {
            return Err(SketchError::Custom(format!(
                "viewport.hit_radius_px must not be negative, found {}",
                self.hit_radius_px
            )));
        }
        Ok(())
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.002,
            max_zoom: 100.0,
            fit_margin: 0.88,
            fit_epsilon: 1e-6,
            hit_radius_px: 8.0,
            zoom_step: 1.2,
            wheel_zoom_step: 1.12,
            transition_ms: 220,
        }
    }
}

/// Render surface size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    /// Width in physical pixels
    pub width: f64,
    /// Height in physical pixels
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl SurfaceSize {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Surface at a pixel ratio of 1.
    pub fn logical(width: f64, height: f64) -> Self {
        Self::new(width, height, 1.0)
    }

    pub fn logical_width(&self) -> f64 {
        self.width / self.device_pixel_ratio
    }

    pub fn logical_height(&self) -> f64 {
        self.height / self.device_pixel_ratio
    }

    fn half(&self) -> Vector2 {
        Vector2::new(self.logical_width() / 2.0, self.logical_height() / 2.0)
    }
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self::logical(800.0, 600.0)
    }
}

/// What lies under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverInfo {
    /// World position under the pointer
    pub world: Vector2,
    /// Index of the nearest point within the hit radius
    pub nearest: Option<usize>,
}

/// Camera plus surface, with all view math.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    camera: CameraState,
    surface: SurfaceSize,
    config: ViewportConfig,
}

impl Viewport {
    pub fn new(surface: SurfaceSize, config: ViewportConfig) -> Self {
        Self {
            camera: CameraState::DEFAULT,
            surface,
            config,
        }
    }

    pub fn camera(&self) -> CameraState {
        self.camera
    }

    /// Set the camera, clamping zoom into range. A camera with a
    /// non-finite field is ignored.
    pub fn set_camera(&mut self, camera: CameraState) {
        if !(camera.x.is_finite() && camera.y.is_finite() && camera.zoom.is_finite()) {
            tracing::warn!(camera = %camera, "ignoring non-finite camera");
            return;
        }
        self.camera = CameraState {
            zoom: self.clamp_zoom(camera.zoom),
            ..camera
        };
    }

    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    pub fn resize(&mut self, surface: SurfaceSize) {
        self.surface = surface;
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    // Does not panic on an inverted or NaN range.
    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.config.min_zoom).min(self.config.max_zoom)
    }

    /// Map a world position to screen pixels.
    pub fn world_to_screen(&self, world: Vector2) -> Vector2 {
        (world - self.camera.focus()) * self.camera.zoom + self.surface.half()
    }

    /// Map a screen pixel position to world coordinates.
    pub fn screen_to_world(&self, screen: Vector2) -> Vector2 {
        (screen - self.surface.half()) / self.camera.zoom + self.camera.focus()
    }

    /// Scale zoom by `factor`.
    ///
    /// With an anchor, the world point under the anchor stays under it.
    /// A non-finite or non-positive factor leaves the camera unchanged.
    pub fn zoom_by(&mut self, factor: f64, anchor: Option<Vector2>) {
        if !factor.is_finite() || factor <= 0.0 || anchor.map_or(false, |a| !a.is_finite()) {
            tracing::warn!(factor, "ignoring invalid zoom factor");
            return;
        }
        let zoom = self.clamp_zoom(self.camera.zoom * factor);
        match anchor {
            Some(screen) => {
                let world = self.screen_to_world(screen);
                let offset = (screen - self.surface.half()) / zoom;
                self.camera = CameraState::new(world.x - offset.x, world.y - offset.y, zoom);
            }
            None => self.camera.zoom = zoom,
        }
        tracing::debug!(camera = %self.camera, "zoomed");
    }

    /// Set zoom, clamped into range. NaN and infinities are ignored.
    pub fn zoom_to(&mut self, zoom: f64) {
        if !zoom.is_finite() {
            tracing::warn!(zoom, "ignoring non-finite zoom");
            return;
        }
        self.camera.zoom = self.clamp_zoom(zoom);
    }

    /// Fit `points` into the surface with margin; empty input resets.
    pub fn fit_to_bounds(&mut self, points: &[Point]) {
        let Some(bbox) = BoundingBox2D::from_points(points) else {
            self.reset();
            return;
        };

        let extent = bbox.extent_at_least(self.config.fit_epsilon);
        let zoom_x = self.surface.logical_width() * self.config.fit_margin / extent.x;
        let zoom_y = self.surface.logical_height() * self.config.fit_margin / extent.y;
        let center = bbox.center();

        self.camera = CameraState::new(center.x, center.y, self.clamp_zoom(zoom_x.min(zoom_y)));
        tracing::debug!(camera = %self.camera, %bbox, "fitted view");
    }

    /// Focus the world origin, keeping zoom.
    pub fn center(&mut self) {
        self.camera.x = 0.0;
        self.camera.y = 0.0;
    }

    pub fn reset(&mut self) {
        self.camera = CameraState::DEFAULT;
    }

    /// Drag the view: content follows the pointer.
    pub fn pan_by_screen(&mut self, dx: f64, dy: f64) {
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        self.camera.x -= dx / self.camera.zoom;
        self.camera.y -= dy / self.camera.zoom;
    }

    /// Wheel input: with the zoom modifier, zoom about the cursor;
    /// otherwise scroll the view by the wheel deltas.
    pub fn wheel(&mut self, delta_x: f64, delta_y: f64, zoom_modifier: bool, cursor: Vector2) {
        if zoom_modifier {
            let factor = if delta_y < 0.0 {
                self.config.wheel_zoom_step
            } else {
                1.0 / self.config.wheel_zoom_step
            };
            self.zoom_by(factor, Some(cursor));
        } else {
            self.pan_by_screen(delta_x, delta_y);
        }
    }

    /// Index of the point nearest to `screen` within the hit radius.
    ///
    /// Ties go to the earliest point in slice order.
    pub fn nearest_point(&self, points: &[Point], screen: Vector2) -> Option<usize> {
        let radius_sq = self.config.hit_radius_px * self.config.hit_radius_px;
        let mut best: Option<(usize, f64)> = None;
        for (index, point) in points.iter().enumerate() {
            let d2 = self.world_to_screen(point.position()).distance_squared(&screen);
            if d2 <= radius_sq && best.map_or(true, |(_, best_d2)| d2 < best_d2) {
                best = Some((index, d2));
            }
        }
        best.map(|(index, _)| index)
    }

    pub fn hover(&self, points: &[Point], screen: Vector2) -> HoverInfo {
        HoverInfo {
            world: self.screen_to_world(screen),
            nearest: self.nearest_point(points, screen),
        }
    }

    /// World rectangle currently visible.
    pub fn visible_bounds(&self) -> BoundingBox2D {
        let top_left = self.screen_to_world(Vector2::ZERO);
        let bottom_right = self.screen_to_world(Vector2::new(
            self.surface.logical_width(),
            self.surface.logical_height(),
        ));
        BoundingBox2D::new(top_left, bottom_right)
    }

    /// Apply a command. Animated commands return the transition from the
    /// previous camera; the viewport already holds the end state.
    pub fn apply(&mut self, command: ViewCommand, points: &[Point]) -> Option<CameraTransition> {
        let before = self.camera;
        let animated = match command {
            ViewCommand::ZoomIn => {
                self.zoom_by(self.config.zoom_step, None);
                false
            }
            ViewCommand::ZoomOut => {
                self.zoom_by(1.0 / self.config.zoom_step, None);
                false
            }
            ViewCommand::ZoomBy { factor, anchor } => {
                self.zoom_by(factor, anchor);
                false
            }
            ViewCommand::ZoomTo(zoom) => {
                self.zoom_to(zoom);
                false
            }
            ViewCommand::Pan { dx, dy } => {
                self.pan_by_screen(dx, dy);
                false
            }
            ViewCommand::Fit => {
                self.fit_to_bounds(points);
                true
            }
            ViewCommand::Center => {
                self.center();
                true
            }
            ViewCommand::Reset => {
                self.reset();
                true
            }
        };

        animated.then(|| {
            CameraTransition::new(
                before,
                self.camera,
                Duration::from_millis(self.config.transition_ms),
            )
        })
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(SurfaceSize::default(), ViewportConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(SurfaceSize::new(1600.0, 1200.0, 2.0), ViewportConfig::default())
    }

    #[test]
    fn test_default_camera_centers_origin() {
        let vp = viewport();
        assert_eq!(vp.world_to_screen(Vector2::ZERO), Vector2::new(400.0, 300.0));
    }

    #[test]
    fn test_round_trip() {
        let mut vp = viewport();
        vp.set_camera(CameraState::new(12.5, -3.0, 4.0));
        let p = Vector2::new(7.25, 100.0);
        let back = vp.screen_to_world(vp.world_to_screen(p));
        assert!((back.x - p.x).abs() < 1e-9);
        assert!((back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut vp = viewport();
        vp.zoom_by(1e9, None);
        assert_eq!(vp.camera().zoom, 100.0);
        vp.zoom_to(0.0);
        assert_eq!(vp.camera().zoom, 0.002);
    }

    #[test]
    fn test_invalid_zoom_is_ignored() {
        let mut vp = viewport();
        vp.set_camera(CameraState::new(1.0, 2.0, 3.0));
        let before = vp.camera();
        let commands = [
            ViewCommand::ZoomBy { factor: f64::NAN, anchor: None },
            ViewCommand::ZoomBy { factor: f64::INFINITY, anchor: Some(Vector2::new(10.0, 10.0)) },
            ViewCommand::ZoomBy { factor: 0.0, anchor: None },
            ViewCommand::ZoomBy { factor: -2.0, anchor: None },
            ViewCommand::ZoomBy { factor: 2.0, anchor: Some(Vector2::new(f64::NAN, 0.0)) },
            ViewCommand::ZoomTo(f64::NAN),
            ViewCommand::ZoomTo(f64::NEG_INFINITY),
            ViewCommand::Pan { dx: f64::NAN, dy: 1.0 },
        ];
        for command in commands {
            assert!(vp.apply(command, &[]).is_none());
            assert_eq!(vp.camera(), before, "{:?}", command);
        }

        vp.set_camera(CameraState::new(0.0, 0.0, f64::NAN));
        assert_eq!(vp.camera(), before);
    }

    #[test]
    fn test_inverted_zoom_range_does_not_panic() {
        let config = ViewportConfig {
            min_zoom: 200.0,
            ..ViewportConfig::default()
        };
        assert!(config.validate().is_err());

        let mut vp = Viewport::new(SurfaceSize::default(), config);
        vp.apply(ViewCommand::ZoomIn, &[]);
        assert!(vp.camera().zoom.is_finite());
    }

    #[test]
    fn test_config_validation() {
        assert!(ViewportConfig::default().validate().is_ok());
        let invalid = [
            ViewportConfig { min_zoom: 0.0, ..ViewportConfig::default() },
            ViewportConfig { max_zoom: f64::NAN, ..ViewportConfig::default() },
            ViewportConfig { fit_margin: 0.0, ..ViewportConfig::default() },
            ViewportConfig { fit_epsilon: -1.0, ..ViewportConfig::default() },
            ViewportConfig { zoom_step: f64::INFINITY, ..ViewportConfig::default() },
            ViewportConfig { hit_radius_px: -1.0, ..ViewportConfig::default() },
        ];
        for config in invalid {
            assert!(
                matches!(config.validate(), Err(SketchError::Custom(_))),
                "{:?}",
                config
            );
        }
    }

    #[test]
    fn test_zoom_without_anchor_keeps_offset() {
        let mut vp = viewport();
        vp.set_camera(CameraState::new(5.0, 6.0, 1.0));
        vp.zoom_by(2.0, None);
        assert_eq!(vp.camera(), CameraState::new(5.0, 6.0, 2.0));
    }

    #[test]
    fn test_zoom_about_anchor() {
        let mut vp = viewport();
        vp.set_camera(CameraState::new(-20.0, 40.0, 1.5));
        let anchor = Vector2::new(120.0, 75.0);
        let before = vp.screen_to_world(anchor);
        vp.zoom_by(3.0, Some(anchor));
        let after = vp.screen_to_world(anchor);
        assert!(before.distance(&after) < 1e-6);
        assert_eq!(vp.camera().zoom, 4.5);
    }

    #[test]
    fn test_fit_to_bounds() {
        let mut vp = viewport();
        let points = vec![Point::new(0.0, 0.0), Point::new(100.0, 50.0)];
        vp.fit_to_bounds(&points);
        let cam = vp.camera();
        assert_eq!((cam.x, cam.y), (50.0, 25.0));
        // 800 * 0.88 / 100 = 7.04, 600 * 0.88 / 50 = 10.56
        assert!((cam.zoom - 7.04).abs() < 1e-12);
    }

    #[test]
    fn test_fit_single_point_is_finite() {
        let mut vp = viewport();
        vp.fit_to_bounds(&[Point::new(3.0, 3.0), Point::new(3.0, 3.0)]);
        let cam = vp.camera();
        assert!(cam.zoom.is_finite());
        assert_eq!(cam.zoom, 100.0);
        assert_eq!((cam.x, cam.y), (3.0, 3.0));
    }

    #[test]
    fn test_fit_empty_resets() {
        let mut vp = viewport();
        vp.set_camera(CameraState::new(9.0, 9.0, 9.0));
        vp.fit_to_bounds(&[]);
        assert_eq!(vp.camera(), CameraState::DEFAULT);
    }

    #[test]
    fn test_pan_and_center() {
        let mut vp = viewport();
        vp.zoom_to(2.0);
        vp.pan_by_screen(10.0, -4.0);
        assert_eq!(vp.camera(), CameraState::new(-5.0, 2.0, 2.0));
        vp.center();
        assert_eq!(vp.camera(), CameraState::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_wheel() {
        let mut vp = viewport();
        vp.wheel(0.0, -1.0, true, Vector2::new(400.0, 300.0));
        assert!((vp.camera().zoom - 1.12).abs() < 1e-12);
        vp.wheel(0.0, 1.0, true, Vector2::new(400.0, 300.0));
        assert!((vp.camera().zoom - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_nearest_point_ties_first() {
        let vp = viewport();
        let points = vec![
            Point::new(50.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(-3.0, 0.0),
        ];
        let screen = vp.world_to_screen(Vector2::ZERO);
        assert_eq!(vp.nearest_point(&points, screen), Some(1));
    }

    #[test]
    fn test_nearest_point_outside_radius() {
        let vp = viewport();
        let points = vec![Point::new(9.0, 0.0)];
        let screen = vp.world_to_screen(Vector2::ZERO);
        assert_eq!(vp.nearest_point(&points, screen), None);
        assert_eq!(vp.hover(&points, screen).world, Vector2::ZERO);
    }

    #[test]
    fn test_apply_commands() {
        let mut vp = viewport();
        let points = vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)];

        assert!(vp.apply(ViewCommand::ZoomIn, &points).is_none());
        assert!((vp.camera().zoom - 1.2).abs() < 1e-12);

        let transition = vp.apply(ViewCommand::Fit, &points).unwrap();
        assert_eq!(transition.to, vp.camera());
        assert!((transition.from.zoom - 1.2).abs() < 1e-12);
        assert_eq!(transition.duration, Duration::from_millis(220));

        vp.apply(ViewCommand::Reset, &points);
        assert_eq!(vp.camera(), CameraState::DEFAULT);
    }

    #[test]
    fn test_visible_bounds() {
        let vp = viewport();
        let bounds = vp.visible_bounds();
        assert_eq!(bounds.min, Vector2::new(-400.0, -300.0));
        assert_eq!(bounds.max, Vector2::new(400.0, 300.0));
    }
}
