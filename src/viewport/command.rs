//! View commands sent to a [`Viewport`](super::Viewport)

use crate::types::Vector2;

/// Camera commands issued by menus, toolbars and input handlers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewCommand {
    /// Zoom in by the configured step around the surface center.
    ZoomIn,
    /// Zoom out by the configured step around the surface center.
    ZoomOut,
    /// Multiply zoom by `factor`, keeping `anchor` (screen) fixed if given.
    ZoomBy { factor: f64, anchor: Option<Vector2> },
    /// Set an absolute zoom.
    ZoomTo(f64),
    /// Fit the current scene.
    Fit,
    /// Move the focus to the world origin, keeping zoom.
    Center,
    /// Back to the default camera.
    Reset,
    /// Drag the view by a screen-space delta.
    Pan { dx: f64, dy: f64 },
}
