//! Camera state and animated transitions

use crate::types::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// World-space focus point and scale (screen pixels per world unit).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl CameraState {
    pub const DEFAULT: CameraState = CameraState {
        x: 0.0,
        y: 0.0,
        zoom: 1.0,
    };

    pub fn new(x: f64, y: f64, zoom: f64) -> Self {
        CameraState { x, y, zoom }
    }

    /// Focus point as a vector
    pub fn focus(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }

    /// Component-wise linear interpolation
    pub fn lerp(&self, target: &CameraState, t: f64) -> CameraState {
        let lerp = |a: f64, b: f64| a + (b - a) * t;
        CameraState {
            x: lerp(self.x, target.x),
            y: lerp(self.y, target.y),
            zoom: lerp(self.zoom, target.zoom),
        }
    }
}

impl Default for CameraState {
    fn default() -> Self {
        CameraState::DEFAULT
    }
}

impl fmt::Display for CameraState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "camera({}, {}) zoom {:.3}x", self.x, self.y, self.zoom)
    }
}

/// A linear camera move over a fixed duration.
///
/// The viewport already holds the end state; renderers sample this to
/// draw the intermediate frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransition {
    pub from: CameraState,
    pub to: CameraState,
    pub duration: Duration,
}

impl CameraTransition {
    pub fn new(from: CameraState, to: CameraState, duration: Duration) -> Self {
        Self { from, to, duration }
    }

    /// Camera at `elapsed` since the transition started.
    pub fn at(&self, elapsed: Duration) -> CameraState {
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.to;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from.lerp(&self.to, t)
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera() {
        assert_eq!(CameraState::default(), CameraState::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_transition_sampling() {
        let tr = CameraTransition::new(
            CameraState::new(0.0, 0.0, 1.0),
            CameraState::new(10.0, -10.0, 3.0),
            Duration::from_millis(200),
        );
        assert_eq!(tr.at(Duration::ZERO), tr.from);
        assert_eq!(tr.at(Duration::from_millis(100)), CameraState::new(5.0, -5.0, 2.0));
        assert_eq!(tr.at(Duration::from_millis(500)), tr.to);
        assert!(tr.is_finished(Duration::from_millis(200)));
    }

    #[test]
    fn test_zero_duration_jumps() {
        let tr = CameraTransition::new(CameraState::DEFAULT, CameraState::new(1.0, 1.0, 2.0), Duration::ZERO);
        assert_eq!(tr.at(Duration::ZERO), tr.to);
    }
}
