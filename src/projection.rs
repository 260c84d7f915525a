//! World to screen projection.
//!
//! Yaw about the vertical axis, then pitch about the horizontal axis, then a
//! perspective divide against a fixed viewer distance.

use crate::camera::CameraState;
use crate::math::{multiply_matrices, multiply_matrix_vector, rotation_x, rotation_y};
use crate::vertex::{ScreenPoint, WorldPoint};

/// Field-of-view constant, multiplied by zoom
pub const FIELD_OF_VIEW: f64 = 500.0;
/// Distance from the viewer to the scene origin along the depth axis
pub const VIEWER_DISTANCE: f64 = 600.0;

/// Virtual drawing surface all primitives are expressed in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Screen position of the scene origin
    pub center: [f64; 2],
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 520.0,
            center: [450.0, 330.0],
        }
    }
}

/// Camera and viewport frozen for one frame
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    rotation: [[f64; 3]; 3],
    focal: f64,
    offset: [f64; 2],
}

impl Projector {
    pub fn new(camera: &CameraState, viewport: &Viewport) -> Self {
        Projector {
            rotation: multiply_matrices(&rotation_x(camera.pitch), &rotation_y(camera.yaw)),
            focal: FIELD_OF_VIEW * camera.zoom,
            offset: [
                viewport.center[0] + camera.pan[0],
                viewport.center[1] + camera.pan[1],
            ],
        }
    }

    /// Camera-space depth only, for sort keys
    pub fn depth(&self, point: WorldPoint) -> f64 {
        let r = &self.rotation[2];
        r[0] * point.x + r[1] * point.y + r[2] * point.z
    }

    pub fn project(&self, point: WorldPoint) -> ScreenPoint {
        let [rx, ry, depth] = multiply_matrix_vector(&self.rotation, &point.as_array());
        let denominator = depth + VIEWER_DISTANCE;
        debug_assert!(
            denominator > 0.0,
            "point {point:?} is behind the viewer (depth {depth})"
        );
        let scale = self.focal / denominator;
        ScreenPoint {
            x: self.offset[0] + rx * scale,
            y: self.offset[1] - ry * scale,
            depth,
            scale,
        }
    }
}

/// One-off projection; build a `Projector` when projecting many points
pub fn project(point: WorldPoint, camera: &CameraState, viewport: &Viewport) -> ScreenPoint {
    Projector::new(camera, viewport).project(point)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_camera() -> CameraState {
        CameraState::new(0.0, 0.0, 1.0)
    }

    #[test]
    fn projection_is_deterministic() {
        let camera = CameraState::new(0.37, 0.21, 1.3).with_pan(12.0, -4.0);
        let viewport = Viewport::default();
        let p = WorldPoint::new(-120.0, 85.0, 40.0);
        assert_eq!(project(p, &camera, &viewport), project(p, &camera, &viewport));
    }

    #[test]
    fn origin_lands_on_scene_center() {
        let viewport = Viewport::default();
        let s = project(WorldPoint::new(0.0, 0.0, 0.0), &flat_camera(), &viewport);
        assert_eq!((s.x, s.y), (450.0, 330.0));
        assert_eq!(s.depth, 0.0);
        assert!((s.scale - FIELD_OF_VIEW / VIEWER_DISTANCE).abs() < 1e-12);
    }

    #[test]
    fn up_is_negative_screen_y() {
        let viewport = Viewport::default();
        let s = project(WorldPoint::new(0.0, 100.0, 0.0), &flat_camera(), &viewport);
        assert!(s.y < 330.0);
    }

    #[test]
    fn farther_points_shrink() {
        let projector = Projector::new(&CameraState::new(0.4, 0.3, 1.0), &Viewport::default());
        let near = projector.project(WorldPoint::new(10.0, 20.0, -100.0));
        let far = projector.project(WorldPoint::new(10.0, 20.0, 200.0));
        assert!(far.depth > near.depth);
        assert!(far.scale <= near.scale);
    }

    #[test]
    fn depth_matches_full_projection() {
        let projector = Projector::new(&CameraState::new(-0.8, 0.6, 2.0), &Viewport::default());
        let p = WorldPoint::new(33.0, -7.0, 140.0);
        assert!((projector.depth(p) - projector.project(p).depth).abs() < 1e-12);
    }

    #[test]
    fn pan_and_zoom_shift_and_scale() {
        let viewport = Viewport::default();
        let p = WorldPoint::new(50.0, 0.0, 0.0);
        let base = project(p, &flat_camera(), &viewport);
        let zoomed = project(p, &CameraState::new(0.0, 0.0, 2.0).with_pan(10.0, 5.0), &viewport);
        assert!((zoomed.x - 10.0 - 450.0 - 2.0 * (base.x - 450.0)).abs() < 1e-9);
        assert_eq!(zoomed.y, 335.0);
    }
}
