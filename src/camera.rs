//! Camera state and the pointer/wheel controller that mutates it.
//!
//! Pitch and zoom are clamped here and nowhere else. The projection relies on
//! that: with pitch inside `CameraLimits` and scene geometry bounded by the
//! viewer distance, the perspective denominator stays positive.

/// Orbit camera around the scene origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Rotation around the vertical axis, in radians
    pub yaw: f64,
    /// Rotation around the horizontal axis, in radians
    pub pitch: f64,
    /// Zoom factor
    pub zoom: f64,
    /// Screen-space pan offset (x, y)
    pub pan: [f64; 2],
}

impl CameraState {
    pub const fn new(yaw: f64, pitch: f64, zoom: f64) -> Self {
        Self {
            yaw,
            pitch,
            zoom,
            pan: [0.0, 0.0],
        }
    }

    pub const fn with_pan(mut self, x: f64, y: f64) -> Self {
        self.pan = [x, y];
        self
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(0.1, 0.2, 1.0)
    }
}

/// Per-scene tuning for the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraLimits {
    pub pitch_min: f64,
    pub pitch_max: f64,
    pub zoom_min: f64,
    pub zoom_max: f64,
    /// Yaw radians per pixel of horizontal drag
    pub yaw_per_pixel: f64,
    /// Pitch radians per pixel of vertical drag
    pub pitch_per_pixel: f64,
    pub zoom_in_ratio: f64,
    pub zoom_out_ratio: f64,
    /// Yaw added per tick while auto-rotating
    pub auto_rotate_step: f64,
}

impl Default for CameraLimits {
    fn default() -> Self {
        Self {
            pitch_min: -0.3,
            pitch_max: 1.0,
            zoom_min: 0.4,
            zoom_max: 2.5,
            yaw_per_pixel: 0.004,
            pitch_per_pixel: 0.003,
            zoom_in_ratio: 1.08,
            zoom_out_ratio: 0.92,
            auto_rotate_step: 0.0018,
        }
    }
}

impl CameraLimits {
    pub fn clamp_pitch(&self, pitch: f64) -> f64 {
        pitch.clamp(self.pitch_min, self.pitch_max)
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.zoom_min, self.zoom_max)
    }

    /// Brings an arbitrary camera (e.g. a preset) inside the limits
    pub fn clamp(&self, camera: CameraState) -> CameraState {
        CameraState {
            pitch: self.clamp_pitch(camera.pitch),
            zoom: self.clamp_zoom(camera.zoom),
            ..camera
        }
    }
}

/// What a held pointer is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragMode {
    #[default]
    Idle,
    Rotating,
    Panning,
}

/// Converts pointer and wheel input into camera updates
#[derive(Debug, Clone)]
pub struct CameraController {
    limits: CameraLimits,
    home: CameraState,
    mode: DragMode,
    /// Last pointer position seen while dragging
    last_pointer: [f64; 2],
    pub auto_rotate: bool,
}

impl CameraController {
    pub fn new(limits: CameraLimits, home: CameraState) -> Self {
        CameraController {
            limits,
            home: limits.clamp(home),
            mode: DragMode::Idle,
            last_pointer: [0.0, 0.0],
            auto_rotate: true,
        }
    }

    pub fn limits(&self) -> &CameraLimits {
        &self.limits
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    pub fn is_dragging(&self) -> bool {
        self.mode != DragMode::Idle
    }

    /// Camera the scene starts with and returns to on reset
    pub fn home(&self) -> CameraState {
        self.home
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, pan_modifier: bool) {
        self.mode = if pan_modifier {
            DragMode::Panning
        } else {
            DragMode::Rotating
        };
        self.last_pointer = [x, y];
    }

    pub fn pointer_move(&mut self, camera: &mut CameraState, x: f64, y: f64) {
        let dx = x - self.last_pointer[0];
        let dy = y - self.last_pointer[1];
        match self.mode {
            DragMode::Idle => return,
            DragMode::Rotating => {
                camera.yaw += dx * self.limits.yaw_per_pixel;
                camera.pitch = self
                    .limits
                    .clamp_pitch(camera.pitch + dy * self.limits.pitch_per_pixel);
            }
            DragMode::Panning => {
                camera.pan[0] += dx;
                camera.pan[1] += dy;
            }
        }
        self.last_pointer = [x, y];
    }

    pub fn pointer_up(&mut self) {
        self.mode = DragMode::Idle;
    }

    /// Applies one wheel notch. Positive `delta` zooms out, like a browser wheel.
    pub fn wheel(&mut self, camera: &mut CameraState, delta: f64) {
        if delta == 0.0 {
            return;
        }
        let ratio = if delta > 0.0 {
            self.limits.zoom_out_ratio
        } else {
            self.limits.zoom_in_ratio
        };
        camera.zoom = self.limits.clamp_zoom(camera.zoom * ratio);
    }

    /// Per-tick idle behavior. Dragging and auto-rotate never both apply.
    pub fn tick(&mut self, camera: &mut CameraState) {
        if self.auto_rotate && !self.is_dragging() {
            camera.yaw += self.limits.auto_rotate_step;
        }
    }

    pub fn reset(&mut self, camera: &mut CameraState) {
        *camera = self.home;
        self.mode = DragMode::Idle;
    }

    /// Jumps to a preset view, keeping it inside the limits
    pub fn apply_preset(&mut self, camera: &mut CameraState, preset: CameraState) {
        *camera = self.limits.clamp(preset);
        self.mode = DragMode::Idle;
    }

    /// Cancels any capture in progress, e.g. on pause
    pub fn release(&mut self) {
        self.mode = DragMode::Idle;
        self.last_pointer = [0.0, 0.0];
    }
}
