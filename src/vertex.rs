/// Point in scene units, y is up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldPoint {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// Projected point: screen position, camera-space depth and perspective scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    /// Post-rotation depth, before the perspective divide. Larger is farther.
    pub depth: f64,
    /// Perspective scale factor, used for detail and glow sizing.
    pub scale: f64,
}

impl ScreenPoint {
    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// Plain 2D point in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
