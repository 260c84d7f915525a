//! 2D output of a frame, in viewport coordinates, in paint order.

use crate::palette::Rgb;
use crate::vertex::Point2;

/// Width of a [`Primitive::Band`] in viewport units
pub const BAND_WIDTH: f64 = 1000.0;
/// Width of the fade at each end of a band
pub const BAND_FEATHER: f64 = 60.0;

/// Line styling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    pub width: f64,
    /// In `[0, 1]`
    pub opacity: f64,
    /// Glow radius around the line; zero for none
    pub glow: f64,
}

impl Stroke {
    pub const fn new(color: Rgb, width: f64, opacity: f64) -> Self {
        Self {
            color,
            width,
            opacity,
            glow: 0.0,
        }
    }

    pub const fn glow(mut self, radius: f64) -> Self {
        self.glow = radius;
        self
    }

    pub fn fade(mut self, factor: f64) -> Self {
        self.opacity = (self.opacity * factor).clamp(0.0, 1.0);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Vertical gradient over the whole viewport, top to horizon
    SkyGradient([Rgb; 4]),
    /// Full-viewport wash
    Flash { color: Rgb, opacity: f64 },
    Line {
        from: Point2,
        to: Point2,
        stroke: Stroke,
    },
    Polyline {
        points: Vec<Point2>,
        stroke: Stroke,
    },
    Circle {
        center: Point2,
        radius: f64,
        /// Filled when `None`
        outline: Option<Stroke>,
        color: Rgb,
        opacity: f64,
    },
    Ellipse {
        center: Point2,
        radius_x: f64,
        radius_y: f64,
        color: Rgb,
        opacity: f64,
    },
    /// Horizontal strip [`BAND_WIDTH`] units wide starting at `x_offset`,
    /// feathered at both ends
    Band {
        x_offset: f64,
        y: f64,
        height: f64,
        color: Rgb,
        opacity: f64,
    },
    /// Text centred on `at`
    Label {
        at: Point2,
        text: String,
        color: Rgb,
        opacity: f64,
    },
}

impl Primitive {
    /// Short name used by the debug overlay and tests
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::SkyGradient(_) => "sky",
            Primitive::Flash { .. } => "flash",
            Primitive::Line { .. } => "line",
            Primitive::Polyline { .. } => "polyline",
            Primitive::Circle { .. } => "circle",
            Primitive::Ellipse { .. } => "ellipse",
            Primitive::Band { .. } => "band",
            Primitive::Label { .. } => "label",
        }
    }
}
