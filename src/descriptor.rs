use thiserror::Error;

use crate::geometry::Archetype;
use crate::palette::PaletteSlot;
use crate::vertex::WorldPoint;

/// Vertical distance between floor bands unless a scene says otherwise
pub const DEFAULT_FLOOR_SPACING: f64 = 14.0;

/// Display facts shown next to a building's label
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingInfo {
    pub name: &'static str,
    pub height: &'static str,
    pub year: u16,
    pub floors: Option<u16>,
    pub note: Option<&'static str>,
}

impl BuildingInfo {
    pub const fn new(name: &'static str, height: &'static str, year: u16) -> Self {
        Self {
            name,
            height,
            year,
            floors: None,
            note: None,
        }
    }

    pub const fn floors(mut self, floors: u16) -> Self {
        self.floors = Some(floors);
        self
    }

    pub const fn note(mut self, note: &'static str) -> Self {
        self.note = Some(note);
        self
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DescriptorError {
    #[error("{name}: {field} must be positive and finite, got {value}")]
    NonPositive {
        name: String,
        field: &'static str,
        value: f64,
    },
    #[error("{name}: position ({x}, {z}) is not finite")]
    Position { name: String, x: f64, z: f64 },
}

/// Static description of one building or landmark
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingDescriptor {
    pub x: f64,
    pub z: f64,
    pub width: f64,
    pub depth: f64,
    pub height: f64,
    pub color: PaletteSlot,
    pub archetype: Archetype,
    pub floor_spacing: f64,
    /// Hidden when landmark display is switched off
    pub landmark: bool,
    pub info: Option<BuildingInfo>,
}

impl BuildingDescriptor {
    /// Plain prism with the default floor spacing
    pub fn new(x: f64, z: f64, width: f64, depth: f64, height: f64, color: PaletteSlot) -> Self {
        BuildingDescriptor {
            x,
            z,
            width,
            depth,
            height,
            color,
            archetype: Archetype::Prism,
            floor_spacing: DEFAULT_FLOOR_SPACING,
            landmark: false,
            info: None,
        }
    }

    /// Square footprint shorthand
    pub fn square(x: f64, z: f64, side: f64, height: f64, color: PaletteSlot) -> Self {
        Self::new(x, z, side, side, height, color)
    }

    pub fn archetype(mut self, archetype: Archetype) -> Self {
        self.archetype = archetype;
        self
    }

    pub fn info(mut self, info: BuildingInfo) -> Self {
        self.info = Some(info);
        self
    }

    pub fn as_landmark(mut self) -> Self {
        self.landmark = true;
        self
    }

    pub fn floor_spacing(mut self, spacing: f64) -> Self {
        self.floor_spacing = spacing;
        self
    }

    pub fn name(&self) -> Option<&'static str> {
        self.info.as_ref().map(|info| info.name)
    }

    /// Point whose depth orders this building in the painter's sort
    pub fn centroid(&self) -> WorldPoint {
        WorldPoint::new(self.x, self.height / 2.0, self.z)
    }

    /// True when generators must not build anything for this descriptor
    pub fn is_degenerate(&self) -> bool {
        self.validate().is_err()
    }

    pub fn validate(&self) -> Result<(), DescriptorError> {
        let name = || self.name().unwrap_or("unnamed").to_string();
        if !self.x.is_finite() || !self.z.is_finite() {
            return Err(DescriptorError::Position {
                name: name(),
                x: self.x,
                z: self.z,
            });
        }
        for (field, value) in [
            ("width", self.width),
            ("depth", self.depth),
            ("height", self.height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(DescriptorError::NonPositive {
                    name: name(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}
