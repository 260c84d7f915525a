//! Procedural wireframe generators, one per building archetype.
//!
//! Every generator is a pure function of its descriptor: no randomness, no
//! shared state. Degenerate descriptors produce no segments; valid ones always
//! produce at least one.

mod bridge;
mod dome;
mod lattice;
mod prism;
mod setback;
mod shell;
mod statue;
mod twisted;

pub use bridge::SuspensionBridge;
pub use dome::DomedHall;
pub use lattice::{LatticeTower, ObservationDeck};
pub use prism::floor_count;
pub use setback::{SetbackSection, SetbackTower, TaperedTower};
pub use shell::{Sail, ShellGroup, ShellProfile};
pub use statue::Statue;
pub use twisted::TwistedTower;

use std::f64::consts::PI;

use crate::descriptor::BuildingDescriptor;
use crate::math::ellipse_point;
use crate::vertex::WorldPoint;

/// Presentational category of a segment; picks stroke weight and opacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderHint {
    /// Outline and corner edges
    Edge,
    /// Floor band on a facade
    Floor,
    /// Diagonal lattice bracing
    Brace,
    /// Horizontal ring or deck
    Ring,
    /// Curved shell rib
    Rib,
    /// Main suspension cable
    Cable,
    /// Vertical hanger between cable and deck
    Suspender,
    /// Spires, masts and antennas
    Mast,
    /// Glowing accent such as a torch or helix edge
    Accent,
}

/// 3D line in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: WorldPoint,
    pub end: WorldPoint,
    pub hint: RenderHint,
}

impl Segment {
    pub const fn new(start: WorldPoint, end: WorldPoint, hint: RenderHint) -> Self {
        Self { start, end, hint }
    }
}

/// Structural pattern a descriptor is drawn with
#[derive(Debug, Clone, PartialEq)]
pub enum Archetype {
    /// Box with floor bands
    Prism,
    /// Box with floor bands and a pyramidal spire
    Spired { spire_height: f64 },
    Setback(SetbackTower),
    Tapered(TaperedTower),
    Twisted(TwistedTower),
    Lattice(LatticeTower),
    Domed(DomedHall),
    Shell(ShellGroup),
    SuspensionBridge(SuspensionBridge),
    Statue(Statue),
}

impl Archetype {
    pub fn label(&self) -> &'static str {
        match self {
            Archetype::Prism => "prism",
            Archetype::Spired { .. } => "spired",
            Archetype::Setback(_) => "setback",
            Archetype::Tapered(_) => "tapered",
            Archetype::Twisted(_) => "twisted",
            Archetype::Lattice(_) => "lattice",
            Archetype::Domed(_) => "domed",
            Archetype::Shell(_) => "shell",
            Archetype::SuspensionBridge(_) => "suspension bridge",
            Archetype::Statue(_) => "statue",
        }
    }
}

/// Builds the wireframe for `descriptor`
pub fn generate(descriptor: &BuildingDescriptor) -> Vec<Segment> {
    let mut out = Vec::new();
    generate_into(descriptor, &mut out);
    out
}

/// Like [`generate`] but appends to a reusable buffer
pub fn generate_into(descriptor: &BuildingDescriptor, out: &mut Vec<Segment>) {
    if descriptor.is_degenerate() {
        return;
    }
    match &descriptor.archetype {
        Archetype::Prism => prism::prism(descriptor, out),
        Archetype::Spired { spire_height } => prism::spired(descriptor, *spire_height, out),
        Archetype::Setback(tower) => setback::setback(descriptor, tower, out),
        Archetype::Tapered(tower) => setback::tapered(descriptor, tower, out),
        Archetype::Twisted(tower) => twisted::twisted(descriptor, tower, out),
        Archetype::Lattice(tower) => lattice::lattice(descriptor, tower, out),
        Archetype::Domed(hall) => dome::domed(descriptor, hall, out),
        Archetype::Shell(group) => shell::shell(descriptor, group, out),
        Archetype::SuspensionBridge(bridge) => bridge::suspension_bridge(descriptor, bridge, out),
        Archetype::Statue(statue) => statue::statue(descriptor, statue, out),
    }
}

/// Footprint corners, counter-clockwise from (-x, -z)
fn corners(cx: f64, cz: f64, half_width: f64, half_depth: f64) -> [(f64, f64); 4] {
    [
        (cx - half_width, cz - half_depth),
        (cx + half_width, cz - half_depth),
        (cx + half_width, cz + half_depth),
        (cx - half_width, cz + half_depth),
    ]
}

fn at(corner: (f64, f64), y: f64) -> WorldPoint {
    WorldPoint::new(corner.0, y, corner.1)
}

/// Closed loop through `corners` at height `y`
fn push_loop(out: &mut Vec<Segment>, corners: &[(f64, f64)], y: f64, hint: RenderHint) {
    for i in 0..corners.len() {
        let next = corners[(i + 1) % corners.len()];
        out.push(Segment::new(at(corners[i], y), at(next, y), hint));
    }
}

/// Connects `bottom[i]` at `y0` to `top[i]` at `y1`
fn push_verticals(
    out: &mut Vec<Segment>,
    bottom: &[(f64, f64)],
    y0: f64,
    top: &[(f64, f64)],
    y1: f64,
    hint: RenderHint,
) {
    for (b, t) in bottom.iter().zip(top) {
        out.push(Segment::new(at(*b, y0), at(*t, y1), hint));
    }
}

/// Consecutive points joined into an open polyline
fn push_polyline<I>(out: &mut Vec<Segment>, points: I, hint: RenderHint)
where
    I: IntoIterator<Item = WorldPoint>,
{
    let mut previous: Option<WorldPoint> = None;
    for point in points {
        if let Some(prev) = previous {
            out.push(Segment::new(prev, point, hint));
        }
        previous = Some(point);
    }
}

/// Regular polygon of `sides` around the vertical axis through (cx, cz)
fn polygon(cx: f64, cz: f64, radius: f64, sides: u32, phase: f64) -> Vec<(f64, f64)> {
    (0..sides.max(3))
        .map(|i| {
            let angle = i as f64 / sides.max(3) as f64 * PI * 2.0 + phase;
            ellipse_point(cx, cz, radius, radius, angle)
        })
        .collect()
}
