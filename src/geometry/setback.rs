use std::f64::consts::PI;

use super::prism::floor_bands;
use super::{corners, polygon, push_loop, push_verticals, RenderHint, Segment};
use crate::descriptor::BuildingDescriptor;
use crate::math::{ellipse_point, lerp};
use crate::vertex::WorldPoint;

/// One stacked section; `top` is a fraction of the descriptor height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetbackSection {
    pub top: f64,
    pub scale: f64,
}

impl SetbackSection {
    pub const fn new(top: f64, scale: f64) -> Self {
        Self { top, scale }
    }
}

/// Stacked rectangular sections, optionally crowned and topped by a mast
#[derive(Debug, Clone, PartialEq)]
pub struct SetbackTower {
    /// Bottom to top; each scale is clamped to at most the one below it
    pub sections: Vec<SetbackSection>,
    /// Tiers of the stepped sunburst crown; zero for a flat roof
    pub crown_tiers: u32,
    pub mast_height: f64,
    /// Rings around the mast, shrinking upwards
    pub mast_rings: u32,
    pub ring_radius: f64,
}

const CROWN_TIER_HEIGHT: f64 = 3.0;
const CROWN_SIDES: u32 = 8;

impl SetbackTower {
    /// Six setbacks under a ringed antenna mast
    pub fn empire_state() -> Self {
        let h = 290.0;
        SetbackTower {
            sections: vec![
                SetbackSection::new(180.0 / h, 1.0),
                SetbackSection::new(210.0 / h, 0.85),
                SetbackSection::new(240.0 / h, 0.65),
                SetbackSection::new(260.0 / h, 0.45),
                SetbackSection::new(275.0 / h, 0.3),
                SetbackSection::new(1.0, 0.18),
            ],
            crown_tiers: 0,
            mast_height: 60.0,
            mast_rings: 4,
            ring_radius: 5.0,
        }
    }

    /// Four setbacks under a tiered sunburst crown and a thin spire
    pub fn art_deco() -> Self {
        let h = 230.0;
        SetbackTower {
            sections: vec![
                SetbackSection::new(150.0 / h, 1.0),
                SetbackSection::new(175.0 / h, 0.85),
                SetbackSection::new(195.0 / h, 0.7),
                SetbackSection::new(210.0 / h, 0.55),
            ],
            crown_tiers: 7,
            mast_height: 34.0,
            mast_rings: 0,
            ring_radius: 0.0,
        }
    }

    /// Number of sections that will actually be drawn
    pub fn drawn_sections(&self) -> usize {
        self.resolved(1.0).len()
    }

    /// Absolute (bottom, top, scale) per section
    fn resolved(&self, height: f64) -> Vec<(f64, f64, f64)> {
        if self.sections.is_empty() {
            return vec![(0.0, height, 1.0)];
        }
        let mut out = Vec::with_capacity(self.sections.len());
        let mut bottom = 0.0;
        let mut scale = 1.0_f64;
        for section in &self.sections {
            let top = section.top.clamp(0.0, 1.0) * height;
            if !(top > bottom) {
                continue;
            }
            if section.scale > 0.0 {
                scale = scale.min(section.scale);
            }
            out.push((bottom, top, scale));
            bottom = top;
        }
        if out.is_empty() {
            out.push((0.0, height, 1.0));
        }
        out
    }
}

pub(super) fn setback(d: &BuildingDescriptor, tower: &SetbackTower, out: &mut Vec<Segment>) {
    let (hw, hd) = (d.width / 2.0, d.depth / 2.0);
    let sections = tower.resolved(d.height);
    let mut roof = 0.0;
    let mut roof_scale = 1.0;

    for (bottom, top, scale) in sections {
        let c = corners(d.x, d.z, hw * scale, hd * scale);
        push_verticals(out, &c, bottom, &c, top, RenderHint::Edge);
        push_loop(out, &c, bottom, RenderHint::Edge);
        push_loop(out, &c, top, RenderHint::Edge);
        floor_bands(out, &c, bottom, top, d.floor_spacing);
        roof = top;
        roof_scale = scale;
    }

    if tower.crown_tiers > 0 {
        roof = sunburst_crown(d, roof, hw * roof_scale, tower.crown_tiers, out);
    }

    if tower.mast_height > 0.0 {
        let mast_top = roof + tower.mast_height;
        out.push(Segment::new(
            WorldPoint::new(d.x, roof, d.z),
            WorldPoint::new(d.x, mast_top, d.z),
            RenderHint::Mast,
        ));
        let spacing = tower.mast_height * 0.8 / tower.mast_rings.max(1) as f64;
        for ring in 0..tower.mast_rings {
            let y = roof + tower.mast_height * 0.1 + ring as f64 * spacing;
            let radius =
                tower.ring_radius * (1.0 - ring as f64 / (tower.mast_rings + 1) as f64);
            let points = polygon(d.x, d.z, radius, CROWN_SIDES, 0.0);
            push_loop(out, &points, y, RenderHint::Mast);
        }
    }
}

/// Shrinking octagonal tiers with triangular peaks; returns the crown top
fn sunburst_crown(
    d: &BuildingDescriptor,
    base: f64,
    radius: f64,
    tiers: u32,
    out: &mut Vec<Segment>,
) -> f64 {
    for tier in 0..tiers {
        let y = base + tier as f64 * CROWN_TIER_HEIGHT;
        let tier_radius = radius * (1.0 - tier as f64 / (tiers + 3) as f64);
        let ring = polygon(d.x, d.z, tier_radius, CROWN_SIDES, 0.0);
        push_loop(out, &ring, y, RenderHint::Accent);

        if tier + 1 < tiers {
            for i in 0..ring.len() {
                let next = ring[(i + 1) % ring.len()];
                let mid = (i as f64 + 0.5) / CROWN_SIDES as f64 * PI * 2.0;
                let (px, pz) = ellipse_point(d.x, d.z, tier_radius * 1.4, tier_radius * 1.4, mid);
                let peak = WorldPoint::new(px, y + 2.0 * CROWN_TIER_HEIGHT, pz);
                out.push(Segment::new(
                    WorldPoint::new(ring[i].0, y, ring[i].1),
                    peak,
                    RenderHint::Accent,
                ));
                out.push(Segment::new(
                    WorldPoint::new(next.0, y, next.1),
                    peak,
                    RenderHint::Accent,
                ));
            }
        }
    }
    base + tiers as f64 * CROWN_TIER_HEIGHT
}

/// Polygonal shaft that narrows linearly, with a central spire
#[derive(Debug, Clone, PartialEq)]
pub struct TaperedTower {
    pub sides: u32,
    /// Vertical subdivisions of the shaft
    pub segments: u32,
    pub top_scale: f64,
    /// A horizontal ring is drawn on every n-th subdivision
    pub ring_every: u32,
    /// Shaft height as a fraction of the descriptor height
    pub shaft_fraction: f64,
    /// Spire tip above the descriptor height, as a fraction of it
    pub spire_rise: f64,
}

impl Default for TaperedTower {
    fn default() -> Self {
        TaperedTower {
            sides: 8,
            segments: 25,
            top_scale: 0.65,
            ring_every: 5,
            shaft_fraction: 0.85,
            spire_rise: 0.12,
        }
    }
}

pub(super) fn tapered(d: &BuildingDescriptor, tower: &TaperedTower, out: &mut Vec<Segment>) {
    let (hw, hd) = (d.width / 2.0, d.depth / 2.0);
    let sides = tower.sides.max(3);
    let segments = tower.segments.max(1);
    let ring_every = tower.ring_every.max(1);
    let shaft = d.height * tower.shaft_fraction.clamp(0.05, 1.0);
    let phase = PI / sides as f64;

    let outline = |s: u32| -> Vec<WorldPoint> {
        let t = s as f64 / segments as f64;
        let scale = lerp(1.0, tower.top_scale, t);
        (0..sides)
            .map(|i| {
                let angle = i as f64 / sides as f64 * PI * 2.0 + phase;
                let (x, z) = ellipse_point(d.x, d.z, hw * scale, hd * scale, angle);
                WorldPoint::new(x, t * shaft, z)
            })
            .collect()
    };

    let mut lower = outline(0);
    for s in 0..segments {
        let upper = outline(s + 1);
        for i in 0..lower.len() {
            out.push(Segment::new(lower[i], upper[i], RenderHint::Edge));
            if s % ring_every == 0 {
                let next = lower[(i + 1) % lower.len()];
                out.push(Segment::new(lower[i], next, RenderHint::Floor));
            }
        }
        lower = upper;
    }

    out.push(Segment::new(
        WorldPoint::new(d.x, shaft, d.z),
        WorldPoint::new(d.x, d.height * (1.0 + tower.spire_rise.max(0.0)), d.z),
        RenderHint::Mast,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{generate, Archetype};
    use crate::palette::PaletteSlot;

    fn empire() -> BuildingDescriptor {
        BuildingDescriptor::square(230.0, 50.0, 48.0, 290.0, PaletteSlot::Accent)
            .archetype(Archetype::Setback(SetbackTower::empire_state()))
    }

    #[test]
    fn empire_state_segment_count() {
        // 6 sections x 12 outline edges, 13 floor bands, mast, 4 rings of 8
        assert_eq!(generate(&empire()).len(), 72 + 13 + 1 + 32);
    }

    #[test]
    fn setback_scales_never_grow() {
        let tower = SetbackTower {
            sections: vec![
                SetbackSection::new(0.5, 1.0),
                SetbackSection::new(0.7, 1.4),
                SetbackSection::new(1.0, 0.5),
            ],
            crown_tiers: 0,
            mast_height: 0.0,
            mast_rings: 0,
            ring_radius: 0.0,
        };
        let resolved = tower.resolved(100.0);
        assert_eq!(resolved[1].2, 1.0);
        assert_eq!(resolved[2].2, 0.5);
    }

    #[test]
    fn empty_or_inverted_sections_fall_back_to_a_box() {
        let empty = SetbackTower {
            sections: Vec::new(),
            ..SetbackTower::empire_state()
        };
        assert_eq!(empty.drawn_sections(), 1);

        let inverted = SetbackTower {
            sections: vec![SetbackSection::new(0.0, 1.0), SetbackSection::new(-1.0, 0.5)],
            ..SetbackTower::empire_state()
        };
        assert_eq!(inverted.drawn_sections(), 1);
    }

    #[test]
    fn mast_sits_on_the_roof() {
        let segments = generate(&empire());
        let mast = segments
            .iter()
            .find(|s| s.hint == RenderHint::Mast)
            .copied()
            .unwrap();
        assert_eq!(mast.start.y, 290.0);
        assert_eq!(mast.end.y, 350.0);
    }

    #[test]
    fn art_deco_crown_is_drawn() {
        let d = BuildingDescriptor::square(180.0, 65.0, 36.0, 230.0, PaletteSlot::Copper)
            .archetype(Archetype::Setback(SetbackTower::art_deco()));
        let segments = generate(&d);
        let crown = segments
            .iter()
            .filter(|s| s.hint == RenderHint::Accent)
            .count();
        // 7 rings of 8, six of them with 16 peak edges
        assert_eq!(crown, 56 + 96);
        let spire_top = segments
            .iter()
            .filter(|s| s.hint == RenderHint::Mast)
            .map(|s| s.end.y)
            .fold(f64::MIN, f64::max);
        assert!((spire_top - (210.0 + 21.0 + 34.0)).abs() < 1e-9);
    }

    #[test]
    fn tapered_tower_narrows() {
        let d = BuildingDescriptor::square(-350.0, 55.0, 50.0, 330.0, PaletteSlot::Primary)
            .archetype(Archetype::Tapered(TaperedTower::default()));
        let segments = generate(&d);
        // 8 x 25 verticals, 5 rings of 8, spire
        assert_eq!(segments.len(), 200 + 40 + 1);

        let radius = |p: WorldPoint| ((p.x + 350.0).powi(2) + (p.z - 55.0).powi(2)).sqrt();
        let first = segments[0];
        assert!(radius(first.end) < radius(first.start));
    }
}
