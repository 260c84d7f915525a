use std::f64::consts::FRAC_PI_2;

use super::{corners, polygon, push_loop, push_polyline, push_verticals, RenderHint, Segment};
use crate::descriptor::BuildingDescriptor;
use crate::math::ellipse_point;
use crate::vertex::WorldPoint;

/// Box base, narrow clock tower, ribbed dome and a finial figure
#[derive(Debug, Clone, PartialEq)]
pub struct DomedHall {
    /// Base block height, fraction of the descriptor height
    pub base: f64,
    pub tower_scale: f64,
    /// Dome springline, fraction of the descriptor height
    pub tower_top: f64,
    /// Dome crown, fraction of the descriptor height
    pub dome_top: f64,
    pub ribs: u32,
    /// Points along each rib after the springline
    pub rib_samples: u32,
    pub finial_height: f64,
}

impl Default for DomedHall {
    fn default() -> Self {
        DomedHall {
            base: 0.45,
            tower_scale: 0.3,
            tower_top: 0.85,
            dome_top: 0.95,
            ribs: 8,
            rib_samples: 4,
            finial_height: 18.0,
        }
    }
}

pub(super) fn domed(d: &BuildingDescriptor, hall: &DomedHall, out: &mut Vec<Segment>) {
    let (hw, hd) = (d.width / 2.0, d.depth / 2.0);
    let base_top = d.height * hall.base;
    let spring = d.height * hall.tower_top;
    let crown = d.height * hall.dome_top;

    let block = corners(d.x, d.z, hw, hd);
    push_verticals(out, &block, 0.0, &block, base_top, RenderHint::Edge);
    push_loop(out, &block, 0.0, RenderHint::Edge);
    push_loop(out, &block, base_top, RenderHint::Edge);

    let tower = corners(d.x, d.z, hw * hall.tower_scale, hd * hall.tower_scale);
    push_verticals(out, &tower, base_top, &tower, spring, RenderHint::Edge);
    push_loop(out, &tower, spring, RenderHint::Edge);

    let radius = hw * hall.tower_scale * 0.7;
    let ribs = hall.ribs.max(3);
    push_loop(out, &polygon(d.x, d.z, radius, ribs, 0.0), spring, RenderHint::Ring);

    let samples = hall.rib_samples.max(1);
    for rib in 0..ribs {
        let angle = rib as f64 / ribs as f64 * std::f64::consts::TAU;
        // quarter-circle profile, closing to a fifth of the base radius
        let points = (0..=samples).map(|k| {
            let theta = k as f64 / samples as f64 * FRAC_PI_2;
            let r = radius * (0.2 + 0.8 * theta.cos());
            let (x, z) = ellipse_point(d.x, d.z, r, r, angle);
            WorldPoint::new(x, spring + (crown - spring) * theta.sin(), z)
        });
        push_polyline(out, points, RenderHint::Rib);
    }

    if hall.finial_height > 0.0 {
        out.push(Segment::new(
            WorldPoint::new(d.x, crown, d.z),
            WorldPoint::new(d.x, d.height + hall.finial_height, d.z),
            RenderHint::Accent,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{generate, Archetype};
    use crate::palette::PaletteSlot;

    fn city_hall() -> BuildingDescriptor {
        BuildingDescriptor::square(230.0, 90.0, 50.0, 140.0, PaletteSlot::Accent)
            .archetype(Archetype::Domed(DomedHall::default()))
    }

    #[test]
    fn domed_segment_count() {
        // base box, tower, springline ring, 8 ribs of 4, finial
        assert_eq!(generate(&city_hall()).len(), 12 + 8 + 8 + 32 + 1);
    }

    #[test]
    fn ribs_climb_from_springline_to_crown() {
        let segments = generate(&city_hall());
        let ribs: Vec<_> = segments
            .iter()
            .filter(|s| s.hint == RenderHint::Rib)
            .collect();
        let low = ribs.iter().map(|s| s.start.y).fold(f64::MAX, f64::min);
        let high = ribs.iter().map(|s| s.end.y).fold(f64::MIN, f64::max);
        assert!((low - 140.0 * 0.85).abs() < 1e-9);
        assert!((high - 140.0 * 0.95).abs() < 1e-9);
        for rib in ribs {
            assert!(rib.end.y >= rib.start.y);
        }
    }
}
