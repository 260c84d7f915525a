use std::f64::consts::PI;

use super::{push_polyline, RenderHint, Segment};
use crate::descriptor::BuildingDescriptor;
use crate::math::ellipse_point;
use crate::vertex::WorldPoint;

/// Square plan rotated progressively with height
#[derive(Debug, Clone, PartialEq)]
pub struct TwistedTower {
    pub floors: u32,
    /// Rotation of the roof relative to the base, radians
    pub total_twist: f64,
    /// Floor ties drawn every n floors
    pub tie_every: u32,
    /// Corner helix lines sampled every n floors
    pub helix_every: u32,
    pub spire_height: f64,
}

impl Default for TwistedTower {
    fn default() -> Self {
        TwistedTower {
            floors: 45,
            total_twist: PI * 0.55,
            tie_every: 3,
            helix_every: 2,
            spire_height: 25.0,
        }
    }
}

const CORNERS: u32 = 4;

pub(super) fn twisted(d: &BuildingDescriptor, tower: &TwistedTower, out: &mut Vec<Segment>) {
    let (hw, hd) = (d.width / 2.0, d.depth / 2.0);
    let floors = tower.floors.max(1);
    let tie_every = tower.tie_every.max(1);
    let helix_every = tower.helix_every.max(1);

    let corner = |c: u32, f: u32| -> WorldPoint {
        let t = f as f64 / floors as f64;
        let angle = c as f64 / CORNERS as f64 * PI * 2.0 + PI / 4.0 + t * tower.total_twist;
        let (x, z) = ellipse_point(d.x, d.z, hw, hd, angle);
        WorldPoint::new(x, t * d.height, z)
    };

    for f in 0..floors {
        for c in 0..CORNERS {
            out.push(Segment::new(corner(c, f), corner(c, f + 1), RenderHint::Edge));
            if f % tie_every == 0 {
                out.push(Segment::new(
                    corner(c, f),
                    corner((c + 1) % CORNERS, f),
                    RenderHint::Floor,
                ));
            }
        }
    }

    for c in 0..CORNERS {
        let samples = (0..=floors).step_by(helix_every as usize);
        push_polyline(out, samples.map(|f| corner(c, f)), RenderHint::Accent);
    }

    if tower.spire_height > 0.0 {
        out.push(Segment::new(
            WorldPoint::new(d.x, d.height, d.z),
            WorldPoint::new(d.x, d.height + tower.spire_height, d.z),
            RenderHint::Mast,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{generate, Archetype};
    use crate::palette::PaletteSlot;

    fn evolution() -> BuildingDescriptor {
        BuildingDescriptor::square(-15.0, 65.0, 40.0, 300.0, PaletteSlot::Primary)
            .archetype(Archetype::Twisted(TwistedTower::default()))
    }

    #[test]
    fn twisted_segment_count() {
        // 45 x 4 risers, 15 x 4 ties, 4 helices of 22 spans, spire
        assert_eq!(generate(&evolution()).len(), 180 + 60 + 88 + 1);
    }

    #[test]
    fn roof_is_rotated_by_total_twist() {
        let d = evolution();
        let segments = generate(&d);
        let base = segments[0].start;
        let base_angle = (base.z - d.z).atan2(base.x - d.x);
        let roof = segments
            .iter()
            .filter(|s| s.hint == RenderHint::Edge)
            .map(|s| s.end)
            .find(|p| (p.y - d.height).abs() < 1e-9)
            .unwrap();
        let roof_angle = (roof.z - d.z).atan2(roof.x - d.x);
        let turned = (roof_angle - base_angle).rem_euclid(PI * 2.0);
        assert!((turned - PI * 0.55).abs() < 1e-9);
    }

    #[test]
    fn zero_floors_still_draws() {
        let d = evolution().archetype(Archetype::Twisted(TwistedTower {
            floors: 0,
            ..TwistedTower::default()
        }));
        assert!(!generate(&d).is_empty());
    }
}
