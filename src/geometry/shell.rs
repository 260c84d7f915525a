use std::f64::consts::PI;

use super::{corners, push_loop, push_polyline, RenderHint, Segment};
use crate::descriptor::BuildingDescriptor;
use crate::vertex::WorldPoint;

/// Height profile of a single rib across its span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellProfile {
    Sine,
    Parabolic,
}

impl ShellProfile {
    /// Rib height fraction at span position `t` in `[0, 1]`
    pub fn height_at(self, t: f64) -> f64 {
        match self {
            ShellProfile::Sine => (t * PI).sin(),
            ShellProfile::Parabolic => 4.0 * t * (1.0 - t),
        }
    }
}

/// One shell, positioned relative to the descriptor centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sail {
    pub dx: f64,
    pub dz: f64,
    pub height: f64,
    pub width: f64,
    /// Base rotation of the first rib, radians
    pub angle: f64,
    pub profile: ShellProfile,
}

/// Group of curved shells on a shared platform
#[derive(Debug, Clone, PartialEq)]
pub struct ShellGroup {
    /// Zero leaves the platform out and stands the shells on the ground
    pub platform_height: f64,
    pub sails: Vec<Sail>,
    pub ribs: u32,
    pub rib_samples: u32,
    /// Ring levels per shell, including the unused ground level
    pub rings: u32,
    /// Distance covered by the ribs of one shell along z
    pub rib_spread: f64,
    /// Extra rotation from the first to the last rib
    pub fan: f64,
    /// Height lost from the first to the last rib, fraction
    pub taper: f64,
}

impl ShellGroup {
    /// Two interlocking groups of sine-profile sails
    pub fn opera_house(scale: f64) -> Self {
        let sail = |dx: f64, dz: f64, height: f64, width: f64, angle: f64| Sail {
            dx: dx * scale,
            dz: dz * scale,
            height: height * scale,
            width: width * scale,
            angle,
            profile: ShellProfile::Sine,
        };
        ShellGroup {
            platform_height: 10.0,
            sails: vec![
                sail(-40.0, -8.0, 85.0, 45.0, 0.12),
                sail(-25.0, 0.0, 70.0, 38.0, 0.18),
                sail(-10.0, 8.0, 55.0, 30.0, 0.24),
                sail(30.0, -8.0, 70.0, 38.0, -0.08),
                sail(42.0, 0.0, 55.0, 30.0, -0.03),
                sail(52.0, 8.0, 42.0, 24.0, 0.02),
            ],
            ribs: 10,
            rib_samples: 14,
            rings: 6,
            rib_spread: 18.0,
            fan: 0.5,
            taper: 0.25,
        }
    }

    /// Single low parabolic vault spanning the whole footprint
    pub fn vault(width: f64, depth: f64, height: f64) -> Self {
        ShellGroup {
            platform_height: 0.0,
            sails: vec![Sail {
                dx: 0.0,
                dz: -depth / 2.0,
                height,
                width,
                angle: 0.0,
                profile: ShellProfile::Parabolic,
            }],
            ribs: 11,
            rib_samples: 12,
            rings: 3,
            rib_spread: depth,
            fan: 0.0,
            taper: 0.0,
        }
    }
}

pub(super) fn shell(d: &BuildingDescriptor, group: &ShellGroup, out: &mut Vec<Segment>) {
    let floor = group.platform_height.max(0.0);
    if floor > 0.0 {
        let platform = corners(d.x, d.z, d.width / 2.0, d.depth / 2.0);
        push_loop(out, &platform, floor, RenderHint::Edge);
    }

    let ribs = group.ribs.max(1);
    let samples = group.rib_samples.max(2);
    for sail in &group.sails {
        let (sx, sz) = (d.x + sail.dx, d.z + sail.dz);

        for r in 0..=ribs {
            let t = r as f64 / ribs as f64;
            let angle = sail.angle + t * group.fan;
            let rib_height = sail.height * (1.0 - t * group.taper);
            let points = (0..=samples).map(|p| {
                let span = p as f64 / samples as f64 - 0.5;
                let lift = sail.profile.height_at(span + 0.5) * rib_height;
                WorldPoint::new(
                    sx + span * sail.width * angle.cos(),
                    floor + lift,
                    sz + t * group.rib_spread + span * sail.width * angle.sin() * 0.3,
                )
            });
            let hint = if r == 0 || r == ribs {
                RenderHint::Edge
            } else {
                RenderHint::Rib
            };
            push_polyline(out, points, hint);
        }

        for level in 1..group.rings {
            let y = floor + sail.height * level as f64 / group.rings as f64 * 0.85;
            let points = (0..=ribs).map(|r| {
                let t = r as f64 / ribs as f64;
                WorldPoint::new(sx, y, sz + t * group.rib_spread)
            });
            push_polyline(out, points, RenderHint::Ring);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{generate, Archetype};
    use crate::palette::PaletteSlot;

    #[test]
    fn profiles_peak_mid_span() {
        for profile in [ShellProfile::Sine, ShellProfile::Parabolic] {
            assert!(profile.height_at(0.0).abs() < 1e-12);
            assert!((profile.height_at(0.5) - 1.0).abs() < 1e-12);
            assert!(profile.height_at(1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn opera_house_segment_count() {
        let d = BuildingDescriptor::new(-266.0, -100.0, 196.0, 84.0, 130.0, PaletteSlot::Ivory)
            .archetype(Archetype::Shell(ShellGroup::opera_house(1.4)));
        // platform, then per sail 11 ribs of 14 spans and 5 rings of 10
        assert_eq!(generate(&d).len(), 4 + 6 * (154 + 50));
    }

    #[test]
    fn sails_rise_from_the_platform() {
        let d = BuildingDescriptor::new(0.0, 0.0, 140.0, 60.0, 90.0, PaletteSlot::Ivory)
            .archetype(Archetype::Shell(ShellGroup::opera_house(1.0)));
        let segments = generate(&d);
        let lowest = segments
            .iter()
            .flat_map(|s| [s.start.y, s.end.y])
            .fold(f64::MAX, f64::min);
        let highest = segments
            .iter()
            .flat_map(|s| [s.start.y, s.end.y])
            .fold(f64::MIN, f64::max);
        assert!((lowest - 10.0).abs() < 1e-9);
        assert!((highest - 95.0).abs() < 1e-9);
    }

    #[test]
    fn vault_has_no_platform() {
        let d = BuildingDescriptor::new(275.0, 40.0, 60.0, 30.0, 55.0, PaletteSlot::Highlight)
            .archetype(Archetype::Shell(ShellGroup::vault(60.0, 30.0, 55.0)));
        let segments = generate(&d);
        assert_eq!(segments.len(), 12 * 12 + 2 * 11);
        assert!(segments.iter().all(|s| s.start.y >= 0.0 && s.end.y <= 55.0 + 1e-9));
    }
}
