use super::{corners, push_polyline, push_verticals, RenderHint, Segment};
use crate::descriptor::BuildingDescriptor;
use crate::vertex::WorldPoint;

/// Two-tower suspension bridge spanning the descriptor width along x.
/// The descriptor depth is the deck width and its height the tower height.
#[derive(Debug, Clone, PartialEq)]
pub struct SuspensionBridge {
    pub deck_height: f64,
    /// Distance from each end of the deck to its tower
    pub tower_inset: f64,
    pub tower_half_width: f64,
    /// Top half-width relative to the base
    pub tower_taper: f64,
    pub beam_spacing: f64,
    pub cable_samples: u32,
    /// Depth of the main span's sag below the tower tops
    pub sag: f64,
    pub suspender_every: u32,
}

impl Default for SuspensionBridge {
    fn default() -> Self {
        SuspensionBridge {
            deck_height: 18.0,
            tower_inset: 25.0,
            tower_half_width: 6.0,
            tower_taper: 0.75,
            beam_spacing: 12.0,
            cable_samples: 20,
            sag: 20.0,
            suspender_every: 2,
        }
    }
}

/// Main cable geometry along the span
#[derive(Debug, Clone, Copy)]
struct CableProfile {
    start: f64,
    end: f64,
    towers: (f64, f64),
    deck: f64,
    top: f64,
    sag: f64,
}

impl CableProfile {
    /// Cable height at `x`: anchor ramps outside the towers, parabolic sag between
    fn height_at(&self, x: f64) -> f64 {
        let (t1, t2) = self.towers;
        if x < t1 {
            self.deck + (x - self.start) / (t1 - self.start) * (self.top - self.deck)
        } else if x > t2 {
            self.deck + (self.end - x) / (self.end - t2) * (self.top - self.deck)
        } else {
            let mid = (t1 + t2) / 2.0;
            let half_span = (t2 - t1) / 2.0;
            let u = (x - mid) / half_span;
            self.top - self.sag * (1.0 - u * u)
        }
    }
}

pub(super) fn suspension_bridge(
    d: &BuildingDescriptor,
    bridge: &SuspensionBridge,
    out: &mut Vec<Segment>,
) {
    let start = d.x - d.width / 2.0;
    let end = d.x + d.width / 2.0;
    let half_deck = d.depth / 2.0;
    let top = d.height;
    let deck = bridge.deck_height.clamp(0.0, top * 0.5);
    let inset = bridge.tower_inset.clamp(d.width * 0.05, d.width / 4.0);
    let towers = (start + inset, end - inset);

    for side in [-half_deck, half_deck] {
        out.push(Segment::new(
            WorldPoint::new(start, deck, d.z + side),
            WorldPoint::new(end, deck, d.z + side),
            RenderHint::Edge,
        ));
    }

    if bridge.beam_spacing > 0.0 {
        let beams = (d.width / bridge.beam_spacing).floor() as u32;
        for k in 0..=beams {
            let x = start + k as f64 * bridge.beam_spacing;
            out.push(Segment::new(
                WorldPoint::new(x, deck, d.z - half_deck),
                WorldPoint::new(x, deck, d.z + half_deck),
                RenderHint::Floor,
            ));
        }
    }

    let tw = bridge.tower_half_width.min(half_deck.max(1.0));
    let top_w = tw * bridge.tower_taper.clamp(0.1, 1.0);
    for tx in [towers.0, towers.1] {
        let base = corners(tx, d.z, tw, tw);
        let head = corners(tx, d.z, top_w, top_w);
        push_verticals(out, &base, 0.0, &head, top, RenderHint::Edge);
        out.push(Segment::new(
            WorldPoint::new(tx - top_w, top, d.z),
            WorldPoint::new(tx + top_w, top, d.z),
            RenderHint::Edge,
        ));
        let arch_half = tw * 2.0 / 3.0;
        let peak = WorldPoint::new(tx, top * 0.65, d.z);
        for side in [-arch_half, arch_half] {
            out.push(Segment::new(
                WorldPoint::new(tx + side, top * 0.45, d.z),
                peak,
                RenderHint::Accent,
            ));
        }
    }

    let profile = CableProfile {
        start,
        end,
        towers,
        deck,
        top,
        sag: bridge.sag.clamp(0.0, (top - deck) * 0.9),
    };
    let samples = bridge.cable_samples.max(2);
    let every = bridge.suspender_every.max(1);
    let cable_offset = (half_deck - 1.0).max(half_deck * 0.5);
    for side in [-cable_offset, cable_offset] {
        let z = d.z + side;
        let points: Vec<WorldPoint> = (0..=samples)
            .map(|i| {
                let x = start + i as f64 / samples as f64 * d.width;
                WorldPoint::new(x, profile.height_at(x), z)
            })
            .collect();
        push_polyline(out, points.iter().copied(), RenderHint::Cable);

        for (i, p) in points.iter().enumerate() {
            let i = i as u32;
            if i > 0 && i < samples && i % every == 0 && p.x > towers.0 && p.x < towers.1 {
                out.push(Segment::new(
                    *p,
                    WorldPoint::new(p.x, deck, z),
                    RenderHint::Suspender,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{generate, Archetype};
    use crate::palette::PaletteSlot;

    fn brooklyn() -> BuildingDescriptor {
        BuildingDescriptor::new(-410.0, -95.0, 120.0, 12.0, 70.0, PaletteSlot::Copper)
            .archetype(Archetype::SuspensionBridge(SuspensionBridge::default()))
    }

    #[test]
    fn bridge_segment_count() {
        let segments = generate(&brooklyn());
        let count = |hint| segments.iter().filter(|s| s.hint == hint).count();
        assert_eq!(count(RenderHint::Floor), 11);
        assert_eq!(count(RenderHint::Cable), 40);
        assert_eq!(count(RenderHint::Suspender), 10);
        // 2 rails, 2 towers of 4 legs and a head beam
        assert_eq!(count(RenderHint::Edge), 2 + 10);
        assert_eq!(count(RenderHint::Accent), 4);
    }

    #[test]
    fn cable_sags_between_towers_and_meets_tower_tops() {
        let profile = CableProfile {
            start: -470.0,
            end: -350.0,
            towers: (-445.0, -375.0),
            deck: 18.0,
            top: 70.0,
            sag: 20.0,
        };
        assert_eq!(profile.height_at(-445.0), 70.0);
        assert_eq!(profile.height_at(-375.0), 70.0);
        assert_eq!(profile.height_at(-410.0), 50.0);
        assert_eq!(profile.height_at(-470.0), 18.0);
        assert_eq!(profile.height_at(-350.0), 18.0);
        let left = profile.height_at(-446.0);
        assert!(left < 70.0 && left > 67.0);
    }

    #[test]
    fn suspenders_hang_down_to_the_deck() {
        for s in generate(&brooklyn())
            .iter()
            .filter(|s| s.hint == RenderHint::Suspender)
        {
            assert!(s.start.y > s.end.y);
            assert_eq!(s.end.y, 18.0);
        }
    }
}
