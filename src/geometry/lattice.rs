use super::{corners, polygon, push_loop, RenderHint, Segment};
use crate::descriptor::BuildingDescriptor;
use crate::vertex::WorldPoint;

/// Stack of polygonal rings around the tower shaft
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationDeck {
    /// Deck height as a fraction of the tower height
    pub level: f64,
    /// Radius as a fraction of the base half-width
    pub radius: f64,
    pub rings: u32,
    pub ring_gap: f64,
    /// Radius growth per ring, fraction of `radius`
    pub flare: f64,
    pub sides: u32,
    /// Slanted struts from the lowest to the highest ring
    pub struts: u32,
    /// Vertical offset of the lowest ring from the deck level
    pub offset: f64,
}

impl ObservationDeck {
    pub fn main() -> Self {
        ObservationDeck {
            level: 0.6,
            radius: 0.3,
            rings: 3,
            ring_gap: 5.0,
            flare: 0.1,
            sides: 12,
            struts: 8,
            offset: -5.0,
        }
    }

    pub fn special() -> Self {
        ObservationDeck {
            level: 0.85,
            radius: 0.15,
            rings: 2,
            ring_gap: 4.0,
            flare: 0.0,
            sides: 10,
            struts: 0,
            offset: 0.0,
        }
    }
}

/// Square lattice tower: piecewise-linear taper, X-bracing, decks, antenna
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeTower {
    pub sections: u32,
    /// Linear taper zone, as a fraction of the height
    pub taper_until: f64,
    /// Width lost per unit of height inside the taper zone
    pub taper_rate: f64,
    pub mid_until: f64,
    pub mid_scale: f64,
    pub top_scale: f64,
    pub decks: Vec<ObservationDeck>,
    pub antenna_height: f64,
    pub antenna_bars: u32,
}

impl Default for LatticeTower {
    fn default() -> Self {
        LatticeTower {
            sections: 50,
            taper_until: 0.6,
            taper_rate: 0.7,
            mid_until: 0.85,
            mid_scale: 0.15,
            top_scale: 0.08,
            decks: vec![ObservationDeck::main(), ObservationDeck::special()],
            antenna_height: 40.0,
            antenna_bars: 3,
        }
    }
}

impl LatticeTower {
    /// Half-width scale at height fraction `t`
    pub fn width_scale(&self, t: f64) -> f64 {
        if t < self.taper_until {
            (1.0 - t * self.taper_rate).max(0.0)
        } else if t < self.mid_until {
            self.mid_scale
        } else {
            self.top_scale
        }
    }
}

pub(super) fn lattice(d: &BuildingDescriptor, tower: &LatticeTower, out: &mut Vec<Segment>) {
    let base = d.width / 2.0;
    let sections = tower.sections.max(1);
    let level = |s: u32| -> (f64, [(f64, f64); 4]) {
        let t = s as f64 / sections as f64;
        let w = base * tower.width_scale(t);
        (t, corners(d.x, d.z, w, w))
    };

    for s in 0..=sections {
        let (t, ring) = level(s);
        let y = t * d.height;
        push_loop(out, &ring, y, RenderHint::Ring);

        if s == sections {
            break;
        }
        let (next_t, next) = level(s + 1);
        let next_y = next_t * d.height;
        for i in 0..4 {
            out.push(Segment::new(
                WorldPoint::new(ring[i].0, y, ring[i].1),
                WorldPoint::new(next[i].0, next_y, next[i].1),
                RenderHint::Edge,
            ));
        }
        if t < tower.taper_until {
            for i in 0..4 {
                let j = (i + 1) % 4;
                out.push(Segment::new(
                    WorldPoint::new(ring[i].0, y, ring[i].1),
                    WorldPoint::new(next[j].0, next_y, next[j].1),
                    RenderHint::Brace,
                ));
                out.push(Segment::new(
                    WorldPoint::new(ring[j].0, y, ring[j].1),
                    WorldPoint::new(next[i].0, next_y, next[i].1),
                    RenderHint::Brace,
                ));
            }
        }
    }

    for deck in &tower.decks {
        observation_deck(d, base, deck, out);
    }

    if tower.antenna_height > 0.0 {
        let mid = d.height + tower.antenna_height / 2.0;
        let top = d.height + tower.antenna_height;
        let mast = [d.height, mid, top].map(|y| WorldPoint::new(d.x, y, d.z));
        out.push(Segment::new(mast[0], mast[1], RenderHint::Mast));
        out.push(Segment::new(mast[1], mast[2], RenderHint::Mast));

        let bars = tower.antenna_bars;
        for bar in 0..bars {
            let y = d.height + tower.antenna_height * (0.125 + 0.875 * bar as f64 / bars as f64);
            let half = (3.0 - bar as f64 * 0.5).max(0.5);
            out.push(Segment::new(
                WorldPoint::new(d.x - half, y, d.z),
                WorldPoint::new(d.x + half, y, d.z),
                RenderHint::Mast,
            ));
        }
    }
}

fn observation_deck(
    d: &BuildingDescriptor,
    base: f64,
    deck: &ObservationDeck,
    out: &mut Vec<Segment>,
) {
    let radius = base * deck.radius;
    let lowest = d.height * deck.level + deck.offset;
    for ring in 0..deck.rings {
        let y = lowest + ring as f64 * deck.ring_gap;
        let r = radius * (1.0 + ring as f64 * deck.flare);
        push_loop(out, &polygon(d.x, d.z, r, deck.sides, 0.0), y, RenderHint::Ring);
    }

    if deck.struts > 0 && deck.rings > 1 {
        let last = (deck.rings - 1) as f64;
        let top = lowest + last * deck.ring_gap;
        let inner = polygon(d.x, d.z, radius, deck.struts, 0.0);
        let outer = polygon(d.x, d.z, radius * (1.0 + last * deck.flare), deck.struts, 0.0);
        for (a, b) in inner.iter().zip(&outer) {
            out.push(Segment::new(
                WorldPoint::new(a.0, lowest, a.1),
                WorldPoint::new(b.0, top, b.1),
                RenderHint::Ring,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{generate, Archetype};
    use crate::palette::PaletteSlot;

    fn tokyo_tower() -> BuildingDescriptor {
        BuildingDescriptor::square(-180.0, 50.0, 100.0, 280.0, PaletteSlot::Orange)
            .archetype(Archetype::Lattice(LatticeTower::default()))
    }

    #[test]
    fn width_profile_is_piecewise() {
        let tower = LatticeTower::default();
        assert_eq!(tower.width_scale(0.0), 1.0);
        assert!((tower.width_scale(0.5) - 0.65).abs() < 1e-12);
        assert_eq!(tower.width_scale(0.7), 0.15);
        assert_eq!(tower.width_scale(0.9), 0.08);
    }

    #[test]
    fn lattice_segment_count() {
        let segments = generate(&tokyo_tower());
        let count = |hint| segments.iter().filter(|s| s.hint == hint).count();
        // 30 braced sections of 8 diagonals
        assert_eq!(count(RenderHint::Brace), 240);
        assert_eq!(count(RenderHint::Edge), 200);
        // 51 section rings, 3 x 12 + 8 struts, 2 x 10
        assert_eq!(count(RenderHint::Ring), 204 + 44 + 20);
        assert_eq!(count(RenderHint::Mast), 5);
    }

    #[test]
    fn antenna_tops_out_above_roof() {
        let top = generate(&tokyo_tower())
            .iter()
            .map(|s| s.end.y.max(s.start.y))
            .fold(f64::MIN, f64::max);
        assert_eq!(top, 320.0);
    }
}
