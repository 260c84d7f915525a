use std::f64::consts::PI;

use super::{polygon, push_loop, push_polyline, push_verticals, RenderHint, Segment};
use crate::descriptor::BuildingDescriptor;
use crate::vertex::WorldPoint;

/// Square pedestal under a flat figure outline.
///
/// The outline is given as `(x, y)` pairs in fractions of the descriptor
/// height and is drawn in the plane through the descriptor centre.
#[derive(Debug, Clone, PartialEq)]
pub struct Statue {
    pub pedestal: f64,
    pub outline: Vec<(f64, f64)>,
    /// Index of the outline point holding the torch, if any
    pub torch: Option<usize>,
}

impl Default for Statue {
    fn default() -> Self {
        const H: f64 = 92.0;
        let outline = [
            (0.0, 25.0),
            (-3.0, 38.0),
            (-2.0, 55.0),
            (-6.0, 70.0),
            (-2.0, 60.0),
            (0.0, 75.0),
            (3.0, 82.0),
            (6.0, 92.0),
            (4.0, 82.0),
            (2.0, 60.0),
            (3.0, 38.0),
            (0.0, 25.0),
        ];
        Statue {
            pedestal: 25.0 / H,
            outline: outline.iter().map(|&(x, y)| (x / H, y / H)).collect(),
            torch: Some(7),
        }
    }
}

impl Statue {
    /// World position of the torch tip for `descriptor`
    pub fn torch_point(&self, d: &BuildingDescriptor) -> Option<WorldPoint> {
        let (x, y) = *self.outline.get(self.torch?)?;
        Some(WorldPoint::new(d.x + x * d.height, y * d.height, d.z))
    }
}

pub(super) fn statue(d: &BuildingDescriptor, statue: &Statue, out: &mut Vec<Segment>) {
    let before = out.len();
    let top = d.height * statue.pedestal.clamp(0.0, 1.0);
    if top > 0.0 {
        let base = polygon(d.x, d.z, d.width / 2.0, 4, PI / 4.0);
        push_verticals(out, &base, 0.0, &base, top, RenderHint::Edge);
        push_loop(out, &base, 0.0, RenderHint::Edge);
        push_loop(out, &base, top, RenderHint::Edge);
    }

    let figure = statue
        .outline
        .iter()
        .map(|&(x, y)| WorldPoint::new(d.x + x * d.height, y * d.height, d.z));
    push_polyline(out, figure, RenderHint::Accent);

    // a figureless statue still needs a mark
    if out.len() == before {
        out.push(Segment::new(
            WorldPoint::new(d.x, 0.0, d.z),
            WorldPoint::new(d.x, d.height, d.z),
            RenderHint::Edge,
        ));
    }
}
