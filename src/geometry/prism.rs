use super::{at, corners, push_loop, push_verticals, RenderHint, Segment};
use crate::descriptor::BuildingDescriptor;
use crate::vertex::WorldPoint;

/// Interior floor bands that fit in `span` at `spacing`; excludes the
/// bottom and top outline
pub fn floor_count(span: f64, spacing: f64) -> usize {
    if !(spacing > 0.0) || !(span > 0.0) {
        return 0;
    }
    let bands = (span / spacing).floor();
    if bands.is_finite() {
        (bands as usize).saturating_sub(1)
    } else {
        0
    }
}

/// Floor bands across the front face (`face[0]` to `face[1]`)
pub(super) fn floor_bands(
    out: &mut Vec<Segment>,
    face: &[(f64, f64); 4],
    bottom: f64,
    top: f64,
    spacing: f64,
) {
    for floor in 1..=floor_count(top - bottom, spacing) {
        let y = bottom + floor as f64 * spacing;
        out.push(Segment::new(at(face[0], y), at(face[1], y), RenderHint::Floor));
    }
}

/// Shared box: four verticals, base and roof loops, floor bands
fn shaft(d: &BuildingDescriptor, out: &mut Vec<Segment>) -> [(f64, f64); 4] {
    let c = corners(d.x, d.z, d.width / 2.0, d.depth / 2.0);
    push_verticals(out, &c, 0.0, &c, d.height, RenderHint::Edge);
    push_loop(out, &c, 0.0, RenderHint::Edge);
    push_loop(out, &c, d.height, RenderHint::Edge);
    floor_bands(out, &c, 0.0, d.height, d.floor_spacing);
    c
}

pub(super) fn prism(d: &BuildingDescriptor, out: &mut Vec<Segment>) {
    shaft(d, out);
}

pub(super) fn spired(d: &BuildingDescriptor, spire_height: f64, out: &mut Vec<Segment>) {
    let roof = shaft(d, out);
    if spire_height > 0.0 && spire_height.is_finite() {
        let apex = WorldPoint::new(d.x, d.height + spire_height, d.z);
        for corner in roof {
            out.push(Segment::new(at(corner, d.height), apex, RenderHint::Mast));
        }
    }
}
