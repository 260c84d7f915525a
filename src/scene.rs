//! Scene assembly: the painter's algorithm over buildings and terrain.

use log::warn;

use crate::camera::CameraState;
use crate::descriptor::BuildingDescriptor;
use crate::geometry::{self, RenderHint, Segment};
use crate::palette::PaletteSlot;
use crate::projection::{Projector, Viewport};
use crate::vertex::WorldPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainKind {
    /// Flat grid with wave lines that bob with the clock
    Water,
    /// Static ground grid
    Grid,
}

/// Rectangular patch of ground or water on the `y = 0` plane
#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    pub kind: TerrainKind,
    pub x_range: (f64, f64),
    pub z_range: (f64, f64),
    /// Distance between grid lines running along z
    pub spacing: f64,
    /// Distance between lines running along x
    pub cross_spacing: f64,
    pub color: PaletteSlot,
}

impl Terrain {
    pub fn water(x_range: (f64, f64), z_range: (f64, f64)) -> Self {
        Terrain {
            kind: TerrainKind::Water,
            x_range,
            z_range,
            spacing: 40.0,
            cross_spacing: 20.0,
            color: PaletteSlot::Water,
        }
    }

    pub fn grid(x_range: (f64, f64), z_range: (f64, f64)) -> Self {
        Terrain {
            kind: TerrainKind::Grid,
            x_range,
            z_range,
            spacing: 50.0,
            cross_spacing: 50.0,
            color: PaletteSlot::Grid,
        }
    }

    pub fn centroid(&self) -> WorldPoint {
        WorldPoint::new(
            (self.x_range.0 + self.x_range.1) / 2.0,
            0.0,
            (self.z_range.0 + self.z_range.1) / 2.0,
        )
    }

    /// Wave height of the line at `z`
    pub fn wave(time: f64, storminess: f64, z: f64) -> f64 {
        (time * 1.5 * storminess + z * 0.08).sin() * 1.5 * storminess
    }

    /// Lines for clock time `time`; only water depends on it
    pub fn segments(&self, time: f64, storminess: f64) -> Vec<Segment> {
        let (x0, x1) = self.x_range;
        let (z0, z1) = self.z_range;
        let mut out = Vec::new();
        for x in steps(x0, x1, self.spacing) {
            out.push(Segment::new(
                WorldPoint::new(x, 0.0, z0),
                WorldPoint::new(x, 0.0, z1),
                RenderHint::Floor,
            ));
        }
        for z in steps(z0, z1, self.cross_spacing) {
            let (y, hint) = match self.kind {
                TerrainKind::Water => (Self::wave(time, storminess, z), RenderHint::Ring),
                TerrainKind::Grid => (0.0, RenderHint::Floor),
            };
            out.push(Segment::new(
                WorldPoint::new(x0, y, z),
                WorldPoint::new(x1, y, z),
                hint,
            ));
        }
        out
    }
}

/// `start, start + step, ...` up to and including `end`
fn steps(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
    let count = if step > 0.0 && end >= start {
        ((end - start) / step + 1e-9).floor() as usize + 1
    } else {
        0
    };
    (0..count).map(move |i| start + i as f64 * step)
}

/// Small vessel drifting along the water
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boat {
    pub x: f64,
    pub z: f64,
    /// Half-width of the side to side drift
    pub drift: f64,
}

impl Boat {
    pub const fn new(x: f64, z: f64) -> Self {
        Boat { x, z, drift: 12.0 }
    }

    pub const fn with_drift(mut self, drift: f64) -> Self {
        self.drift = drift;
        self
    }

    /// Hull outline (four edges) and a cabin mast at clock `time`; `index`
    /// keeps neighbours out of phase
    pub fn segments(&self, time: f64, index: usize) -> [Segment; 5] {
        let i = index as f64;
        let x = self.x + (time * 0.25 + i).sin() * self.drift;
        let bob = (time * 1.4 + i * 2.0).sin() * 0.8;
        let p = |dx: f64, dy: f64| WorldPoint::new(x + dx, bob + dy, self.z);
        let (h1, h2, h3, h4) = (p(-10.0, 0.0), p(10.0, 0.0), p(8.0, 3.0), p(-8.0, 3.0));
        [
            Segment::new(h1, h2, RenderHint::Edge),
            Segment::new(h1, h4, RenderHint::Edge),
            Segment::new(h2, h3, RenderHint::Edge),
            Segment::new(h3, h4, RenderHint::Edge),
            Segment::new(p(0.0, 0.0), p(0.0, 7.0), RenderHint::Mast),
        ]
    }
}

/// Static world data of one city
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub buildings: Vec<BuildingDescriptor>,
    pub terrain: Vec<Terrain>,
    /// Hidden during storms
    pub boats: Vec<Boat>,
}

impl Scene {
    /// Keeps valid descriptors and logs the ones that are dropped
    pub fn new(buildings: Vec<BuildingDescriptor>, terrain: Vec<Terrain>) -> Self {
        let buildings = buildings
            .into_iter()
            .filter(|b| match b.validate() {
                Ok(()) => true,
                Err(err) => {
                    warn!("dropping building descriptor: {err}");
                    false
                }
            })
            .collect();
        Scene {
            buildings,
            terrain,
            boats: Vec::new(),
        }
    }

    pub fn with_boats(mut self, boats: Vec<Boat>) -> Self {
        self.boats = boats;
        self
    }

    pub fn landmarks(&self) -> impl Iterator<Item = &BuildingDescriptor> {
        self.buildings.iter().filter(|b| b.landmark)
    }

    /// The first water patch, if the city has one
    pub fn water(&self) -> Option<&Terrain> {
        self.terrain.iter().find(|t| t.kind == TerrainKind::Water)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Drawable<'a> {
    Building(&'a BuildingDescriptor),
    Terrain(&'a Terrain),
}

/// A world object with its depth key for this frame
#[derive(Debug, Clone, Copy)]
pub struct DrawableObject<'a> {
    pub item: Drawable<'a>,
    /// Camera-space depth of the centroid; larger is farther
    pub depth: f64,
}

impl DrawableObject<'_> {
    pub fn color(&self) -> PaletteSlot {
        match self.item {
            Drawable::Building(b) => b.color,
            Drawable::Terrain(t) => t.color,
        }
    }

    pub fn segments(&self, time: f64, storminess: f64) -> Vec<Segment> {
        match self.item {
            Drawable::Building(b) => geometry::generate(b),
            Drawable::Terrain(t) => t.segments(time, storminess),
        }
    }
}

/// Gathers every visible object and orders it farthest first
pub fn assemble_frame<'a>(
    scene: &'a Scene,
    camera: &CameraState,
    show_landmarks: bool,
) -> Vec<DrawableObject<'a>> {
    let projector = Projector::new(camera, &Viewport::default());

    let terrain = scene.terrain.iter().map(|t| DrawableObject {
        item: Drawable::Terrain(t),
        depth: projector.depth(t.centroid()),
    });
    let buildings = scene
        .buildings
        .iter()
        .filter(|b| show_landmarks || !b.landmark)
        .map(|b| DrawableObject {
            item: Drawable::Building(b),
            depth: projector.depth(b.centroid()),
        });

    let mut objects: Vec<DrawableObject<'a>> = terrain.chain(buildings).collect();
    objects.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    objects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::BuildingInfo;

    fn tower(x: f64, z: f64) -> BuildingDescriptor {
        BuildingDescriptor::square(x, z, 20.0, 100.0, PaletteSlot::Primary)
    }

    fn depths(objects: &[DrawableObject]) -> Vec<f64> {
        objects.iter().map(|o| o.depth).collect()
    }

    #[test]
    fn farther_objects_come_first() {
        let scene = Scene::new(
            vec![tower(0.0, -100.0), tower(0.0, 200.0), tower(0.0, 50.0)],
            Vec::new(),
        );
        let camera = CameraState::new(0.0, 0.0, 1.0);
        let objects = assemble_frame(&scene, &camera, true);
        let zs: Vec<f64> = objects
            .iter()
            .map(|o| match o.item {
                Drawable::Building(b) => b.z,
                Drawable::Terrain(_) => unreachable!(),
            })
            .collect();
        assert_eq!(zs, vec![200.0, 50.0, -100.0]);
    }

    #[test]
    fn order_follows_camera_rotation() {
        let scene = Scene::new(vec![tower(-200.0, 0.0), tower(200.0, 0.0)], Vec::new());
        for yaw in [-1.2, -0.4, 0.3, 1.1, 2.5] {
            let objects = assemble_frame(&scene, &CameraState::new(yaw, 0.2, 1.0), true);
            let d = depths(&objects);
            assert!(d.windows(2).all(|w| w[0] >= w[1]), "yaw {yaw}: {d:?}");
        }
    }

    #[test]
    fn terrain_takes_part_in_the_sort() {
        let scene = Scene::new(
            vec![tower(0.0, 100.0)],
            vec![
                Terrain::water((-100.0, 100.0), (-220.0, -50.0)),
                Terrain::grid((-100.0, 100.0), (-50.0, 180.0)),
            ],
        );
        let objects = assemble_frame(&scene, &CameraState::new(0.0, 0.0, 1.0), true);
        assert_eq!(objects.len(), 3);
        assert!(matches!(objects.last().map(|o| o.item), Some(Drawable::Terrain(t)) if t.kind == TerrainKind::Water));
    }

    #[test]
    fn landmark_toggle_hides_landmarks() {
        let landmark = tower(10.0, 10.0)
            .info(BuildingInfo::new("SPIRE", "1,000 ft", 1999))
            .as_landmark();
        let scene = Scene::new(vec![tower(0.0, 0.0), landmark], Vec::new());
        let camera = CameraState::default();
        assert_eq!(assemble_frame(&scene, &camera, true).len(), 2);
        assert_eq!(assemble_frame(&scene, &camera, false).len(), 1);
        assert_eq!(scene.landmarks().count(), 1);
    }

    #[test]
    fn invalid_descriptors_are_dropped() {
        let flat = BuildingDescriptor::square(0.0, 0.0, 20.0, 0.0, PaletteSlot::Primary);
        let scene = Scene::new(vec![flat, tower(5.0, 5.0)], Vec::new());
        assert_eq!(scene.buildings.len(), 1);
    }

    #[test]
    fn degenerate_objects_yield_no_segments() {
        let flat = BuildingDescriptor::square(0.0, 0.0, 20.0, 0.0, PaletteSlot::Primary);
        let object = DrawableObject {
            item: Drawable::Building(&flat),
            depth: 0.0,
        };
        assert!(object.segments(0.0, 1.0).is_empty());
    }

    #[test]
    fn water_lines_move_with_the_clock() {
        let water = Terrain::water((-550.0, 500.0), (-220.0, -50.0));
        let still = water.segments(0.0, 1.0);
        let later = water.segments(1.0, 1.0);
        // 27 lines along z, 9 wave lines along x
        assert_eq!(still.len(), 27 + 9);
        assert_ne!(still, later);
        let grid = Terrain::grid((-550.0, 500.0), (-50.0, 180.0));
        assert_eq!(grid.segments(0.0, 1.0), grid.segments(3.0, 2.0));
        assert_eq!(grid.segments(0.0, 1.0).len(), 22 + 5);
    }

    #[test]
    fn steps_include_the_end() {
        let values: Vec<f64> = steps(-50.0, 180.0, 50.0).collect();
        assert_eq!(values, vec![-50.0, 0.0, 50.0, 100.0, 150.0]);
        assert_eq!(steps(0.0, 10.0, 0.0).count(), 0);
    }

    #[test]
    fn boats_drift_and_bob_around_their_mooring() {
        let boat = Boat::new(-150.0, -190.0);
        for step in 0..50 {
            let time = step as f64 * 0.37;
            let hull = boat.segments(time, 1);
            let centre = (hull[0].start.x + hull[0].end.x) / 2.0;
            assert!((centre - boat.x).abs() <= boat.drift + 1e-9);
            assert!(hull[0].start.y.abs() <= 0.8 + 1e-9);
            assert!(hull.iter().all(|s| s.start.z == boat.z && s.end.z == boat.z));
            assert!((hull[4].end.y - hull[4].start.y - 7.0).abs() < 1e-9);
        }
        assert_ne!(boat.segments(1.0, 0), boat.segments(1.0, 1));
    }

    #[test]
    fn water_is_found_among_the_terrain() {
        let dry = Scene::new(Vec::new(), vec![Terrain::grid((-10.0, 10.0), (0.0, 10.0))]);
        assert!(dry.water().is_none());
        let wet = Scene::new(
            Vec::new(),
            vec![
                Terrain::grid((-10.0, 10.0), (0.0, 10.0)),
                Terrain::water((-10.0, 10.0), (-20.0, 0.0)),
            ],
        )
        .with_boats(vec![Boat::new(0.0, -10.0)]);
        assert_eq!(wet.water().map(|t| t.kind), Some(TerrainKind::Water));
        assert_eq!(wet.boats.len(), 1);
    }
}
