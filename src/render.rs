//! Frame builder: sorted world objects plus weather state in, paint-ordered
//! primitives out.
//!
//! Paint order: sky, stars, celestial body, clouds, world objects farthest
//! first, water reflections, boats, torch flames, labels, fog, rain, snow,
//! lightning, wind dial.

use std::f64::consts::PI;

use crate::geometry::{generate, Archetype, RenderHint, Segment};
use crate::palette::{palette_for, Palette, PaletteSlot, Rgb};
use crate::primitive::{Primitive, Stroke, BAND_FEATHER};
use crate::projection::Projector;
use crate::scene::{Drawable, DrawableObject, Scene, TerrainKind};
use crate::state::SceneState;
use crate::vertex::{Point2, WorldPoint};
use crate::weather::{fog_bands, DayPhase, WeatherMode};

const STAR_COUNT: usize = 90;
const RIPPLE_COUNT: usize = 20;
const REFLECTION_COLUMNS: usize = 45;
const REFLECTION_ROWS: usize = 6;
const REFLECTION_COLORS: [PaletteSlot; 8] = [
    PaletteSlot::Pink,
    PaletteSlot::Accent,
    PaletteSlot::Secondary,
    PaletteSlot::Primary,
    PaletteSlot::Highlight,
    PaletteSlot::Orange,
    PaletteSlot::Purple,
    PaletteSlot::Copper,
];
/// Centre of the wind dial, in viewport units
const WIND_DIAL: Point2 = Point2::new(44.0, 68.0);
const WIND_DIAL_RADIUS: f64 = 19.0;
/// Labels closer than this depth would sit on top of the viewer
const LABEL_NEAR_DEPTH: f64 = -320.0;
const LABEL_LIFT: f64 = 18.0;

const CLOUD: Rgb = Rgb::hex(0x7788AA);
const STORM_CLOUD: Rgb = Rgb::hex(0x222230);
const FOG: Rgb = Rgb::hex(0x8899AA);

/// Counters for the debug overlay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub objects: usize,
    pub segments: usize,
    pub labels: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub primitives: Vec<Primitive>,
    pub stats: FrameStats,
}

/// Base width and opacity for a segment hint
pub fn hint_stroke(hint: RenderHint) -> (f64, f64) {
    match hint {
        RenderHint::Edge => (1.2, 0.9),
        RenderHint::Floor => (0.25, 0.18),
        RenderHint::Brace => (0.5, 0.45),
        RenderHint::Ring => (0.8, 0.6),
        RenderHint::Rib => (0.6, 0.55),
        RenderHint::Cable => (1.0, 0.75),
        RenderHint::Suspender => (0.4, 0.4),
        RenderHint::Mast => (1.0, 0.85),
        RenderHint::Accent => (1.5, 0.95),
    }
}

fn night_glow(hint: RenderHint) -> f64 {
    match hint {
        RenderHint::Floor | RenderHint::Brace | RenderHint::Suspender => 0.0,
        RenderHint::Edge => 3.0,
        RenderHint::Accent => 5.0,
        _ => 2.0,
    }
}

/// Distant objects fade, but never below half strength
fn depth_fade(depth: f64) -> f64 {
    (1.0 - depth.max(0.0) / 1200.0).clamp(0.5, 1.0)
}

/// Per-frame values shared by every painter below
struct Ambient {
    palette: Palette,
    mode: WeatherMode,
    time: f64,
    time_of_day: f64,
    wind: f64,
    night: bool,
    flashing: bool,
}

impl Ambient {
    fn of(state: &SceneState) -> Self {
        let mode = state.weather.mode();
        let time_of_day = state.weather.time_of_day();
        Ambient {
            palette: palette_for(time_of_day, mode),
            mode,
            time: state.clock.time(),
            time_of_day,
            wind: state.weather.wind_speed(),
            night: state.weather.phase() == DayPhase::Night,
            flashing: state.weather.lightning.is_flashing(),
        }
    }

    fn fog_factor(&self) -> f64 {
        if self.mode == WeatherMode::Fog {
            0.5
        } else {
            1.0
        }
    }
}

/// Builds every primitive of the current frame
pub fn build_frame(state: &SceneState) -> Frame {
    let ambient = Ambient::of(state);
    let projector = Projector::new(&state.camera, &state.viewport);
    let objects = state.drawables();
    let mut frame = Frame::default();
    let out = &mut frame.primitives;

    out.push(Primitive::SkyGradient(if ambient.flashing {
        ambient.palette.lightning_sky()
    } else {
        ambient.palette.sky
    }));
    push_stars(out, &ambient, state.viewport.width);
    push_celestial(out, &ambient);
    push_clouds(out, &ambient, state);

    frame.stats.objects = objects.len();
    for object in &objects {
        frame.stats.segments += push_object(out, &ambient, &projector, object);
    }
    push_reflections(out, &ambient, &projector, &state.scene);
    if ambient.mode != WeatherMode::Storm {
        push_boats(out, &ambient, &projector, &state.scene);
    }
    push_torches(out, &ambient, &projector, &objects);

    if state.display.labels && ambient.mode != WeatherMode::Storm {
        frame.stats.labels = push_labels(out, &ambient, &projector, &objects);
    }

    if ambient.mode == WeatherMode::Fog {
        for band in fog_bands(ambient.time) {
            out.push(Primitive::Band {
                x_offset: band.x_offset,
                y: band.y,
                height: band.height,
                color: FOG,
                opacity: band.opacity,
            });
        }
    }
    if ambient.mode.has_rain() {
        push_rain(out, &ambient, state);
    }
    if ambient.mode == WeatherMode::Snow {
        push_snow(out, state);
    }
    if ambient.flashing {
        push_lightning(out, state);
    }
    push_wind_dial(out, &ambient);

    frame
}

fn push_stars(out: &mut Vec<Primitive>, ambient: &Ambient, width: f64) {
    if !ambient.night || ambient.mode != WeatherMode::Clear {
        return;
    }
    for i in 0..STAR_COUNT {
        let i = i as f64;
        out.push(Primitive::Circle {
            center: Point2::new(
                ((i * 127.1).sin() * 0.5 + 0.5) * width,
                ((i * 311.7).cos() * 0.5 + 0.5) * 140.0,
            ),
            radius: 0.4 + ((i * 17.3).sin() * 0.5 + 0.5) * 0.45,
            outline: None,
            color: Rgb::WHITE,
            opacity: 0.12 + (ambient.time * 1.4 + i).sin() * 0.1,
        });
    }
}

fn push_celestial(out: &mut Vec<Primitive>, ambient: &Ambient) {
    if matches!(ambient.mode, WeatherMode::Storm | WeatherMode::Fog) {
        return;
    }
    let t = ambient.time_of_day;
    let accent = ambient.palette.accent;
    if t > 0.7 {
        let moon = Point2::new(820.0, 55.0);
        out.push(Primitive::Circle {
            center: moon,
            radius: 18.0,
            outline: Some(Stroke::new(accent, 0.8, 0.45)),
            color: accent,
            opacity: 0.45,
        });
        out.push(Primitive::Circle {
            center: moon,
            radius: 15.0,
            outline: None,
            color: accent,
            opacity: 0.08,
        });
    } else if t < 0.3 || t > 0.6 {
        let y = if t < 0.3 {
            85.0 - t * 170.0
        } else {
            85.0 - (1.0 - t) * 130.0
        };
        let sun = Point2::new(840.0, y);
        out.push(Primitive::Circle {
            center: sun,
            radius: 25.0,
            outline: None,
            color: ambient.palette.orange,
            opacity: 0.28,
        });
        out.push(Primitive::Circle {
            center: sun,
            radius: 16.0,
            outline: None,
            color: accent,
            opacity: 0.45,
        });
    }
}

fn push_clouds(out: &mut Vec<Primitive>, ambient: &Ambient, state: &SceneState) {
    let t = ambient.time_of_day;
    if ambient.mode == WeatherMode::Clear && t > 0.3 && t < 0.7 {
        return;
    }
    let (color, opacity) = match ambient.mode {
        WeatherMode::Storm => (STORM_CLOUD, 0.65),
        WeatherMode::Fog => (CLOUD, 0.45),
        _ => (CLOUD, 0.35),
    };
    for cloud in &state.particles.clouds {
        let (w, h) = (cloud.width, cloud.height);
        for (dx, dy, rx, ry) in [
            (0.0, 0.0, w * 0.5, h * 0.5),
            (-w * 0.25, h * 0.15, w * 0.3, h * 0.35),
            (w * 0.25, h * 0.1, w * 0.32, h * 0.38),
        ] {
            out.push(Primitive::Ellipse {
                center: Point2::new(cloud.x + dx, cloud.y + dy),
                radius_x: rx,
                radius_y: ry,
                color,
                opacity,
            });
        }
    }
}

/// Projects one object's segments; returns how many were drawn
fn push_object(
    out: &mut Vec<Primitive>,
    ambient: &Ambient,
    projector: &Projector,
    object: &DrawableObject,
) -> usize {
    let storminess = ambient.mode.storminess();
    let segments = object.segments(ambient.time, storminess);
    let color = ambient.palette.get(object.color());
    let fade = ambient.fog_factor() * depth_fade(object.depth);
    let glow = ambient.night && !ambient.flashing;

    for segment in &segments {
        let stroke = match object.item {
            Drawable::Terrain(terrain) => terrain_stroke(terrain.kind, segment, color, ambient),
            Drawable::Building(_) => {
                let (width, opacity) = hint_stroke(segment.hint);
                let stroke = Stroke::new(color, width, opacity);
                if glow {
                    stroke.glow(night_glow(segment.hint))
                } else {
                    stroke
                }
            }
        };
        out.push(Primitive::Line {
            from: projector.project(segment.start).position(),
            to: projector.project(segment.end).position(),
            stroke: stroke.fade(fade),
        });
    }
    segments.len()
}

fn terrain_stroke(kind: TerrainKind, segment: &Segment, color: Rgb, ambient: &Ambient) -> Stroke {
    match (kind, segment.hint) {
        (TerrainKind::Water, RenderHint::Ring) => {
            let s = ambient.mode.storminess();
            // Waves nearer the shore read brighter
            let opacity = 0.12 + (segment.start.z + 220.0).max(0.0) / 600.0;
            Stroke::new(color, 0.5 * s, opacity)
        }
        (TerrainKind::Water, _) => Stroke::new(color, 0.35, 0.22),
        (TerrainKind::Grid, _) => {
            let opacity = if ambient.mode == WeatherMode::Fog { 0.12 } else { 0.3 };
            Stroke::new(color, 0.45, opacity)
        }
    }
}

/// Flickering city lights on the water, clear nights only
fn push_reflections(
    out: &mut Vec<Primitive>,
    ambient: &Ambient,
    projector: &Projector,
    scene: &Scene,
) {
    if !ambient.night || ambient.mode != WeatherMode::Clear {
        return;
    }
    let Some(water) = scene.water() else {
        return;
    };
    let t = ambient.time;
    let (x0, x1) = water.x_range;
    let (z0, z1) = water.z_range;
    for i in 0..REFLECTION_COLUMNS {
        let f = i as f64;
        let x = x0 + 30.0 + f * 23.0;
        if x > x1 {
            break;
        }
        let flicker = 0.2 + (t * 2.2 + f * 0.5).sin() * 0.15;
        let color = ambient.palette.get(REFLECTION_COLORS[i % REFLECTION_COLORS.len()]);
        for j in 0..REFLECTION_ROWS {
            let g = j as f64;
            let z = z0 + 20.0 + g * 25.0;
            if z > z1 {
                break;
            }
            let wave = (t * 1.6 + f * 0.35 + g * 0.2).sin() * 2.5;
            let sway = (t * 0.7 + f).sin() * 3.0;
            let p = projector.project(WorldPoint::new(x + sway, wave - 2.0, z));
            out.push(Primitive::Ellipse {
                center: p.position(),
                radius_x: 5.0 + g * 0.8,
                radius_y: 1.2,
                color,
                opacity: flicker * (1.0 - g * 0.12),
            });
        }
    }
}

/// Boat hulls and cabin masts
fn push_boats(out: &mut Vec<Primitive>, ambient: &Ambient, projector: &Projector, scene: &Scene) {
    let fade = ambient.fog_factor();
    let hull = Stroke::new(ambient.palette.get(PaletteSlot::Highlight), 0.8, 0.6).fade(fade);
    let cabin = Stroke::new(ambient.palette.accent, 0.6, 0.5).fade(fade);
    for (i, boat) in scene.boats.iter().enumerate() {
        for segment in boat.segments(ambient.time, i) {
            out.push(Primitive::Line {
                from: projector.project(segment.start).position(),
                to: projector.project(segment.end).position(),
                stroke: if segment.hint == RenderHint::Mast { cabin } else { hull },
            });
        }
    }
}

fn push_torches(
    out: &mut Vec<Primitive>,
    ambient: &Ambient,
    projector: &Projector,
    objects: &[DrawableObject],
) {
    for object in objects {
        let Drawable::Building(building) = object.item else {
            continue;
        };
        let Archetype::Statue(statue) = &building.archetype else {
            continue;
        };
        if let Some(torch) = statue.torch_point(building) {
            let p = projector.project(torch);
            out.push(Primitive::Circle {
                center: Point2::new(p.x, p.y - 4.0),
                radius: 2.0 + (ambient.time * 5.0).sin() * 0.5,
                outline: None,
                color: ambient.palette.accent,
                opacity: 0.85,
            });
        }
    }
}

fn push_labels(
    out: &mut Vec<Primitive>,
    ambient: &Ambient,
    projector: &Projector,
    objects: &[DrawableObject],
) -> usize {
    let opacity = if ambient.mode == WeatherMode::Fog { 0.45 } else { 0.95 };
    let mut count = 0;
    for object in objects {
        let Drawable::Building(building) = object.item else {
            continue;
        };
        let Some(name) = building.name() else {
            continue;
        };
        let top = generate(building)
            .iter()
            .flat_map(|s| [s.start.y, s.end.y])
            .fold(building.height, f64::max);
        let mut anchor = building.centroid();
        anchor.y = top + LABEL_LIFT;
        let p = projector.project(anchor);
        if p.depth < LABEL_NEAR_DEPTH {
            continue;
        }
        out.push(Primitive::Label {
            at: p.position(),
            text: name.to_string(),
            color: ambient.palette.get(building.color),
            opacity,
        });
        count += 1;
    }
    count
}

fn push_rain(out: &mut Vec<Primitive>, ambient: &Ambient, state: &SceneState) {
    let storm = ambient.mode == WeatherMode::Storm;
    let intensity = if storm { 1.5 } else { 1.0 };
    let stroke = Stroke::new(ambient.palette.primary, 0.7 * intensity, 0.35 * intensity);
    for drop in &state.particles.rain {
        let from = drop.position;
        out.push(Primitive::Line {
            from,
            to: Point2::new(from.x + ambient.wind * drop.length, from.y + drop.length),
            stroke,
        });
    }

    if storm {
        let t = ambient.time;
        let water = ambient.palette.get(PaletteSlot::Water);
        for i in 0..RIPPLE_COUNT {
            let i = i as f64;
            let radius = ((5.0 * t + i).sin() + 1.0) * 3.5;
            // Ripples fade as they spread
            let opacity = 0.25 - radius * 0.02;
            out.push(Primitive::Circle {
                center: Point2::new(
                    100.0 + (40.0 * i + 30.0 * t).rem_euclid(700.0),
                    440.0 + (2.0 * i).sin() * 25.0,
                ),
                radius,
                outline: Some(Stroke::new(water, 0.4, opacity)),
                color: water,
                opacity,
            });
        }
    }
}

fn push_snow(out: &mut Vec<Primitive>, state: &SceneState) {
    let cross = Stroke::new(Rgb::WHITE, 0.5, 0.4);
    for flake in &state.particles.snow {
        let c = flake.position;
        out.push(Primitive::Circle {
            center: c,
            radius: flake.size,
            outline: None,
            color: Rgb::WHITE,
            opacity: 0.65,
        });
        if flake.size > 2.0 {
            let arm = flake.size * 1.5;
            for angle in [0.0, PI / 2.0] {
                let (dx, dy) = (angle.cos() * arm, angle.sin() * arm);
                out.push(Primitive::Line {
                    from: Point2::new(c.x - dx, c.y - dy),
                    to: Point2::new(c.x + dx, c.y + dy),
                    stroke: cross,
                });
            }
        }
    }
    out.push(Primitive::Band {
        x_offset: -BAND_FEATHER,
        y: 475.0,
        height: 45.0,
        color: Rgb::WHITE,
        opacity: 0.08,
    });
}

fn push_lightning(out: &mut Vec<Primitive>, state: &SceneState) {
    let bolt = state.weather.lightning.bolt();
    if bolt.len() > 1 {
        out.push(Primitive::Polyline {
            points: bolt.to_vec(),
            stroke: Stroke::new(Rgb::WHITE, 2.5, 0.95).glow(8.0),
        });
    }
    out.push(Primitive::Flash {
        color: Rgb::WHITE,
        opacity: 0.25,
    });
}

/// Arrow from just behind the dial centre out to `14 + 24 * wind`, with a
/// two-barb head: tail, tip, barb, tip, barb
fn wind_arrow(wind: f64) -> [Point2; 5] {
    let angle = PI * 0.18;
    let (sin, cos) = angle.sin_cos();
    let length = 14.0 + wind * 24.0;
    let at = |r: f64, a: f64| Point2::new(WIND_DIAL.x + a.cos() * r, WIND_DIAL.y + a.sin() * r);
    let tip = at(length, angle);
    let barb = |turn: f64| {
        let back = angle + PI + turn;
        Point2::new(tip.x + back.cos() * 4.0, tip.y + back.sin() * 4.0)
    };
    [
        Point2::new(WIND_DIAL.x - cos * 3.0, WIND_DIAL.y - sin * 3.0),
        tip,
        barb(0.5),
        tip,
        barb(-0.5),
    ]
}

fn push_wind_dial(out: &mut Vec<Primitive>, ambient: &Ambient) {
    let primary = ambient.palette.primary;
    let accent = ambient.palette.accent;
    out.push(Primitive::Ellipse {
        center: WIND_DIAL,
        radius_x: WIND_DIAL_RADIUS,
        radius_y: WIND_DIAL_RADIUS,
        color: Rgb::BLACK,
        opacity: 0.28,
    });
    out.push(Primitive::Circle {
        center: WIND_DIAL,
        radius: WIND_DIAL_RADIUS,
        outline: Some(Stroke::new(primary, 0.6, 0.8)),
        color: primary,
        opacity: 0.8,
    });
    out.push(Primitive::Label {
        at: Point2::new(WIND_DIAL.x, WIND_DIAL.y - 24.0),
        text: "WIND".to_string(),
        color: primary,
        opacity: 0.9,
    });
    out.push(Primitive::Polyline {
        points: wind_arrow(ambient.wind).to_vec(),
        stroke: Stroke::new(accent, 1.4, 0.9),
    });
    out.push(Primitive::Label {
        at: Point2::new(WIND_DIAL.x, WIND_DIAL.y + 32.0),
        text: format!("{} km/h", (ambient.wind * 30.0).round()),
        color: accent,
        opacity: 0.9,
    });
}
