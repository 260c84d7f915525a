//! Built-in scenes. Plain data: the core never depends on this module.

use std::fmt;

use clap::ValueEnum;

use crate::camera::{CameraLimits, CameraState};
use crate::descriptor::{BuildingDescriptor, BuildingInfo};
use crate::geometry::{
    Archetype, DomedHall, LatticeTower, ObservationDeck, SetbackSection, SetbackTower, ShellGroup,
    Statue, SuspensionBridge, TaperedTower, TwistedTower,
};
use crate::palette::PaletteSlot::{self, *};
use crate::scene::{Boat, Scene, Terrain};
use crate::weather::ParticleCounts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum City {
    #[default]
    #[value(alias = "nyc")]
    NewYork,
    Moscow,
    Tokyo,
    Sydney,
    #[value(alias = "philly")]
    Philadelphia,
    #[value(alias = "hk")]
    HongKong,
    Chicago,
}

impl City {
    pub const ALL: [City; 7] = [
        City::NewYork,
        City::Moscow,
        City::Tokyo,
        City::Sydney,
        City::Philadelphia,
        City::HongKong,
        City::Chicago,
    ];

    pub fn title(self) -> &'static str {
        match self {
            City::NewYork => "NEW YORK CITY",
            City::Moscow => "MOSCOW",
            City::Tokyo => "TOKYO",
            City::Sydney => "SYDNEY",
            City::Philadelphia => "PHILADELPHIA",
            City::HongKong => "HONG KONG",
            City::Chicago => "CHICAGO",
        }
    }

    pub fn settings(self) -> CitySettings {
        match self {
            City::NewYork => new_york(),
            City::Moscow => moscow(),
            City::Tokyo => tokyo(),
            City::Sydney => sydney(),
            City::Philadelphia => philadelphia(),
            City::HongKong => hong_kong(),
            City::Chicago => chicago(),
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Camera jump bound to a number key
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraPreset {
    /// Replaces the whole camera
    View(CameraState),
    /// Keeps yaw and pan, changes only pitch and zoom
    Tilt { pitch: f64, zoom: f64 },
}

impl CameraPreset {
    /// Camera after applying the preset to `current`
    pub fn resolve(&self, current: CameraState) -> CameraState {
        match *self {
            CameraPreset::View(camera) => camera,
            CameraPreset::Tilt { pitch, zoom } => CameraState {
                pitch,
                zoom,
                ..current
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamedPreset {
    pub name: &'static str,
    pub preset: CameraPreset,
}

const fn view(name: &'static str, yaw: f64, pitch: f64, zoom: f64, pan: [f64; 2]) -> NamedPreset {
    NamedPreset {
        name,
        preset: CameraPreset::View(CameraState::new(yaw, pitch, zoom).with_pan(pan[0], pan[1])),
    }
}

const fn tilt(name: &'static str, pitch: f64, zoom: f64) -> NamedPreset {
    NamedPreset {
        name,
        preset: CameraPreset::Tilt { pitch, zoom },
    }
}

/// Everything a city contributes to a session
#[derive(Debug, Clone)]
pub struct CitySettings {
    pub title: &'static str,
    pub scene: Scene,
    pub home: CameraState,
    pub limits: CameraLimits,
    /// Bound to keys `1`.. in order; the first one is the home view
    pub presets: Vec<NamedPreset>,
    pub particles: ParticleCounts,
    pub time_of_day: f64,
    pub wind_speed: f64,
}

fn limits(auto_rotate_step: f64) -> CameraLimits {
    CameraLimits {
        auto_rotate_step,
        ..CameraLimits::default()
    }
}

/// Unnamed filler towers: (x, z, side, height, colour)
fn filler(rows: &[(f64, f64, f64, f64, PaletteSlot)]) -> impl Iterator<Item = BuildingDescriptor> + '_ {
    rows.iter()
        .map(|&(x, z, side, h, color)| BuildingDescriptor::square(x, z, side, h, color))
}

fn named(
    x: f64,
    z: f64,
    side: f64,
    h: f64,
    color: PaletteSlot,
    info: BuildingInfo,
) -> BuildingDescriptor {
    BuildingDescriptor::square(x, z, side, h, color).info(info)
}

fn stepped(sections: &[(f64, f64)], mast_height: f64, mast_rings: u32) -> Archetype {
    Archetype::Setback(SetbackTower {
        sections: sections
            .iter()
            .map(|&(top, scale)| SetbackSection::new(top, scale))
            .collect(),
        crown_tiers: 0,
        mast_height,
        mast_rings,
        ring_radius: if mast_rings > 0 { 4.0 } else { 0.0 },
    })
}

fn tapered(sides: u32, top_scale: f64, spire_rise: f64) -> Archetype {
    Archetype::Tapered(TaperedTower {
        sides,
        top_scale,
        spire_rise,
        ..TaperedTower::default()
    })
}

fn new_york() -> CitySettings {
    let mut buildings = vec![
        named(-350.0, 55.0, 50.0, 330.0, Primary,
            BuildingInfo::new("ONE WTC", "1,776 ft", 2014).floors(104).note("Tallest in Western Hemisphere"))
            .archetype(tapered(4, 0.55, 0.12)),
        named(-310.0, 75.0, 38.0, 200.0, Highlight,
            BuildingInfo::new("3 WTC", "1,079 ft", 2018).floors(80)),
        named(-200.0, 45.0, 28.0, 150.0, Accent,
            BuildingInfo::new("WOOLWORTH", "792 ft", 1913).floors(57).note("Gothic cathedral of commerce"))
            .archetype(Archetype::Spired { spire_height: 30.0 }),
        named(-25.0, 50.0, 35.0, 190.0, Pink,
            BuildingInfo::new("30 HUDSON", "1,268 ft", 2019).floors(73).note("Hudson Yards observation deck")),
        named(140.0, 55.0, 38.0, 260.0, Highlight,
            BuildingInfo::new("ONE VANDERBILT", "1,401 ft", 2020).floors(93).note("Newest supertall"))
            .archetype(Archetype::Spired { spire_height: 45.0 }),
        named(180.0, 65.0, 36.0, 230.0, Copper,
            BuildingInfo::new("CHRYSLER", "1,046 ft", 1930).floors(77).note("Art Deco masterpiece"))
            .archetype(Archetype::Setback(SetbackTower::art_deco())),
        named(230.0, 50.0, 48.0, 290.0, Accent,
            BuildingInfo::new("EMPIRE STATE", "1,454 ft", 1931).floors(102).note("NYC icon since 1931"))
            .archetype(Archetype::Setback(SetbackTower::empire_state())),
        named(340.0, 60.0, 24.0, 270.0, Primary,
            BuildingInfo::new("432 PARK", "1,396 ft", 2015).floors(85).note("Pencil tower"))
            .floor_spacing(8.0),
        named(375.0, 50.0, 18.0, 260.0, Highlight,
            BuildingInfo::new("STEINWAY", "1,428 ft", 2021).floors(84).note("Most slender skyscraper"))
            .floor_spacing(8.0),
        named(405.0, 65.0, 30.0, 280.0, Secondary,
            BuildingInfo::new("CENTRAL PARK TWR", "1,550 ft", 2021).floors(98).note("Tallest residential"))
            .archetype(Archetype::Spired { spire_height: 20.0 }),
        BuildingDescriptor::square(-520.0, -160.0, 20.0, 92.0, Teal)
            .archetype(Archetype::Statue(Statue::default()))
            .info(BuildingInfo::new("STATUE OF LIBERTY", "305 ft", 1886).note("Torch lit at night"))
            .as_landmark(),
        BuildingDescriptor::new(-410.0, -95.0, 120.0, 12.0, 70.0, Steel)
            .archetype(Archetype::SuspensionBridge(SuspensionBridge::default()))
            .info(BuildingInfo::new("BROOKLYN BRIDGE", "276 ft", 1883))
            .as_landmark(),
    ];
    buildings.extend(filler(&[
        (-420.0, 60.0, 25.0, 70.0, Purple),
        (-390.0, 45.0, 28.0, 85.0, Secondary),
        (-275.0, 50.0, 34.0, 175.0, Purple),
        (-240.0, 70.0, 30.0, 140.0, Secondary),
        (-160.0, 65.0, 24.0, 95.0, Purple),
        (-130.0, 50.0, 26.0, 110.0, Highlight),
        (-100.0, 70.0, 22.0, 85.0, Secondary),
        (-60.0, 55.0, 28.0, 130.0, Orange),
        (10.0, 70.0, 32.0, 170.0, Secondary),
        (40.0, 55.0, 30.0, 145.0, Purple),
        (75.0, 60.0, 28.0, 160.0, Pink),
        (105.0, 45.0, 32.0, 180.0, Accent),
        (275.0, 70.0, 26.0, 140.0, Purple),
        (305.0, 55.0, 30.0, 155.0, Secondary),
        (440.0, 55.0, 26.0, 150.0, Purple),
        (470.0, 70.0, 24.0, 120.0, Orange),
        (-380.0, 140.0, 22.0, 55.0, Purple),
        (-320.0, 150.0, 24.0, 65.0, Secondary),
        (-250.0, 145.0, 20.0, 50.0, Primary),
        (-180.0, 155.0, 22.0, 60.0, Highlight),
        (-100.0, 145.0, 24.0, 70.0, Accent),
        (-30.0, 150.0, 20.0, 55.0, Purple),
        (50.0, 155.0, 22.0, 65.0, Secondary),
        (130.0, 145.0, 24.0, 75.0, Primary),
        (210.0, 150.0, 20.0, 50.0, Highlight),
        (290.0, 155.0, 22.0, 60.0, Accent),
        (370.0, 145.0, 24.0, 70.0, Purple),
        (440.0, 150.0, 20.0, 55.0, Secondary),
    ]));

    CitySettings {
        title: City::NewYork.title(),
        scene: Scene::new(
            buildings,
            vec![
                Terrain::water((-550.0, 500.0), (-220.0, -50.0)),
                Terrain::grid((-550.0, 500.0), (-50.0, 180.0)),
            ],
        )
        .with_boats(vec![
            Boat::new(-400.0, -170.0),
            Boat::new(-150.0, -190.0),
            Boat::new(100.0, -160.0),
            Boat::new(300.0, -180.0),
        ]),
        home: CameraState::new(0.1, 0.2, 1.0),
        limits: limits(0.0018),
        presets: vec![
            view("SKYLINE", 0.1, 0.2, 1.0, [0.0, 0.0]),
            tilt("AERIAL", 0.8, 0.55),
            tilt("STREET", 0.06, 1.5),
            view("LIBERTY", -0.6, 0.18, 1.2, [-120.0, 0.0]),
            view("MIDTOWN", 0.5, 0.22, 1.1, [80.0, 0.0]),
        ],
        particles: ParticleCounts::default(),
        time_of_day: 0.82,
        wind_speed: 0.35,
    }
}

fn moscow() -> CitySettings {
    let mut buildings = vec![
        named(-420.0, 55.0, 55.0, 200.0, Ivory,
            BuildingInfo::new("HOTEL UKRAINA", "650 ft", 1957).floors(34).note("Seven Sisters"))
            .archetype(stepped(&[(0.5, 1.0), (0.7, 0.7), (0.85, 0.45), (1.0, 0.25)], 50.0, 3)),
        named(-280.0, 60.0, 44.0, 380.0, Steel,
            BuildingInfo::new("FEDERATION E", "1,227 ft", 2017).floors(97).note("Tallest in Europe"))
            .archetype(Archetype::Tapered(TaperedTower {
                sides: 3,
                segments: 30,
                top_scale: 0.5,
                ring_every: 3,
                shaft_fraction: 0.95,
                spire_rise: 0.05,
            })),
        named(-230.0, 75.0, 40.0, 300.0, Steel,
            BuildingInfo::new("FEDERATION W", "794 ft", 2017).floors(63)),
        named(-175.0, 55.0, 38.0, 340.0, Primary,
            BuildingInfo::new("OKO SOUTH", "1,161 ft", 2015).floors(85))
            .archetype(Archetype::Spired { spire_height: 25.0 }),
        named(-130.0, 70.0, 34.0, 260.0, Primary,
            BuildingInfo::new("OKO NORTH", "803 ft", 2015).floors(49)),
        named(-75.0, 55.0, 42.0, 320.0, Copper,
            BuildingInfo::new("MERCURY CITY", "1,112 ft", 2013).floors(75).note("Golden facade"))
            .archetype(stepped(&[(0.6, 1.0), (0.8, 0.8), (1.0, 0.6)], 0.0, 0)),
        named(-15.0, 65.0, 40.0, 300.0, Primary,
            BuildingInfo::new("EVOLUTION", "807 ft", 2014).floors(55).note("DNA helix twist"))
            .archetype(Archetype::Twisted(TwistedTower::default())),
        named(45.0, 55.0, 36.0, 280.0, Highlight,
            BuildingInfo::new("CITY OF CAPITALS", "990 ft", 2010).floors(76)),
        named(140.0, 60.0, 38.0, 250.0, Purple,
            BuildingInfo::new("IMPERIA", "787 ft", 2011).floors(60)),
        named(195.0, 75.0, 34.0, 280.0, Orange,
            BuildingInfo::new("EURASIA", "1,013 ft", 2014).floors(72)),
    ];
    buildings.extend(filler(&[
        (90.0, 70.0, 32.0, 235.0, Highlight),
        (250.0, 60.0, 30.0, 240.0, Steel),
        (295.0, 70.0, 28.0, 210.0, Primary),
        (340.0, 55.0, 26.0, 180.0, Purple),
        (380.0, 65.0, 24.0, 160.0, Teal),
        (-380.0, 140.0, 20.0, 80.0, Purple),
        (-320.0, 150.0, 18.0, 70.0, Primary),
        (-260.0, 145.0, 22.0, 90.0, Steel),
        (-200.0, 155.0, 18.0, 75.0, Primary),
        (-140.0, 140.0, 20.0, 85.0, Orange),
        (-80.0, 150.0, 18.0, 70.0, Highlight),
        (-20.0, 145.0, 22.0, 95.0, Purple),
        (40.0, 155.0, 18.0, 65.0, Primary),
        (100.0, 140.0, 20.0, 80.0, Steel),
        (160.0, 150.0, 18.0, 70.0, Primary),
        (220.0, 145.0, 22.0, 85.0, Orange),
        (280.0, 155.0, 18.0, 60.0, Teal),
    ]));

    CitySettings {
        title: City::Moscow.title(),
        scene: Scene::new(
            buildings,
            vec![
                Terrain::water((-500.0, 480.0), (-200.0, -60.0)),
                Terrain::grid((-500.0, 480.0), (-40.0, 180.0)),
            ],
        )
        .with_boats(vec![
            Boat::new(-200.0, -130.0),
            Boat::new(100.0, -110.0),
            Boat::new(350.0, -125.0),
        ]),
        home: CameraState::new(0.1, 0.2, 1.0),
        limits: limits(0.0016),
        presets: vec![
            view("SKYLINE", 0.1, 0.2, 1.0, [0.0, 0.0]),
            tilt("AERIAL", 0.7, 0.55),
            tilt("STREET", 0.05, 1.45),
            view("UKRAINA", -0.4, 0.18, 1.2, [-150.0, 0.0]),
            view("CITY", 0.25, 0.16, 1.25, [-50.0, 0.0]),
        ],
        particles: ParticleCounts {
            rain: 160,
            snow: 250,
            clouds: 6,
        },
        time_of_day: 0.78,
        wind_speed: 0.35,
    }
}

fn tokyo() -> CitySettings {
    let mut buildings = vec![
        named(-180.0, 50.0, 100.0, 280.0, Orange,
            BuildingInfo::new("TOKYO TOWER", "1,092 ft", 1958).note("Iconic landmark"))
            .archetype(Archetype::Lattice(LatticeTower::default())),
        named(320.0, 70.0, 20.0, 420.0, Primary,
            BuildingInfo::new("TOKYO SKYTREE", "2,080 ft", 2012).note("Tallest in Japan"))
            .archetype(Archetype::Tapered(TaperedTower {
                sides: 12,
                segments: 30,
                top_scale: 0.35,
                ring_every: 5,
                shaft_fraction: 0.9,
                spire_rise: 0.08,
            })),
        BuildingDescriptor::new(-80.0, 80.0, 40.0, 25.0, 230.0, Primary)
            .info(BuildingInfo::new("METRO GOV", "797 ft", 1990).floors(48).note("Twin towers"))
            .archetype(stepped(&[(0.75, 1.0), (1.0, 0.7)], 0.0, 0)),
        named(30.0, 70.0, 36.0, 200.0, Secondary,
            BuildingInfo::new("COCOON TOWER", "669 ft", 2008).floors(50).note("Cocoon design"))
            .archetype(Archetype::Tapered(TaperedTower {
                sides: 10,
                segments: 20,
                top_scale: 0.55,
                ring_every: 4,
                shaft_fraction: 0.9,
                spire_rise: 0.05,
            })),
        named(-280.0, 75.0, 38.0, 220.0, Purple,
            BuildingInfo::new("DOCOMO", "787 ft", 2000).note("Clock tower top"))
            .archetype(Archetype::Spired { spire_height: 40.0 }),
        named(110.0, 65.0, 34.0, 210.0, Teal,
            BuildingInfo::new("PARK TOWER", "771 ft", 1994).floors(52)),
        named(180.0, 80.0, 32.0, 195.0, Highlight,
            BuildingInfo::new("SUMITOMO", "679 ft", 2017).floors(40)),
        named(-30.0, 90.0, 36.0, 185.0, Accent,
            BuildingInfo::new("MITSUI", "722 ft", 1974).floors(55)),
        named(250.0, 60.0, 40.0, 205.0, Orange,
            BuildingInfo::new("MORI TOWER", "780 ft", 2003).floors(54)),
        named(-140.0, 65.0, 32.0, 220.0, Steel,
            BuildingInfo::new("MIDTOWN", "813 ft", 2007).floors(54)),
    ];
    buildings.extend(filler(&[
        (60.0, 95.0, 28.0, 170.0, Purple),
        (-220.0, 90.0, 30.0, 160.0, Teal),
        (270.0, 110.0, 28.0, 155.0, Primary),
        (-350.0, 75.0, 26.0, 145.0, Highlight),
        (400.0, 90.0, 30.0, 140.0, Secondary),
        (-400.0, 85.0, 28.0, 130.0, Orange),
        (-380.0, 150.0, 18.0, 85.0, Purple),
        (-340.0, 160.0, 16.0, 75.0, Teal),
        (-300.0, 155.0, 20.0, 95.0, Primary),
        (-260.0, 165.0, 16.0, 70.0, Secondary),
        (-220.0, 150.0, 18.0, 80.0, Orange),
        (-180.0, 160.0, 16.0, 65.0, Highlight),
        (-140.0, 155.0, 20.0, 90.0, Purple),
        (-100.0, 165.0, 16.0, 75.0, Teal),
        (-60.0, 150.0, 18.0, 85.0, Primary),
        (-20.0, 160.0, 16.0, 70.0, Secondary),
        (20.0, 155.0, 20.0, 95.0, Orange),
        (60.0, 165.0, 16.0, 65.0, Highlight),
        (100.0, 150.0, 18.0, 80.0, Purple),
        (140.0, 160.0, 16.0, 75.0, Teal),
        (180.0, 155.0, 20.0, 90.0, Primary),
        (220.0, 165.0, 16.0, 70.0, Secondary),
        (260.0, 150.0, 18.0, 85.0, Orange),
        (300.0, 160.0, 16.0, 65.0, Highlight),
        (340.0, 155.0, 20.0, 75.0, Purple),
        (380.0, 165.0, 16.0, 60.0, Teal),
        (-350.0, 200.0, 14.0, 55.0, Primary),
        (-280.0, 210.0, 12.0, 50.0, Secondary),
        (-210.0, 205.0, 14.0, 60.0, Purple),
        (-140.0, 215.0, 12.0, 45.0, Teal),
    ]));

    CitySettings {
        title: City::Tokyo.title(),
        scene: Scene::new(buildings, vec![Terrain::grid((-450.0, 480.0), (-50.0, 250.0))]),
        home: CameraState::new(0.12, 0.15, 1.0),
        limits: limits(0.0012),
        presets: vec![
            view("SKYLINE", 0.12, 0.15, 1.0, [0.0, 0.0]),
            tilt("AERIAL", 0.75, 0.55),
            tilt("STREET", 0.05, 1.45),
            view("TOKYO TOWER", -0.35, 0.12, 1.5, [-100.0, 20.0]),
            view("SKYTREE", 0.5, 0.15, 1.3, [120.0, 0.0]),
        ],
        particles: ParticleCounts {
            rain: 180,
            snow: 200,
            clouds: 6,
        },
        time_of_day: 0.72,
        wind_speed: 0.25,
    }
}

/// Revolving turret on a slim cylindrical shaft
fn sydney_tower() -> LatticeTower {
    LatticeTower {
        sections: 14,
        taper_until: 0.0,
        taper_rate: 0.0,
        mid_until: 0.78,
        mid_scale: 1.0,
        top_scale: 0.5,
        decks: vec![ObservationDeck {
            level: 0.78,
            radius: 2.8,
            rings: 4,
            ring_gap: 6.0,
            flare: 0.05,
            sides: 12,
            struts: 12,
            offset: 0.0,
        }],
        antenna_height: 40.0,
        antenna_bars: 2,
    }
}

fn sydney() -> CitySettings {
    let mut buildings = vec![
        BuildingDescriptor::new(-266.0, -100.0, 196.0, 84.0, 130.0, Ivory)
            .archetype(Archetype::Shell(ShellGroup::opera_house(1.4)))
            .info(BuildingInfo::new("OPERA HOUSE", "213 ft", 1973).note("Shell vaults"))
            .as_landmark(),
        named(80.0, 80.0, 12.0, 280.0, Accent,
            BuildingInfo::new("SYDNEY TOWER", "1,014 ft", 1981).note("Observation deck"))
            .archetype(Archetype::Lattice(sydney_tower())),
        named(-180.0, 50.0, 32.0, 250.0, Teal,
            BuildingInfo::new("ONE SYDNEY HARBOUR", "876 ft", 2022).floors(71)),
        named(140.0, 70.0, 38.0, 220.0, Primary,
            BuildingInfo::new("CHIFLEY TOWER", "787 ft", 1992).floors(53))
            .archetype(Archetype::Spired { spire_height: 30.0 }),
        named(200.0, 60.0, 36.0, 200.0, Steel,
            BuildingInfo::new("DEUTSCHE BANK", "673 ft", 2005).floors(39)),
        named(30.0, 65.0, 34.0, 195.0, Purple,
            BuildingInfo::new("CITIGROUP", "640 ft", 2000).floors(50)),
        named(-40.0, 75.0, 32.0, 210.0, Highlight,
            BuildingInfo::new("GOVERNOR PHILLIP", "640 ft", 1994).floors(54)),
        named(-100.0, 60.0, 30.0, 190.0, Secondary,
            BuildingInfo::new("AURORA PLACE", "623 ft", 2000).floors(41).note("Renzo Piano"))
            .archetype(Archetype::Shell(ShellGroup::vault(30.0, 30.0, 190.0))),
        named(260.0, 75.0, 36.0, 175.0, Orange,
            BuildingInfo::new("GROSVENOR", "574 ft", 1988).floors(44)),
        named(320.0, 65.0, 34.0, 215.0, Steel,
            BuildingInfo::new("MLC CENTRE", "666 ft", 1978).floors(60)),
    ];
    buildings.extend(filler(&[
        (-140.0, 85.0, 30.0, 165.0, Teal),
        (-220.0, 70.0, 28.0, 145.0, Purple),
        (-280.0, 80.0, 26.0, 130.0, Primary),
        (380.0, 70.0, 30.0, 140.0, Highlight),
        (430.0, 85.0, 28.0, 125.0, Orange),
        (-300.0, 150.0, 22.0, 90.0, Steel),
        (-240.0, 160.0, 20.0, 80.0, Purple),
        (-180.0, 155.0, 24.0, 100.0, Primary),
        (-120.0, 165.0, 20.0, 85.0, Teal),
        (-60.0, 150.0, 22.0, 95.0, Highlight),
        (0.0, 160.0, 20.0, 75.0, Secondary),
        (60.0, 155.0, 24.0, 105.0, Orange),
        (120.0, 165.0, 20.0, 80.0, Steel),
        (180.0, 150.0, 22.0, 90.0, Purple),
        (240.0, 160.0, 20.0, 85.0, Primary),
        (300.0, 155.0, 24.0, 70.0, Teal),
        (360.0, 165.0, 20.0, 75.0, Highlight),
    ]));

    CitySettings {
        title: City::Sydney.title(),
        scene: Scene::new(
            buildings,
            vec![
                Terrain::water((-450.0, 500.0), (-250.0, -50.0)),
                Terrain::grid((-450.0, 480.0), (-30.0, 200.0)),
            ],
        )
        .with_boats(vec![
            Boat::new(-100.0, -200.0),
            Boat::new(200.0, -180.0),
            Boat::new(400.0, -210.0),
        ]),
        home: CameraState::new(0.15, 0.18, 1.0),
        limits: limits(0.0015),
        presets: vec![
            view("HARBOUR", 0.15, 0.18, 1.0, [0.0, 0.0]),
            tilt("AERIAL", 0.65, 0.55),
            tilt("STREET", 0.05, 1.4),
            view("OPERA HOUSE", -0.3, 0.15, 1.4, [-120.0, 20.0]),
            view("TOWER", 0.1, 0.2, 1.3, [50.0, 0.0]),
        ],
        particles: ParticleCounts {
            rain: 150,
            snow: 120,
            clouds: 8,
        },
        time_of_day: 0.72,
        wind_speed: 0.35,
    }
}

fn philadelphia() -> CitySettings {
    let mut buildings = vec![
        named(-305.0, 60.0, 32.0, 145.0, Teal,
            BuildingInfo::new("CIRA CENTRE", "436 ft", 2005).floors(29)),
        named(-265.0, 75.0, 30.0, 160.0, Highlight,
            BuildingInfo::new("FMC TOWER", "736 ft", 2016).floors(49)),
        named(-145.0, 55.0, 44.0, 300.0, Steel,
            BuildingInfo::new("COMCAST TECH", "1,121 ft", 2018).floors(60).note("Tallest in Philadelphia"))
            .archetype(stepped(&[(0.3, 1.0), (0.85, 0.9), (1.0, 0.75)], 0.0, 0)),
        named(-90.0, 65.0, 42.0, 235.0, Primary,
            BuildingInfo::new("COMCAST CENTER", "974 ft", 2008).floors(58))
            .archetype(Archetype::Tapered(TaperedTower {
                sides: 4,
                segments: 20,
                top_scale: 0.8,
                ring_every: 4,
                shaft_fraction: 1.0,
                spire_rise: 0.04,
            })),
        named(35.0, 55.0, 46.0, 265.0, Primary,
            BuildingInfo::new("ONE LIBERTY", "945 ft", 1987).floors(61).note("First to exceed City Hall"))
            .archetype(Archetype::Spired { spire_height: 55.0 }),
        named(95.0, 60.0, 42.0, 235.0, Primary,
            BuildingInfo::new("TWO LIBERTY", "848 ft", 1990).floors(58))
            .archetype(Archetype::Spired { spire_height: 40.0 }),
        named(145.0, 70.0, 36.0, 190.0, Accent,
            BuildingInfo::new("MELLON CENTER", "792 ft", 1990).floors(54)),
        named(230.0, 90.0, 50.0, 140.0, Accent,
            BuildingInfo::new("CITY HALL", "548 ft", 1901).floors(9).note("William Penn statue"))
            .archetype(Archetype::Domed(DomedHall::default()))
            .as_landmark(),
        named(280.0, 65.0, 34.0, 175.0, Teal,
            BuildingInfo::new("THREE LOGAN", "739 ft", 2019).floors(60)),
        named(330.0, 55.0, 36.0, 195.0, Primary,
            BuildingInfo::new("BNY MELLON", "792 ft", 1990).floors(54)),
    ];
    buildings.extend(filler(&[
        (-380.0, 70.0, 24.0, 75.0, Purple),
        (-345.0, 55.0, 26.0, 90.0, Secondary),
        (-225.0, 60.0, 26.0, 100.0, Purple),
        (-190.0, 70.0, 28.0, 115.0, Orange),
        (-45.0, 75.0, 26.0, 130.0, Purple),
        (-15.0, 60.0, 28.0, 145.0, Secondary),
        (185.0, 55.0, 28.0, 140.0, Purple),
        (375.0, 70.0, 26.0, 110.0, Secondary),
        (410.0, 60.0, 24.0, 85.0, Purple),
        (-360.0, 150.0, 20.0, 50.0, Purple),
        (-280.0, 155.0, 22.0, 60.0, Secondary),
        (-200.0, 145.0, 18.0, 45.0, Primary),
        (-120.0, 160.0, 20.0, 55.0, Highlight),
        (-40.0, 150.0, 22.0, 65.0, Accent),
        (40.0, 155.0, 18.0, 50.0, Purple),
        (120.0, 145.0, 20.0, 60.0, Secondary),
        (200.0, 160.0, 22.0, 45.0, Primary),
        (280.0, 150.0, 18.0, 55.0, Highlight),
        (360.0, 155.0, 20.0, 50.0, Accent),
    ]));

    CitySettings {
        title: City::Philadelphia.title(),
        scene: Scene::new(
            buildings,
            vec![
                Terrain::water((-450.0, 450.0), (-200.0, -75.0)),
                Terrain::grid((-450.0, 450.0), (-50.0, 180.0)),
            ],
        )
        .with_boats(vec![
            Boat::new(-250.0, -150.0).with_drift(8.0),
            Boat::new(50.0, -165.0).with_drift(8.0),
            Boat::new(300.0, -145.0).with_drift(8.0),
        ]),
        home: CameraState::new(0.12, 0.2, 1.0),
        limits: limits(0.0018),
        presets: vec![
            view("SKYLINE", 0.12, 0.2, 1.0, [0.0, 0.0]),
            tilt("AERIAL", 0.75, 0.55),
            tilt("STREET", 0.06, 1.45),
            view("LIBERTY PLACE", 0.35, 0.18, 1.3, [30.0, 0.0]),
            view("CITY HALL", -0.2, 0.22, 1.15, [-60.0, 0.0]),
        ],
        particles: ParticleCounts::default(),
        time_of_day: 0.82,
        wind_speed: 0.35,
    }
}

fn hong_kong() -> CitySettings {
    let mut buildings = vec![
        named(-170.0, 55.0, 38.0, 170.0, Highlight,
            BuildingInfo::new("HSBC", "587 ft", 1985).floors(47).note("Foster's exoskeleton"))
            .floor_spacing(20.0),
        named(-120.0, 60.0, 40.0, 285.0, Primary,
            BuildingInfo::new("BANK OF CHINA", "1,205 ft", 1990).floors(70).note("I.M. Pei geometric"))
            .archetype(Archetype::Tapered(TaperedTower {
                sides: 4,
                segments: 20,
                top_scale: 0.4,
                ring_every: 5,
                shaft_fraction: 0.88,
                spire_rise: 0.15,
            })),
        named(-75.0, 70.0, 34.0, 240.0, Accent,
            BuildingInfo::new("CHEUNG KONG", "928 ft", 1999).floors(62)),
        named(-25.0, 50.0, 48.0, 350.0, Primary,
            BuildingInfo::new("TWO IFC", "1,362 ft", 2003).floors(88).note("Tallest on HK Island"))
            .archetype(stepped(&[(0.8, 1.0), (0.9, 0.85), (0.96, 0.7), (1.0, 0.55)], 0.0, 0)),
        named(30.0, 65.0, 36.0, 200.0, Teal,
            BuildingInfo::new("ONE IFC", "656 ft", 1999).floors(38)),
        named(115.0, 55.0, 32.0, 175.0, Accent,
            BuildingInfo::new("JARDINE HOUSE", "587 ft", 1973).floors(52).note("Circular windows"))
            .floor_spacing(8.0),
        named(225.0, 55.0, 42.0, 310.0, Secondary,
            BuildingInfo::new("CENTRAL PLAZA", "1,227 ft", 1992).floors(78).note("Neon pyramid top"))
            .archetype(Archetype::Spired { spire_height: 35.0 }),
        BuildingDescriptor::new(275.0, 40.0, 60.0, 30.0, 55.0, Highlight)
            .archetype(Archetype::Shell(ShellGroup::vault(60.0, 30.0, 55.0)))
            .info(BuildingInfo::new("HKCEC", "low-rise", 1988).note("Convention Center")),
    ];
    buildings.extend(filler(&[
        (-420.0, 70.0, 22.0, 95.0, Purple),
        (-390.0, 55.0, 24.0, 110.0, Teal),
        (-360.0, 65.0, 20.0, 85.0, Pink),
        (-330.0, 60.0, 26.0, 125.0, Primary),
        (-300.0, 75.0, 22.0, 100.0, Teal),
        (-270.0, 55.0, 24.0, 135.0, Orange),
        (-240.0, 70.0, 20.0, 115.0, Secondary),
        (-210.0, 60.0, 26.0, 150.0, Primary),
        (75.0, 75.0, 28.0, 165.0, Purple),
        (155.0, 70.0, 24.0, 145.0, Pink),
        (185.0, 60.0, 26.0, 160.0, Orange),
        (325.0, 65.0, 24.0, 155.0, Accent),
        (360.0, 75.0, 22.0, 130.0, Purple),
        (390.0, 60.0, 26.0, 175.0, Primary),
        (420.0, 70.0, 20.0, 120.0, Teal),
        (450.0, 55.0, 24.0, 145.0, Pink),
        (-400.0, 140.0, 18.0, 70.0, Purple),
        (-350.0, 150.0, 16.0, 60.0, Teal),
        (-300.0, 145.0, 20.0, 80.0, Pink),
        (-250.0, 155.0, 18.0, 75.0, Orange),
        (-200.0, 140.0, 16.0, 65.0, Primary),
        (-150.0, 150.0, 20.0, 85.0, Teal),
        (-100.0, 145.0, 18.0, 70.0, Secondary),
        (-50.0, 155.0, 16.0, 60.0, Primary),
        (0.0, 140.0, 20.0, 90.0, Accent),
        (50.0, 150.0, 18.0, 75.0, Purple),
        (100.0, 145.0, 16.0, 65.0, Teal),
        (150.0, 155.0, 20.0, 80.0, Pink),
        (200.0, 140.0, 18.0, 70.0, Orange),
        (250.0, 150.0, 16.0, 85.0, Primary),
        (300.0, 145.0, 20.0, 75.0, Teal),
        (350.0, 155.0, 18.0, 60.0, Secondary),
        (400.0, 140.0, 16.0, 70.0, Primary),
        (-380.0, 210.0, 14.0, 50.0, Purple),
        (-320.0, 220.0, 12.0, 45.0, Teal),
        (-260.0, 215.0, 14.0, 55.0, Pink),
        (-200.0, 225.0, 12.0, 40.0, Orange),
        (-140.0, 210.0, 14.0, 50.0, Primary),
        (-80.0, 220.0, 12.0, 60.0, Teal),
        (-20.0, 215.0, 14.0, 45.0, Secondary),
        (40.0, 225.0, 12.0, 55.0, Primary),
        (100.0, 210.0, 14.0, 50.0, Accent),
        (160.0, 220.0, 12.0, 40.0, Purple),
        (220.0, 215.0, 14.0, 55.0, Teal),
        (280.0, 225.0, 12.0, 45.0, Pink),
        (340.0, 210.0, 14.0, 50.0, Orange),
        (400.0, 220.0, 12.0, 40.0, Primary),
    ]));

    CitySettings {
        title: City::HongKong.title(),
        scene: Scene::new(
            buildings,
            vec![
                Terrain::water((-480.0, 480.0), (-220.0, -50.0)),
                Terrain::grid((-480.0, 480.0), (-40.0, 300.0)),
            ],
        )
        .with_boats(vec![
            Boat::new(-300.0, -140.0),
            Boat::new(0.0, -155.0),
            Boat::new(250.0, -135.0),
        ]),
        home: CameraState::new(0.08, 0.18, 1.0),
        limits: limits(0.0015),
        presets: vec![
            view("HARBOUR", 0.08, 0.18, 1.0, [0.0, 0.0]),
            tilt("PEAK VIEW", 0.7, 0.55),
            tilt("WATERFRONT", 0.05, 1.4),
            view("IFC", 0.2, 0.15, 1.3, [-80.0, 0.0]),
            view("CENTRAL", -0.1, 0.16, 1.25, [60.0, 0.0]),
        ],
        particles: ParticleCounts {
            rain: 180,
            snow: 150,
            clouds: 10,
        },
        time_of_day: 0.85,
        wind_speed: 0.3,
    }
}

/// Round corncob tower with a balcony ring on every floor
fn corncob() -> Archetype {
    Archetype::Tapered(TaperedTower {
        sides: 12,
        segments: 20,
        top_scale: 1.0,
        ring_every: 1,
        shaft_fraction: 0.96,
        spire_rise: 0.0,
    })
}

fn chicago() -> CitySettings {
    let mut buildings = vec![
        named(-300.0, 50.0, 35.0, 130.0, Accent,
            BuildingInfo::new("311 S WACKER", "961 ft", 1990).floors(65)),
        named(-220.0, 60.0, 55.0, 290.0, Primary,
            BuildingInfo::new("WILLIS TOWER", "1,451 ft", 1973).floors(110).note("Formerly Sears Tower"))
            .archetype(stepped(&[(0.55, 1.0), (0.75, 0.7), (1.0, 0.45)], 40.0, 0)),
        named(-85.0, 45.0, 32.0, 160.0, Highlight,
            BuildingInfo::new("AQUA TOWER", "859 ft", 2009).floors(82).note("Iconic wavy balconies"))
            .floor_spacing(6.0),
        named(-40.0, 40.0, 40.0, 200.0, Primary,
            BuildingInfo::new("AON CENTER", "1,136 ft", 1973).floors(83)),
        named(5.0, 60.0, 32.0, 180.0, Accent,
            BuildingInfo::new("PRUDENTIAL", "995 ft", 1990).floors(64))
            .archetype(Archetype::Spired { spire_height: 35.0 }),
        named(40.0, 35.0, 30.0, 190.0, Purple,
            BuildingInfo::new("ST. REGIS", "1,198 ft", 2020).floors(101).note("3rd tallest in Chicago"))
            .archetype(Archetype::Twisted(TwistedTower::default())),
        named(80.0, 30.0, 35.0, 220.0, Secondary,
            BuildingInfo::new("TRUMP TOWER", "1,388 ft", 2009).floors(98))
            .archetype(Archetype::Spired { spire_height: 40.0 }),
        named(115.0, 55.0, 28.0, 140.0, Orange,
            BuildingInfo::new("MARINA CITY", "587 ft", 1964).floors(65).note("Iconic twin towers"))
            .archetype(corncob()),
        BuildingDescriptor::square(145.0, 55.0, 28.0, 140.0, Orange).archetype(corncob()),
        named(220.0, 40.0, 45.0, 260.0, Accent,
            BuildingInfo::new("HANCOCK", "1,127 ft", 1969).floors(100).note("Iconic X-bracing"))
            .archetype(Archetype::Tapered(TaperedTower {
                sides: 4,
                segments: 20,
                top_scale: 0.65,
                ring_every: 4,
                shaft_fraction: 0.88,
                spire_rise: 0.12,
            })),
    ];
    buildings.extend(filler(&[
        (-380.0, 80.0, 25.0, 70.0, Purple),
        (-350.0, 60.0, 30.0, 90.0, Secondary),
        (-150.0, 40.0, 30.0, 110.0, Purple),
        (-120.0, 70.0, 28.0, 95.0, Secondary),
        (175.0, 70.0, 26.0, 105.0, Highlight),
        (275.0, 60.0, 30.0, 140.0, Secondary),
        (310.0, 80.0, 28.0, 115.0, Purple),
        (345.0, 50.0, 32.0, 125.0, Primary),
        (380.0, 70.0, 26.0, 95.0, Highlight),
        (-320.0, 150.0, 22.0, 60.0, Purple),
        (-240.0, 140.0, 25.0, 70.0, Secondary),
        (-160.0, 160.0, 20.0, 55.0, Primary),
        (-80.0, 150.0, 24.0, 65.0, Highlight),
        (0.0, 140.0, 22.0, 75.0, Accent),
        (80.0, 160.0, 20.0, 50.0, Purple),
        (160.0, 150.0, 26.0, 80.0, Secondary),
        (260.0, 140.0, 22.0, 60.0, Primary),
        (340.0, 150.0, 20.0, 55.0, Accent),
    ]));

    CitySettings {
        title: City::Chicago.title(),
        scene: Scene::new(
            buildings,
            vec![
                Terrain::water((-400.0, 450.0), (-250.0, -80.0)),
                Terrain::grid((-400.0, 450.0), (-80.0, 200.0)),
            ],
        )
        .with_boats(vec![
            Boat::new(-200.0, -180.0),
            Boat::new(50.0, -200.0),
            Boat::new(250.0, -170.0),
        ]),
        home: CameraState::new(0.15, 0.25, 1.0),
        limits: limits(0.002),
        presets: vec![
            view("SKYLINE", 0.15, 0.25, 1.0, [0.0, 0.0]),
            tilt("AERIAL", 0.85, 0.6),
            tilt("STREET", 0.08, 1.6),
            view("WILLIS", -0.3, 0.18, 1.3, [90.0, 0.0]),
            view("HANCOCK", 0.45, 0.2, 1.25, [-90.0, 0.0]),
        ],
        particles: ParticleCounts::default(),
        time_of_day: 0.85,
        wind_speed: 0.5,
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;
    use crate::geometry::generate;
    use crate::projection::{Projector, Viewport, VIEWER_DISTANCE};
    use crate::vertex::WorldPoint;

    fn norm(p: WorldPoint) -> f64 {
        (p.x * p.x + p.y * p.y + p.z * p.z).sqrt()
    }

    #[test]
    fn every_city_stays_inside_the_viewer_sphere() {
        for city in City::ALL {
            let settings = city.settings();
            let mut points = Vec::new();
            for b in &settings.scene.buildings {
                for s in generate(b) {
                    points.extend([s.start, s.end]);
                }
            }
            for t in &settings.scene.terrain {
                for s in t.segments(3.7, 2.0) {
                    points.extend([s.start, s.end]);
                }
            }
            assert!(!points.is_empty());
            for p in points {
                assert!(norm(p) < VIEWER_DISTANCE, "{city}: {p:?} is too far out");
            }
        }
    }

    #[test]
    fn extreme_cameras_keep_depth_in_front_of_the_viewer() {
        for city in City::ALL {
            let settings = city.settings();
            for step in 0..4 {
                for pitch in [settings.limits.pitch_min, settings.limits.pitch_max] {
                    let camera = CameraState::new(step as f64 * FRAC_PI_2, pitch, 2.5);
                    let projector = Projector::new(&camera, &Viewport::default());
                    for b in &settings.scene.buildings {
                        for s in generate(b) {
                            assert!(projector.depth(s.end) + VIEWER_DISTANCE > 0.0);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn every_city_has_five_presets_and_named_buildings() {
        for city in City::ALL {
            let settings = city.settings();
            assert_eq!(settings.presets.len(), 5, "{city}");
            assert_eq!(
                settings.presets[0].preset.resolve(CameraState::default()),
                settings.home
            );
            assert!(settings.scene.buildings.iter().filter(|b| b.info.is_some()).count() >= 8);
            assert!(settings.limits.auto_rotate_step > 0.0);
        }
    }

    #[test]
    fn catalog_descriptors_are_all_valid() {
        // Scene::new drops invalid descriptors, so compare against the raw counts.
        assert_eq!(City::NewYork.settings().scene.buildings.len(), 40);
        assert_eq!(City::Tokyo.settings().scene.buildings.len(), 40);
        for city in City::ALL {
            for b in &city.settings().scene.buildings {
                assert!(b.validate().is_ok());
            }
        }
    }

    #[test]
    fn tilt_presets_keep_yaw_and_pan() {
        let current = CameraState::new(1.3, 0.2, 1.0).with_pan(40.0, -10.0);
        let tilted = CameraPreset::Tilt {
            pitch: 0.8,
            zoom: 0.55,
        }
        .resolve(current);
        assert_eq!(tilted, CameraState::new(1.3, 0.8, 0.55).with_pan(40.0, -10.0));
    }

    #[test]
    fn harbour_cities_have_boats_on_the_water() {
        for city in City::ALL {
            let settings = city.settings();
            let Some(water) = settings.scene.water() else {
                assert!(settings.scene.boats.is_empty(), "{city}");
                continue;
            };
            assert!(!settings.scene.boats.is_empty(), "{city}");
            for boat in &settings.scene.boats {
                assert!(boat.x - boat.drift - 10.0 >= water.x_range.0, "{city}");
                assert!(boat.x + boat.drift + 10.0 <= water.x_range.1, "{city}");
                assert!((water.z_range.0..=water.z_range.1).contains(&boat.z), "{city}");
            }
        }
        assert_eq!(City::NewYork.settings().scene.boats.len(), 4);
        assert!(City::Tokyo.settings().scene.boats.is_empty());
    }

    #[test]
    fn hong_kong_and_chicago_parse_from_the_command_line() {
        assert_eq!(City::from_str("hk", true), Ok(City::HongKong));
        assert_eq!(City::from_str("chicago", true), Ok(City::Chicago));
        assert_eq!(City::HongKong.settings().title, "HONG KONG");
        let chicago = City::Chicago.settings();
        assert_eq!(chicago.presets[3].name, "WILLIS");
        assert_eq!(chicago.particles, ParticleCounts::default());
    }

    #[test]
    fn landmarks_are_flagged() {
        let nyc = City::NewYork.settings();
        let names: Vec<_> = nyc.scene.landmarks().filter_map(|b| b.name()).collect();
        assert_eq!(names, vec!["STATUE OF LIBERTY", "BROOKLYN BRIDGE"]);
    }
}
