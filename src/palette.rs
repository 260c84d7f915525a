//! Time-of-day and weather dependent colour sets.

use crate::weather::{DayPhase, WeatherMode};

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::hex(0xFFFFFF);
    pub const BLACK: Rgb = Rgb::hex(0x000000);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// From a `0xRRGGBB` literal
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Blends towards `other` by `t` in `[0, 1]`
    pub fn mix(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }

    /// Perceived brightness in `[0, 1]`
    pub fn luminance(self) -> f64 {
        (0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64) / 255.0
    }
}

/// Named colour a descriptor refers to; resolved against the current palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteSlot {
    Primary,
    Secondary,
    Accent,
    Highlight,
    Purple,
    Orange,
    Copper,
    Pink,
    Teal,
    Steel,
    Ivory,
    Water,
    Grid,
}

/// Resolved colour set for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
    pub highlight: Rgb,
    pub purple: Rgb,
    pub orange: Rgb,
    pub copper: Rgb,
    pub pink: Rgb,
    pub teal: Rgb,
    pub steel: Rgb,
    pub ivory: Rgb,
    pub water: Rgb,
    pub grid: Rgb,
    /// Sky gradient, top to horizon
    pub sky: [Rgb; 4],
}

impl Palette {
    pub fn get(&self, slot: PaletteSlot) -> Rgb {
        match slot {
            PaletteSlot::Primary => self.primary,
            PaletteSlot::Secondary => self.secondary,
            PaletteSlot::Accent => self.accent,
            PaletteSlot::Highlight => self.highlight,
            PaletteSlot::Purple => self.purple,
            PaletteSlot::Orange => self.orange,
            PaletteSlot::Copper => self.copper,
            PaletteSlot::Pink => self.pink,
            PaletteSlot::Teal => self.teal,
            PaletteSlot::Steel => self.steel,
            PaletteSlot::Ivory => self.ivory,
            PaletteSlot::Water => self.water,
            PaletteSlot::Grid => self.grid,
        }
    }

    /// Sky washed towards white while a lightning flash is active
    pub fn lightning_sky(&self) -> [Rgb; 4] {
        self.sky.map(|c| c.mix(Rgb::WHITE, 0.3))
    }
}

const NIGHT: Palette = Palette {
    primary: Rgb::hex(0x00D4FF),
    secondary: Rgb::hex(0xFF6B9D),
    accent: Rgb::hex(0xFFD700),
    highlight: Rgb::hex(0x00FF88),
    purple: Rgb::hex(0xB388FF),
    orange: Rgb::hex(0xFF8C00),
    copper: Rgb::hex(0xFF7744),
    pink: Rgb::hex(0xFF66AA),
    teal: Rgb::hex(0x00CED1),
    steel: Rgb::hex(0xA8C0D0),
    ivory: Rgb::hex(0xE8E8E8),
    water: Rgb::hex(0x0044AA),
    grid: Rgb::hex(0x4400AA),
    sky: [
        Rgb::hex(0x030306),
        Rgb::hex(0x060812),
        Rgb::hex(0x0A0C1A),
        Rgb::hex(0x101428),
    ],
};

const SUNSET: Palette = Palette {
    primary: Rgb::hex(0x00BBDD),
    secondary: Rgb::hex(0xFF5588),
    accent: Rgb::hex(0xFFBB00),
    highlight: Rgb::hex(0x00DD77),
    purple: Rgb::hex(0xCC66FF),
    orange: Rgb::hex(0xFF5500),
    copper: Rgb::hex(0xDD4422),
    pink: Rgb::hex(0xFF5599),
    teal: Rgb::hex(0x00BBAA),
    steel: Rgb::hex(0x99AABB),
    ivory: Rgb::hex(0xFFE8D8),
    water: Rgb::hex(0x004466),
    grid: Rgb::hex(0x5511AA),
    sky: [
        Rgb::hex(0x0D0818),
        Rgb::hex(0x2A1535),
        Rgb::hex(0x6A2845),
        Rgb::hex(0xCC6030),
    ],
};

const DAY: Palette = Palette {
    primary: Rgb::hex(0x0099CC),
    secondary: Rgb::hex(0xDD4477),
    accent: Rgb::hex(0xDDAA00),
    highlight: Rgb::hex(0x00AA55),
    purple: Rgb::hex(0x9955CC),
    orange: Rgb::hex(0xDD5500),
    copper: Rgb::hex(0xBB4422),
    pink: Rgb::hex(0xDD5588),
    teal: Rgb::hex(0x009999),
    steel: Rgb::hex(0x8899AA),
    ivory: Rgb::hex(0xEEEEEE),
    water: Rgb::hex(0x006699),
    grid: Rgb::hex(0x3311AA),
    sky: [
        Rgb::hex(0x2A4060),
        Rgb::hex(0x4A6080),
        Rgb::hex(0x6A80A0),
        Rgb::hex(0x8AA0C0),
    ],
};

const STORM_SKY: [Rgb; 4] = [
    Rgb::hex(0x101015),
    Rgb::hex(0x181822),
    Rgb::hex(0x252530),
    Rgb::hex(0x353545),
];
const STORM_WATER: Rgb = Rgb::hex(0x001833);

const FOG_SKY: [Rgb; 4] = [
    Rgb::hex(0x3A4050),
    Rgb::hex(0x4A5060),
    Rgb::hex(0x5A6070),
    Rgb::hex(0x6A7080),
];

/// Picks the base palette for the time of day, then applies weather overrides
pub fn palette_for(time_of_day: f64, weather: WeatherMode) -> Palette {
    let mut palette = match DayPhase::from_time_of_day(time_of_day) {
        DayPhase::Night => NIGHT,
        DayPhase::Sunset => SUNSET,
        DayPhase::Sunrise | DayPhase::Day => DAY,
    };

    match weather {
        WeatherMode::Rain | WeatherMode::Storm => {
            palette.sky = STORM_SKY;
            palette.water = STORM_WATER;
        }
        WeatherMode::Fog => palette.sky = FOG_SKY,
        WeatherMode::Clear | WeatherMode::Snow => {}
    }

    palette
}
