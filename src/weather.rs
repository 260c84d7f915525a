//! Simulation clock, weather modes, particles and lightning.
//!
//! Particle positions are closed-form functions of the clock time folded into
//! the visible bounds, so motion is seamless and a particle returns to its
//! origin after one wrap period. Particles are created once and only moved.

use std::f64::consts::PI;
use std::fmt;

use rand::Rng;

use crate::math::wrap;
use crate::vertex::Point2;

/// Closed set of weather modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum WeatherMode {
    #[default]
    Clear,
    Rain,
    Snow,
    Storm,
    Fog,
}

impl WeatherMode {
    pub const ALL: [WeatherMode; 5] = [
        WeatherMode::Clear,
        WeatherMode::Rain,
        WeatherMode::Snow,
        WeatherMode::Storm,
        WeatherMode::Fog,
    ];

    /// Next mode in cycling order
    pub fn next(self) -> WeatherMode {
        let index = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Scales water wave amplitude and speed
    pub fn storminess(self) -> f64 {
        match self {
            WeatherMode::Storm => 2.0,
            WeatherMode::Rain => 1.3,
            _ => 1.0,
        }
    }

    pub fn has_rain(self) -> bool {
        matches!(self, WeatherMode::Rain | WeatherMode::Storm)
    }
}

impl fmt::Display for WeatherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WeatherMode::Clear => "clear",
            WeatherMode::Rain => "rain",
            WeatherMode::Snow => "snow",
            WeatherMode::Storm => "storm",
            WeatherMode::Fog => "fog",
        };
        f.write_str(name)
    }
}

/// Named phase of the continuous time-of-day value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPhase {
    Sunrise,
    Day,
    Sunset,
    Night,
}

impl DayPhase {
    pub fn from_time_of_day(t: f64) -> DayPhase {
        if t > 0.75 {
            DayPhase::Night
        } else if t > 0.6 {
            DayPhase::Sunset
        } else if t < 0.3 {
            DayPhase::Sunrise
        } else {
            DayPhase::Day
        }
    }
}

/// Virtual time advanced by a fixed step per tick, independent of wall-clock jitter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    ticks: u64,
    step: f64,
}

impl SimulationClock {
    pub const DEFAULT_STEP: f64 = 0.02;

    pub fn new(step: f64) -> Self {
        debug_assert!(step > 0.0);
        Self { ticks: 0, step }
    }

    pub fn advance(&mut self) {
        self.ticks += 1;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Derived from the tick count so it never accumulates rounding error
    pub fn time(&self) -> f64 {
        self.ticks as f64 * self.step
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STEP)
    }
}

/// Area particles wrap around in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleBounds {
    pub width: f64,
    pub height: f64,
}

/// Number of particles of each kind, fixed at scene load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticleCounts {
    pub rain: usize,
    pub snow: usize,
    pub clouds: usize,
}

impl Default for ParticleCounts {
    fn default() -> Self {
        Self {
            rain: 150,
            snow: 200,
            clouds: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RainDrop {
    pub origin: Point2,
    pub speed: f64,
    pub length: f64,
    pub position: Point2,
}

impl RainDrop {
    const FALL_RATE: f64 = 50.0;
    const DRIFT_RATE: f64 = 10.0;
    const WIND_OFFSET: f64 = 100.0;

    fn advance(&mut self, time: f64, wind: f64, bounds: ParticleBounds) {
        let x = self.origin.x + time * self.speed * Self::DRIFT_RATE * wind + wind * Self::WIND_OFFSET;
        let y = self.origin.y + time * self.speed * Self::FALL_RATE;
        self.position = Point2::new(wrap(x, bounds.width), wrap(y, bounds.height));
    }

    /// Clock time after which the drop is back at its starting height
    pub fn fall_period(&self, bounds: ParticleBounds) -> f64 {
        bounds.height / (self.speed * Self::FALL_RATE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnowFlake {
    pub origin: Point2,
    pub size: f64,
    pub speed: f64,
    /// Phase of the sideways wobble
    pub phase: f64,
    pub position: Point2,
}

impl SnowFlake {
    const FALL_RATE: f64 = 28.0;
    const DRIFT_RATE: f64 = 18.0;

    fn advance(&mut self, time: f64, wind: f64, bounds: ParticleBounds) {
        let wobble = (time * 2.0 + self.phase).sin() * Self::DRIFT_RATE * wind;
        let x = self.origin.x + wobble + time * Self::DRIFT_RATE * wind;
        let y = self.origin.y + time * self.speed * Self::FALL_RATE;
        self.position = Point2::new(wrap(x, bounds.width), wrap(y, bounds.height));
    }

    pub fn fall_period(&self, bounds: ParticleBounds) -> f64 {
        bounds.height / (self.speed * Self::FALL_RATE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    pub origin_x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    pub x: f64,
}

impl Cloud {
    const DRIFT_RATE: f64 = 18.0;
    /// Clouds enter and leave this far outside the viewport
    pub const MARGIN: f64 = 100.0;

    fn advance(&mut self, time: f64, wind: f64, bounds: ParticleBounds) {
        let travel = self.origin_x + time * self.speed * Self::DRIFT_RATE * (1.0 + wind);
        self.x = wrap(travel, bounds.width + 2.0 * Self::MARGIN) - Self::MARGIN;
    }
}

/// All sky particles of a scene. Every kind is allocated up front so weather
/// switches never allocate.
#[derive(Debug, Clone)]
pub struct Particles {
    pub bounds: ParticleBounds,
    pub rain: Vec<RainDrop>,
    pub snow: Vec<SnowFlake>,
    pub clouds: Vec<Cloud>,
}

impl Particles {
    pub fn new<R: Rng>(counts: ParticleCounts, bounds: ParticleBounds, rng: &mut R) -> Self {
        let rain = (0..counts.rain)
            .map(|_| {
                let origin = Point2::new(
                    rng.gen_range(0.0..bounds.width),
                    rng.gen_range(0.0..bounds.height),
                );
                RainDrop {
                    origin,
                    speed: rng.gen_range(8.0..14.0),
                    length: rng.gen_range(10.0..25.0),
                    position: origin,
                }
            })
            .collect();

        let snow = (0..counts.snow)
            .map(|_| {
                let origin = Point2::new(
                    rng.gen_range(0.0..bounds.width),
                    rng.gen_range(0.0..bounds.height),
                );
                SnowFlake {
                    origin,
                    size: rng.gen_range(1.0..4.0),
                    speed: rng.gen_range(1.0..3.0),
                    phase: rng.gen_range(0.0..PI * 2.0),
                    position: origin,
                }
            })
            .collect();

        let clouds = (0..counts.clouds)
            .map(|i| {
                let origin_x = i as f64 * 130.0 - Cloud::MARGIN;
                Cloud {
                    origin_x,
                    y: rng.gen_range(35.0..85.0),
                    width: rng.gen_range(80.0..140.0),
                    height: rng.gen_range(25.0..45.0),
                    speed: rng.gen_range(0.3..0.7),
                    x: origin_x,
                }
            })
            .collect();

        Particles {
            bounds,
            rain,
            snow,
            clouds,
        }
    }

    /// Repositions every particle for clock time `time`.
    ///
    /// Only the particles the current mode shows are touched.
    pub fn advance(&mut self, mode: WeatherMode, time: f64, wind: f64) {
        let bounds = self.bounds;
        if mode.has_rain() {
            for drop in &mut self.rain {
                drop.advance(time, wind, bounds);
            }
        }
        if mode == WeatherMode::Snow {
            for flake in &mut self.snow {
                flake.advance(time, wind, bounds);
            }
        }
        for cloud in &mut self.clouds {
            cloud.advance(time, wind, bounds);
        }
    }
}

/// One translucent fog band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogBand {
    pub x_offset: f64,
    pub y: f64,
    pub height: f64,
    pub opacity: f64,
}

pub const FOG_BAND_COUNT: usize = 6;

/// Fog bands for clock time `time`; they stay put vertically and sway sideways
pub fn fog_bands(time: f64) -> [FogBand; FOG_BAND_COUNT] {
    std::array::from_fn(|i| {
        let i = i as f64;
        FogBand {
            x_offset: -50.0 + (time * 0.3 + i).sin() * 18.0,
            y: 240.0 + i * 48.0,
            height: 55.0,
            opacity: 0.12 + i * 0.04,
        }
    })
}

/// Storm lightning tuning, in ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightningTuning {
    /// Chance of a strike per window
    pub window_chance: f64,
    pub window_ticks: u32,
    pub flash_ticks: u32,
    pub follow_up_delay: u32,
    pub follow_up_chance: f64,
    pub follow_up_ticks: u32,
}

impl Default for LightningTuning {
    fn default() -> Self {
        Self {
            window_chance: 0.1,
            window_ticks: 15,
            flash_ticks: 3,
            follow_up_delay: 5,
            follow_up_chance: 0.5,
            follow_up_ticks: 2,
        }
    }
}

impl LightningTuning {
    /// Per-tick probability giving `window_chance` over `window_ticks` trials
    pub fn tick_chance(&self) -> f64 {
        1.0 - (1.0 - self.window_chance).powf(1.0 / self.window_ticks as f64)
    }

    /// Ticks after a strike by which every flash it caused has cleared
    pub fn max_flash_window(&self) -> u32 {
        self.flash_ticks.max(self.follow_up_delay + self.follow_up_ticks)
    }
}

/// Lightning as countdowns: a flash is active while `flash_ticks > 0`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lightning {
    flash_ticks: u32,
    follow_up_in: Option<u32>,
    bolt: Vec<Point2>,
    strikes: u64,
}

impl Lightning {
    pub fn is_flashing(&self) -> bool {
        self.flash_ticks > 0
    }

    fn is_idle(&self) -> bool {
        self.flash_ticks == 0 && self.follow_up_in.is_none()
    }

    /// Jagged bolt path for the current flash, in viewport coordinates
    pub fn bolt(&self) -> &[Point2] {
        &self.bolt
    }

    /// Strikes so far, follow-ups included
    pub fn strikes(&self) -> u64 {
        self.strikes
    }

    pub fn clear(&mut self) {
        self.flash_ticks = 0;
        self.follow_up_in = None;
        self.bolt.clear();
    }

    fn strike<R: Rng>(&mut self, ticks: u32, rng: &mut R) {
        self.flash_ticks = ticks;
        self.strikes += 1;
        self.bolt.clear();
        let mut x = rng.gen_range(180.0..720.0);
        let mut y = 0.0;
        while y < 340.0 {
            self.bolt.push(Point2::new(x, y));
            y += rng.gen_range(18.0..46.0);
            x += rng.gen_range(-27.5..27.5);
        }
    }

    fn tick<R: Rng>(&mut self, storm: bool, tuning: &LightningTuning, rng: &mut R) {
        self.flash_ticks = self.flash_ticks.saturating_sub(1);

        if let Some(remaining) = self.follow_up_in {
            if remaining <= 1 {
                self.follow_up_in = None;
                if rng.gen_bool(tuning.follow_up_chance) {
                    self.strike(tuning.follow_up_ticks, rng);
                    log::trace!("lightning follow-up strike");
                }
            } else {
                self.follow_up_in = Some(remaining - 1);
            }
        }

        if storm && self.is_idle() && rng.gen_bool(tuning.tick_chance()) {
            self.strike(tuning.flash_ticks, rng);
            self.follow_up_in = Some(tuning.follow_up_delay);
            log::debug!("lightning strike #{}", self.strikes);
        }

        if !self.is_flashing() && self.follow_up_in.is_none() {
            self.bolt.clear();
        }
    }
}

/// Weather mode plus the two continuous controls and lightning
#[derive(Debug, Clone)]
pub struct WeatherState {
    mode: WeatherMode,
    time_of_day: f64,
    wind_speed: f64,
    pub tuning: LightningTuning,
    pub lightning: Lightning,
}

impl WeatherState {
    pub fn new(mode: WeatherMode, time_of_day: f64, wind_speed: f64) -> Self {
        Self {
            mode,
            time_of_day: time_of_day.clamp(0.0, 1.0),
            wind_speed: wind_speed.clamp(0.0, 1.0),
            tuning: LightningTuning::default(),
            lightning: Lightning::default(),
        }
    }

    pub fn mode(&self) -> WeatherMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: WeatherMode) {
        if mode != self.mode {
            log::info!("weather {} -> {}", self.mode, mode);
        }
        self.mode = mode;
        if mode != WeatherMode::Storm {
            self.lightning.clear();
        }
    }

    pub fn time_of_day(&self) -> f64 {
        self.time_of_day
    }

    pub fn set_time_of_day(&mut self, value: f64) {
        self.time_of_day = value.clamp(0.0, 1.0);
    }

    pub fn phase(&self) -> DayPhase {
        DayPhase::from_time_of_day(self.time_of_day)
    }

    pub fn wind_speed(&self) -> f64 {
        self.wind_speed
    }

    pub fn set_wind_speed(&mut self, value: f64) {
        self.wind_speed = value.clamp(0.0, 1.0);
    }

    /// Advances lightning by one tick; the clock and particles are advanced by the caller
    pub fn tick<R: Rng>(&mut self, rng: &mut R) {
        let storm = self.mode == WeatherMode::Storm;
        self.lightning.tick(storm, &self.tuning, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const BOUNDS: ParticleBounds = ParticleBounds {
        width: 900.0,
        height: 520.0,
    };

    /// Distance on a circle of circumference `m`
    fn circular_gap(a: f64, b: f64, m: f64) -> f64 {
        let d = (a - b).abs();
        d.min(m - d)
    }

    fn particles(seed: u64) -> Particles {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Particles::new(ParticleCounts::default(), BOUNDS, &mut rng)
    }

    #[test]
    fn day_phase_thresholds() {
        assert_eq!(DayPhase::from_time_of_day(0.1), DayPhase::Sunrise);
        assert_eq!(DayPhase::from_time_of_day(0.3), DayPhase::Day);
        assert_eq!(DayPhase::from_time_of_day(0.6), DayPhase::Day);
        assert_eq!(DayPhase::from_time_of_day(0.61), DayPhase::Sunset);
        assert_eq!(DayPhase::from_time_of_day(0.75), DayPhase::Sunset);
        assert_eq!(DayPhase::from_time_of_day(0.76), DayPhase::Night);
    }

    #[test]
    fn clock_advances_by_fixed_step() {
        let mut clock = SimulationClock::default();
        for _ in 0..50 {
            clock.advance();
        }
        assert_eq!(clock.ticks(), 50);
        assert!((clock.time() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn seeded_particles_are_reproducible() {
        let a = particles(7);
        let b = particles(7);
        assert_eq!(a.rain, b.rain);
        assert_eq!(a.snow, b.snow);
        assert_eq!(a.clouds, b.clouds);
        assert_eq!(a.rain.len(), 150);
        assert_eq!(a.snow.len(), 200);
        assert_eq!(a.clouds.len(), 8);
    }

    #[test]
    fn rain_returns_to_origin_after_one_period() {
        let mut p = particles(3);
        let drop = p.rain[0].clone();
        let period = drop.fall_period(BOUNDS);
        p.advance(WeatherMode::Rain, period, 0.0);
        let moved = &p.rain[0];
        assert!(circular_gap(moved.position.y, drop.origin.y, BOUNDS.height) < 1e-6);
        assert_eq!(moved.position.x, drop.origin.x);
    }

    #[test]
    fn snow_returns_to_origin_after_one_period() {
        let mut p = particles(11);
        let flake = p.snow[5].clone();
        p.advance(WeatherMode::Snow, flake.fall_period(BOUNDS), 0.0);
        assert!(circular_gap(p.snow[5].position.y, flake.origin.y, BOUNDS.height) < 1e-6);
    }

    #[test]
    fn particles_never_leave_bounds() {
        let mut p = particles(5);
        let mut clock = SimulationClock::default();
        for step in 0..3000 {
            clock.advance();
            let wind = (step % 10) as f64 / 9.0;
            p.advance(WeatherMode::Storm, clock.time(), wind);
            p.advance(WeatherMode::Snow, clock.time(), wind);
            for d in &p.rain {
                assert!((0.0..BOUNDS.width).contains(&d.position.x));
                assert!((0.0..BOUNDS.height).contains(&d.position.y));
            }
            for f in &p.snow {
                assert!((0.0..BOUNDS.width).contains(&f.position.x));
                assert!((0.0..BOUNDS.height).contains(&f.position.y));
            }
            for c in &p.clouds {
                assert!(c.x >= -Cloud::MARGIN && c.x < BOUNDS.width + Cloud::MARGIN);
            }
        }
    }

    #[test]
    fn rain_motion_is_continuous_between_wraps() {
        let mut p = particles(9);
        p.advance(WeatherMode::Rain, 1.00, 0.0);
        let a = p.rain[2].position.y;
        p.advance(WeatherMode::Rain, 1.02, 0.0);
        let b = p.rain[2].position.y;
        let step = p.rain[2].speed * 50.0 * 0.02;
        let delta = wrap(b - a, BOUNDS.height);
        assert!((delta - step).abs() < 1e-9);
    }

    #[test]
    fn fog_bands_sway_over_time() {
        let a = fog_bands(0.0);
        let b = fog_bands(3.0);
        assert_eq!(a[2].y, b[2].y);
        assert_ne!(a[2].x_offset, b[2].x_offset);
        assert!(a.iter().all(|band| band.x_offset.abs() <= 68.0));
    }

    #[test]
    fn storm_produces_lightning_that_clears() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut weather = WeatherState::new(WeatherMode::Clear, 0.8, 0.4);
        for _ in 0..500 {
            weather.tick(&mut rng);
            assert!(!weather.lightning.is_flashing());
        }

        weather.set_mode(WeatherMode::Storm);
        let window = weather.tuning.max_flash_window();
        let mut struck_at = None;
        for tick in 0..5000 {
            weather.tick(&mut rng);
            if weather.lightning.is_flashing() {
                struck_at = Some(tick);
                break;
            }
        }
        assert!(struck_at.is_some(), "no lightning within 5000 storm ticks");
        assert!(!weather.lightning.bolt().is_empty());

        // Only the strike already in flight may flash from here on.
        weather.tuning.window_chance = 0.0;

        let mut cleared = false;
        for _ in 0..window {
            weather.tick(&mut rng);
            if !weather.lightning.is_flashing() && weather.lightning.follow_up_in.is_none() {
                cleared = true;
                break;
            }
        }
        assert!(cleared, "flash outlived its {window}-tick window");
    }

    #[test]
    fn leaving_storm_clears_lightning() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut weather = WeatherState::new(WeatherMode::Storm, 0.8, 0.4);
        weather.tuning.window_chance = 1.0;
        weather.tick(&mut rng);
        assert!(weather.lightning.is_flashing());
        weather.set_mode(WeatherMode::Rain);
        assert!(!weather.lightning.is_flashing());
        assert!(weather.lightning.bolt().is_empty());
    }

    #[test]
    fn tick_chance_matches_window_chance() {
        let tuning = LightningTuning::default();
        let p = tuning.tick_chance();
        let over_window = 1.0 - (1.0 - p).powi(tuning.window_ticks as i32);
        assert!((over_window - tuning.window_chance).abs() < 1e-12);
    }

    #[test]
    fn sliders_are_clamped() {
        let mut weather = WeatherState::new(WeatherMode::Fog, 2.0, -1.0);
        assert_eq!(weather.time_of_day(), 1.0);
        assert_eq!(weather.wind_speed(), 0.0);
        weather.set_wind_speed(0.5);
        assert_eq!(weather.wind_speed(), 0.5);
        assert_eq!(weather.phase(), DayPhase::Night);
    }

    #[test]
    fn weather_cycles_through_all_modes() {
        let mut mode = WeatherMode::Clear;
        for _ in 0..WeatherMode::ALL.len() {
            mode = mode.next();
        }
        assert_eq!(mode, WeatherMode::Clear);
    }
}
