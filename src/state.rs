use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::camera::{CameraController, CameraState};
use crate::catalog::{City, NamedPreset};
use crate::projection::Viewport;
use crate::scene::{assemble_frame, DrawableObject, Scene};
use crate::weather::{ParticleBounds, Particles, SimulationClock, WeatherMode, WeatherState};

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 42;

/// Step applied by the time-of-day and wind keys
pub const SLIDER_STEP: f64 = 0.02;

/// Session options chosen at startup
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub city: City,
    pub weather: WeatherMode,
    /// Overrides the city's default when set
    pub time_of_day: Option<f64>,
    /// Overrides the city's default when set
    pub wind_speed: Option<f64>,
    pub seed: u64,
    pub auto_rotate: bool,
    pub labels: bool,
    pub landmarks: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            city: City::default(),
            weather: WeatherMode::Clear,
            time_of_day: None,
            wind_speed: None,
            seed: DEFAULT_SEED,
            auto_rotate: true,
            labels: true,
            landmarks: true,
        }
    }
}

/// Display toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    pub labels: bool,
    pub landmarks: bool,
    /// Simulation paused
    pub paused: bool,
    /// Enable debug overlay
    pub debug: bool,
}

/// Everything that changes while a scene is on screen
#[derive(Debug, Clone)]
pub struct SceneState {
    pub title: &'static str,
    pub scene: Scene,
    pub viewport: Viewport,
    pub camera: CameraState,
    pub controller: CameraController,
    pub presets: Vec<NamedPreset>,
    pub clock: SimulationClock,
    pub weather: WeatherState,
    pub particles: Particles,
    pub display: DisplayOptions,
    rng: ChaCha8Rng,
}

impl SceneState {
    pub fn new(config: &SceneConfig) -> Self {
        let settings = config.city.settings();
        let viewport = Viewport::default();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let bounds = ParticleBounds {
            width: viewport.width,
            height: viewport.height,
        };
        let particles = Particles::new(settings.particles, bounds, &mut rng);

        let mut controller = CameraController::new(settings.limits, settings.home);
        controller.auto_rotate = config.auto_rotate;
        let camera = controller.home();

        let weather = WeatherState::new(
            config.weather,
            config.time_of_day.unwrap_or(settings.time_of_day),
            config.wind_speed.unwrap_or(settings.wind_speed),
        );

        info!(
            "loaded {} ({} buildings, {} landmarks, {} boats, seed {})",
            settings.title,
            settings.scene.buildings.len(),
            settings.scene.landmarks().count(),
            settings.scene.boats.len(),
            config.seed
        );

        SceneState {
            title: settings.title,
            scene: settings.scene,
            viewport,
            camera,
            controller,
            presets: settings.presets,
            clock: SimulationClock::default(),
            weather,
            particles,
            display: DisplayOptions {
                labels: config.labels,
                landmarks: config.landmarks,
                paused: false,
                debug: false,
            },
            rng,
        }
    }

    /// Advances one fixed step. A paused scene keeps its clock, particles,
    /// lightning and auto-rotation frozen.
    pub fn tick(&mut self) {
        if self.display.paused {
            return;
        }
        self.clock.advance();
        self.weather.tick(&mut self.rng);
        self.particles.advance(
            self.weather.mode(),
            self.clock.time(),
            self.weather.wind_speed(),
        );
        self.controller.tick(&mut self.camera);
    }

    /// World objects for this frame, farthest first
    pub fn drawables(&self) -> Vec<DrawableObject<'_>> {
        assemble_frame(&self.scene, &self.camera, self.display.landmarks)
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, pan_modifier: bool) {
        self.controller.pointer_down(x, y, pan_modifier);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.controller.pointer_move(&mut self.camera, x, y);
    }

    pub fn pointer_up(&mut self) {
        self.controller.pointer_up();
    }

    pub fn wheel(&mut self, delta: f64) {
        self.controller.wheel(&mut self.camera, delta);
    }

    pub fn reset_camera(&mut self) {
        self.controller.reset(&mut self.camera);
    }

    /// Jumps to preset `index`; returns its name, or `None` if there is none
    pub fn apply_preset(&mut self, index: usize) -> Option<&'static str> {
        let named = *self.presets.get(index)?;
        let target = named.preset.resolve(self.camera);
        self.controller.apply_preset(&mut self.camera, target);
        debug!("camera preset {}", named.name);
        Some(named.name)
    }

    pub fn set_weather(&mut self, mode: WeatherMode) {
        self.weather.set_mode(mode);
    }

    pub fn cycle_weather(&mut self) -> WeatherMode {
        let next = self.weather.mode().next();
        self.set_weather(next);
        next
    }

    pub fn adjust_time_of_day(&mut self, delta: f64) {
        self.weather
            .set_time_of_day(self.weather.time_of_day() + delta);
    }

    pub fn adjust_wind(&mut self, delta: f64) {
        self.weather.set_wind_speed(self.weather.wind_speed() + delta);
    }

    pub fn toggle_auto_rotate(&mut self) {
        self.controller.auto_rotate = !self.controller.auto_rotate;
    }

    pub fn toggle_labels(&mut self) {
        self.display.labels = !self.display.labels;
    }

    pub fn toggle_landmarks(&mut self) {
        self.display.landmarks = !self.display.landmarks;
        debug!(
            "landmarks shown: {} ({} affected)",
            self.display.landmarks,
            self.scene.landmarks().count()
        );
    }

    pub fn toggle_debug(&mut self) {
        self.display.debug = !self.display.debug;
    }

    pub fn toggle_pause(&mut self) {
        self.display.paused = !self.display.paused;
        if self.display.paused {
            self.controller.release();
        }
        info!("paused: {}", self.display.paused);
    }
}
