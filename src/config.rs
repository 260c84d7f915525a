use std::path::PathBuf;

use clap::Parser;

use crate::catalog::City;
use crate::logging::LoggingConfig;
use crate::state::{SceneConfig, DEFAULT_SEED};
use crate::weather::WeatherMode;

/// Command line options
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Wireframe 3D city skylines in the terminal")]
pub struct Args {
    /// Scene to load
    #[arg(long, value_enum, default_value_t = City::NewYork)]
    pub city: City,

    /// Initial weather
    #[arg(long, value_enum, default_value_t = WeatherMode::Clear)]
    pub weather: WeatherMode,

    /// Time of day in [0, 1]: sunrise < 0.3, day, sunset, night > 0.75
    #[arg(long, value_parser = parse_unit)]
    pub time_of_day: Option<f64>,

    /// Wind speed in [0, 1]
    #[arg(long, value_parser = parse_unit)]
    pub wind: Option<f64>,

    /// Seed for particle placement and lightning
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Target frames per second
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=120))]
    pub fps: u32,

    /// Start with auto-rotate off
    #[arg(long)]
    pub no_auto_rotate: bool,

    /// Start with building labels hidden
    #[arg(long)]
    pub hide_labels: bool,

    /// Start with landmarks hidden
    #[arg(long)]
    pub hide_landmarks: bool,

    /// Write logs to this file; the terminal itself is taken by the renderer
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "skyline3d::weather=trace"
    #[arg(long)]
    pub log_filter: Option<String>,
}

fn parse_unit(value: &str) -> Result<f64, String> {
    let number: f64 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if (0.0..=1.0).contains(&number) {
        Ok(number)
    } else {
        Err(format!("{number} is outside [0, 1]"))
    }
}

impl Args {
    pub fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            city: self.city,
            weather: self.weather,
            time_of_day: self.time_of_day,
            wind_speed: self.wind,
            seed: self.seed,
            auto_rotate: !self.no_auto_rotate,
            labels: !self.hide_labels,
            landmarks: !self.hide_landmarks,
        }
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.log_filter.clone(),
            file: self.log_file.clone(),
        }
    }

    /// Time between simulation ticks
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_scene_defaults() {
        let args = Args::try_parse_from(["skyline3d"]).unwrap();
        assert_eq!(args.scene_config(), SceneConfig::default());
        assert_eq!(args.fps, 30);
        assert_eq!(args.tick_interval().as_millis(), 33);
        assert!(args.logging_config().file.is_none());
    }

    #[test]
    fn parses_every_option() {
        let args = Args::try_parse_from([
            "skyline3d",
            "--city",
            "tokyo",
            "--weather",
            "storm",
            "--time-of-day",
            "0.25",
            "--wind",
            "1",
            "--seed",
            "7",
            "--no-auto-rotate",
            "--hide-labels",
            "--hide-landmarks",
            "--log-file",
            "skyline.log",
            "--log-filter",
            "debug",
        ])
        .unwrap();
        let config = args.scene_config();
        assert_eq!(config.city, City::Tokyo);
        assert_eq!(config.weather, WeatherMode::Storm);
        assert_eq!(config.time_of_day, Some(0.25));
        assert_eq!(config.wind_speed, Some(1.0));
        assert_eq!(config.seed, 7);
        assert!(!config.auto_rotate && !config.labels && !config.landmarks);
        let logging = args.logging_config();
        assert_eq!(logging.file, Some(PathBuf::from("skyline.log")));
        assert_eq!(logging.env_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn city_aliases() {
        let args = Args::try_parse_from(["skyline3d", "--city", "nyc"]).unwrap();
        assert_eq!(args.city, City::NewYork);
        let args = Args::try_parse_from(["skyline3d", "--city", "new-york"]).unwrap();
        assert_eq!(args.city, City::NewYork);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(Args::try_parse_from(["skyline3d", "--time-of-day", "1.5"]).is_err());
        assert!(Args::try_parse_from(["skyline3d", "--wind", "-0.1"]).is_err());
        assert!(Args::try_parse_from(["skyline3d", "--wind", "gusty"]).is_err());
        assert!(Args::try_parse_from(["skyline3d", "--fps", "0"]).is_err());
        assert!(Args::try_parse_from(["skyline3d", "--weather", "hail"]).is_err());
    }
}
