use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "skyline3d::weather=trace"). The terminal is owned by the renderer, so
/// records only go to `file`; without one, logging stays off.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub file: Option<PathBuf>,
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Subsequent calls are ignored and leave the log file alone. Fails only if
/// the first call cannot create the log file.
pub fn init_logging(config: LoggingConfig) -> io::Result<()> {
    let Some(path) = config.file else {
        return Ok(());
    };

    let mut result = Ok(());
    INIT.call_once(|| {
        let file = match File::create(&path) {
            Ok(file) => file,
            Err(err) => {
                result = Err(err);
                return;
            }
        };
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder
            .write_style(env_logger::WriteStyle::Never)
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();

        log::debug!("logging to {}", path.display());
    });
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_initialization_keeps_the_log() {
        let path = std::env::temp_dir().join(format!("skyline3d-{}.log", std::process::id()));
        let config = LoggingConfig {
            env_filter: Some("info".to_string()),
            file: Some(path.clone()),
        };
        init_logging(config.clone()).unwrap();
        log::info!("first session line");

        init_logging(config).unwrap();
        let missing = LoggingConfig {
            env_filter: None,
            file: Some(path.join("no-such-dir").join("x.log")),
        };
        assert!(init_logging(missing).is_ok());

        let written = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(written.contains("first session line"));
    }
}
