//! tracing subscriber setup
//!
//! Console output always goes to stderr; stdout is reserved for
//! de-identified data in file mode.

use crate::config::LoggingConfig;
use crate::domain::{DeidError, Result};
use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// File name prefix of the rotated JSON log
const LOG_FILE_PREFIX: &str = "deid.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the non-blocking file writer alive
///
/// Dropping it flushes pending file log lines, so hold it until exit.
pub struct LoggingGuard {
    _file_writer: Option<WorkerGuard>,
}

/// Install the global subscriber
///
/// The filter comes from `RUST_LOG` when set, otherwise `deid=<level>`.
/// With `local_enabled`, JSON lines are also written to a rotated file
/// under `local_path`.
///
/// # Example
///
/// ```no_run
/// use deid::logging::init_logging;
/// use deid::config::LoggingConfig;
///
/// let _guard = init_logging("debug", &LoggingConfig::default())
///     .expect("Failed to initialize logging");
/// ```
pub fn init_logging(level: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let level = parse_log_level(level)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("deid={level}")));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter.clone())
        .boxed();

    let mut layers: Vec<BoxedLayer> = vec![stderr_layer];
    let mut file_writer = None;

    if config.local_enabled {
        let (layer, guard) = json_file_layer(config, filter)?;
        layers.push(layer);
        file_writer = Some(guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| DeidError::Configuration(format!("Failed to initialize logging: {e}")))?;

    tracing::debug!(
        level = %level,
        file_logging = config.local_enabled,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_writer: file_writer,
    })
}

fn json_file_layer(config: &LoggingConfig, filter: EnvFilter) -> Result<(BoxedLayer, WorkerGuard)> {
    let directory = Path::new(&config.local_path);
    std::fs::create_dir_all(directory).map_err(|e| {
        DeidError::Configuration(format!(
            "Cannot create log directory {}: {e}",
            directory.display()
        ))
    })?;

    let appender = RollingFileAppender::new(
        rotation_for(&config.local_rotation),
        directory,
        LOG_FILE_PREFIX,
    );
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(writer)
        .with_filter(filter)
        .boxed();

    Ok((layer, guard))
}

/// `hourly` or anything else, which rotates daily
fn rotation_for(name: &str) -> Rotation {
    if name.eq_ignore_ascii_case("hourly") {
        Rotation::HOURLY
    } else {
        Rotation::DAILY
    }
}

fn parse_log_level(level: &str) -> Result<Level> {
    const NAMES: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

    let lower = level.to_ascii_lowercase();
    if !NAMES.contains(&lower.as_str()) {
        return Err(DeidError::Configuration(format!(
            "Unknown log level '{level}', expected one of: {}",
            NAMES.join(", ")
        )));
    }

    lower
        .parse::<Level>()
        .map_err(|e| DeidError::Configuration(format!("Unknown log level '{level}': {e}")))
}
