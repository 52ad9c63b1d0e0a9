//! Logging configuration and initialization
//!
//! Console output goes to stderr so the CLI can keep stdout for its results.
//! Library code logs through the `log` facade; the subscriber's `tracing-log`
//! bridge forwards those records.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Filter variable checked before `RUST_LOG`
pub const LOG_ENV: &str = "SHADER_WORKBENCH_LOG";

/// Set to "json" for JSON console output
pub const LOG_FORMAT_ENV: &str = "SHADER_WORKBENCH_LOG_FORMAT";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Enable console output (default: true)
    pub console_enabled: bool,
    /// Also write to a log file (default: false)
    pub file_enabled: bool,
    /// Log file path (default: `shader-workbench.log` in the working directory)
    pub file_path: Option<PathBuf>,
    /// Use JSON format for console logs (default: false)
    pub json_format: bool,
    /// Default filter when no environment filter is set (default: "info")
    pub default_level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            console_enabled: true,
            file_enabled: false,
            file_path: None,
            json_format: false,
            default_level: "info".to_string(),
        }
    }
}

impl LogConfig {
    /// Quieter default for one-shot commands
    pub fn for_cli(verbose: bool) -> Self {
        Self {
            default_level: if verbose { "debug" } else { "warn" }.to_string(),
            ..Self::default()
        }
    }
}

/// `SHADER_WORKBENCH_LOG_FORMAT` overrides the configured format
fn resolve_json(env_value: Option<&str>, configured: bool) -> bool {
    match env_value {
        Some(v) => v.eq_ignore_ascii_case("json"),
        None => configured,
    }
}

/// Initialize the logging system
///
/// Returns a guard that must be kept alive while file logging is in use so
/// buffered records are flushed.
///
/// # Environment Variables
///
/// - `SHADER_WORKBENCH_LOG`: filter (e.g. "debug", "info,shader_workbench=debug")
/// - `SHADER_WORKBENCH_LOG_FORMAT`: "json" for JSON output
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(&config.default_level));

    let use_json = resolve_json(std::env::var(LOG_FORMAT_ENV).ok().as_deref(), config.json_format);

    let mut file_guard: Option<WorkerGuard> = None;
    let file_layer = if config.file_enabled {
        let log_path = config
            .file_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("shader-workbench.log"));
        let file = std::fs::File::create(&log_path)?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        file_guard = Some(guard);
        Some(
            fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false),
        )
    } else {
        None
    };

    let json_layer = (config.console_enabled && use_json).then(|| {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
    });
    let console_layer = (config.console_enabled && !use_json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(json_layer)
        .with(console_layer)
        .try_init()?;

    tracing::debug!(
        target: "shader_workbench",
        version = env!("CARGO_PKG_VERSION"),
        json_format = use_json,
        file_enabled = config.file_enabled,
        "Logging initialized"
    );

    Ok(file_guard)
}

pub use tracing_appender::non_blocking::WorkerGuard as LogGuard;
