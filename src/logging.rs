use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use crate::error::{StatementError, StatementResult};

/// Logging configuration, also the `[logging]` section of the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: PathBuf,
    /// Daily rolling JSON log files; needs the `advanced_logging` feature
    pub enable_file_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            log_dir: PathBuf::from("logs"),
            enable_file_logging: false,
        }
    }
}

/// Keeps the background log writer alive. Drop it last.
#[derive(Default)]
pub struct LoggingGuard {
    #[cfg(feature = "advanced_logging")]
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// Initialize the global subscriber. `RUST_LOG` overrides `config.level`.
pub fn init_logging(config: &LoggingConfig) -> StatementResult<LoggingGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| StatementError::configuration(format!("invalid log level '{}': {}", config.level, e)))?;

    let registry = Registry::default().with(env_filter);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .boxed();

    #[cfg(feature = "advanced_logging")]
    if config.enable_file_logging {
        use tracing_appender::{non_blocking, rolling};

        std::fs::create_dir_all(&config.log_dir)
            .map_err(|e| StatementError::file_io(config.log_dir.to_string_lossy().to_string(), e))?;

        let file_appender = rolling::daily(&config.log_dir, "hdfc_extract.log");
        let (file_writer, guard) = non_blocking(file_appender);
        let file_layer = fmt::layer().json().with_writer(file_writer).boxed();

        registry
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .map_err(|e| StatementError::configuration(format!("logging already initialized: {}", e)))?;

        info!("File logging enabled: {}", config.log_dir.display());
        return Ok(LoggingGuard {
            _file_guard: Some(guard),
        });
    }

    registry
        .with(console_layer)
        .try_init()
        .map_err(|e| StatementError::configuration(format!("logging already initialized: {}", e)))?;

    if config.enable_file_logging && cfg!(not(feature = "advanced_logging")) {
        warn!("File logging requested but the advanced_logging feature is not enabled");
    }
    info!("Log level: {}", config.level);

    Ok(LoggingGuard::default())
}

/// Log system information for debugging
pub fn log_system_info() {
    info!("🐹 {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    info!("System: {} {}", std::env::consts::OS, std::env::consts::ARCH);

    if let Ok(cwd) = std::env::current_dir() {
        info!("Working directory: {}", cwd.display());
    }
}

/// Logs the duration of an operation when dropped
pub struct PerformanceTimer {
    start: std::time::Instant,
    operation: String,
}

impl PerformanceTimer {
    pub fn start(operation: impl Into<String>) -> Self {
        let operation = operation.into();
        info!("⏱️  Starting: {}", operation);
        Self {
            start: std::time::Instant::now(),
            operation,
        }
    }

    pub fn checkpoint(&self, checkpoint: &str) {
        let elapsed = self.start.elapsed();
        info!("⏱️  {} - {}: {}ms", self.operation, checkpoint, elapsed.as_millis());
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }
}

impl Drop for PerformanceTimer {
    fn drop(&mut self) {
        info!("⏱️  Completed {}: {}ms", self.operation, self.start.elapsed().as_millis());
    }
}

/// Record a `StatementError` with the operation it interrupted
#[macro_export]
macro_rules! log_error {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error.describe(),
            not_found = $error.is_not_found(),
            context = $context,
            "Statement extraction failed"
        );
    };
}
