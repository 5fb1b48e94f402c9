use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "adaptive.log";

pub struct FileLogGuard {
    _guard: WorkerGuard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub level: String,
    /// Daily rolling file output in this directory, in addition to stderr.
    pub file_dir: Option<String>,
}

impl LogOptions {
    /// `ENABLE_FILE_LOGS=true|1` turns on file output under `LOG_DIR`
    /// (default `./logs`).
    pub fn from_env(level: &str) -> Self {
        let file_enabled = std::env::var("ENABLE_FILE_LOGS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let file_dir = file_enabled
            .then(|| std::env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string()));

        Self {
            level: level.to_string(),
            file_dir,
        }
    }
}

/// Installs the global subscriber. Hold on to the returned guard until exit,
/// otherwise buffered file output is dropped.
pub fn init_tracing(options: &LogOptions) -> Option<FileLogGuard> {
    let env_filter =
        EnvFilter::try_new(&options.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    let file_output = options.file_dir.as_deref().and_then(|dir| {
        if let Err(err) = std::fs::create_dir_all(dir) {
            eprintln!("failed to create log directory {dir}: {err}");
            return None;
        }
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
        Some(tracing_appender::non_blocking(appender))
    });

    let (file_layer, guard) = match file_output {
        Some((writer, guard)) => (
            Some(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true),
            ),
            Some(FileLogGuard { _guard: guard }),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

