//! Diagnostic output for the `tcxrs` binary
//!
//! The library only emits `tracing` events; nothing is printed until the
//! binary installs a subscriber with [`init_logging`]. Console logs go to
//! stderr so that summaries written to stdout stay machine-readable.

use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// `[logging]` section of the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,

    /// Also write JSON lines to this file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Start a new log file every day instead of appending to one
    pub rotate_daily: bool,

    /// Report span enter/exit events
    pub spans: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Pretty,
            file: None,
            rotate_daily: false,
            spans: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Filter directive limiting output to this crate at this level
    pub fn directive(self) -> String {
        format!("tcxrs={}", self.as_str())
    }

    /// Level after `verbose` repetitions of `-v`
    ///
    /// Each flag raises the level by one step; a configured level that is
    /// already more verbose is kept.
    pub fn from_verbosity(base: LogLevel, verbose: u8) -> LogLevel {
        let raised = match verbose {
            0 => base,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        };
        raised.max(base)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, colored, with source locations
    Pretty,
    /// One JSON object per event
    Json,
    /// Single line per event
    Compact,
}

/// Install the global subscriber described by `config`
///
/// A `RUST_LOG` directive, when set, replaces the configured level.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.directive()));

    let file = match &config.file {
        Some(path) => Some(file_layer(path, config)?),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer(config))
        .with(file)
        .try_init()?;

    tracing::debug!(
        level = config.level.as_str(),
        format = ?config.format,
        file = ?config.file,
        "Logging initialized"
    );
    Ok(())
}

fn console_layer<S>(config: &LogConfig) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
    match config.format {
        LogFormat::Pretty => layer
            .with_line_number(true)
            .with_span_events(span_events(config))
            .boxed(),
        LogFormat::Json => layer
            .json()
            .with_current_span(config.spans)
            .with_span_list(config.spans)
            .boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}

/// JSON lines written to `path`, or to daily files named after it
fn file_layer<S>(path: &Path, config: &LogConfig) -> anyhow::Result<BoxedLayer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let directory = log_directory(path);
    fs::create_dir_all(directory)?;

    let layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_current_span(config.spans)
        .with_span_list(config.spans);

    if config.rotate_daily {
        let prefix = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("tcxrs.log");
        let appender = tracing_appender::rolling::daily(directory, prefix);
        Ok(layer.with_writer(appender).boxed())
    } else {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(layer.with_writer(Mutex::new(file)).boxed())
    }
}

fn log_directory(path: &Path) -> &Path {
    path.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

fn span_events(config: &LogConfig) -> FmtSpan {
    if config.spans {
        FmtSpan::ENTER | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}
