//! Logging setup for the `emadocs` binary
//!
//! A `tracing-subscriber` registry with a per-target filter and a selectable
//! output format.

use std::io;

use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Multi-line, coloured, with timestamps.
    Pretty,
    /// One line per event, no timestamps.
    Compact,
    /// Machine-readable, one JSON object per event.
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean
/// for `tokens` and `ast` dumps.
pub fn init(level: LogLevel, format: LogFormat) {
    let level = LevelFilter::from(level);
    let targets = Targets::new()
        .with_default(LevelFilter::WARN.min(level))
        .with_target("emadocs_compiler", level)
        .with_target("emadocs", level);

    let layer = create_format_layer(format).with_filter(targets);
    tracing_subscriber::registry().with(layer).init();
}

fn create_format_layer(format: LogFormat) -> Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync> {
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .without_time()
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(io::stderr)
            .boxed(),
    }
}
