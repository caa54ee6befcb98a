use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

use crate::scenes::SceneKind;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "ember")]
#[command(about = "A CPU Monte Carlo path tracer", version)]
pub struct Args {
    /// Demo scene to render
    #[arg(long, value_enum, default_value_t = SceneKind::CornellBox)]
    pub scene: SceneKind,

    /// Image width in pixels (overrides the scene)
    #[arg(long)]
    pub width: Option<u32>,

    /// Samples per pixel (overrides the scene)
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Maximum bounce depth (overrides the scene)
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Worker threads, defaults to one per logical core
    #[arg(long, short = 't')]
    pub threads: Option<usize>,

    /// Seed for scene generation and sampling
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// JSON file with camera settings overriding the scene's
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Output file (.ppm or .png); PPM goes to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Logging level, overridable with RUST_LOG
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}
