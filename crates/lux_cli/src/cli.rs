use clap::{Parser, ValueEnum};
use log::LevelFilter;

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
#[derive(Parser, Debug)]
#[command(name = "lux")]
#[command(about = "Render a scene file with the Lux ray tracer")]
pub struct Args {
    /// Scene description (.txt line format or .json)
    pub scene_file: String,

    /// Output image path (format from extension, e.g. .png)
    pub output_image: String,

    /// Image width in pixels
    #[arg(long, default_value_t = 500)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 500)]
    pub height: u32,

    /// Seed for soft-shadow sample jitter
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
