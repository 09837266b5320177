use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Verbosity selectable from the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    /// Only failures
    Error,
    /// Failures and suspicious conditions
    Warn,
    /// Render progress and timings
    Info,
    /// Internal detail useful when debugging
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// The `log` filter this verbosity corresponds to.
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

/// Parse a Russian-roulette limit, which must lie in (0, 1].
fn parse_rr_limit(value: &str) -> Result<f64, String> {
    let limit: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if limit > 0.0 && limit <= 1.0 {
        Ok(limit)
    } else {
        Err(format!("{limit} is outside (0, 1]"))
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Parser)]
#[command(name = "lumapath")]
#[command(about = "A physically based Monte Carlo path tracer")]
pub struct Args {
    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// Image width in pixels
    #[arg(long, default_value = "800", help = "Image width in pixels")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "600", help = "Image height in pixels")]
    pub height: u32,

    /// Number of samples per pixel
    #[arg(long, short = 's', default_value = "100", help = "Number of samples per pixel")]
    pub samples_per_pixel: u32,

    /// Maximum number of ray bounces
    #[arg(long, short = 'd', default_value = "8", help = "Maximum number of ray bounces")]
    pub max_depth: u32,

    /// Russian-roulette limit in (0, 1]; lower values keep more paths alive
    #[arg(
        long,
        default_value = "0.25",
        value_parser = parse_rr_limit,
        help = "Russian-roulette limit in (0, 1]; lower values keep more paths alive"
    )]
    pub rr_limit: f64,

    /// Seed for the per-pixel random number streams
    #[arg(long, default_value = "0", help = "Seed for the per-pixel random number streams")]
    pub seed: u64,

    /// Output file path (.png for 8-bit with gamma correction, .exr for HDR linear)
    #[arg(
        short,
        long,
        default_value = "output.png",
        help = "Output file path (.png for 8-bit with gamma correction, .exr for HDR linear)"
    )]
    pub output: String,
}
