//! Command-line interface definition.

use std::path::PathBuf;

use clap::Parser;
use icsfeed_core::TracingOutputFormat;

/// icsfeed - merge upstream event feeds into one iCalendar subscription
#[derive(Debug, Parser)]
#[command(name = "icsfeed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "ICSFEED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on (overrides the config file)
    #[arg(long, short, env = "ICSFEED_BIND")]
    pub bind: Option<String>,

    /// Upstream listing endpoint (overrides the config file)
    #[arg(long, env = "ICSFEED_UPSTREAM_URL")]
    pub upstream_url: Option<String>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, env = "ICSFEED_LOG_FORMAT")]
    pub log_format: LogFormat,
}

/// Log output format selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Multi-line human output
    Pretty,
    /// Single-line human output
    Compact,
    /// One JSON object per line
    Json,
}

impl From<LogFormat> for TracingOutputFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
            LogFormat::Json => Self::Json,
        }
    }
}
