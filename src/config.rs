//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "seat-hold")]
#[command(about = "A reload-resilient seat-hold countdown service")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Seat hold duration in minutes (at least 1)
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u64).range(1..))]
    pub hold_minutes: u64,

    /// JSON file persisting the hold deadline across restarts
    #[arg(short, long, default_value = "seat-hold.json")]
    pub store: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn hold_duration(&self) -> Duration {
        Duration::from_secs(self.hold_minutes.saturating_mul(60))
    }
}
