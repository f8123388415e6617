//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Medigram using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Medigram - Patient Records Service
#[derive(Parser, Debug)]
#[command(name = "medigram")]
#[command(version, about, long_about = None)]
#[command(author = "Medigram Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "medigram.toml", env = "MEDIGRAM_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "MEDIGRAM_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API
    Serve(commands::serve::ServeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
