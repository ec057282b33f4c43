//! CLI module - Command-line interface for the job board
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Job board server and maintenance tools
#[derive(Parser)]
#[command(name = "jobboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API with the background scheduler
    #[command(alias = "daemon", alias = "d")]
    Serve,

    /// Deactivate expired jobs and prune stale reset codes once
    #[command(alias = "check", alias = "c")]
    Sweep,

    /// List currently active jobs
    #[command(alias = "ls", alias = "l")]
    Jobs {
        /// Only jobs whose title or description contains this text
        #[arg(long, short)]
        search: Option<String>,

        /// Maximum number of jobs to show
        #[arg(long, short, default_value = "20")]
        limit: u64,
    },

    /// Create default config file
    #[command(alias = "i")]
    Init,
}

pub use commands::*;
