//! CLI module for Coursescout.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::config::Settings;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Coursescout - find the right free course
///
/// Semantic search over a catalog of free online courses, with an AI advisor
/// that explains which of the retrieved courses fit your goal.
#[derive(Parser, Debug)]
#[command(name = "coursescout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Course catalog CSV (overrides catalog.path)
    #[arg(long, global = true, env = "COURSESCOUT_CATALOG")]
    pub catalog: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Config file in effect: `--config` if given, else the default location.
    pub fn config_path(&self) -> PathBuf {
        match &self.config {
            Some(path) => Settings::expand_path(path),
            None => Settings::default_config_path(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the catalog and get an AI analysis of the best matches
    Search {
        /// What you would like to learn
        query: String,

        /// Number of courses to retrieve (default: search.default_k)
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Build the index once, then answer queries from stdin
    Interactive {
        /// Number of courses to retrieve per query (default: search.default_k)
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// List the courses in the catalog
    List,

    /// Start HTTP API server for integration with other systems
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Check configuration and required files
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
