//! CLI module for Ideacrew.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Ideacrew - YouTube comments to video ideas
///
/// A crew of AI agents that filters viewer comments, turns them into video
/// ideas, researches comparable videos and scores the results.
#[derive(Parser, Debug)]
#[command(name = "ideacrew")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the pipeline over a set of comments
    Run {
        /// Comments file (JSON array, {"comments": [...]}, or one comment per line)
        #[arg(long, conflicts_with = "video", required_unless_present = "video")]
        comments: Option<String>,

        /// Fetch comments from a YouTube video (URL or ID)
        #[arg(long)]
        video: Option<String>,

        /// Maximum number of comments to process
        #[arg(long)]
        max_comments: Option<usize>,

        /// Write the ideas to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Output format (json, toml, markdown)
        #[arg(long, default_value = "json")]
        format: String,

        /// Chat model to use for all agents
        #[arg(short, long)]
        model: Option<String>,

        /// Print each stage's raw output after the run
        #[arg(long)]
        show_stages: bool,
    },

    /// Check API keys and configuration
    Doctor,

    /// Inspect or export the agent and task prompts
    Prompts {
        #[command(subcommand)]
        action: PromptsAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum PromptsAction {
    /// Print the effective prompts as TOML
    Show,

    /// Write agents.toml and tasks.toml into a directory for customization
    Export {
        /// Target directory
        dir: String,
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
