//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::config::TreeStyle;

/// Navigable tree model for block-structured documents
#[derive(Parser, Debug)]
#[command(name = "blocktree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Config file, layered on top of the global config
    #[arg(short, long, global = true, env = "BLOCKTREE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the block tree and print it
    Tree {
        /// JSON block list, `-` for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Start at the block with this id
        #[arg(long)]
        from: Option<String>,
        /// Rendering style (default from config)
        #[arg(long, value_enum)]
        style: Option<TreeStyle>,
    },

    /// Build the block tree and write it back as nested JSON
    Flatten {
        /// JSON block list, `-` for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Start at the block with this id (it and its following siblings)
        #[arg(long)]
        from: Option<String>,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
        /// Write to file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Show node count, depth, leaves and temporary ids
    Stats {
        /// JSON block list, `-` for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print config template
    Template,

    /// Show config paths
    Path,
}
