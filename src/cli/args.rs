//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Skill tree engine: progress modes, routing, tooltips and click handling
#[derive(Parser, Debug)]
#[command(name = "skilltree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Skill document (.json or .toml); default: config `skills_file`, else demo tree
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath, env = "SKILLTREE_FILE")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the root tooltip for a points/max ratio
    Describe {
        /// Allocated points
        #[arg(allow_negative_numbers = true)]
        points: i64,
        /// Maximum points
        #[arg(allow_negative_numbers = true)]
        max_points: i64,
    },

    /// Show the skill tree with point badges
    Show,

    /// Print the tooltip of a leaf
    Tooltip {
        /// Leaf name
        leaf: String,
    },

    /// Add points to leaves, in order
    Upgrade {
        /// Leaf names
        #[arg(required = true)]
        leaves: Vec<String>,
        /// Points per step
        #[arg(short = 'n', long, default_value_t = 1)]
        points: i32,
    },

    /// Remove points from leaves, in order
    Downgrade {
        /// Leaf names
        #[arg(required = true)]
        leaves: Vec<String>,
        /// Points per step
        #[arg(short = 'n', long, default_value_t = 1)]
        points: i32,
    },

    /// Simulate a mouse click at a position
    Click {
        x: f32,
        y: f32,
        /// Right click (downgrade) instead of left click (upgrade)
        #[arg(long)]
        right: bool,
    },

    /// Show the branch path between two leaves
    Route {
        from: String,
        to: String,
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

    /// Create config template
    Init {
        /// Create global config instead of ./.skilltree.toml
        #[arg(short, long)]
        global: bool,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
