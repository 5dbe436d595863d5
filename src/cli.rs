use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::LoggingMode;

#[derive(Parser)]
#[command(name = "logboss")]
#[command(about = "Find, highlight, comment out and remove console logging", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        value_enum,
        default_value_t = LoggingMode::Stderr,
        hide = true
    )]
    pub logging_mode: LoggingMode,

    /// Verbose logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Directory holding the persisted per-file state
    #[arg(long, env = "LOGBOSS_STATE_DIR", global = true)]
    pub state_dir: Option<PathBuf>,
}

#[derive(Args, Clone, Debug, Default)]
pub struct Targets {
    /// Files or folders to process (default: the active file)
    pub paths: Vec<PathBuf>,

    /// Source file extensions to pick up when expanding folders
    #[arg(long = "ext")]
    pub extensions: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Highlight console statements
    Highlight(Targets),
    /// Remove console highlighting
    RemoveHighlight(Targets),
    /// Highlight, or remove highlighting if already highlighted
    ToggleHighlight(Targets),
    /// Comment out console statements
    Comment(Targets),
    /// Uncomment commented-out console statements
    Uncomment(Targets),
    /// Delete console statements, including commented-out ones
    RemoveLogs(Targets),
    /// Comment or uncomment console statements depending on file state
    ToggleComments(Targets),
    /// Make a file the active file
    Open {
        path: PathBuf,
    },
    /// List located console statements
    Scan {
        #[command(flatten)]
        targets: Targets,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Show persisted state of a file (default: the active file)
    Status {
        path: Option<PathBuf>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// List candidate source files, active file first
    Files {
        /// Folder to search (default: current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        #[arg(long = "ext")]
        extensions: Vec<String>,
    },
}
