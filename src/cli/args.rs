//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `check`: Run consistency checks across locale files and source code
//! - `usage`: Report where translation keys are used
//! - `rename`: Rename a key in source code and locale files
//! - `init`: Initialize a gloss configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::config::ExtractionMode;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }
}

/// Common arguments shared by the scanning commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Source code root directory (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Translations directory (overrides config file)
    #[arg(long)]
    pub translations_root: Option<PathBuf>,

    /// Key extraction mode (overrides config file)
    #[arg(long, value_enum)]
    pub mode: Option<ExtractionMode>,

    /// Print machine-readable JSON instead of the human report
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Treat placeholder and plural mismatches as errors
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Args)]
pub struct UsageCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Group keys per page via the import graph instead of flat counts
    #[arg(long)]
    pub pages: bool,
}

#[derive(Debug, Args)]
pub struct RenameCommand {
    /// Key to rename
    pub old: String,

    /// New key name
    pub new: String,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Only rewrite source code, leaving locale files untouched
    #[arg(long)]
    pub code_only: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check locale files and source code for consistency issues
    Check(CheckCommand),
    /// Report translation key usage across the source tree
    Usage(UsageCommand),
    /// Rename a translation key in source code and locale files
    Rename(RenameCommand),
    /// Initialize a new .glossrc.json configuration file
    Init,
}
