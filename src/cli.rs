//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for songbook using the `clap` crate.
//!
//! # Commands
//!
//! - **build** (default): merge a songbook from a playlist or alphabetically
//! - **init**: interactive configuration wizard
//! - **config**: read and change single configuration values
//! - **completions**: print shell completions
//!
//! A playlist name may be given directly without `build`:
//!
//! ```text
//! songbook TheKeltners-shortSet2025.txt
//! songbook TheKeltners-abc
//! ```

use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Playlists are named <Project>-<Context>[-...].txt and live in the playlist
folder. Each line names one song; blank lines and lines starting with '#' are
ignored. Titles match file names ignoring case, spaces and punctuation, and a
title matching several files includes all of them. Titles missing from the
project folder are looked up in the generic folder.

Use <Project>-abc instead of a playlist to merge every file of the project
folder in alphabetical order. Files starting with 'zzz' or 'ZZZ' are left out.";

/// Options of a songbook build
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildArgs {
    /// Playlist file name (e.g. CoolBand-Concert2025.txt) or <Project>-abc
    #[arg(value_name = "LIST")]
    pub list: Option<String>,

    /// Base path (overrides config)
    #[arg(long = "bp", value_name = "PATH")]
    pub base_path: Option<PathBuf>,

    /// Playlist folder, relative to the base path (overrides config)
    #[arg(long = "lp", value_name = "DIR")]
    pub playlist_dir: Option<PathBuf>,

    /// Folder with generic files, relative to the base path (overrides config)
    #[arg(long = "gendir", value_name = "DIR")]
    pub generic_dir: Option<PathBuf>,

    /// Write the songbook here instead of <base>/<Project>-<Context>.pdf
    #[arg(short = 'o', long = "out", value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Resolve and show the plan without writing a songbook
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,
}

/// Configuration management subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key=value (e.g., generic_dir=Original)
        #[arg(value_name = "KEY=VALUE")]
        setting: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key to retrieve (e.g., base_path)
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Print the config file location
    Path,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Merge a songbook (default)
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        args: BuildArgs,
    },

    /// Set up the configuration interactively
    Init,

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "songbook")]
#[command(about = "Merge sheet music files into a songbook, ordered by a playlist or by alphabet", long_about = None)]
#[command(version, after_help = AFTER_HELP)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub build: BuildArgs,

    /// Suppress informational output (warnings and errors are still shown)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl Cli {
    /// Parse command-line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Resolve the command to run, treating bare build options as `build`
    #[must_use]
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or_else(|| Commands::Build {
            args: self.build.clone(),
        })
    }

    /// Log filter implied by `-v` flags
    #[must_use]
    pub const fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "songbook=warn",
            1 => "songbook=info",
            2 => "songbook=debug",
            _ => "songbook=trace",
        }
    }
}

/// Write completions for `shell` to stdout
pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
}
