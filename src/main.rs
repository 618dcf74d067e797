//! Songbook CLI application entry point
//!
//! Combines the sheet music of a project (a band, an orchestra, a concert)
//! into a single PDF songbook.
//!
//! # Usage
//!
//! ```bash
//! # Songbook ordered by the playlist ~/sheetmusic/playlists/CoolBand-Concert2025.txt
//! songbook CoolBand-Concert2025.txt
//!
//! # Every file of ~/sheetmusic/CoolBand, alphabetically
//! songbook CoolBand-abc
//!
//! # Show what would be merged
//! songbook build -n CoolBand-Concert2025.txt
//!
//! # Different base path for one run
//! songbook --bp /mnt/scores CoolBand-abc
//! ```
//!
//! # Configuration
//!
//! Settings are read from the user's config directory
//! (`~/.config/songbook/config.toml` on Linux) and `SONGBOOK_*` environment
//! variables. `songbook init` writes the file interactively.

use colored::Colorize;
use songbook::{
    Resolution, Songbook, SongbookError, Warning,
    cli::{BuildArgs, Cli, Commands, ConfigCommands, print_completions},
    config::{self, SongbookConfig},
    merge::PdfMerger,
    naming::PlaylistName,
    output,
};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, SongbookError>;

/// Install the log subscriber; `RUST_LOG` wins over `-v` flags
fn init_tracing(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Apply per-run command line overrides to the loaded configuration
fn apply_overrides(config: &mut SongbookConfig, args: &BuildArgs) {
    if let Some(base_path) = &args.base_path {
        config.base_path.clone_from(base_path);
    }
    if let Some(playlist_dir) = &args.playlist_dir {
        config.playlist_dir.clone_from(playlist_dir);
    }
    if let Some(generic_dir) = &args.generic_dir {
        config.generic_dir.clone_from(generic_dir);
    }
}

fn print_warnings(warnings: &[Warning]) {
    if warnings.is_empty() {
        return;
    }
    eprintln!("\n{}", "WARNINGS:".yellow().bold());
    for warning in warnings {
        eprintln!("{}", output::warning_line(warning));
    }
}

fn print_resolution(resolution: &Resolution, base: &Path) {
    if resolution.entries.is_empty() {
        for (i, path) in resolution.plan.paths().iter().enumerate() {
            println!("{}", output::plan_line(i, path, base));
        }
    } else {
        for entry in &resolution.entries {
            for line in output::entry_lines(entry, base) {
                println!("{line}");
            }
        }
    }
}

/// Handle the build command - resolve a playlist or project folder and merge it
///
/// # Errors
///
/// Returns `SongbookError` if no list is given, the list name is invalid, a
/// source cannot be read, or merging fails. Warnings are printed either way.
fn handle_build_command(mut config: SongbookConfig, args: &BuildArgs, quiet: bool) -> Result<()> {
    apply_overrides(&mut config, args);

    let list = args.list.as_deref().ok_or_else(|| {
        SongbookError::InvalidInput(
            "No playlist given. Use 'songbook <Project>-<Context>.txt' or 'songbook <Project>-abc'.".into(),
        )
    })?;
    let name = PlaylistName::parse(list)?;
    let book = Songbook::new(&config.extension, config.exclusion_prefixes())?;

    let project_dir = config.project_path(&name.project);
    let destination = config.output_path(&name.output_file_name(book.extension()), args.out.as_deref());
    let sink = PdfMerger::new();

    let result = if name.is_alphabetic() {
        if !quiet {
            println!("Collecting all files from: {}", project_dir.display());
            println!("Compiling files sorted by alphabet.");
        }
        if args.dry_run {
            book.plan_by_abc(&project_dir)
        } else {
            book.by_abc(&project_dir, &sink, &destination)
        }
    } else {
        let playlist = config.locate_playlist(list);
        let generic_dir = config.generic_path();
        if !quiet {
            println!("Reading sequence of repertoire from: {}", playlist.display());
            println!("Collecting respective files from: {}", project_dir.display());
            println!("Falling back to generic files from: {}", generic_dir.display());
        }
        if args.dry_run {
            book.plan_by_list(&playlist, &project_dir, &generic_dir)
        } else {
            book.by_list(&playlist, &project_dir, &generic_dir, &sink, &destination)
        }
    };

    match result {
        Ok(resolution) => {
            if !quiet || args.dry_run {
                print_resolution(&resolution, &config.base_path);
            }
            print_warnings(&resolution.warnings);
            if args.dry_run {
                if !quiet {
                    println!("\nDry run: {} file(s), nothing written.", resolution.plan.len());
                }
            } else if !quiet {
                println!(
                    "\nWrote {} file(s) to songbook: {}",
                    resolution.plan.len(),
                    destination.display()
                );
            }
            Ok(())
        }
        Err(e) => {
            print_warnings(e.warnings());
            Err(e)
        }
    }
}

/// Handle the config command - manage application settings
///
/// # Errors
///
/// Returns `SongbookError` if the configuration key is invalid, value parsing fails,
/// or configuration save fails.
fn handle_config_command(mut config: SongbookConfig, command: &ConfigCommands, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Set { setting } => {
            let (key, value) = setting.split_once('=').ok_or_else(|| {
                SongbookError::InvalidInput("Invalid format. Use: songbook config set key=value".into())
            })?;
            let key = key.trim();
            config.set(key, value)?;
            config.save()?;
            if !quiet {
                println!("Set {key} = {}", config.get(key)?);
            }
        }
        ConfigCommands::Get { key } => {
            println!("{}", config.get(key)?);
        }
        ConfigCommands::Path => {
            println!("{}", SongbookConfig::config_path()?.display());
        }
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let config = SongbookConfig::load()?;
    let quiet = cli.quiet || config.quiet;

    match cli.get_command() {
        Commands::Build { args } => handle_build_command(config, &args, quiet),
        Commands::Init => {
            config::first_time_setup(config)?;
            Ok(())
        }
        Commands::Config { command } => handle_config_command(config, &command, quiet),
        Commands::Completions { shell } => {
            print_completions(shell);
            Ok(())
        }
    }
}

/// Main entry point for the songbook application
///
/// Parses command-line arguments, sets up logging, and dispatches to the
/// appropriate command handler. Errors are printed and turn into a failing
/// exit status.
fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.log_filter());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
