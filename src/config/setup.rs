//! Interactive setup wizard
//!
//! Asks for the base folder and the generic folder and writes the answers to
//! the user's config file.

use super::SongbookConfig;
use config::ConfigError;
use dialoguer::{Input, theme::ColorfulTheme};
use std::path::PathBuf;

/// Interactive first-time setup - prompts for the folder layout
///
/// Starts from `current` so re-running the wizard keeps earlier answers as
/// defaults:
/// 1. Prompts for the base path (default: `~/sheetmusic`)
/// 2. Prompts for the generic folder name (default: `Original`)
/// 3. Saves the configuration
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - User input cannot be read
/// - The configuration cannot be saved
pub fn first_time_setup(current: SongbookConfig) -> Result<SongbookConfig, ConfigError> {
    println!("Welcome to songbook! Let's set up your sheet music folders.\n");

    let base_path: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Base path")
        .default(current.base_path.to_string_lossy().to_string())
        .interact_text()
        .map_err(|e| ConfigError::Message(format!("Failed to read input: {e}")))?;

    let generic_dir: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Folder with generic sheet music (relative to base path)")
        .default(current.generic_dir.to_string_lossy().to_string())
        .interact_text()
        .map_err(|e| ConfigError::Message(format!("Failed to read input: {e}")))?;

    let config = SongbookConfig {
        base_path: PathBuf::from(base_path),
        generic_dir: PathBuf::from(generic_dir),
        ..current
    };
    config.save()?;

    println!("\nConfiguration saved to {}", SongbookConfig::config_path()?.display());
    Ok(config)
}
