//! Configuration module for songbook
//!
//! Manages the folder layout and matching settings. Configuration is stored
//! in the user's config directory and may be overridden by `SONGBOOK_*`
//! environment variables and, for a single run, by command line flags.

mod setup;

pub use setup::first_time_setup;

use crate::resolve::ExclusionPrefixes;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Keys accepted by `get` and `set`
pub const KEYS: [&str; 6] = [
    "base_path",
    "playlist_dir",
    "generic_dir",
    "extension",
    "excluded_prefixes",
    "quiet",
];

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SongbookConfig {
    /// Parent folder of project folders, the generic folder and playlists
    pub base_path: PathBuf,

    /// Playlist folder, relative to the base path
    pub playlist_dir: PathBuf,

    /// Folder with generic files, relative to the base path
    pub generic_dir: PathBuf,

    /// Extension of the files to merge
    pub extension: String,

    /// File name prefixes left out of alphabetic songbooks
    pub excluded_prefixes: Vec<String>,

    /// Suppress informational output by default
    pub quiet: bool,
}

impl Default for SongbookConfig {
    fn default() -> Self {
        Self {
            base_path: dirs::home_dir().unwrap_or_default().join("sheetmusic"),
            playlist_dir: PathBuf::from("playlists"),
            generic_dir: PathBuf::from("Original"),
            extension: "pdf".to_string(),
            excluded_prefixes: vec!["zzz".to_string(), "ZZZ".to_string()],
            quiet: false,
        }
    }
}

impl SongbookConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("songbook").join("config.toml"))
    }

    /// Load configuration from the user's config file and the environment
    ///
    /// A missing file is not an error; defaults are used.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path` and the environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("SONGBOOK")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("excluded_prefixes"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to the user's config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or its folder cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Absolute playlist folder
    #[must_use]
    pub fn playlist_path(&self) -> PathBuf {
        self.base_path.join(&self.playlist_dir)
    }

    /// Absolute generic folder
    #[must_use]
    pub fn generic_path(&self) -> PathBuf {
        self.base_path.join(&self.generic_dir)
    }

    /// Folder holding a project's files
    #[must_use]
    pub fn project_path(&self, project: &str) -> PathBuf {
        self.base_path.join(project)
    }

    /// Locate the playlist file for a LIST argument
    ///
    /// An existing file given with a directory part is used as given;
    /// anything else is looked up in the playlist folder.
    #[must_use]
    pub fn locate_playlist(&self, list: &str) -> PathBuf {
        let given = Path::new(list);
        if given.components().count() > 1 && given.is_file() {
            given.to_path_buf()
        } else {
            self.playlist_path().join(list)
        }
    }

    /// Songbook destination: `out` when given, else `<base>/<file_name>`
    #[must_use]
    pub fn output_path(&self, file_name: &str, out: Option<&Path>) -> PathBuf {
        out.map_or_else(|| self.base_path.join(file_name), Path::to_path_buf)
    }

    #[must_use]
    pub fn exclusion_prefixes(&self) -> ExclusionPrefixes {
        ExclusionPrefixes::new(self.excluded_prefixes.iter().cloned())
    }

    /// Get a configuration value as text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` for unknown keys.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "base_path" => self.base_path.display().to_string(),
            "playlist_dir" => self.playlist_dir.display().to_string(),
            "generic_dir" => self.generic_dir.display().to_string(),
            "extension" => self.extension.clone(),
            "excluded_prefixes" => self.excluded_prefixes.join(","),
            "quiet" => self.quiet.to_string(),
            _ => return Err(ConfigError::NotFound(unknown_key(key))),
        };
        Ok(value)
    }

    /// Set a configuration value from text
    ///
    /// `excluded_prefixes` takes a comma separated list; an empty value clears it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` for unknown keys and `ConfigError::Message`
    /// for values that cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "base_path" => self.base_path = PathBuf::from(value),
            "playlist_dir" => self.playlist_dir = PathBuf::from(value),
            "generic_dir" => self.generic_dir = PathBuf::from(value),
            "extension" => {
                let extension = value.trim_start_matches('.');
                if extension.is_empty() {
                    return Err(ConfigError::Message("extension must not be empty".to_string()));
                }
                self.extension = extension.to_string();
            }
            "excluded_prefixes" => {
                self.excluded_prefixes = value
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from)
                    .collect();
            }
            "quiet" => {
                self.quiet = value.parse::<bool>().map_err(|_| {
                    ConfigError::Message(format!("Invalid value for quiet: '{value}'. Use 'true' or 'false'"))
                })?;
            }
            _ => return Err(ConfigError::NotFound(unknown_key(key))),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> String {
    format!("Unknown configuration key: '{key}'. Available keys: {}", KEYS.join(", "))
}
