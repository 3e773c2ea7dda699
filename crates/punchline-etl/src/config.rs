use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use punchline_core::{Determiners, MatchMode};

use crate::load::{DataSource, LoadOptions, DEFAULT_PATTERN};

/// Datamuse "means like" endpoint.
pub const DEFAULT_SYNONYM_ENDPOINT: &str = "https://api.datamuse.com/words";

/// Configuration for punchline.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (PUNCH_* prefix)
/// 3. Config file (~/.config/punchline/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// A CSV file, or a directory of CSV files.
    ///
    /// Can be set via:
    /// - CLI: --data /path/to/similes
    /// - ENV: PUNCH_DATA_PATH
    /// - Config: data_path = "/path/to/similes"
    /// - Default: ~/.local/share/punchline
    pub data_path: PathBuf,

    /// File name glob used when `data_path` is a directory.
    pub file_pattern: String,

    /// Drop rows whose (artist, line) pair already appeared.
    pub dedupe: bool,

    /// Default match policy for `search` and `browse`.
    pub match_mode: MatchMode,

    /// Maximum number of matches rendered per query.
    pub result_limit: usize,

    /// Number of random records shown for an empty query.
    pub sample_size: usize,

    /// Leading words stripped before last-word matching.
    pub determiners: Determiners,

    pub synonyms: SynonymSettings,

    pub logging: twyg::Opts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            file_pattern: DEFAULT_PATTERN.to_string(),
            dedupe: true,
            match_mode: MatchMode::default(),
            result_limit: 50,
            sample_size: 5,
            determiners: Determiners::default(),
            synonyms: SynonymSettings::default(),
            logging: twyg::Opts::default(),
        }
    }
}

/// Settings for the word-relatedness service used by `expanded` matching.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SynonymSettings {
    pub enabled: bool,
    pub endpoint: String,
    /// Related terms requested per word.
    pub max_results: usize,
    pub timeout_secs: u64,
}

impl Default for SynonymSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_SYNONYM_ENDPOINT.to_string(),
            max_results: 4,
            timeout_secs: 3,
        }
    }
}

impl SynonymSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/punchline/config.toml
    /// Reads environment variables with PUNCH_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new()
            .context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path.to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder.add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("punch");
        builder.add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build()
            .context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration with a custom data location.
    ///
    /// This is used when the --data CLI flag is provided.
    pub fn load_with_data_path(data_path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.data_path = data_path;
        Ok(config)
    }

    pub fn data_source(&self) -> DataSource {
        DataSource::from_path(self.data_path.clone(), &self.file_pattern)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            dedupe: self.dedupe,
        }
    }
}

/// Get the default data location.
///
/// Returns: ~/.local/share/punchline (or platform equivalent)
fn default_data_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("punchline")
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/punchline/config.toml
/// - macOS: ~/Library/Application Support/punchline/config.toml
/// - Windows: %APPDATA%\punchline\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("punchline")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Punchline Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (PUNCH_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Simile data: one CSV file, or a directory of CSV files
#
# Columns: line, artist, song (and optionally signified, signifier)
#
# Can also be set via:
# - CLI: punchline --data /path/to/similes search ice
# - Environment: PUNCH_DATA_PATH=/path/to/similes
#
# Default: Platform-specific data directory
#data_path = "/path/to/similes"

# File name pattern used when data_path is a directory
file_pattern = "*.csv"

# Drop rows whose (artist, line) pair already appeared in an earlier file
dedupe = true

# Match policy: substring, last-word, word-boundary or expanded
match_mode = "word-boundary"

# Maximum number of matches shown per query
result_limit = 50

# Number of random similes shown for an empty query
sample_size = 5

# Leading words ignored by last-word matching ("the wolf" compares as "wolf")
determiners = ["a", "an", "the", "my", "his", "her", "your", "our", "their", "that", "this"]

[synonyms]
# Related-word lookups for the "expanded" match mode
enabled = true
endpoint = "https://api.datamuse.com/words"
max_results = 4
timeout_secs = 3
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config())
        .context("Failed to write config file")?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.data_path.as_os_str().is_empty());
        assert_eq!(config.file_pattern, "*.csv");
        assert_eq!(config.match_mode, MatchMode::WordBoundary);
        assert_eq!(config.result_limit, 50);
        assert_eq!(config.sample_size, 5);
        assert!(config.dedupe);
    }

    #[test]
    fn test_default_synonym_settings() {
        let settings = SynonymSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.max_results, 4);
        assert_eq!(settings.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_config_load() {
        // Should not fail even if config file doesn't exist
        let result = Config::load();
        assert!(result.is_ok());
    }

    #[test]
    fn test_config_with_custom_data_path() {
        let custom_path = PathBuf::from("/tmp/similes.csv");
        let config = Config::load_with_data_path(custom_path.clone());
        assert!(config.is_ok());
        assert_eq!(config.unwrap().data_path, custom_path);
    }

    #[test]
    fn test_data_source_for_missing_path_is_file() {
        let config = Config {
            data_path: PathBuf::from("/no/such/simile_database.csv"),
            ..Config::default()
        };
        assert_eq!(
            config.data_source(),
            DataSource::File(PathBuf::from("/no/such/simile_database.csv"))
        );
    }

    #[test]
    fn test_load_options_follow_dedupe() {
        let config = Config {
            dedupe: false,
            ..Config::default()
        };
        assert!(!config.load_options().dedupe);
    }
}
