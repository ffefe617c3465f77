//! Configuration file persistence for auto-card-embed
//!
//! This module handles loading and saving the settings file in the
//! platform-specific config directory with graceful fallback to defaults.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config directory
const APP_NAME: &str = "auto-card-embed";

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Extension of the temporary file used during atomic writes
const BACKUP_EXTENSION: &str = "json.bak";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for the application.
///
/// - **Windows**: `%APPDATA%\auto-card-embed\`
/// - **macOS**: `~/Library/Application Support/auto-card-embed/`
/// - **Linux**: `~/.config/auto-card-embed/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the config directory cannot be determined
/// (e.g., if the HOME environment variable is not set).
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the configuration file.
pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

// ─────────────────────────────────────────────────────────────────────────────
// Load Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Load configuration from the default config file location.
///
/// Never fails: a missing, empty or corrupted file yields default settings
/// (the latter with a warning in the log).
pub fn load_config() -> Settings {
    get_config_file_path()
        .and_then(|path| load_config_from(&path))
        .unwrap_or_warn_default(Settings::default(), "Failed to load configuration")
}

/// Load configuration from an explicit path.
///
/// # Errors
///
/// - `Error::ConfigLoad`: the file exists but could not be read
/// - `Error::ConfigParse`: the file is not valid settings JSON
pub fn load_config_from(config_path: &Path) -> Result<Settings> {
    if !config_path.exists() {
        debug!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        return Ok(Settings::default());
    }

    debug!("Loading config from: {}", config_path.display());

    let contents = fs::read_to_string(config_path).map_err(|e| Error::ConfigLoad {
        path: config_path.to_path_buf(),
        source: Box::new(e),
    })?;

    if contents.trim().is_empty() {
        debug!("Config file is empty, using defaults");
        return Ok(Settings::default());
    }

    let settings = Settings::from_json_sanitized(&contents).map_err(|e| {
        warn!(
            "Config file at {} contains invalid JSON: {}",
            config_path.display(),
            e
        );
        Error::ConfigParse {
            message: format!("Failed to parse config file: {}", e),
            source: Some(Box::new(e)),
        }
    })?;

    info!(
        "Configuration loaded successfully from {}",
        config_path.display()
    );
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Save configuration to the default config file location.
pub fn save_config(settings: &Settings) -> Result<()> {
    save_config_to(settings, &get_config_file_path()?)
}

/// Save configuration to an explicit path.
///
/// Writes to a sibling `.json.bak` file first and renames it over the
/// target, creating the parent directory when needed.
///
/// # Errors
///
/// Returns `Error::ConfigSave` if the directory, temp file or rename fails.
pub fn save_config_to(settings: &Settings, config_path: &Path) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        if !parent.exists() {
            debug!("Creating config directory: {}", parent.display());
            fs::create_dir_all(parent).map_err(|e| Error::ConfigSave {
                path: parent.to_path_buf(),
                source: Box::new(e),
            })?;
        }
    }

    let backup_path = config_path.with_extension(BACKUP_EXTENSION);

    let json = serde_json::to_string_pretty(settings).map_err(|e| Error::ConfigSave {
        path: config_path.to_path_buf(),
        source: Box::new(e),
    })?;

    fs::write(&backup_path, &json).map_err(|e| Error::ConfigSave {
        path: backup_path.clone(),
        source: Box::new(e),
    })?;

    fs::rename(&backup_path, config_path).map_err(|e| Error::ConfigSave {
        path: config_path.to_path_buf(),
        source: Box::new(e),
    })?;

    info!(
        "Configuration saved successfully to {}",
        config_path.display()
    );
    Ok(())
}

/// Save configuration, ignoring errors.
///
/// Returns `true` if the save was successful, `false` otherwise.
pub fn save_config_silent(settings: &Settings) -> bool {
    match save_config(settings) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save configuration: {}", e);
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;
    use tempfile::TempDir;

    /// Helper to create a test environment with a temporary config directory.
    struct TestEnv {
        _temp_dir: TempDir,
        config_file: PathBuf,
    }

    impl TestEnv {
        fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let config_file = temp_dir.path().join(APP_NAME).join(CONFIG_FILE_NAME);
            Self {
                _temp_dir: temp_dir,
                config_file,
            }
        }

        fn write_config(&self, content: &str) {
            fs::create_dir_all(self.config_file.parent().unwrap()).unwrap();
            fs::write(&self.config_file, content).expect("Failed to write config");
        }
    }

    #[test]
    fn test_get_config_file_path() {
        if let Ok(path) = get_config_file_path() {
            assert!(path.to_string_lossy().contains(APP_NAME));
            assert!(path.to_string_lossy().ends_with(CONFIG_FILE_NAME));
        }
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let env = TestEnv::new();
        let settings = load_config_from(&env.config_file).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_empty_file_uses_defaults() {
        let env = TestEnv::new();
        env.write_config("   \n");
        let settings = load_config_from(&env.config_file).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_corrupted_file_is_parse_error() {
        let env = TestEnv::new();
        env.write_config("{ not json");
        let result = load_config_from(&env.config_file);
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let env = TestEnv::new();
        let original = Settings {
            show_popup_on_paste: false,
            enable_twitter_embed: false,
            theme: Theme::Dark,
            height_cache_capacity: 32,
            user_agent: Some("cards/1.0".to_string()),
            ..Settings::default()
        };

        save_config_to(&original, &env.config_file).unwrap();
        let loaded = load_config_from(&env.config_file).unwrap();

        assert_eq!(original, loaded);
        assert!(!env.config_file.with_extension(BACKUP_EXTENSION).exists());
    }

    #[test]
    fn test_load_sanitizes_values() {
        let env = TestEnv::new();
        env.write_config(r#"{"height_cache_capacity": 0}"#);
        let settings = load_config_from(&env.config_file).unwrap();
        assert_eq!(settings.height_cache_capacity, 1);
    }

    #[test]
    fn test_load_config_graceful_fallback() {
        // Always returns usable settings, whatever is on disk
        let settings = load_config();
        assert!(settings.height_cache_capacity >= Settings::MIN_HEIGHT_CACHE_CAPACITY);
    }
}
