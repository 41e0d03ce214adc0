// RPTO Leads - platform/config.rs
//
// Platform-specific data directory resolution and config.toml loading
// with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for configuration and the lead table.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/rptoleads/)
    pub config_dir: PathBuf,

    /// Data directory holding the lead table.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
                data_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of the lead table.
    pub fn default_store_file(&self) -> PathBuf {
        self.data_dir.join(constants::STORE_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[store]` section.
    pub store: StoreSection,
    /// `[export]` section.
    pub export: ExportSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[store]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Path of the JSON lead table (default: platform data dir).
    pub file: Option<String>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// Export file name prefix.
    pub file_prefix: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce a `ConfigError` and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Explicit lead table path; `None` = platform default.
    pub store_file: Option<PathBuf>,

    /// Prefix for export file names.
    pub export_file_prefix: String,

    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_file: None,
            export_file_prefix: constants::DEFAULT_EXPORT_FILE_PREFIX.to_string(),
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and every problem found.
/// If the file does not exist, returns defaults with no problems (first run).
/// An unreadable or unparseable file yields defaults plus one error.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<ConfigError>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let err = ConfigError::Io {
                path: config_path,
                source: e,
            };
            return (AppConfig::default(), vec![err]);
        }
    };

    match toml::from_str::<RawConfig>(&content) {
        Ok(raw) => {
            tracing::info!(path = %config_path.display(), "Loaded config.toml");
            validate(raw)
        }
        Err(e) => {
            let err = ConfigError::TomlParse {
                path: config_path,
                source: e,
            };
            (AppConfig::default(), vec![err])
        }
    }
}

/// Validate each field, accumulating all errors.
fn validate(raw: RawConfig) -> (AppConfig, Vec<ConfigError>) {
    let mut config = AppConfig::default();
    let mut errors = Vec::new();

    // -- Store: file --
    if let Some(file) = raw.store.file {
        if !file.trim().is_empty() {
            config.store_file = Some(PathBuf::from(file));
        }
    }

    // -- Export: file_prefix --
    if let Some(prefix) = raw.export.file_prefix {
        let valid_chars = prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !prefix.is_empty() && prefix.len() <= constants::MAX_EXPORT_PREFIX_LEN && valid_chars {
            config.export_file_prefix = prefix;
        } else {
            errors.push(ConfigError::ValueOutOfRange {
                field: "[export] file_prefix".to_string(),
                value: prefix,
                expected: format!(
                    "1-{} characters of A-Z, a-z, 0-9, '_' or '-'",
                    constants::MAX_EXPORT_PREFIX_LEN
                ),
            });
        }
    }

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level);
        } else {
            errors.push(ConfigError::ValueOutOfRange {
                field: "[logging] level".to_string(),
                value: level,
                expected: "error, warn, info, debug or trace".to_string(),
            });
        }
    }

    (config, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) {
        std::fs::write(dir.path().join(constants::CONFIG_FILE_NAME), body).unwrap();
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let (config, errors) = load_config(dir.path());
        assert!(errors.is_empty());
        assert_eq!(config.export_file_prefix, constants::DEFAULT_EXPORT_FILE_PREFIX);
        assert!(config.store_file.is_none());
    }

    #[test]
    fn test_valid_config() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            "[store]\nfile = \"/srv/leads.json\"\n\n[export]\nfile_prefix = \"north_zone\"\n\n\
             [logging]\nlevel = \"debug\"\n\n[unknown]\nkey = 1\n",
        );
        let (config, errors) = load_config(dir.path());
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert_eq!(config.store_file, Some(PathBuf::from("/srv/leads.json")));
        assert_eq!(config.export_file_prefix, "north_zone");
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            "[export]\nfile_prefix = \"../escape\"\n[logging]\nlevel = \"loud\"\n",
        );
        let (config, errors) = load_config(dir.path());
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| matches!(e, ConfigError::ValueOutOfRange { .. })));
        assert_eq!(config.export_file_prefix, constants::DEFAULT_EXPORT_FILE_PREFIX);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_malformed_toml() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "[store\nfile = ");
        let (_, errors) = load_config(dir.path());
        assert!(matches!(errors.as_slice(), [ConfigError::TomlParse { .. }]));
    }
}
