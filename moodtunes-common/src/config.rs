//! Configuration loading and config file resolution
//!
//! All settings live in an optional TOML file. A missing file is not an
//! error: the service starts with compiled defaults. Command-line flags are
//! applied on top by the binaries.

use crate::emotion::AliasTable;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "MOODTUNES_CONFIG";

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "moodtunes.toml";

/// Logging section of the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Contents of the TOML config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub bind_addr: String,
    pub port: u16,
    /// Classifier artifact (JSON)
    pub model_path: PathBuf,
    /// Song catalog (CSV)
    pub catalog_path: PathBuf,
    /// Prediction log database (SQLite)
    pub database_path: PathBuf,
    /// Songs returned per recommendation
    pub song_limit: usize,
    pub logging: LoggingConfig,
    /// Replaces the built-in alias table when present
    pub aliases: Option<BTreeMap<String, String>>,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 5000,
            model_path: PathBuf::from("model/emotion_model.json"),
            catalog_path: PathBuf::from("data/songs.csv"),
            database_path: PathBuf::from("data/moodtunes.db"),
            song_limit: crate::catalog::DEFAULT_SONG_LIMIT,
            logging: LoggingConfig::default(),
            aliases: None,
        }
    }
}

impl TomlConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    fn validate(&self) -> Result<()> {
        if self.song_limit == 0 {
            return Err(Error::Config("song_limit must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Replace file values with the ones given on the command line
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(bind_addr) = &overrides.bind_addr {
            self.bind_addr = bind_addr.clone();
        }
        if let Some(model_path) = &overrides.model_path {
            self.model_path = model_path.clone();
        }
        if let Some(catalog_path) = &overrides.catalog_path {
            self.catalog_path = catalog_path.clone();
        }
        if let Some(database_path) = &overrides.database_path {
            self.database_path = database_path.clone();
        }
    }

    /// Alias table from the `[aliases]` section, or the built-in defaults
    pub fn alias_table(&self) -> Result<AliasTable> {
        match &self.aliases {
            Some(aliases) => AliasTable::new(aliases),
            None => Ok(AliasTable::default()),
        }
    }
}

/// Settings given on the command line; `None` keeps the file value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub bind_addr: Option<String>,
    pub model_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
}

/// Locate the config file
///
/// Priority order:
/// 1. Command-line argument
/// 2. `MOODTUNES_CONFIG` environment variable
/// 3. `./moodtunes.toml`
/// 4. `<platform config dir>/moodtunes/config.toml`
///
/// Explicit locations (1, 2) are returned even if the file does not exist;
/// implicit ones only when present.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|d| d.join("moodtunes").join("config.toml"))
        .filter(|p| p.exists())
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from this file
    File(PathBuf),
    /// An explicit location was given but nothing exists there
    Missing(PathBuf),
    /// No config file anywhere; compiled defaults
    Defaults,
}

/// Resolve and load the config file, falling back to defaults when missing
///
/// Does not log: it runs before the tracing subscriber is installed, so the
/// caller reports the returned [`ConfigSource`].
pub fn load_config(cli_arg: Option<&Path>) -> Result<(TomlConfig, ConfigSource)> {
    match resolve_config_path(cli_arg) {
        Some(path) if path.exists() => {
            let config = TomlConfig::load(&path)?;
            Ok((config, ConfigSource::File(path)))
        }
        Some(path) => Ok((TomlConfig::default(), ConfigSource::Missing(path))),
        None => Ok((TomlConfig::default(), ConfigSource::Defaults)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.song_limit, 5);
        assert_eq!(config.logging.level, "info");
        assert!(config.aliases.is_none());
        assert_eq!(config.alias_table().unwrap(), AliasTable::default());
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config, TomlConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
            port = 8080
            catalog_path = "/srv/songs.csv"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.catalog_path, PathBuf::from("/srv/songs.csv"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.model_path, PathBuf::from("model/emotion_model.json"));
    }

    #[test]
    fn test_aliases_section_replaces_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
            [aliases]
            Joyful = "HAPPY"
            furious = "anger"
            "#,
        )
        .unwrap();

        let table = config.alias_table().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.normalize("joyful"), "happy");
        // Built-in aliases are not merged in
        assert_eq!(table.normalize("joy"), "joy");
    }

    #[test]
    fn test_cyclic_aliases_rejected() {
        let config = TomlConfig::from_toml_str(
            r#"
            [aliases]
            a = "b"
            b = "a"
            "#,
        )
        .unwrap();
        assert!(config.alias_table().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("port = \"not a number\"");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_song_limit_rejected() {
        assert!(TomlConfig::from_toml_str("song_limit = 0").is_err());
    }

    #[test]
    fn test_overrides_beat_file_values() {
        let mut config = TomlConfig::from_toml_str(
            r#"
            bind_addr = "0.0.0.0"
            port = 8080
            model_path = "/srv/model.json"
            catalog_path = "/srv/songs.csv"
            database_path = "/srv/log.db"
            "#,
        )
        .unwrap();

        config.apply_overrides(&ConfigOverrides {
            port: Some(9000),
            bind_addr: Some("127.0.0.2".to_string()),
            model_path: Some(PathBuf::from("cli/model.json")),
            catalog_path: Some(PathBuf::from("cli/songs.csv")),
            database_path: Some(PathBuf::from("cli/log.db")),
        });

        assert_eq!(config.port, 9000);
        assert_eq!(config.bind_addr, "127.0.0.2");
        assert_eq!(config.model_path, PathBuf::from("cli/model.json"));
        assert_eq!(config.catalog_path, PathBuf::from("cli/songs.csv"));
        assert_eq!(config.database_path, PathBuf::from("cli/log.db"));
    }

    #[test]
    fn test_absent_overrides_keep_file_values() {
        let file = TomlConfig::from_toml_str(
            r#"
            port = 8080
            catalog_path = "/srv/songs.csv"
            "#,
        )
        .unwrap();

        let mut config = file.clone();
        config.apply_overrides(&ConfigOverrides::default());
        assert_eq!(config, file);

        config.apply_overrides(&ConfigOverrides {
            database_path: Some(PathBuf::from("cli/log.db")),
            ..Default::default()
        });
        assert_eq!(config.port, 8080);
        assert_eq!(config.catalog_path, PathBuf::from("/srv/songs.csv"));
        assert_eq!(config.database_path, PathBuf::from("cli/log.db"));
    }

    #[test]
    fn test_cli_path_takes_priority() {
        let path = Path::new("/tmp/explicit-moodtunes.toml");
        assert_eq!(resolve_config_path(Some(path)), Some(path.to_path_buf()));
    }
}
