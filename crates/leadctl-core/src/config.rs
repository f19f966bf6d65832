//! Configuration management for leadctl.
//!
//! Loads configuration from ${LEADCTL_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
/// To update, edit default_config.toml directly.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Merges user config values into the default template.
///
/// This ensures new comments/sections from the template are always present,
/// while preserving user's customized values.
fn merge_with_template(user_config: &str) -> Result<String> {
    use toml_edit::DocumentMut;

    // Parse the template as the base
    let mut doc: DocumentMut = default_config_template()
        .parse()
        .context("Failed to parse default config template")?;

    // Parse user's existing config
    let user_doc: DocumentMut = user_config.parse().context("Failed to parse user config")?;

    // Overlay user values onto template
    merge_items(doc.as_table_mut(), user_doc.as_table());

    Ok(doc.to_string())
}

/// Recursively merges items from source table into target table.
fn merge_items(target: &mut toml_edit::Table, source: &toml_edit::Table) {
    use toml_edit::Item;

    for (key, value) in source.iter() {
        match value {
            Item::Value(v) => {
                // Scalar value: override in target
                target[key] = Item::Value(v.clone());
            }
            Item::Table(src_table) => {
                // Nested table: recursively merge
                if let Some(Item::Table(target_table)) = target.get_mut(key) {
                    merge_items(target_table, src_table);
                } else {
                    // Target doesn't have this table, copy it
                    target[key] = Item::Table(src_table.clone());
                }
            }
            Item::ArrayOfTables(src_arr) => {
                // Array of tables: replace entirely with user's version
                target[key] = Item::ArrayOfTables(src_arr.clone());
            }
            Item::None => {}
        }
    }
}

pub mod paths {
    //! Path resolution for leadctl configuration and data directories.
    //!
    //! LEADCTL_HOME resolution order:
    //! 1. LEADCTL_HOME environment variable (if set)
    //! 2. ~/.config/leadctl (default)

    use std::path::PathBuf;

    /// Returns the leadctl home directory.
    ///
    /// Checks LEADCTL_HOME env var first, falls back to ~/.config/leadctl
    pub fn leadctl_home() -> PathBuf {
        if let Ok(home) = std::env::var("LEADCTL_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("leadctl"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        leadctl_home().join("config.toml")
    }

    /// Returns the directory console-mode log files are written to.
    pub fn logs_dir() -> PathBuf {
        leadctl_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the lead backend
    pub base_url: String,
}

impl Config {
    const DEFAULT_BASE_URL: &str = "http://localhost:8000";

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Returns the effective base URL for API requests.
    ///
    /// Resolution order:
    /// 1) LEADCTL_BASE_URL environment variable (if set)
    /// 2) base_url from the config file
    ///
    /// Trailing slashes are stripped so request paths can be appended verbatim.
    pub fn effective_base_url(&self) -> String {
        let raw = std::env::var("LEADCTL_BASE_URL").unwrap_or_else(|_| self.base_url.clone());
        raw.trim_end_matches('/').to_string()
    }

    /// Saves only the base_url field to the config file.
    ///
    /// Creates the file if it doesn't exist.
    /// Preserves existing fields and comments using toml_edit.
    pub fn save_base_url(base_url: &str) -> Result<()> {
        Self::save_base_url_to(&paths::config_path(), base_url)
    }

    /// Saves only the base_url field to a specific config file path.
    ///
    /// Creates the file with default template if it doesn't exist.
    /// If file exists, merges user values into the latest template.
    pub fn save_base_url_to(path: &Path, base_url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        // Start from template, merge user values if file exists
        let contents = if path.exists() {
            let user_config = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            merge_with_template(&user_config)?
        } else {
            default_config_template().to_string()
        };

        // Parse as editable document
        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        // Update base_url field
        doc["base_url"] = value(base_url.trim_end_matches('/'));

        Self::write_config(path, &doc.to_string())
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    /// Config loading: missing file returns defaults.
    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.base_url, "http://localhost:8000");
    }

    /// Config loading: empty file falls back to defaults per field.
    #[test]
    fn test_load_empty_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.base_url, "http://localhost:8000");
    }

    /// Config loading: explicit base_url wins over the default.
    #[test]
    fn test_load_reads_base_url() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "base_url = \"https://crm.example.com\"\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.base_url, "https://crm.example.com");
    }

    /// Config loading: malformed TOML is an error, not a silent default.
    #[test]
    fn test_load_malformed_config_fails() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "base_url = [not toml").unwrap();

        assert!(Config::load_from(&config_path).is_err());
    }

    /// effective_base_url: trailing slashes are stripped.
    #[test]
    fn test_effective_base_url_strips_trailing_slash() {
        let config = Config {
            base_url: "https://crm.example.com/".to_string(),
        };
        assert_eq!(config.effective_base_url(), "https://crm.example.com");
    }

    /// save_base_url: creates file from template when missing.
    #[test]
    fn test_save_base_url_creates_file_with_template() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        Config::save_base_url_to(&config_path, "https://crm.example.com").unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        // Template comments should be present
        assert!(contents.contains("# leadctl configuration"));
        assert!(contents.contains("base_url = \"https://crm.example.com\""));

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.base_url, "https://crm.example.com");
    }

    /// save_base_url: existing user values survive a save.
    #[test]
    fn test_save_base_url_preserves_existing_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "base_url = \"http://old.example.com\"\n").unwrap();

        Config::save_base_url_to(&config_path, "http://new.example.com").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.base_url, "http://new.example.com");

        // Template comments are merged in on save
        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("# leadctl configuration"));
    }

    /// save_base_url: trailing slash is normalized away before writing.
    #[test]
    fn test_save_base_url_strips_trailing_slash() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        Config::save_base_url_to(&config_path, "https://crm.example.com/").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.base_url, "https://crm.example.com");
    }

    /// init: creates the file once, errors the second time.
    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        Config::init(&config_path).unwrap();
        assert!(config_path.exists());

        let err = Config::init(&config_path).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
