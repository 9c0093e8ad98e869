//! Config manager for loading, saving, and atomic updates.
//!
//! Key features:
//! - Atomic writes (write to temp file, then rename)
//! - Section-level updates (only the modified section is changed)
//! - Missing fields filled from defaults on load

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml_edit::{DocumentMut, Item};

use super::settings::{ConfigSection, EngineSettings};

/// Errors that can occur during config operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Failed to parse config for editing: {0}")]
    EditParseError(#[from] toml_edit::TomlError),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Manages engine configuration on disk.
pub struct ConfigManager {
    /// Path to the config file.
    config_path: PathBuf,
    /// Current settings loaded in memory.
    settings: EngineSettings,
}

impl ConfigManager {
    /// Create a new config manager with the given config file path.
    ///
    /// Does not load the config - call `load()` or `load_or_create()`
    /// after.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: EngineSettings::default(),
        }
    }

    /// Get the config file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Get a reference to the current settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Get a mutable reference to the current settings.
    ///
    /// Note: changes made here are only in memory until `save()` or
    /// `update_section()` is called.
    pub fn settings_mut(&mut self) -> &mut EngineSettings {
        &mut self.settings
    }

    /// Load config from file.
    ///
    /// Returns an error if the file doesn't exist.
    pub fn load(&mut self) -> ConfigResult<()> {
        if !self.config_path.exists() {
            return Err(ConfigError::NotFound(self.config_path.clone()));
        }

        let content = fs::read_to_string(&self.config_path)?;
        self.settings = toml::from_str(&content)?;
        Ok(())
    }

    /// Load config from file, creating it with defaults if missing.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        if self.config_path.exists() {
            let content = fs::read_to_string(&self.config_path)?;
            self.settings = toml::from_str(&content)?;
        } else {
            self.settings = EngineSettings::default();
            self.save()?;
        }
        Ok(())
    }

    /// Save the entire config atomically.
    pub fn save(&self) -> ConfigResult<()> {
        let content = self.generate_config_with_comments()?;
        self.atomic_write(&content)?;
        Ok(())
    }

    /// Update a specific section atomically.
    ///
    /// Re-reads the file from disk, replaces only the specified section,
    /// and writes back atomically, so unrelated sections (and their
    /// comments) survive.
    pub fn update_section(&mut self, section: ConfigSection) -> ConfigResult<()> {
        let current_content = if self.config_path.exists() {
            fs::read_to_string(&self.config_path)?
        } else {
            String::new()
        };

        let mut doc: DocumentMut = if current_content.is_empty() {
            DocumentMut::new()
        } else {
            current_content.parse()?
        };

        let section_toml = self.serialize_section(section)?;
        let section_doc: DocumentMut = section_toml.parse()?;
        let section_table = section_doc.as_table().clone();

        doc[section.table_name()] = Item::Table(section_table);

        self.atomic_write(&doc.to_string())?;
        Ok(())
    }

    /// Serialize one section to a TOML fragment.
    fn serialize_section(&self, section: ConfigSection) -> ConfigResult<String> {
        let toml = match section {
            ConfigSection::Timing => toml::to_string_pretty(&self.settings.timing)?,
            ConfigSection::Fades => toml::to_string_pretty(&self.settings.fades)?,
            ConfigSection::Quiz => toml::to_string_pretty(&self.settings.quiz)?,
            ConfigSection::Formats => toml::to_string_pretty(&self.settings.formats)?,
            ConfigSection::Paths => toml::to_string_pretty(&self.settings.paths)?,
            ConfigSection::Logging => toml::to_string_pretty(&self.settings.logging)?,
        };
        Ok(toml)
    }

    /// Generate config content with section comments.
    fn generate_config_with_comments(&self) -> ConfigResult<String> {
        let mut output = String::new();

        output.push_str("# Reel Core Configuration\n");
        output.push_str("# This file is auto-generated. Comments may be preserved on section updates.\n\n");

        for section in ConfigSection::all() {
            let comment = match section {
                ConfigSection::Timing => "Frame rate and duration defaults",
                ConfigSection::Fades => "Fade-in/out window lengths in frames",
                ConfigSection::Quiz => "Quiz phase timing defaults",
                ConfigSection::Formats => "Per-format duration bounds in seconds",
                ConfigSection::Paths => "Working directories",
                ConfigSection::Logging => "Render log configuration",
            };
            output.push_str(&format!("# {}\n[{}]\n", comment, section.table_name()));
            output.push_str(&self.serialize_section(*section)?);
            output.push('\n');
        }

        Ok(output)
    }

    /// Write content to the config file atomically.
    ///
    /// Writes to a temp file first, then renames.
    fn atomic_write(&self, content: &str) -> io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.config_path.with_extension("toml.tmp");

        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }

        fs::rename(&temp_path, &self.config_path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn load_or_create_creates_default() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(".config").join("reel.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        assert!(config_path.exists());
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[timing]"));
        assert!(content.contains("[quiz]"));
    }

    #[test]
    fn load_or_create_preserves_existing() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("reel.toml");

        fs::write(&config_path, "[timing]\nfps = 25.0\n").unwrap();

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        assert!((manager.settings().timing.fps - 25.0).abs() < 1e-9);
        // Missing sections fall back to defaults.
        assert_eq!(manager.settings().fades.fade_in_frames, 15);
    }

    #[test]
    fn update_section_only_changes_target() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("reel.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        manager.settings_mut().quiz.thinking_seconds = 6.0;
        manager.update_section(ConfigSection::Quiz).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("thinking_seconds = 6.0"));
        assert!(content.contains("[timing]"));
    }

    #[test]
    fn saved_config_round_trips() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("reel.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();
        manager.settings_mut().formats.short_max_seconds = 60.0;
        manager.save().unwrap();

        let mut reloaded = ConfigManager::new(&config_path);
        reloaded.load().unwrap();
        assert!((reloaded.settings().formats.short_max_seconds - 60.0).abs() < 1e-9);
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("reel.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        let temp_path = config_path.with_extension("toml.tmp");
        assert!(!temp_path.exists());
    }

    #[test]
    fn load_missing_file_errors() {
        let dir = tempdir().unwrap();
        let mut manager = ConfigManager::new(dir.path().join("missing.toml"));
        assert!(matches!(manager.load(), Err(ConfigError::NotFound(_))));
    }
}
