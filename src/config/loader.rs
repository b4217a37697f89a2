use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::types::Config;
use super::validation::Validate;
use crate::log_error;

pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Loader for `config.toml` in the user's configuration directory.
    pub fn new() -> Result<Self> {
        let config_path = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("bytebeat")
            .join("config.toml");
        Ok(Self { config_path })
    }

    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Reads the configuration, writing defaults first if there is none yet.
    ///
    /// Values are validated and the file is rewritten in normalized form when
    /// it differs. A file that is not valid TOML is kept next to the original
    /// as `config.toml.backup` and replaced by defaults.
    pub fn load_or_create(&self) -> Result<Config> {
        if !self.config_path.exists() {
            let defaults = Config::default();
            self.save(&defaults)?;
            return Ok(defaults);
        }

        let content = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read config file {}", self.config_path.display()))?;

        let mut config = match toml::from_str::<Config>(&content) {
            Ok(config) => config,
            Err(e) => return self.replace_corrupt(&content, e),
        };
        config.validate();

        let normalized = toml::to_string_pretty(&config).context("Failed to serialize config")?;
        if content.trim() != normalized.trim() {
            self.write(&normalized)?;
        }
        Ok(config)
    }

    fn replace_corrupt(&self, content: &str, error: toml::de::Error) -> Result<Config> {
        let backup_path = self.config_path.with_extension("toml.backup");
        fs::write(&backup_path, content).context("Failed to write backup")?;
        log_error!(
            "Config file corrupted: {}. Backup saved to {}. Using defaults.",
            error,
            backup_path.display()
        );

        let defaults = Config::default();
        self.save(&defaults)?;
        Ok(defaults)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let toml_string = toml::to_string_pretty(config).context("Failed to serialize config")?;
        self.write(&toml_string)
    }

    fn write(&self, toml_string: &str) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        fs::write(&self.config_path, toml_string).context("Failed to write config file")
    }
}
