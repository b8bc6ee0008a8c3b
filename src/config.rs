use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::language::Language;
use crate::session::COUNTDOWN_SECS;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub language: String,
    pub countdown_secs: u32,
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::Alphabetic.name().to_string(),
            countdown_secs: COUNTDOWN_SECS,
            data_dir: None,
        }
    }
}

/// Settings in effect for this run: stored config overlaid with command line flags
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    pub language: Language,
    pub countdown_secs: u32,
    pub data_dir: Option<PathBuf>,
}

impl RuntimeSettings {
    pub fn resolve(
        config: &Config,
        language: Option<Language>,
        countdown_secs: Option<u32>,
        data_dir: Option<PathBuf>,
    ) -> Self {
        let stored_language = Language::from_name(&config.language).unwrap_or_else(|| {
            warn!(language = %config.language, "unknown language in config, using default");
            Language::default()
        });
        Self {
            language: language.unwrap_or(stored_language),
            countdown_secs: countdown_secs.unwrap_or(config.countdown_secs).max(1),
            data_dir: data_dir.or_else(|| config.data_dir.clone()),
        }
    }
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self::resolve(&Config::default(), None, None, None)
    }
}

impl From<&RuntimeSettings> for Config {
    fn from(rs: &RuntimeSettings) -> Self {
        Self {
            language: rs.language.name().to_string(),
            countdown_secs: rs.countdown_secs,
            data_dir: rs.data_dir.clone(),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
