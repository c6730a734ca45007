//! CLI settings
//!
//! Read from a TOML file. Every key is optional and a missing file yields
//! the defaults; a file that does not parse is an error.

use charlist_core::errors::CharlistError;
use charlist_core::logging_facility::Profile;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_SETTINGS_FILE: &str = "charlist.toml";

/// Environment variable overriding `database_path`
pub const DATABASE_ENV: &str = "CHARLIST_DB";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database_path: PathBuf,
    pub log_profile: Profile,
    /// Name given to characters added without one
    pub default_character_name: String,
    /// Directory new sheet paths are placed under
    pub characters_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("character_data.db"),
            log_profile: Profile::Development,
            default_character_name: "No name".to_string(),
            characters_dir: PathBuf::from("Characters"),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, CharlistError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, CharlistError> {
        toml::from_str(text).map_err(|e| CharlistError::Serialization {
            message: e.to_string(),
        })
    }

    /// Database to open: the flag, then the environment, then the file
    pub fn database_path(&self, flag: Option<PathBuf>, env: Option<String>) -> PathBuf {
        flag.or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| self.database_path.clone())
    }

    /// Default sheet location for a new character
    pub fn sheet_path_for(&self, name: &str) -> PathBuf {
        self.characters_dir.join(format!("{}.xml", name))
    }
}
