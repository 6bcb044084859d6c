use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::app::DEFAULT_COLOR;
use crate::error::Error;

pub const DIR_NAME: &str = "MultiTimer";
const FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Color given to timers added with an empty color field.
    pub default_color: String,
    /// Tracing filter directive, overridden by `RUST_LOG`.
    pub log_level: String,
    pub mouse: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_COLOR.to_owned(),
            log_level: "info".to_owned(),
            mouse: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        let path = config_file().ok_or(Error::NoHomeDir)?;
        Self::load_from(&path)
    }

    /// A missing file is not an error, it just means defaults.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&text).map_err(|source| Error::Config {
            path: path.to_owned(),
            source,
        })
    }
}

pub fn config_file() -> Option<PathBuf> {
    let dirs = BaseDirs::new()?;
    Some(dirs.config_dir().join(DIR_NAME).join(FILE_NAME))
}

pub fn data_dir() -> Option<PathBuf> {
    let dirs = BaseDirs::new()?;
    Some(dirs.data_dir().join(DIR_NAME))
}
