//! On-disk layout of one Hermes installation.

use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = "hermes";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const UPLOADS_DIR_NAME: &str = "uploads";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub config_file: PathBuf,
    pub uploads_dir: PathBuf,
}

impl AppPaths {
    pub fn from_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        AppPaths {
            config_file: data_dir.join(CONFIG_FILE_NAME),
            uploads_dir: data_dir.join(UPLOADS_DIR_NAME),
            data_dir,
        }
    }

    /// `<platform data dir>/hermes`, when the platform has one.
    pub fn default_location() -> Option<Self> {
        dirs::data_dir().map(|d| Self::from_data_dir(d.join(APP_DIR_NAME)))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
