//! Uploaded images: copied into the flat uploads directory and read back as
//! `data:` URLs for the presentation layer.

use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};

use crate::error::{HermesError, HermesResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
    Button,
    Background,
}

impl AssetCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetCategory::Button => "button",
            AssetCategory::Background => "background",
        }
    }
}

/// Builds `<category>_<epoch-millis>.<ext>` from the uploaded file's
/// original name. A name without an extension yields no trailing dot.
pub fn asset_file_name(category: AssetCategory, original_name: &str, now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis();
    match original_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!("{}_{}.{}", category.as_str(), millis, ext),
        _ => format!("{}_{}", category.as_str(), millis),
    }
}

#[derive(Debug, Clone)]
pub struct AssetManager {
    uploads_dir: PathBuf,
}

impl AssetManager {
    pub fn new(uploads_dir: impl Into<PathBuf>) -> Self {
        AssetManager {
            uploads_dir: uploads_dir.into(),
        }
    }

    /// Writes `bytes` to `<uploads>/<file_name>`, replacing any file of the
    /// same name, and returns the absolute path written.
    pub fn save_image(&self, file_name: &str, bytes: &[u8]) -> HermesResult<PathBuf> {
        validate_file_name(file_name)?;
        fs::create_dir_all(&self.uploads_dir)?;
        let path = absolute(&self.uploads_dir)?.join(file_name);
        fs::write(&path, bytes)?;
        log::info!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }

    /// Reads a file as `data:image/<ext>;base64,<data>`. The extension is
    /// taken from the path as-is; the content is not inspected.
    pub fn read_data_url(&self, path: &Path) -> HermesResult<String> {
        read_data_url(path)
    }
}

pub fn read_data_url(path: &Path) -> HermesResult<String> {
    if path.as_os_str().is_empty() {
        return Err(std::io::Error::new(std::io::ErrorKind::NotFound, "empty path").into());
    }
    let data = fs::read(path)?;
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(format!("data:image/{};base64,{}", ext, STANDARD.encode(data)))
}

// Uploads are flat: anything that could leave the directory is refused.
fn validate_file_name(name: &str) -> HermesResult<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || Path::new(name).is_absolute();
    if bad {
        return Err(HermesError::InvalidFileName(name.to_string()));
    }
    Ok(())
}

fn absolute(dir: &Path) -> HermesResult<PathBuf> {
    if dir.is_absolute() {
        Ok(dir.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(dir))
    }
}
