//! The request/response surface the presentation layer talks to.
//!
//! Each operation exists twice: a fallible method returning
//! [`HermesResult`], and the boundary form used by [`Bridge::handle`] which
//! logs the failure and answers with the soft value (`false`, `null` or `""`)
//! instead. Nothing here panics across the boundary.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::assets::AssetManager;
use crate::config::{Document, HermesConfig};
use crate::error::{HermesResult, LockResultExt};
use crate::paths::AppPaths;
use crate::store::ConfigStore;
use crate::updates::UpdateHub;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

/// Options forwarded to the native file picker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileDialogOptions {
    pub title: Option<String>,
    pub default_path: Option<String>,
    pub button_label: Option<String>,
    pub filters: Vec<FileFilter>,
    pub properties: Vec<String>,
    pub message: Option<String>,
}

/// Native file picker. `None` means the user cancelled.
pub trait FilePicker: Send + Sync {
    fn pick_file(&self, options: &FileDialogOptions) -> Option<PathBuf>;
}

/// Picker for hosts without a native dialog; always reports a cancel.
#[derive(Debug, Default)]
pub struct NoFilePicker;

impl FilePicker for NoFilePicker {
    fn pick_file(&self, _options: &FileDialogOptions) -> Option<PathBuf> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "kebab-case")]
pub enum BridgeRequest {
    GetConfig,
    SaveConfig(Document),
    SaveImage {
        #[serde(rename = "fileName")]
        file_name: String,
        buffer: Vec<u8>,
    },
    ReadImageAsDataUrl(String),
    SelectFile(FileDialogOptions),
}

impl BridgeRequest {
    pub fn method(&self) -> &'static str {
        match self {
            BridgeRequest::GetConfig => "get-config",
            BridgeRequest::SaveConfig(_) => "save-config",
            BridgeRequest::SaveImage { .. } => "save-image",
            BridgeRequest::ReadImageAsDataUrl(_) => "read-image-as-data-url",
            BridgeRequest::SelectFile(_) => "select-file",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BridgeResponse {
    Config(Document),
    Saved(bool),
    Path(Option<String>),
    DataUrl(String),
}

impl BridgeResponse {
    pub fn into_value(self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

pub struct Bridge {
    store: Mutex<ConfigStore>,
    assets: AssetManager,
    picker: Box<dyn FilePicker>,
    updates: UpdateHub,
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("store", &self.store)
            .field("assets", &self.assets)
            .finish_non_exhaustive()
    }
}

impl Bridge {
    pub fn new(paths: &AppPaths, picker: Box<dyn FilePicker>) -> Self {
        Bridge {
            store: Mutex::new(ConfigStore::open(paths)),
            assets: AssetManager::new(paths.uploads_dir.clone()),
            picker,
            updates: UpdateHub::new(),
        }
    }

    pub fn updates(&self) -> &UpdateHub {
        &self.updates
    }

    /// Re-reads the document from disk and returns it. A file that cannot be
    /// read or parsed is reported through the error log and answered with
    /// the defaults.
    pub fn get_config(&self) -> HermesResult<Document> {
        let mut store = self.store.lock().map_lock_err("config store")?;
        if let Err(e) = store.initialize() {
            log::error!("get-config: {}", e);
        }
        Ok(store.get_all().clone())
    }

    /// Typed view of the freshly loaded document.
    pub fn settings(&self) -> HermesResult<HermesConfig> {
        self.get_config().map(|doc| HermesConfig::from_document(&doc))
    }

    /// Replaces the stored document with `document`.
    pub fn save_config(&self, document: Document) -> HermesResult<()> {
        self.store
            .lock()
            .map_lock_err("config store")?
            .save(document)
    }

    pub fn save_image(&self, file_name: &str, bytes: &[u8]) -> HermesResult<PathBuf> {
        self.assets.save_image(file_name, bytes)
    }

    pub fn read_image_as_data_url(&self, path: &Path) -> HermesResult<String> {
        self.assets.read_data_url(path)
    }

    pub fn select_file(&self, options: &FileDialogOptions) -> Option<PathBuf> {
        self.picker.pick_file(options)
    }

    /// Serves one request, converting every failure into its soft result.
    pub fn handle(&self, request: BridgeRequest) -> BridgeResponse {
        let method = request.method();
        match request {
            BridgeRequest::GetConfig => match self.get_config() {
                Ok(doc) => BridgeResponse::Config(doc),
                Err(e) => {
                    log::error!("{}: {}", method, e);
                    BridgeResponse::Config(crate::config::default_document())
                }
            },
            BridgeRequest::SaveConfig(doc) => match self.save_config(doc) {
                Ok(()) => BridgeResponse::Saved(true),
                Err(e) => {
                    log::error!("{}: {}", method, e);
                    BridgeResponse::Saved(false)
                }
            },
            BridgeRequest::SaveImage { file_name, buffer } => {
                match self.save_image(&file_name, &buffer) {
                    Ok(path) => BridgeResponse::Path(Some(path.to_string_lossy().into_owned())),
                    Err(e) => {
                        log::error!("{} {:?}: {}", method, file_name, e);
                        BridgeResponse::Path(None)
                    }
                }
            }
            BridgeRequest::ReadImageAsDataUrl(path) => {
                match self.read_image_as_data_url(Path::new(&path)) {
                    Ok(url) => BridgeResponse::DataUrl(url),
                    Err(e) => {
                        log::warn!("{} {:?}: {}", method, path, e);
                        BridgeResponse::DataUrl(String::new())
                    }
                }
            }
            BridgeRequest::SelectFile(options) => BridgeResponse::Path(
                self.select_file(&options)
                    .map(|p| p.to_string_lossy().into_owned()),
            ),
        }
    }

    /// Decodes a `{ "method": ..., "params": ... }` value and serves it.
    /// Undecodable requests get `null`.
    pub fn handle_value(&self, request: Value) -> Value {
        match serde_json::from_value::<BridgeRequest>(request) {
            Ok(req) => self.handle(req).into_value(),
            Err(e) => {
                log::error!("Rejected bridge request: {}", e);
                Value::Null
            }
        }
    }
}
