pub mod assets;
pub mod bridge;
pub mod config;
pub mod error;
pub mod launcher;
pub mod paths;
pub mod store;
pub mod updates;

pub use assets::{asset_file_name, read_data_url, AssetCategory, AssetManager};
pub use bridge::{
    Bridge, BridgeRequest, BridgeResponse, FileDialogOptions, FileFilter, FilePicker,
    NoFilePicker,
};
pub use config::{default_document, ButtonConfig, Document, HermesConfig, WindowGeometry};
pub use error::{HermesError, HermesResult, LockResultExt};
pub use launcher::{open_link, BrowserLaunch};
pub use paths::AppPaths;
pub use store::ConfigStore;
pub use updates::{ListenerId, ProgressInfo, UpdateChannel, UpdateEvent, UpdateHub, UpdateInfo};
