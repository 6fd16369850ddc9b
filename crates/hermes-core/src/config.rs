//! The configuration document and its typed read view.
//!
//! The stored document stays an untyped JSON object so keys Hermes does not
//! know about survive a read-modify-write cycle. [`HermesConfig`] is the typed
//! view consumers read from, with defaults applied for absent fields.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// The persisted configuration object.
pub type Document = Map<String, Value>;

pub const KEY_BUTTONS: &str = "buttons";
pub const KEY_BACKGROUND_IMAGE: &str = "backgroundImage";
pub const KEY_FULLSCREEN: &str = "fullscreen";
pub const KEY_WINDOW_WIDTH: &str = "windowWidth";
pub const KEY_WINDOW_HEIGHT: &str = "windowHeight";
pub const KEY_CHROME_EXECUTABLE_PATH: &str = "chromeExecutablePath";
pub const KEY_CHROME_ARGS: &str = "chromeArgs";

pub const DEFAULT_WINDOW_WIDTH: u32 = 800;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 600;

/// A quick-launch button. Order in the document is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonConfig {
    pub img: String,
    pub link: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HermesConfig {
    pub buttons: Vec<ButtonConfig>,
    pub background_image: String,
    pub fullscreen: bool,
    pub window_width: u32,
    pub window_height: u32,
    pub chrome_executable_path: String,
    pub chrome_args: String,
    #[serde(flatten)]
    pub extra: Document,
}

impl Default for HermesConfig {
    fn default() -> Self {
        HermesConfig {
            buttons: Vec::new(),
            background_image: String::new(),
            fullscreen: false,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            chrome_executable_path: String::new(),
            chrome_args: String::new(),
            extra: Document::new(),
        }
    }
}

/// The document written on first run: every recognized field at its default.
pub fn default_document() -> Document {
    let mut doc = Document::new();
    doc.insert(KEY_BUTTONS.into(), json!([]));
    doc.insert(KEY_BACKGROUND_IMAGE.into(), json!(""));
    doc.insert(KEY_FULLSCREEN.into(), json!(false));
    doc.insert(KEY_WINDOW_WIDTH.into(), json!(DEFAULT_WINDOW_WIDTH));
    doc.insert(KEY_WINDOW_HEIGHT.into(), json!(DEFAULT_WINDOW_HEIGHT));
    doc.insert(KEY_CHROME_EXECUTABLE_PATH.into(), json!(""));
    doc.insert(KEY_CHROME_ARGS.into(), json!(""));
    doc
}

fn is_known_key(key: &str) -> bool {
    matches!(
        key,
        KEY_BUTTONS
            | KEY_BACKGROUND_IMAGE
            | KEY_FULLSCREEN
            | KEY_WINDOW_WIDTH
            | KEY_WINDOW_HEIGHT
            | KEY_CHROME_EXECUTABLE_PATH
            | KEY_CHROME_ARGS
    )
}

fn dimension(value: &Value) -> Option<u32> {
    let n = value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))?;
    u32::try_from(n).ok()
}

fn buttons(value: &Value) -> Vec<ButtonConfig> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };
    entries
        .iter()
        .filter(|v| v.is_object())
        .filter_map(|v| serde_json::from_value(v.clone()).ok())
        .collect()
}

impl HermesConfig {
    /// Reads the typed view out of a document. Absent fields, and fields
    /// holding a value of the wrong type, take their default.
    pub fn from_document(doc: &Document) -> Self {
        let defaults = HermesConfig::default();
        let string = |key: &str, fallback: String| {
            doc.get(key)
                .and_then(|v| v.as_str())
                .map(String::from)
                .unwrap_or(fallback)
        };
        HermesConfig {
            buttons: doc.get(KEY_BUTTONS).map(buttons).unwrap_or_default(),
            background_image: string(KEY_BACKGROUND_IMAGE, defaults.background_image),
            fullscreen: doc
                .get(KEY_FULLSCREEN)
                .and_then(|v| v.as_bool())
                .unwrap_or(defaults.fullscreen),
            window_width: doc
                .get(KEY_WINDOW_WIDTH)
                .and_then(dimension)
                .unwrap_or(defaults.window_width),
            window_height: doc
                .get(KEY_WINDOW_HEIGHT)
                .and_then(dimension)
                .unwrap_or(defaults.window_height),
            chrome_executable_path: string(
                KEY_CHROME_EXECUTABLE_PATH,
                defaults.chrome_executable_path,
            ),
            chrome_args: string(KEY_CHROME_ARGS, defaults.chrome_args),
            extra: doc
                .iter()
                .filter(|(k, _)| !is_known_key(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    pub fn window_geometry(&self) -> WindowGeometry {
        WindowGeometry {
            fullscreen: self.fullscreen,
            width: self.window_width,
            height: self.window_height,
        }
    }

    /// `chromeArgs` split on whitespace; empty tokens are dropped.
    pub fn chrome_arg_tokens(&self) -> Vec<String> {
        self.chrome_args.split_whitespace().map(String::from).collect()
    }
}

/// Initial size and mode of the launcher window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowGeometry {
    pub fullscreen: bool,
    pub width: u32,
    pub height: u32,
}
