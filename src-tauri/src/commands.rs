use hermes_core::{open_link as launch_link, Bridge, BridgeRequest, Document, FileDialogOptions};
use serde_json::Value;
use tauri::State;

#[tauri::command]
pub fn get_config(bridge: State<'_, Bridge>) -> Value {
    bridge.handle(BridgeRequest::GetConfig).into_value()
}

#[tauri::command]
pub fn save_config(bridge: State<'_, Bridge>, config: Document) -> Value {
    bridge.handle(BridgeRequest::SaveConfig(config)).into_value()
}

#[tauri::command]
pub fn save_image(bridge: State<'_, Bridge>, file_name: String, buffer: Vec<u8>) -> Value {
    bridge
        .handle(BridgeRequest::SaveImage { file_name, buffer })
        .into_value()
}

#[tauri::command]
pub fn read_image_as_data_url(bridge: State<'_, Bridge>, file_path: String) -> Value {
    bridge
        .handle(BridgeRequest::ReadImageAsDataUrl(file_path))
        .into_value()
}

#[tauri::command]
pub fn select_file(bridge: State<'_, Bridge>, options: Option<FileDialogOptions>) -> Value {
    bridge
        .handle(BridgeRequest::SelectFile(options.unwrap_or_default()))
        .into_value()
}

/// Generic entry point: `{ "method": "get-config" | ..., "params": ... }`.
#[tauri::command]
pub fn bridge_invoke(bridge: State<'_, Bridge>, request: Value) -> Value {
    bridge.handle_value(request)
}

#[tauri::command]
pub fn open_link(bridge: State<'_, Bridge>, link: String) -> bool {
    let result = bridge
        .settings()
        .and_then(|settings| launch_link(&settings, &link));
    match result {
        Ok(()) => true,
        Err(e) => {
            log::error!("open-link {:?}: {}", link, e);
            false
        }
    }
}
