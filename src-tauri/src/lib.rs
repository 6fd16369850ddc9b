mod commands;
mod picker;

use hermes_core::{AppPaths, Bridge, UpdateChannel};
use tauri::{AppHandle, Emitter, Manager, WebviewUrl, WebviewWindowBuilder};

/// Re-emits every update notification to the webview under its channel name.
fn forward_updates(bridge: &Bridge, app: &AppHandle) -> hermes_core::HermesResult<()> {
    for channel in UpdateChannel::ALL {
        let app = app.clone();
        bridge.updates().subscribe(channel, move |event| {
            if let Err(e) = app.emit(event.channel().as_str(), event.payload()) {
                log::warn!("Failed to forward {}: {}", event.channel().as_str(), e);
            }
        })?;
    }
    Ok(())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        .invoke_handler(tauri::generate_handler![
            commands::get_config,
            commands::save_config,
            commands::save_image,
            commands::read_image_as_data_url,
            commands::select_file,
            commands::bridge_invoke,
            commands::open_link,
        ])
        .setup(|app| {
            let paths = match app.path().app_data_dir() {
                Ok(dir) => AppPaths::from_data_dir(dir),
                Err(e) => {
                    log::warn!("No app data dir from Tauri ({}), using platform default", e);
                    AppPaths::default_location().ok_or("no data directory available")?
                }
            };
            log::info!("Data directory: {}", paths.data_dir().display());

            let bridge = Bridge::new(&paths, Box::new(picker::NativeFilePicker));
            forward_updates(&bridge, app.handle())?;
            let geometry = bridge.settings()?.window_geometry();
            app.manage(bridge);

            WebviewWindowBuilder::new(app, "main", WebviewUrl::App("index.html".into()))
                .title("Hermes")
                .inner_size(f64::from(geometry.width), f64::from(geometry.height))
                .fullscreen(geometry.fullscreen)
                .build()?;
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
