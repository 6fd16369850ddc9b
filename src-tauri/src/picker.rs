use std::path::PathBuf;

use hermes_core::{FileDialogOptions, FilePicker};

/// File picker backed by the platform dialog. `buttonLabel`, `message` and
/// `properties` have no `rfd` counterpart and are ignored.
pub struct NativeFilePicker;

impl FilePicker for NativeFilePicker {
    fn pick_file(&self, options: &FileDialogOptions) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new();
        if let Some(title) = &options.title {
            dialog = dialog.set_title(title);
        }
        if let Some(default_path) = &options.default_path {
            let path = PathBuf::from(default_path);
            if path.is_dir() {
                dialog = dialog.set_directory(&path);
            } else {
                if let Some(parent) = path.parent() {
                    dialog = dialog.set_directory(parent);
                }
                if let Some(name) = path.file_name() {
                    dialog = dialog.set_file_name(name.to_string_lossy());
                }
            }
        }
        for filter in &options.filters {
            dialog = dialog.add_filter(&filter.name, &filter.extensions[..]);
        }
        dialog.pick_file()
    }
}
