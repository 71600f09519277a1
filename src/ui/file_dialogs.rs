use std::path::{Path, PathBuf};

use fltk::dialog::{FileDialogOptions, FileDialogType, NativeFileChooser};

fn run_chooser(mut nfc: NativeFileChooser, filter: &str, start_dir: Option<&Path>) -> Option<PathBuf> {
    nfc.set_filter(filter);
    if let Some(dir) = start_dir {
        if let Err(e) = nfc.set_directory(&dir) {
            tracing::debug!(dir = %dir.display(), error = ?e, "could not set dialog directory");
        }
    }
    nfc.show(); // blocks until close
    let filename = nfc.filename();
    if filename.as_os_str().is_empty() {
        None
    } else {
        Some(filename)
    }
}

pub fn native_open_dialog(filter: &str, start_dir: Option<&Path>) -> Option<PathBuf> {
    let mut nfc = NativeFileChooser::new(FileDialogType::BrowseFile);
    nfc.set_title("Open Note");
    run_chooser(nfc, filter, start_dir)
}

pub fn native_save_dialog(filter: &str, suggested_name: Option<&str>, start_dir: Option<&Path>) -> Option<PathBuf> {
    let mut nfc = NativeFileChooser::new(FileDialogType::BrowseSaveFile);
    nfc.set_title("Save Note");
    nfc.set_option(FileDialogOptions::SaveAsConfirm);
    if let Some(name) = suggested_name {
        nfc.set_preset_file(name);
    }
    run_chooser(nfc, filter, start_dir)
}
