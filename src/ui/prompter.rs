use std::path::{Path, PathBuf};

use fltk::dialog::{self, ColorMode};

use super::file_dialogs::{native_open_dialog, native_save_dialog};
use crate::app::domain::prompts::{Prompter, UnsavedChoice};
use crate::app::domain::style::Rgb;

/// Modal FLTK dialogs behind the `Prompter` seam.
#[derive(Debug, Default)]
pub struct FltkPrompter;

impl Prompter for FltkPrompter {
    fn confirm_unsaved_changes(&mut self, document_name: &str) -> UnsavedChoice {
        let choice = dialog::choice2_default(
            &format!("\"{}\" has unsaved changes. Save now?", document_name),
            "Save",
            "Discard",
            "Cancel",
        );
        match choice {
            Some(0) => UnsavedChoice::Save,
            Some(1) => UnsavedChoice::Discard,
            _ => UnsavedChoice::Cancel,
        }
    }

    fn choose_open_path(&mut self, filter: &str, start_dir: Option<&Path>) -> Option<PathBuf> {
        native_open_dialog(filter, start_dir)
    }

    fn choose_save_path(
        &mut self,
        filter: &str,
        suggested_name: Option<&str>,
        start_dir: Option<&Path>,
    ) -> Option<PathBuf> {
        native_save_dialog(filter, suggested_name, start_dir)
    }

    fn choose_color(&mut self, initial: Rgb) -> Option<Rgb> {
        dialog::color_chooser_with_default("Text Color", ColorMode::Byte, (initial.r, initial.g, initial.b))
            .map(|(r, g, b)| Rgb::new(r, g, b))
    }

    fn report_error(&mut self, message: &str) {
        dialog::alert_default(message);
    }
}
