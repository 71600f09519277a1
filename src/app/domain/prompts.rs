use std::path::{Path, PathBuf};

use super::style::Rgb;

/// Answer to the "unsaved changes" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsavedChoice {
    Save,
    Discard,
    Cancel,
}

/// Modal dialogs the session and formatting controllers need.
///
/// Every `Option` return is `None` when the user cancels.
pub trait Prompter {
    fn confirm_unsaved_changes(&mut self, document_name: &str) -> UnsavedChoice;

    fn choose_open_path(&mut self, filter: &str, start_dir: Option<&Path>) -> Option<PathBuf>;

    fn choose_save_path(
        &mut self,
        filter: &str,
        suggested_name: Option<&str>,
        start_dir: Option<&Path>,
    ) -> Option<PathBuf>;

    fn choose_color(&mut self, initial: Rgb) -> Option<Rgb>;

    fn report_error(&mut self, message: &str);
}
