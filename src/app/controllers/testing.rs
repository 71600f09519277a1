use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::app::domain::prompts::{Prompter, UnsavedChoice};
use crate::app::domain::style::{FontSize, FontSpec, Rgb, StyleFlags};

pub fn test_font() -> FontSpec {
    FontSpec::new("Segoe UI", FontSize::from_points(12).unwrap(), StyleFlags::REGULAR)
}

/// Prompter answering from queues and recording what it was asked.
#[derive(Default)]
pub struct ScriptedPrompter {
    pub confirms: VecDeque<UnsavedChoice>,
    pub open_paths: VecDeque<Option<PathBuf>>,
    pub save_paths: VecDeque<Option<PathBuf>>,
    pub colors: VecDeque<Option<Rgb>>,

    pub confirm_count: usize,
    pub save_dialogs: usize,
    pub open_dirs: Vec<Option<PathBuf>>,
    pub suggested_names: Vec<Option<String>>,
    pub color_initials: Vec<Rgb>,
    pub errors: Vec<String>,
}

impl Prompter for ScriptedPrompter {
    fn confirm_unsaved_changes(&mut self, _document_name: &str) -> UnsavedChoice {
        self.confirm_count += 1;
        self.confirms.pop_front().expect("unexpected unsaved-changes prompt")
    }

    fn choose_open_path(&mut self, _filter: &str, start_dir: Option<&Path>) -> Option<PathBuf> {
        self.open_dirs.push(start_dir.map(Path::to_path_buf));
        self.open_paths.pop_front().expect("unexpected open dialog")
    }

    fn choose_save_path(
        &mut self,
        _filter: &str,
        suggested_name: Option<&str>,
        _start_dir: Option<&Path>,
    ) -> Option<PathBuf> {
        self.save_dialogs += 1;
        self.suggested_names.push(suggested_name.map(str::to_string));
        self.save_paths.pop_front().expect("unexpected save dialog")
    }

    fn choose_color(&mut self, initial: Rgb) -> Option<Rgb> {
        self.color_initials.push(initial);
        self.colors.pop_front().expect("unexpected colour dialog")
    }

    fn report_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}
