use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::app::domain::prompts::{Prompter, UnsavedChoice};
use crate::app::domain::style::FontSpec;
use crate::app::domain::surface::TextSurface;
use crate::app::services::file_filters::{get_document_filter_multiline, get_save_filter_multiline};
use crate::app::services::persistence;
use crate::app::services::text_ops::extract_filename;

const APP_NAME: &str = "Rich Notes";

/// Path and unsaved-changes state of the single open document.
///
/// The dirty flag is shared with the surface's modify callback, so every
/// text or style mutation marks the session dirty without going through it.
pub struct DocumentSession {
    current_path: Option<PathBuf>,
    dirty: Rc<Cell<bool>>,
    last_directory: Option<PathBuf>,
    default_font: FontSpec,
}

impl DocumentSession {
    pub fn new(default_font: FontSpec) -> Self {
        Self {
            current_path: None,
            dirty: Rc::new(Cell::new(false)),
            last_directory: None,
            default_font,
        }
    }

    /// Registers the dirty-tracking observer and applies the default font.
    pub fn attach<S: TextSurface + ?Sized>(&self, surface: &mut S) {
        surface.set_base_font(self.default_font.clone());
        let dirty = self.dirty.clone();
        surface.add_modify_callback(Box::new(move |_| dirty.set(true)));
    }

    pub fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn last_directory(&self) -> Option<&Path> {
        self.last_directory.as_deref()
    }

    pub fn set_last_directory(&mut self, dir: Option<PathBuf>) {
        self.last_directory = dir;
    }

    /// File name of the current path, or "Untitled".
    pub fn display_name(&self) -> String {
        self.current_path
            .as_deref()
            .map(extract_filename)
            .unwrap_or_else(|| "Untitled".to_string())
    }

    pub fn window_title(&self) -> String {
        let prefix = if self.is_dirty() { "*" } else { "" };
        format!("{}{} - {}", prefix, self.display_name(), APP_NAME)
    }

    pub fn status_text<S: TextSurface + ?Sized>(&self, surface: &S) -> String {
        let marker = if self.is_dirty() { " • Unsaved" } else { "" };
        format!("Chars: {}{}", surface.char_count(), marker)
    }

    /// Replaces the document with an empty one. Returns `false` if the user
    /// kept the current document.
    pub fn new_document<S, P>(&mut self, surface: &mut S, prompter: &mut P) -> bool
    where
        S: TextSurface + ?Sized,
        P: Prompter + ?Sized,
    {
        if !self.confirm_save_if_dirty(surface, prompter) {
            return false;
        }
        surface.clear();
        surface.set_base_font(self.default_font.clone());
        self.current_path = None;
        self.dirty.set(false);
        tracing::info!("new document");
        true
    }

    pub fn open_document<S, P>(&mut self, surface: &mut S, prompter: &mut P) -> bool
    where
        S: TextSurface + ?Sized,
        P: Prompter + ?Sized,
    {
        if !self.confirm_save_if_dirty(surface, prompter) {
            return false;
        }
        let filter = get_document_filter_multiline();
        let Some(path) = prompter.choose_open_path(&filter, self.last_directory.as_deref()) else {
            return false;
        };
        self.open_path(surface, prompter, &path)
    }

    /// Loads `path` without asking about unsaved changes. On failure the
    /// document and the session are left as they were.
    pub fn open_path<S, P>(&mut self, surface: &mut S, prompter: &mut P, path: &Path) -> bool
    where
        S: TextSurface + ?Sized,
        P: Prompter + ?Sized,
    {
        match persistence::load(path, &self.default_font) {
            Ok(content) => {
                surface.set_base_font(self.default_font.clone());
                content.apply_to(surface);
                self.remember_path(path);
                self.dirty.set(false);
                tracing::info!(path = %path.display(), chars = surface.char_count(), "opened document");
                true
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to open document");
                prompter.report_error(&format!("Failed to open file: {}", e));
                false
            }
        }
    }

    /// Saves to the current path, or to a path chosen in the save dialog when
    /// there is none or `force_as_new` is set. Returns `true` once the file
    /// is fully written.
    pub fn save_document<S, P>(&mut self, surface: &mut S, prompter: &mut P, force_as_new: bool) -> bool
    where
        S: TextSurface + ?Sized,
        P: Prompter + ?Sized,
    {
        let path = match self.current_path.clone() {
            Some(path) if !force_as_new => path,
            _ => {
                let suggested = self.current_path.as_deref().map(extract_filename);
                let filter = get_save_filter_multiline();
                match prompter.choose_save_path(
                    &filter,
                    suggested.as_deref(),
                    self.last_directory.as_deref(),
                ) {
                    Some(path) => path,
                    None => return false,
                }
            }
        };

        match persistence::save(&path, surface) {
            Ok(()) => {
                self.remember_path(&path);
                self.dirty.set(false);
                tracing::info!(path = %path.display(), "saved document");
                true
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to save document");
                prompter.report_error(&format!("Failed to save: {}", e));
                false
            }
        }
    }

    /// `true` when it is safe to discard the current content.
    pub fn confirm_save_if_dirty<S, P>(&mut self, surface: &mut S, prompter: &mut P) -> bool
    where
        S: TextSurface + ?Sized,
        P: Prompter + ?Sized,
    {
        if !self.is_dirty() {
            return true;
        }
        match prompter.confirm_unsaved_changes(&self.display_name()) {
            UnsavedChoice::Cancel => false,
            UnsavedChoice::Discard => true,
            UnsavedChoice::Save => self.save_document(surface, prompter, false),
        }
    }

    /// Gate for quitting and closing the window.
    pub fn request_close<S, P>(&mut self, surface: &mut S, prompter: &mut P) -> bool
    where
        S: TextSurface + ?Sized,
        P: Prompter + ?Sized,
    {
        self.confirm_save_if_dirty(surface, prompter)
    }

    fn remember_path(&mut self, path: &Path) {
        self.current_path = Some(path.to_path_buf());
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.last_directory = Some(parent.to_path_buf());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::app::controllers::formatting;
    use crate::app::controllers::testing::{ScriptedPrompter, test_font};
    use crate::app::domain::document::RichDocument;
    use crate::app::domain::style::{Effective, StyleBit};
    use crate::app::domain::surface::Selection;

    fn setup() -> (DocumentSession, RichDocument) {
        let session = DocumentSession::new(test_font());
        let mut doc = RichDocument::new(test_font());
        session.attach(&mut doc);
        (session, doc)
    }

    #[test]
    fn test_fresh_session_is_clean_and_untitled() {
        let (session, doc) = setup();
        assert!(!session.is_dirty());
        assert!(session.current_path().is_none());
        assert_eq!(session.window_title(), "Untitled - Rich Notes");
        assert_eq!(session.status_text(&doc), "Chars: 0");
    }

    #[test]
    fn test_typing_then_saving_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.rtf");
        let (mut session, mut doc) = setup();
        let mut prompter = ScriptedPrompter::default();

        doc.insert_text(0, "Hello");
        assert!(session.is_dirty());
        assert_eq!(doc.char_count(), 5);
        assert_eq!(session.window_title(), "*Untitled - Rich Notes");
        assert_eq!(session.status_text(&doc), "Chars: 5 • Unsaved");

        prompter.save_paths.push_back(Some(path.clone()));
        assert!(session.save_document(&mut doc, &mut prompter, false));
        assert!(!session.is_dirty());
        assert_eq!(session.current_path(), Some(path.as_path()));
        assert_eq!(session.window_title(), "note.rtf - Rich Notes");
        assert_eq!(session.status_text(&doc), "Chars: 5");
        assert_eq!(session.last_directory(), Some(dir.path()));
        assert!(path.exists());
        // untitled documents get no suggested name
        assert_eq!(prompter.suggested_names, vec![None]);
    }

    #[test]
    fn test_dirty_until_saved() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, mut doc) = setup();
        let mut prompter = ScriptedPrompter::default();

        doc.insert_text(0, "abc");
        doc.delete(0..1);
        formatting::toggle_style(&mut doc, &session, Selection::all(2), StyleBit::Italic);
        assert!(session.is_dirty());

        prompter.save_paths.push_back(Some(dir.path().join("a.txt")));
        assert!(session.save_document(&mut doc, &mut prompter, false));
        assert!(!session.is_dirty());

        doc.set_bullet(Selection::caret(0), true);
        assert!(session.is_dirty());
    }

    #[test]
    fn test_save_uses_current_path_without_dialog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo.txt");
        let (mut session, mut doc) = setup();
        let mut prompter = ScriptedPrompter::default();

        doc.insert_text(0, "one");
        prompter.save_paths.push_back(Some(path.clone()));
        assert!(session.save_document(&mut doc, &mut prompter, false));

        doc.insert_text(3, " two");
        assert!(session.save_document(&mut doc, &mut prompter, false));
        assert_eq!(prompter.save_dialogs, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "one two");
    }

    #[test]
    fn test_save_as_suggests_current_name() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.rtf");
        let second = dir.path().join("second.txt");
        let (mut session, mut doc) = setup();
        let mut prompter = ScriptedPrompter::default();

        doc.insert_text(0, "x");
        prompter.save_paths.push_back(Some(first.clone()));
        assert!(session.save_document(&mut doc, &mut prompter, false));

        prompter.save_paths.push_back(Some(second.clone()));
        assert!(session.save_document(&mut doc, &mut prompter, true));
        assert_eq!(prompter.suggested_names[1].as_deref(), Some("first.rtf"));
        assert_eq!(session.current_path(), Some(second.as_path()));
    }

    #[test]
    fn test_cancelled_save_dialog_changes_nothing() {
        let (mut session, mut doc) = setup();
        let mut prompter = ScriptedPrompter::default();

        doc.insert_text(0, "draft");
        prompter.save_paths.push_back(None);
        assert!(!session.save_document(&mut doc, &mut prompter, false));
        assert!(session.is_dirty());
        assert!(session.current_path().is_none());
        assert!(prompter.errors.is_empty());
    }

    #[test]
    fn test_failed_save_reports_and_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, mut doc) = setup();
        let mut prompter = ScriptedPrompter::default();

        doc.insert_text(0, "draft");
        prompter
            .save_paths
            .push_back(Some(dir.path().join("missing").join("x.rtf")));
        assert!(!session.save_document(&mut doc, &mut prompter, false));
        assert!(session.is_dirty());
        assert!(session.current_path().is_none());
        assert_eq!(prompter.errors.len(), 1);
        assert!(prompter.errors[0].starts_with("Failed to save: "));
    }

    #[test]
    fn test_open_missing_path_reports_and_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, mut doc) = setup();
        let mut prompter = ScriptedPrompter::default();
        doc.insert_text(0, "keep me");

        let missing = dir.path().join("nope.rtf");
        assert!(!session.open_path(&mut doc, &mut prompter, &missing));
        assert!(session.is_dirty());
        assert!(session.current_path().is_none());
        assert_eq!(doc.full_text(), "keep me");
        assert_eq!(prompter.errors.len(), 1);
        assert!(prompter.errors[0].starts_with("Failed to open file: "));
    }

    #[test]
    fn test_open_malformed_rtf_leaves_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.rtf");
        fs::write(&path, "not rich text").unwrap();
        let (mut session, mut doc) = setup();
        let mut prompter = ScriptedPrompter::default();
        doc.insert_text(0, "keep");

        prompter.confirms.push_back(UnsavedChoice::Discard);
        prompter.open_paths.push_back(Some(path));
        assert!(!session.open_document(&mut doc, &mut prompter));
        assert_eq!(doc.full_text(), "keep");
        assert!(session.is_dirty());
        assert_eq!(prompter.errors.len(), 1);
    }

    #[test]
    fn test_open_document_loads_and_cleans() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.rtf");
        let (mut session, mut doc) = setup();
        let mut prompter = ScriptedPrompter::default();

        doc.insert_text(0, "Hello");
        formatting::toggle_style(&mut doc, &session, Selection::all(5), StyleBit::Bold);
        prompter.save_paths.push_back(Some(path.clone()));
        assert!(session.save_document(&mut doc, &mut prompter, false));

        let (mut session2, mut doc2) = setup();
        prompter.open_paths.push_back(Some(path.clone()));
        assert!(session2.open_document(&mut doc2, &mut prompter));
        assert!(!session2.is_dirty());
        assert_eq!(session2.current_path(), Some(path.as_path()));
        assert_eq!(doc2.full_text(), "Hello");
        assert!(formatting::is_style_active(&doc2, Selection::all(5), StyleBit::Bold));
    }

    #[test]
    fn test_open_dialog_starts_in_last_directory() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, mut doc) = setup();
        let mut prompter = ScriptedPrompter::default();

        doc.insert_text(0, "x");
        prompter.save_paths.push_back(Some(dir.path().join("x.txt")));
        assert!(session.save_document(&mut doc, &mut prompter, false));

        prompter.open_paths.push_back(None);
        assert!(!session.open_document(&mut doc, &mut prompter));
        assert_eq!(prompter.open_dirs, vec![Some(dir.path().to_path_buf())]);
    }

    #[test]
    fn test_confirm_cancel_aborts_without_mutation() {
        let (mut session, mut doc) = setup();
        let mut prompter = ScriptedPrompter::default();
        doc.insert_text(0, "unsaved");

        prompter.confirms.push_back(UnsavedChoice::Cancel);
        assert!(!session.new_document(&mut doc, &mut prompter));
        assert_eq!(doc.full_text(), "unsaved");
        assert!(session.is_dirty());
        assert_eq!(prompter.save_dialogs, 0);
    }

    #[test]
    fn test_confirm_discard_proceeds_without_io() {
        let (mut session, mut doc) = setup();
        let mut prompter = ScriptedPrompter::default();
        doc.insert_text(0, "unsaved");

        prompter.confirms.push_back(UnsavedChoice::Discard);
        assert!(session.confirm_save_if_dirty(&mut doc, &mut prompter));
        assert_eq!(prompter.save_dialogs, 0);
        assert!(session.is_dirty());
    }

    #[test]
    fn test_confirm_save_returns_save_result() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, mut doc) = setup();
        let mut prompter = ScriptedPrompter::default();
        doc.insert_text(0, "unsaved");

        // save dialog cancelled: caller must abort
        prompter.confirms.push_back(UnsavedChoice::Save);
        prompter.save_paths.push_back(None);
        assert!(!session.request_close(&mut doc, &mut prompter));

        prompter.confirms.push_back(UnsavedChoice::Save);
        prompter.save_paths.push_back(Some(dir.path().join("kept.rtf")));
        assert!(session.request_close(&mut doc, &mut prompter));
        assert!(!session.is_dirty());
        assert!(dir.path().join("kept.rtf").exists());
    }

    #[test]
    fn test_clean_session_skips_prompt() {
        let (mut session, mut doc) = setup();
        let mut prompter = ScriptedPrompter::default();
        assert!(session.request_close(&mut doc, &mut prompter));
        assert_eq!(prompter.confirm_count, 0);
    }

    #[test]
    fn test_new_document_resets_everything() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, mut doc) = setup();
        let mut prompter = ScriptedPrompter::default();

        doc.insert_text(0, "Hello");
        formatting::toggle_style(&mut doc, &session, Selection::all(5), StyleBit::Bold);
        prompter.save_paths.push_back(Some(dir.path().join("a.rtf")));
        assert!(session.save_document(&mut doc, &mut prompter, false));

        assert!(session.new_document(&mut doc, &mut prompter));
        assert!(!session.is_dirty());
        assert!(session.current_path().is_none());
        assert_eq!(doc.char_count(), 0);
        assert_eq!(doc.effective_font(Selection::caret(0)), Effective::Uniform(test_font()));
        assert_eq!(session.window_title(), "Untitled - Rich Notes");
    }

    #[test]
    fn test_plain_text_open_resets_formatting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.TXT");
        fs::write(&path, "line one\r\nline two").unwrap();
        let (mut session, mut doc) = setup();
        let mut prompter = ScriptedPrompter::default();

        assert!(session.open_path(&mut doc, &mut prompter, &path));
        assert_eq!(doc.full_text(), "line one\nline two");
        assert!(!session.is_dirty());
        assert!(!formatting::is_style_active(&doc, Selection::all(17), StyleBit::Bold));
    }
}
