use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use fltk::{
    app::Sender,
    enums::Event,
    frame::Frame,
    prelude::*,
    text::{TextBuffer, TextEditor},
    window::Window,
};

use super::controllers::formatting;
use super::controllers::session::DocumentSession;
use super::domain::document::RichDocument;
use super::domain::messages::Message;
use super::domain::settings::AppSettings;
use super::domain::style::StyleBit;
use super::domain::surface::{Selection, TextSurface};
use super::services::text_ops::{byte_to_char_index, char_to_byte_index};
use crate::ui::main_window::MainWidgets;
use crate::ui::prompter::FltkPrompter;
use crate::ui::style_map::{StyleMap, fltk_font};
use crate::ui::toolbar::Toolbar;

/// Single-window coordinator: owns the widgets, the document model and the
/// session, and keeps the FLTK buffer and the model in step.
pub struct AppState {
    pub window: Window,
    pub editor: TextEditor,
    pub status: Frame,
    pub toolbar: Toolbar,
    pub buffer: TextBuffer,
    pub style_buffer: TextBuffer,
    pub sender: Sender<Message>,
    pub settings: AppSettings,
    pub document: RichDocument,
    pub session: DocumentSession,
    prompter: FltkPrompter,
    style_map: StyleMap,
    /// Set while the buffer is rewritten from the model, so the modify
    /// callback does not echo the change back.
    syncing: Rc<Cell<bool>>,
}

impl AppState {
    pub fn new(widgets: MainWidgets, sender: Sender<Message>, settings: AppSettings) -> Self {
        let MainWidgets {
            wind,
            mut text_editor,
            status,
            toolbar,
            ..
        } = widgets;

        let default_font = settings.default_font();
        let mut document = RichDocument::new(default_font.clone());
        let mut session = DocumentSession::new(default_font);
        session.set_last_directory(settings.last_open_directory.clone());
        session.attach(&mut document);

        let mut buffer = TextBuffer::default();
        let style_buffer = TextBuffer::default();
        let syncing = Rc::new(Cell::new(false));

        let guard = syncing.clone();
        let source = buffer.clone();
        let mut style_buf = style_buffer.clone();
        buffer.add_modify_callback(move |pos, inserted, deleted, _restyled, _deleted_text| {
            if guard.get() || (inserted == 0 && deleted == 0) {
                return;
            }
            // Keep the style buffer byte-aligned until the next render.
            if deleted > 0 {
                style_buf.remove(pos, pos + deleted);
            }
            let text = if inserted > 0 {
                let filler: String = std::iter::repeat_n('A', inserted as usize).collect();
                style_buf.insert(pos, &filler);
                source.text_range(pos, pos + inserted).unwrap_or_default()
            } else {
                String::new()
            };
            sender.send(Message::BufferModified {
                pos: pos.max(0) as usize,
                inserted: text,
                deleted: deleted.max(0) as usize,
            });
        });

        text_editor.set_buffer(buffer.clone());
        text_editor.handle(move |_, ev| {
            if matches!(ev, Event::Released | Event::KeyUp) {
                sender.send(Message::SelectionChanged);
            }
            false
        });

        let mut state = Self {
            window: wind,
            editor: text_editor,
            status,
            toolbar,
            buffer,
            style_buffer,
            sender,
            settings,
            document,
            session,
            prompter: FltkPrompter,
            style_map: StyleMap::new(),
            syncing,
        };
        state.apply_base_font();
        state.render_styles();
        state.refresh();
        state
    }

    pub fn dispatch(&mut self, msg: Message) {
        match msg {
            Message::FileNew => self.file_new(),
            Message::FileOpen => self.file_open(),
            Message::FileSave => self.file_save(false),
            Message::FileSaveAs => self.file_save(true),
            Message::FileQuit | Message::WindowClose => self.file_quit(),
            Message::ToggleBold => self.toggle_style(StyleBit::Bold),
            Message::ToggleItalic => self.toggle_style(StyleBit::Italic),
            Message::ToggleUnderline => self.toggle_style(StyleBit::Underline),
            Message::SetFontSize(points) => self.set_font_size(points),
            Message::ChooseColor => self.choose_color(),
            Message::ToggleBullet => {
                let selection = self.sync_selection();
                formatting::toggle_bullet(&mut self.document, &self.session, selection);
            }
            Message::ClearFormatting => {
                let selection = self.sync_selection();
                formatting::clear_formatting(&mut self.document, &self.session, selection);
                self.render_styles();
            }
            Message::BufferModified {
                pos,
                inserted,
                deleted,
            } => self.apply_buffer_edit(pos, &inserted, deleted),
            Message::SelectionChanged => {}
        }
        self.refresh();
    }

    /// Loads a file given on the command line.
    pub fn open_file(&mut self, path: &Path) {
        if self.session.open_path(&mut self.document, &mut self.prompter, path) {
            self.load_buffer_from_model();
        }
        self.refresh();
    }

    pub fn file_new(&mut self) {
        if self.session.new_document(&mut self.document, &mut self.prompter) {
            self.load_buffer_from_model();
        }
    }

    pub fn file_open(&mut self) {
        if self.session.open_document(&mut self.document, &mut self.prompter) {
            self.load_buffer_from_model();
        }
    }

    pub fn file_save(&mut self, force_as_new: bool) {
        self.session
            .save_document(&mut self.document, &mut self.prompter, force_as_new);
    }

    pub fn file_quit(&mut self) {
        if !self.session.request_close(&mut self.document, &mut self.prompter) {
            return;
        }
        self.settings.last_open_directory = self.session.last_directory().map(Path::to_path_buf);
        if let Err(e) = self.settings.save() {
            tracing::warn!(error = %e, "failed to save settings");
        }
        self.window.hide();
    }

    fn toggle_style(&mut self, bit: StyleBit) {
        let selection = self.sync_selection();
        formatting::toggle_style(&mut self.document, &self.session, selection, bit);
        self.render_styles();
    }

    fn set_font_size(&mut self, points: u32) {
        let selection = self.sync_selection();
        match formatting::apply_font_size(&mut self.document, &self.session, selection, points) {
            Ok(()) => self.render_styles(),
            Err(e) => {
                tracing::warn!(points, error = %e, "rejected font size");
                fltk::dialog::alert_default(&e.to_string());
            }
        }
    }

    fn choose_color(&mut self) {
        let selection = self.sync_selection();
        if formatting::choose_and_apply_color(&mut self.document, &self.session, &mut self.prompter, selection) {
            self.render_styles();
        }
    }

    /// Mirrors an edit made in the FLTK buffer into the model. Byte offsets
    /// refer to the model text, which matches the buffer before the edit.
    fn apply_buffer_edit(&mut self, pos: usize, inserted: &str, deleted: usize) {
        let text = self.document.content().text();
        let start = byte_to_char_index(text, pos);
        let end = byte_to_char_index(text, pos + deleted);
        if end > start {
            self.document.delete(start..end);
        }
        if !inserted.is_empty() {
            self.document.insert_text(start, inserted);
        }
        if inserted.contains('\r') {
            // the model normalised line endings; push them back
            let caret = self.document.selection().end;
            self.load_buffer_from_model();
            let text = self.document.content().text();
            self.editor.set_insert_position(char_to_byte_index(text, caret) as i32);
        } else {
            self.render_styles();
        }
    }

    /// Copies the editor's selection (or caret) into the model.
    fn sync_selection(&mut self) -> Selection {
        let selection = {
            let text = self.document.content().text();
            match self.buffer.selection_position() {
                Some((start, end)) if start != end => Selection::new(
                    byte_to_char_index(text, start.max(0) as usize),
                    byte_to_char_index(text, end.max(0) as usize),
                ),
                _ => Selection::caret(byte_to_char_index(
                    text,
                    self.editor.insert_position().max(0) as usize,
                )),
            }
        };
        self.document.set_selection(selection);
        selection
    }

    fn load_buffer_from_model(&mut self) {
        self.syncing.set(true);
        self.buffer.set_text(&self.document.full_text());
        self.syncing.set(false);
        self.editor.set_insert_position(0);
        self.apply_base_font();
        self.render_styles();
    }

    fn apply_base_font(&mut self) {
        let base = self.document.base_font();
        self.editor.set_text_font(fltk_font(&base.family, base.flags));
        self.editor.set_text_size(base.size.rounded_points() as i32);
    }

    fn render_styles(&mut self) {
        self.style_map.clear();
        let bytes = self.style_map.style_bytes(self.document.content());
        self.style_buffer.set_text(&bytes);
        self.editor
            .set_highlight_data_ext(self.style_buffer.clone(), self.style_map.entries().to_vec());
        self.editor.redraw();
    }

    fn refresh_toolbar(&mut self) {
        let selection = self.sync_selection();
        let active = |bit| formatting::is_style_active(&self.document, selection, bit);
        let (bold, italic, underline) = (
            active(StyleBit::Bold),
            active(StyleBit::Italic),
            active(StyleBit::Underline),
        );
        let bullet = self.document.bullet_state(selection).unwrap_or(false);
        let size = self
            .document
            .effective_font(selection)
            .uniform()
            .map(|font| font.size.rounded_points());
        self.toolbar.reflect(bold, italic, underline, bullet, size);
    }

    /// Update the window title and status line from the session
    pub fn refresh(&mut self) {
        self.refresh_toolbar();
        self.window.set_label(&self.session.window_title());
        self.status
            .set_label(&self.session.status_text(&self.document));
    }
}
