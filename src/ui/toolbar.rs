use fltk::{
    app::Sender,
    button::{Button, ToggleButton},
    enums::{Align, Font},
    frame::Frame,
    group::{Flex, FlexType},
    menu::Choice,
    prelude::*,
};

use crate::app::domain::messages::Message;

pub const TOOLBAR_HEIGHT: i32 = 30;

/// Format buttons whose pressed state mirrors the selection.
pub struct Toolbar {
    pub row: Flex,
    pub bold: ToggleButton,
    pub italic: ToggleButton,
    pub underline: ToggleButton,
    pub bullet: ToggleButton,
    pub size: Choice,
    presets: Vec<u32>,
}

fn action_button(row: &mut Flex, label: &str, width: i32, sender: &Sender<Message>, msg: Message) -> Button {
    let mut btn = Button::default().with_label(label);
    btn.clear_visible_focus();
    btn.emit(*sender, msg);
    row.fixed(&btn, width);
    btn
}

fn toggle_button(row: &mut Flex, label: &str, font: Font, sender: &Sender<Message>, msg: Message) -> ToggleButton {
    let mut btn = ToggleButton::default().with_label(label);
    btn.set_label_font(font);
    btn.clear_visible_focus();
    btn.emit(*sender, msg);
    row.fixed(&btn, TOOLBAR_HEIGHT);
    btn
}

impl Toolbar {
    pub fn new(sender: &Sender<Message>, presets: &[u32]) -> Self {
        let mut row = Flex::default();
        row.set_type(FlexType::Row);
        row.set_margin(2);
        row.set_pad(2);

        action_button(&mut row, "New", 50, sender, Message::FileNew);
        action_button(&mut row, "Open", 50, sender, Message::FileOpen);
        action_button(&mut row, "Save", 50, sender, Message::FileSave);
        action_button(&mut row, "Save As", 64, sender, Message::FileSaveAs);

        let bold = toggle_button(&mut row, "B", Font::HelveticaBold, sender, Message::ToggleBold);
        let italic = toggle_button(&mut row, "I", Font::HelveticaItalic, sender, Message::ToggleItalic);
        let mut underline = toggle_button(&mut row, "U", Font::Helvetica, sender, Message::ToggleUnderline);
        underline.set_tooltip("Underline");

        let mut size = Choice::default();
        for preset in presets {
            size.add_choice(&preset.to_string());
        }
        size.clear_visible_focus();
        size.set_tooltip("Font size");
        size.set_align(Align::Left);
        let choice_presets = presets.to_vec();
        let s = *sender;
        size.set_callback(move |c| {
            let Ok(idx) = usize::try_from(c.value()) else {
                return;
            };
            if let Some(&points) = choice_presets.get(idx) {
                s.send(Message::SetFontSize(points));
            }
        });
        row.fixed(&size, 60);

        action_button(&mut row, "Color", 56, sender, Message::ChooseColor);
        let bullet = toggle_button(&mut row, "•", Font::Helvetica, sender, Message::ToggleBullet);
        action_button(&mut row, "Clear", 50, sender, Message::ClearFormatting);

        // filler keeps the buttons packed to the left
        Frame::default();
        row.end();

        Self {
            row,
            bold,
            italic,
            underline,
            bullet,
            size,
            presets: presets.to_vec(),
        }
    }

    /// Reflects the selection's state. `size` is `None` for mixed sizes.
    pub fn reflect(&mut self, bold: bool, italic: bool, underline: bool, bullet: bool, size: Option<u32>) {
        self.bold.set_value(bold);
        self.italic.set_value(italic);
        self.underline.set_value(underline);
        self.bullet.set_value(bullet);
        let idx = size
            .and_then(|points| self.presets.iter().position(|p| *p == points))
            .and_then(|i| i32::try_from(i).ok())
            .unwrap_or(-1);
        self.size.set_value(idx);
    }
}
