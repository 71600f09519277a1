use fltk::{
    app::Sender,
    enums::{Align, Color, FrameType},
    frame::Frame,
    group::Flex,
    menu::MenuBar,
    prelude::*,
    text::{TextBuffer, TextEditor, WrapMode},
    window::Window,
};

use super::menu::build_menu;
use super::toolbar::{TOOLBAR_HEIGHT, Toolbar};
use crate::app::domain::messages::Message;

const STATUS_HEIGHT: i32 = 22;

pub struct MainWidgets {
    pub wind: Window,
    pub flex: Flex,
    pub menu: MenuBar,
    pub toolbar: Toolbar,
    pub text_editor: TextEditor,
    pub status: Frame,
}

pub fn build_main_window(sender: &Sender<Message>, size_presets: &[u32], word_wrap: bool) -> MainWidgets {
    let mut wind = Window::new(100, 100, 760, 520, "Untitled - Rich Notes");
    wind.set_xclass("RichNotes");

    let mut flex = Flex::new(0, 0, 760, 520, None);
    flex.set_type(fltk::group::FlexType::Column);

    let mut menu = MenuBar::new(0, 0, 0, 30, "");
    build_menu(&mut menu, sender, size_presets);
    flex.fixed(&menu, 30);

    let toolbar = Toolbar::new(sender, size_presets);
    flex.fixed(&toolbar.row, TOOLBAR_HEIGHT);

    let mut text_editor = TextEditor::new(0, 0, 0, 0, "");
    text_editor.set_buffer(TextBuffer::default());
    if word_wrap {
        text_editor.wrap_mode(WrapMode::AtBounds, 0);
    }

    let mut status = Frame::default().with_label("Chars: 0");
    status.set_frame(FrameType::FlatBox);
    status.set_color(Color::from_rgb(240, 240, 240));
    status.set_label_size(12);
    status.set_align(Align::Left | Align::Inside);
    flex.fixed(&status, STATUS_HEIGHT);

    flex.end();
    wind.resizable(&flex);
    wind.end();

    MainWidgets {
        wind,
        flex,
        menu,
        toolbar,
        text_editor,
        status,
    }
}
