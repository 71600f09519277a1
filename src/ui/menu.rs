use fltk::{
    app::Sender,
    enums::Shortcut,
    menu::{MenuBar, MenuFlag},
    prelude::*,
};

use crate::app::domain::messages::Message;

pub fn build_menu(menu: &mut MenuBar, sender: &Sender<Message>, size_presets: &[u32]) {
    let s = sender;

    // File
    menu.add("File/New", Shortcut::Ctrl | 'n', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileNew) });
    menu.add("File/Open...", Shortcut::Ctrl | 'o', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileOpen) });
    menu.add("File/Save", Shortcut::Ctrl | 's', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileSave) });
    menu.add("File/Save As...", Shortcut::Ctrl | Shortcut::Shift | 's', MenuFlag::MenuDivider, { let s = *s; move |_| s.send(Message::FileSaveAs) });
    menu.add("File/Quit", Shortcut::Ctrl | 'q', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileQuit) });

    // Format
    menu.add("Format/Bold", Shortcut::Ctrl | 'b', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::ToggleBold) });
    menu.add("Format/Italic", Shortcut::Ctrl | 'i', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::ToggleItalic) });
    menu.add("Format/Underline", Shortcut::Ctrl | 'u', MenuFlag::MenuDivider, { let s = *s; move |_| s.send(Message::ToggleUnderline) });
    for &size in size_presets {
        menu.add(&format!("Format/Font Size/{}", size), Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::SetFontSize(size)) });
    }
    menu.add("Format/Color...", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::ChooseColor) });
    menu.add("Format/Bullet", Shortcut::None, MenuFlag::MenuDivider, { let s = *s; move |_| s.send(Message::ToggleBullet) });
    menu.add("Format/Clear Formatting", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::ClearFormatting) });
}
