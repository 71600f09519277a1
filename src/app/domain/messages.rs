/// All messages that can be sent through the FLTK channel.
/// Each toolbar or shortcut callback sends one of these; the dispatch loop in main handles them.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // File
    FileNew,
    FileOpen,
    FileSave,
    FileSaveAs,
    FileQuit,
    WindowClose,

    // Format
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    SetFontSize(u32),
    ChooseColor,
    ToggleBullet,
    ClearFormatting,

    // Editor
    /// Text changed in the FLTK buffer. Positions and the deleted length are
    /// byte offsets into the buffer before the change.
    BufferModified {
        pos: usize,
        inserted: String,
        deleted: usize,
    },
    SelectionChanged,
}
