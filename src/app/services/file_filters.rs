/// Filters for the open dialog, rich text first.
///
/// FLTK format: "Description\tPattern\nDescription2\tPattern2"
/// Note: FLTK automatically adds "All Files (*)" option, so we don't include it
pub fn get_document_filter_multiline() -> String {
    ["Rich Text\t*.rtf", "Text Files\t*.txt"].join("\n")
}

/// Filters for the save dialog. The chosen extension selects the format.
pub fn get_save_filter_multiline() -> String {
    get_document_filter_multiline()
}
