use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use super::rtf;
use super::text_ops::{decode_text_lossy, extension_lowercase};
use crate::app::domain::rich_text::StyledText;
use crate::app::domain::style::FontSpec;
use crate::app::domain::surface::TextSurface;
use crate::app::infrastructure::error::Result;

/// On-disk format, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    RichText,
    PlainText,
}

impl Codec {
    /// `.rtf` (any case) is rich text; every other extension is plain text.
    pub fn for_path(path: &Path) -> Self {
        match extension_lowercase(path).as_deref() {
            Some("rtf") => Self::RichText,
            _ => Self::PlainText,
        }
    }
}

/// A fully decoded file, ready to replace the surface content.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentContent {
    Rich(StyledText),
    Plain(String),
}

impl DocumentContent {
    pub fn apply_to<S: TextSurface + ?Sized>(self, surface: &mut S) {
        match self {
            Self::Rich(content) => surface.replace_content(content),
            Self::Plain(text) => surface.replace_plain(&text),
        }
    }
}

/// Read and decode a file. Nothing touches the surface until the caller
/// applies the returned content.
pub fn load(path: &Path, base: &FontSpec) -> Result<DocumentContent> {
    let bytes = fs::read(path)?;
    let codec = Codec::for_path(path);
    tracing::debug!(path = %path.display(), ?codec, bytes = bytes.len(), "decoding document");
    match codec {
        Codec::RichText => Ok(DocumentContent::Rich(rtf::decode(&bytes, base)?)),
        Codec::PlainText => Ok(DocumentContent::Plain(decode_text_lossy(&bytes))),
    }
}

/// Encode the surface content for `path` and write it atomically.
///
/// Plain text targets keep only the characters; formatting is dropped.
pub fn save<S: TextSurface + ?Sized>(path: &Path, surface: &S) -> Result<()> {
    let codec = Codec::for_path(path);
    let bytes = match codec {
        Codec::RichText => surface.serialize_structured(),
        Codec::PlainText => surface.full_text().into_bytes(),
    };
    tracing::debug!(path = %path.display(), ?codec, bytes = bytes.len(), "encoding document");
    write_atomically(path, &bytes)
}

/// The destination only ever holds the old or the complete new content.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let existing = fs::metadata(path).ok().map(|m| m.permissions());
    let mut temp = new_temp_file(dir)?;
    temp.write_all(bytes)?;
    // A replaced file keeps its mode; a new one gets the umask default.
    if let Some(permissions) = existing {
        temp.as_file().set_permissions(permissions)?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(unix)]
fn new_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    tempfile::Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn new_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::document::RichDocument;
    use crate::app::domain::style::{CharStyle, FontSize, Rgb, StyleFlags};
    use crate::app::domain::surface::Selection;
    use crate::app::infrastructure::error::AppError;

    fn base() -> FontSpec {
        FontSpec::new("Segoe UI", FontSize::from_points(12).unwrap(), StyleFlags::REGULAR)
    }

    fn styled_doc() -> RichDocument {
        let mut doc = RichDocument::new(base());
        doc.insert_text(0, "Title\nfirst item\nsecond item");
        let bold = base().with_flags(StyleFlags {
            bold: true,
            ..StyleFlags::REGULAR
        });
        doc.set_font(Selection::new(0, 5), &bold);
        doc.set_font(Selection::new(6, 16), &base().with_size(FontSize::from_points(20).unwrap()));
        doc.set_color(Selection::new(17, 28), Rgb::new(0, 128, 255));
        doc.set_bullet(Selection::new(6, 28), true);
        doc
    }

    #[test]
    fn test_codec_dispatch_is_case_insensitive() {
        assert_eq!(Codec::for_path(Path::new("a.rtf")), Codec::RichText);
        assert_eq!(Codec::for_path(Path::new("a.RTF")), Codec::RichText);
        assert_eq!(Codec::for_path(Path::new("a.Rtf")), Codec::RichText);
        assert_eq!(Codec::for_path(Path::new("a.txt")), Codec::PlainText);
        assert_eq!(Codec::for_path(Path::new("a.md")), Codec::PlainText);
        assert_eq!(Codec::for_path(Path::new("noext")), Codec::PlainText);
        assert_eq!(Codec::for_path(Path::new("rtf")), Codec::PlainText);
    }

    #[test]
    fn test_rich_round_trip_keeps_styles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.rtf");
        let doc = styled_doc();

        save(&path, &doc).unwrap();
        let loaded = load(&path, &base()).unwrap();
        assert_eq!(loaded, DocumentContent::Rich(doc.snapshot()));

        let mut other = RichDocument::new(base());
        loaded.apply_to(&mut other);
        assert_eq!(other.snapshot(), doc.snapshot());
    }

    #[test]
    fn test_plain_round_trip_drops_styles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        let doc = styled_doc();

        save(&path, &doc).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), doc.full_text());

        let mut other = RichDocument::new(base());
        load(&path, &base()).unwrap().apply_to(&mut other);
        assert_eq!(other.full_text(), doc.full_text());
        let all = Selection::all(other.char_count());
        assert_eq!(other.effective_style(all).uniform(), Some(CharStyle::plain(&base())));
        assert_eq!(other.bullet_state(all).uniform(), Some(false));
    }

    #[test]
    fn test_unknown_extension_is_plain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.markdown");
        fs::write(&path, "{\\rtf1 not parsed}").unwrap();
        assert_eq!(
            load(&path, &base()).unwrap(),
            DocumentContent::Plain("{\\rtf1 not parsed}".to_string())
        );
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("missing.rtf"), &base()).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn test_load_malformed_rtf_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.rtf");
        fs::write(&path, "{\\rtf1 {\\b never closed").unwrap();
        let err = load(&path, &base()).unwrap_err();
        assert!(matches!(err, AppError::Rtf(_)));
    }

    #[test]
    fn test_save_into_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("note.rtf");
        let err = save(&path, &styled_doc()).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_save_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        fs::write(&path, "old content that is longer").unwrap();

        let mut doc = RichDocument::new(base());
        doc.insert_text(0, "new");
        save(&path, &doc).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");

        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_mode_of_replaced_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.rtf");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        save(&path, &styled_doc()).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_gets_default_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        // fs::write applies the process umask to 0o666
        let reference = dir.path().join("reference.txt");
        fs::write(&reference, "").unwrap();
        let expected = fs::metadata(&reference).unwrap().permissions().mode() & 0o777;

        let path = dir.path().join("note.txt");
        save(&path, &styled_doc()).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, expected);
    }
}
