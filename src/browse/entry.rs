use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use crate::constants::{HIDDEN_MARKER, SNIFF_BYTES};

/// Coarse content classification used by the file filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    PlainText,
    Markdown,
    Other,
}

impl ContentType {
    pub fn is_template_like(self) -> bool {
        matches!(self, ContentType::PlainText | ContentType::Markdown)
    }
}

/// A directory child plus the facts the browser needs about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
    /// Lowercased, without the leading dot.
    pub extension: Option<String>,
    pub hidden: bool,
    /// `None` when classification was not possible.
    pub content_type: Option<ContentType>,
}

impl Entry {
    /// Builds an entry, classifying files by extension or by sniffing their head.
    pub fn new(
        path: PathBuf,
        is_dir: bool,
    ) -> Self {
        let content_type = if is_dir {
            None
        } else {
            classify(&path)
        };
        Self::with_content_type(path, is_dir, content_type)
    }

    pub fn with_content_type(
        path: PathBuf,
        is_dir: bool,
        content_type: Option<ContentType>,
    ) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase());
        let hidden = name.starts_with(HIDDEN_MARKER);
        Entry {
            path,
            name,
            is_dir,
            extension,
            hidden,
            content_type,
        }
    }
}

/// `text/*` subtypes that are markup or structured data rather than plain text.
const NON_PLAIN_TEXT: &[&str] = &[
    "html",
    "xml",
    "sgml",
    "csv",
    "tab-separated-values",
    "rtf",
    "richtext",
    "enriched",
    "calendar",
    "vcard",
    "x-vcard",
];

/// Classifies a file: extension-based MIME lookup, or a content sniff when
/// the name has no extension. Source code and other `text/*` types count as
/// plain text.
pub fn classify(path: &Path) -> Option<ContentType> {
    match path.extension() {
        Some(_) => mime_guess::from_path(path).first().map(|mime| {
            match (mime.type_().as_str(), mime.subtype().as_str()) {
                ("text", "markdown" | "x-markdown") => ContentType::Markdown,
                ("text", sub) if !NON_PLAIN_TEXT.contains(&sub) => ContentType::PlainText,
                _ => ContentType::Other,
            }
        }),
        None => sniff(path),
    }
}

fn sniff(path: &Path) -> Option<ContentType> {
    let mut head = Vec::with_capacity(SNIFF_BYTES);
    let file = File::open(path).ok()?;
    file.take(SNIFF_BYTES as u64).read_to_end(&mut head).ok()?;
    if looks_like_text(&head) {
        Some(ContentType::PlainText)
    } else {
        Some(ContentType::Other)
    }
}

/// Non-empty, NUL-free, valid UTF-8; a character cut off at the end of the
/// sample is tolerated.
pub fn looks_like_text(head: &[u8]) -> bool {
    if head.is_empty() || head.contains(&0) {
        return false;
    }
    match std::str::from_utf8(head) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased_and_hidden_detected() {
        let e = Entry::with_content_type(PathBuf::from("/t/.Notes.MD"), false, None);
        assert_eq!(e.name, ".Notes.MD");
        assert_eq!(e.extension.as_deref(), Some("md"));
        assert!(e.hidden);
    }

    #[test]
    fn text_sniffing() {
        assert!(looks_like_text(b"hello\nworld"));
        assert!(!looks_like_text(b""));
        assert!(!looks_like_text(b"abc\0def"));
        // "é" cut in half at the end of the sample
        assert!(looks_like_text(&[b'a', 0xC3]));
        assert!(!looks_like_text(&[0xFF, 0xFE, b'a']));
    }

    #[test]
    fn known_extensions_classify_by_mime() {
        assert_eq!(
            classify(Path::new("/nowhere/a.txt")),
            Some(ContentType::PlainText)
        );
        assert_eq!(
            classify(Path::new("/nowhere/a.png")),
            Some(ContentType::Other)
        );
    }

    #[test]
    fn source_code_is_plain_text_but_markup_is_not() {
        assert_eq!(
            classify(Path::new("/nowhere/script.py")),
            Some(ContentType::PlainText)
        );
        assert_eq!(
            classify(Path::new("/nowhere/page.html")),
            Some(ContentType::Other)
        );
        assert_eq!(
            classify(Path::new("/nowhere/rows.csv")),
            Some(ContentType::Other)
        );
    }

    #[test]
    fn extensionless_files_are_sniffed() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let readme = dir.path().join("README");
        std::fs::write(&readme, "plain words\n")?;
        let blob = dir.path().join("blob");
        std::fs::write(&blob, [0u8, 1, 2, 3])?;
        assert_eq!(classify(&readme), Some(ContentType::PlainText));
        assert_eq!(classify(&blob), Some(ContentType::Other));
        assert_eq!(classify(&dir.path().join("missing")), None);
        Ok(())
    }
}
