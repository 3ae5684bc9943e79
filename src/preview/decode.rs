use std::{fmt, fs::File, io, io::Read, path::Path};

use encoding_rs::{Encoding, MACINTOSH, UTF_8, WINDOWS_1252};
use tracing::debug;

#[derive(Debug)]
pub enum PreviewError {
    Io(io::Error),
    Undecodable { tried: Vec<&'static str> },
}

impl fmt::Display for PreviewError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            PreviewError::Io(e) => write!(f, "{e}"),
            PreviewError::Undecodable { tried } => {
                write!(f, "not valid text in any of {}", tried.join(", "))
            }
        }
    }
}

impl std::error::Error for PreviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PreviewError::Io(e) => Some(e),
            PreviewError::Undecodable { .. } => None,
        }
    }
}

impl From<io::Error> for PreviewError {
    fn from(e: io::Error) -> Self {
        PreviewError::Io(e)
    }
}

/// Ordered list of encodings tried until one decodes without errors.
#[derive(Debug, Clone)]
pub struct TextDecoder {
    encodings: Vec<&'static Encoding>,
}

impl TextDecoder {
    /// UTF-8, then Mac Roman, then Windows-1252.
    pub fn standard() -> Self {
        Self::with_encodings(vec![UTF_8, MACINTOSH, WINDOWS_1252])
    }

    pub fn with_encodings(encodings: Vec<&'static Encoding>) -> Self {
        TextDecoder { encodings }
    }

    pub fn decode(
        &self,
        bytes: &[u8],
    ) -> Result<(String, &'static Encoding), PreviewError> {
        for &encoding in &self.encodings {
            if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes)
            {
                if encoding != UTF_8 {
                    debug!("decoded preview as {}", encoding.name());
                }
                return Ok((text.into_owned(), encoding));
            }
        }
        Err(PreviewError::Undecodable {
            tried: self.encodings.iter().map(|e| e.name()).collect(),
        })
    }

    /// Reads at most `max_bytes` of `path` and decodes them.
    pub fn read_text(
        &self,
        path: &Path,
        max_bytes: u64,
    ) -> Result<String, PreviewError> {
        let file = File::open(path)?;
        let mut bytes = Vec::new();
        // one extra byte tells us whether the file was cut short
        file.take(max_bytes.saturating_add(1))
            .read_to_end(&mut bytes)?;
        let truncated = bytes.len() as u64 > max_bytes;
        if truncated {
            bytes.truncate(max_bytes as usize);
            let keep = complete_utf8_prefix(&bytes);
            bytes.truncate(keep);
        }
        self.decode(&bytes).map(|(text, _)| text)
    }
}

impl Default for TextDecoder {
    fn default() -> Self {
        Self::standard()
    }
}

/// Length of `bytes` without a UTF-8 sequence cut off at the very end.
fn complete_utf8_prefix(bytes: &[u8]) -> usize {
    match std::str::from_utf8(bytes) {
        Err(e) if e.error_len().is_none() => e.valid_up_to(),
        _ => bytes.len(),
    }
}
