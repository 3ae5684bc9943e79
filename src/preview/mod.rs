//! Preview of the selected entry: a rich external rendering when available,
//! decoded plain text otherwise, and an inline message when both fail.

pub mod decode;
pub mod rich;

use std::path::Path;

use anyhow::Result;
use tracing::{debug, warn};

pub use decode::{PreviewError, TextDecoder};
pub use rich::{CommandPreviewer, RichPreviewer, strip_ansi};

use crate::{browse::Entry, config::Config, constants::DEFAULT_MAX_PREVIEW_BYTES};

/// Which surface the pane currently shows; exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    Empty,
    Rich,
    Text,
    Error,
}

pub type RichFactory = Box<dyn FnOnce() -> Result<Box<dyn RichPreviewer>>>;

/// The rich surface: one previewer whose content is swapped per selection.
struct RichSurface {
    previewer: Box<dyn RichPreviewer>,
    content: String,
}

pub struct PreviewPane {
    factory: Option<RichFactory>,
    rich: Option<RichSurface>,
    decoder: TextDecoder,
    max_bytes: u64,
    state: PreviewState,
    text: String,
    message: String,
    scroll: u16,
}

impl PreviewPane {
    /// `factory` builds the rich previewer on first use; `None` means text only.
    pub fn new(
        factory: Option<RichFactory>,
        decoder: TextDecoder,
        max_bytes: u64,
    ) -> Self {
        PreviewPane {
            factory,
            rich: None,
            decoder,
            max_bytes,
            state: PreviewState::Empty,
            text: String::new(),
            message: String::new(),
            scroll: 0,
        }
    }

    pub fn text_only() -> Self {
        Self::new(None, TextDecoder::standard(), DEFAULT_MAX_PREVIEW_BYTES)
    }

    pub fn from_config(config: &Config) -> Self {
        let factory = config.previewer.clone().map(|cmd| -> RichFactory {
            Box::new(move || {
                let previewer = CommandPreviewer::from_command_line(&cmd)?;
                Ok(Box::new(previewer) as Box<dyn RichPreviewer>)
            })
        });
        Self::new(factory, TextDecoder::standard(), config.max_preview_bytes)
    }

    pub fn state(&self) -> PreviewState {
        self.state
    }

    /// Text of the visible surface; empty for the placeholder.
    pub fn content(&self) -> &str {
        match self.state {
            PreviewState::Empty => "",
            PreviewState::Rich => self.rich.as_ref().map_or("", |r| r.content.as_str()),
            PreviewState::Text => &self.text,
            PreviewState::Error => &self.message,
        }
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_by(
        &mut self,
        delta: i32,
    ) {
        let max = self.content().lines().count().saturating_sub(1);
        let max = u16::try_from(max).unwrap_or(u16::MAX);
        let next = i32::from(self.scroll).saturating_add(delta).clamp(0, i32::from(max));
        self.scroll = u16::try_from(next).unwrap_or(0);
    }

    /// Updates the pane for a new selection.
    pub fn show(
        &mut self,
        selection: Option<&Entry>,
    ) {
        self.scroll = 0;
        let Some(entry) = selection.filter(|e| !e.is_dir) else {
            self.state = PreviewState::Empty;
            return;
        };
        if self.show_rich(&entry.path) {
            self.state = PreviewState::Rich;
            return;
        }
        match self.decoder.read_text(&entry.path, self.max_bytes) {
            Ok(text) => {
                self.text = printable(&text);
                self.state = PreviewState::Text;
            }
            Err(e) => {
                self.message = printable(&format!("Could not preview {}: {e}", entry.name));
                self.state = PreviewState::Error;
            }
        }
    }

    fn show_rich(
        &mut self,
        path: &Path,
    ) -> bool {
        if self.rich.is_none()
            && let Some(factory) = self.factory.take()
        {
            match factory() {
                Ok(previewer) => {
                    self.rich = Some(RichSurface {
                        previewer,
                        content: String::new(),
                    })
                }
                Err(e) => warn!("rich preview unavailable, using plain text: {e:#}"),
            }
        }
        let Some(surface) = self.rich.as_mut() else {
            return false;
        };
        match surface.previewer.render(path) {
            Ok(content) => {
                surface.content = printable(&content);
                true
            }
            Err(e) => {
                debug!("rich preview failed for {:?}: {e:#}", path);
                false
            }
        }
    }
}

/// Text that is safe to hand to the terminal: escape sequences removed,
/// carriage returns dropped, other control characters shown as U+FFFD.
pub fn printable(text: &str) -> String {
    strip_ansi(text)
        .chars()
        .filter(|&c| c != '\r')
        .map(|c| {
            if c.is_control() && c != '\n' && c != '\t' {
                char::REPLACEMENT_CHARACTER
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use encoding_rs::UTF_8;
    use std::{cell::Cell, path::PathBuf, rc::Rc};

    struct Fake {
        fail: bool,
    }

    impl RichPreviewer for Fake {
        fn render(
            &mut self,
            path: &Path,
        ) -> Result<String> {
            if self.fail {
                Err(anyhow!("cannot render"))
            } else {
                Ok(format!("RICH {}", path.display()))
            }
        }
    }

    fn counting_factory(
        built: Rc<Cell<usize>>,
        fail: bool,
    ) -> RichFactory {
        Box::new(move || {
            built.set(built.get() + 1);
            Ok(Box::new(Fake { fail }) as Box<dyn RichPreviewer>)
        })
    }

    fn file_entry(path: PathBuf) -> Entry {
        Entry::with_content_type(path, false, None)
    }

    #[test]
    fn rich_surface_is_built_once_and_reused() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let a = dir.path().join("a.md");
        let b = dir.path().join("b.md");
        std::fs::write(&a, "a")?;
        std::fs::write(&b, "b")?;
        let built = Rc::new(Cell::new(0));
        let mut pane = PreviewPane::new(
            Some(counting_factory(built.clone(), false)),
            TextDecoder::standard(),
            1024,
        );
        pane.show(Some(&file_entry(a)));
        pane.show(Some(&file_entry(b.clone())));
        assert_eq!(built.get(), 1);
        assert_eq!(pane.state(), PreviewState::Rich);
        assert_eq!(pane.content(), format!("RICH {}", b.display()));
        Ok(())
    }

    #[test]
    fn unavailable_rich_falls_back_to_text() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let a = dir.path().join("a.txt");
        std::fs::write(&a, "hello template")?;
        let failing: RichFactory = Box::new(|| Err(anyhow!("no previewer")));
        let mut pane = PreviewPane::new(Some(failing), TextDecoder::standard(), 1024);
        pane.show(Some(&file_entry(a)));
        assert_eq!(pane.state(), PreviewState::Text);
        assert_eq!(pane.content(), "hello template");
        Ok(())
    }

    #[test]
    fn failing_render_falls_back_per_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let a = dir.path().join("a.txt");
        std::fs::write(&a, "body")?;
        let built = Rc::new(Cell::new(0));
        let mut pane = PreviewPane::new(
            Some(counting_factory(built, true)),
            TextDecoder::standard(),
            1024,
        );
        pane.show(Some(&file_entry(a)));
        assert_eq!(pane.state(), PreviewState::Text);
        assert_eq!(pane.content(), "body");
        Ok(())
    }

    #[test]
    fn control_sequences_never_reach_the_screen() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let a = dir.path().join("esc.txt");
        std::fs::write(&a, "ok\x1b[2J\x1b]0;title\x07 end\r\nbell\x07\tx\n")?;
        let mut pane = PreviewPane::text_only();
        pane.show(Some(&file_entry(a)));
        assert_eq!(pane.state(), PreviewState::Text);
        assert_eq!(pane.content(), "ok end\nbell\u{FFFD}\tx\n");
        Ok(())
    }

    #[test]
    fn undecodable_bytes_show_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let a = dir.path().join("bad.txt");
        std::fs::write(&a, [0xFFu8, 0xFE, 0xFD])?;
        let mut pane = PreviewPane::new(None, TextDecoder::with_encodings(vec![UTF_8]), 1024);
        pane.show(Some(&file_entry(a)));
        assert_eq!(pane.state(), PreviewState::Error);
        assert!(pane.content().starts_with("Could not preview bad.txt"));
        Ok(())
    }

    #[test]
    fn vanished_file_shows_error() {
        let mut pane = PreviewPane::text_only();
        pane.show(Some(&file_entry(PathBuf::from("/gone/away.md"))));
        assert_eq!(pane.state(), PreviewState::Error);
        assert!(pane.content().contains("away.md"));
    }

    #[test]
    fn directories_and_nothing_are_empty() {
        let mut pane = PreviewPane::text_only();
        let dir = Entry::with_content_type(PathBuf::from("/tmp"), true, None);
        pane.show(Some(&dir));
        assert_eq!(pane.state(), PreviewState::Empty);
        pane.show(None);
        assert_eq!(pane.state(), PreviewState::Empty);
        assert_eq!(pane.content(), "");
    }

    #[test]
    fn scroll_is_clamped_and_reset() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let a = dir.path().join("a.txt");
        std::fs::write(&a, "1\n2\n3\n")?;
        let mut pane = PreviewPane::text_only();
        pane.show(Some(&file_entry(a.clone())));
        pane.scroll_by(10);
        assert_eq!(pane.scroll(), 2);
        pane.scroll_by(-5);
        assert_eq!(pane.scroll(), 0);
        pane.scroll_by(1);
        pane.show(Some(&file_entry(a)));
        assert_eq!(pane.scroll(), 0);
        Ok(())
    }
}
