use std::{
    fs,
    path::PathBuf,
    time::{Duration, Instant},
};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};
use tracing::debug;

use crate::{
    browse::{BrowserSource, Entry, Enumerate, FilterPolicy, FsEnumerator},
    config::{Config, PickMode},
    constants::{HIDDEN_MARKER, TYPE_SELECT_RESET},
    preview::PreviewPane,
    ui::browser::BrowserState,
};

/// How a picker session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Selected(PathBuf),
    Cancelled,
}

/// Work queued for the next turn of the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    SelectFirstRow,
}

/// Screen regions from the last frame, for mouse hit testing.
#[derive(Debug, Clone, Default)]
pub struct HitAreas {
    /// (column index, inner list area, first visible row)
    pub columns: Vec<(usize, Rect, usize)>,
    pub open: Rect,
    pub cancel: Rect,
}

/// Owns the browser, the preview pane and the confirm/cancel actions.
pub struct Picker<E = FsEnumerator> {
    source: BrowserSource<E>,
    browser: BrowserState,
    preview: Option<PreviewPane>,
    mode: PickMode,
    selection: Option<Entry>,
    confirm_enabled: bool,
    rendered_once: bool,
    deferred: Vec<Deferred>,
    query: String,
    typed_at: Option<Instant>,
    type_select_timeout: Duration,
    prompt: Option<String>,
    status: Option<String>,
    pub(crate) hits: HitAreas,
}

impl Picker<FsEnumerator> {
    pub fn from_config(config: &Config) -> Self {
        let filter = match config.mode {
            PickMode::File => FilterPolicy::templates(),
            PickMode::Directory => FilterPolicy::directories(),
        };
        let source = BrowserSource::new(config.root.clone(), filter);
        let preview = config
            .show_preview
            .then(|| PreviewPane::from_config(config));
        Picker::new(source, preview, config.mode)
    }
}

impl<E: Enumerate> Picker<E> {
    pub fn new(
        source: BrowserSource<E>,
        preview: Option<PreviewPane>,
        mode: PickMode,
    ) -> Self {
        let mut picker = Picker {
            source,
            browser: BrowserState::new(),
            preview,
            mode,
            selection: None,
            confirm_enabled: false,
            rendered_once: false,
            deferred: Vec::new(),
            query: String::new(),
            typed_at: None,
            type_select_timeout: TYPE_SELECT_RESET,
            prompt: None,
            status: None,
            hits: HitAreas::default(),
        };
        picker.selection_changed();
        picker
    }

    pub fn with_type_select_timeout(
        mut self,
        timeout: Duration,
    ) -> Self {
        self.type_select_timeout = timeout;
        self
    }

    pub fn source(&self) -> &BrowserSource<E> {
        &self.source
    }

    pub fn browser(&self) -> &BrowserState {
        &self.browser
    }

    pub(crate) fn browser_mut(&mut self) -> &mut BrowserState {
        &mut self.browser
    }

    pub fn preview(&self) -> Option<&PreviewPane> {
        self.preview.as_ref()
    }

    pub fn mode(&self) -> PickMode {
        self.mode
    }

    pub fn selection(&self) -> Option<&Entry> {
        self.selection.as_ref()
    }

    pub fn confirm_enabled(&self) -> bool {
        self.confirm_enabled
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Called by the renderer once the root column has been laid out.
    pub(crate) fn root_rendered(&mut self) {
        if self.rendered_once {
            return;
        }
        self.rendered_once = true;
        if self.mode == PickMode::File && self.selection.is_none() {
            self.deferred.push(Deferred::SelectFirstRow);
        }
    }

    /// Runs work queued during the last draw; returns whether anything changed.
    pub fn run_deferred(&mut self) -> bool {
        let mut changed = false;
        for task in std::mem::take(&mut self.deferred) {
            match task {
                Deferred::SelectFirstRow => {
                    if self.selection.is_none() && self.browser.select_row(&self.source, 0, 0) {
                        self.selection_changed();
                        changed = true;
                    }
                }
            }
        }
        changed
    }

    /// Dispatches one terminal event; `Some` ends the session.
    pub fn handle_event(
        &mut self,
        event: Event,
    ) -> Option<Outcome> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => None,
        }
    }

    fn handle_key(
        &mut self,
        key: KeyEvent,
    ) -> Option<Outcome> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if let Some(name) = self.prompt.as_mut() {
            match key.code {
                KeyCode::Esc => self.prompt = None,
                KeyCode::Enter => self.create_directory(),
                KeyCode::Backspace => {
                    name.pop();
                }
                KeyCode::Char(c) if !ctrl => name.push(c),
                _ => {}
            }
            return None;
        }

        match (key.code, ctrl) {
            (KeyCode::Esc, _) | (KeyCode::Char('c'), true) | (KeyCode::Char('q'), true) => {
                return Some(Outcome::Cancelled);
            }
            (KeyCode::Enter, _) => return self.confirm(),
            (KeyCode::Char('n'), true) if self.mode == PickMode::Directory => {
                self.query.clear();
                self.status = None;
                self.prompt = Some(String::new());
                return None;
            }
            (KeyCode::PageDown, _) => {
                if let Some(preview) = self.preview.as_mut() {
                    preview.scroll_by(10);
                }
                return None;
            }
            (KeyCode::PageUp, _) => {
                if let Some(preview) = self.preview.as_mut() {
                    preview.scroll_by(-10);
                }
                return None;
            }
            _ => {}
        }

        if self
            .typed_at
            .is_some_and(|t| t.elapsed() >= self.type_select_timeout)
        {
            self.query.clear();
        }
        let changed = match key.code {
            KeyCode::Backspace if !self.query.is_empty() => {
                self.query.pop();
                self.typed_at = Some(Instant::now());
                self.browser.type_select(&self.source, &self.query)
            }
            KeyCode::Char(c) if !ctrl => {
                self.query.push(c);
                self.typed_at = Some(Instant::now());
                self.browser.type_select(&self.source, &self.query)
            }
            code => {
                self.query.clear();
                match code {
                    KeyCode::Up => self.browser.move_by(&self.source, -1),
                    KeyCode::Down => self.browser.move_by(&self.source, 1),
                    KeyCode::Home => self.browser.select_first(&self.source),
                    KeyCode::End => self.browser.select_last(&self.source),
                    KeyCode::Right | KeyCode::Tab => self.browser.enter(&self.source),
                    KeyCode::Left | KeyCode::Backspace | KeyCode::BackTab => {
                        if self.browser.active() == 0 && self.mode == PickMode::Directory {
                            // lets the root itself be chosen
                            self.browser.clear_selection()
                        } else {
                            self.browser.leave()
                        }
                    }
                    _ => false,
                }
            }
        };
        if changed {
            self.selection_changed();
        }
        None
    }

    fn handle_mouse(
        &mut self,
        mouse: MouseEvent,
    ) -> Option<Outcome> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) || self.prompt.is_some() {
            return None;
        }
        let pos = Position::new(mouse.column, mouse.row);
        if self.hits.cancel.contains(pos) {
            return Some(Outcome::Cancelled);
        }
        if self.hits.open.contains(pos) {
            return self.confirm();
        }
        let hit = self
            .hits
            .columns
            .iter()
            .find(|(_, area, _)| area.contains(pos))
            .map(|&(column, area, offset)| (column, offset + usize::from(pos.y - area.y)));
        if let Some((column, row)) = hit {
            self.query.clear();
            if self.browser.select_row(&self.source, column, row) {
                self.selection_changed();
            }
        }
        None
    }

    /// Recomputes the selection, the confirm state and the preview.
    fn selection_changed(&mut self) {
        self.selection = self.browser.selection(&self.source);
        self.confirm_enabled = self.confirm_target().is_some();
        if let Some(preview) = self.preview.as_mut() {
            preview.show(self.selection.as_ref());
        }
    }

    fn confirm_target(&self) -> Option<PathBuf> {
        match (self.mode, self.selection.as_ref()) {
            (PickMode::File, Some(entry)) if !entry.is_dir => Some(entry.path.clone()),
            (PickMode::File, _) => None,
            (PickMode::Directory, Some(entry)) if entry.is_dir => Some(entry.path.clone()),
            (PickMode::Directory, Some(_)) => None,
            (PickMode::Directory, None) => Some(self.browser.active_dir(self.source.root())),
        }
    }

    /// The confirm action: a no-op unless something selectable is selected.
    pub fn confirm(&mut self) -> Option<Outcome> {
        if !self.confirm_enabled {
            return None;
        }
        self.confirm_target().map(Outcome::Selected)
    }

    fn create_directory(&mut self) {
        let Some(name) = self.prompt.take() else {
            return;
        };
        let name = name.trim();
        if name.is_empty() || name.contains(['/', '\\']) {
            self.status = Some(format!("Invalid folder name: {name:?}"));
            return;
        }
        if name.starts_with(HIDDEN_MARKER) {
            self.status = Some(format!("Invalid folder name: {name:?} would be hidden"));
            return;
        }
        let parent = self.browser.active_dir(self.source.root());
        let path = parent.join(name);
        match fs::create_dir(&path) {
            Ok(()) => {
                debug!("created {:?}", path);
                self.source.lister().invalidate(&parent);
                self.status = Some(format!("Created {name}"));
                if self.browser.select_path(&self.source, &path) {
                    self.selection_changed();
                }
            }
            Err(e) => self.status = Some(format!("Could not create {name}: {e}")),
        }
    }
}
