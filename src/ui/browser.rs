use std::path::{Path, PathBuf};

use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};

use crate::browse::{BrowserSource, Entry, Enumerate};

/// One column of the browser: the children of `node` (root when `None`).
#[derive(Debug, Clone, Default)]
pub struct Column {
    pub node: Option<Entry>,
    pub selected: Option<usize>,
    pub scroll_offset: usize,
}

impl Column {
    fn of(node: Option<Entry>) -> Self {
        Column {
            node,
            selected: None,
            scroll_offset: 0,
        }
    }

    pub fn dir<'a>(
        &'a self,
        root: &'a Path,
    ) -> &'a Path {
        self.node.as_ref().map_or(root, |n| n.path.as_path())
    }
}

/// Column navigation over a [`BrowserSource`].
///
/// Selecting a directory opens its children in a new column to the right;
/// keyboard focus stays on `active` until the user moves into it.
#[derive(Debug, Clone)]
pub struct BrowserState {
    columns: Vec<Column>,
    active: usize,
}

impl Default for BrowserState {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserState {
    pub fn new() -> Self {
        BrowserState {
            columns: vec![Column::of(None)],
            active: 0,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// The deepest selected entry.
    pub fn selection<E: Enumerate>(
        &self,
        source: &BrowserSource<E>,
    ) -> Option<Entry> {
        self.columns
            .iter()
            .rev()
            .find_map(|col| col.selected.map(|idx| (col, idx)))
            .and_then(|(col, idx)| source.child(col.node.as_ref(), idx))
    }

    /// Directory whose children the focused column shows.
    pub fn active_dir(
        &self,
        root: &Path,
    ) -> PathBuf {
        self.columns[self.active].dir(root).to_path_buf()
    }

    /// Selects `row` in `column`, opening a child column for directories.
    pub fn select_row<E: Enumerate>(
        &mut self,
        source: &BrowserSource<E>,
        column: usize,
        row: usize,
    ) -> bool {
        let Some(col) = self.columns.get(column) else {
            return false;
        };
        let Some(entry) = source.child(col.node.as_ref(), row) else {
            return false;
        };
        let changed = col.selected != Some(row) || self.active != column;
        self.active = column;
        self.columns[column].selected = Some(row);
        self.columns.truncate(column + 1);
        if !source.is_leaf(&entry) {
            self.columns.push(Column::of(Some(entry)));
        }
        changed
    }

    /// Moves the selection in the focused column by `delta` rows.
    pub fn move_by<E: Enumerate>(
        &mut self,
        source: &BrowserSource<E>,
        delta: isize,
    ) -> bool {
        let col = &self.columns[self.active];
        let count = source.child_count(col.node.as_ref());
        if count == 0 {
            return false;
        }
        let target = match col.selected {
            Some(idx) => idx.saturating_add_signed(delta).min(count - 1),
            None if delta < 0 => count - 1,
            None => 0,
        };
        self.select_row(source, self.active, target)
    }

    pub fn select_first<E: Enumerate>(
        &mut self,
        source: &BrowserSource<E>,
    ) -> bool {
        self.select_row(source, self.active, 0)
    }

    pub fn select_last<E: Enumerate>(
        &mut self,
        source: &BrowserSource<E>,
    ) -> bool {
        let count = source.child_count(self.columns[self.active].node.as_ref());
        count > 0 && self.select_row(source, self.active, count - 1)
    }

    /// Moves focus into the opened directory column, selecting its first row.
    pub fn enter<E: Enumerate>(
        &mut self,
        source: &BrowserSource<E>,
    ) -> bool {
        let next = self.active + 1;
        match self.columns.get(next) {
            Some(col) if source.child_count(col.node.as_ref()) > 0 => {
                self.select_row(source, next, 0)
            }
            _ => false,
        }
    }

    /// Moves focus back to the parent column, keeping its directory selected.
    pub fn leave(&mut self) -> bool {
        if self.active == 0 {
            return false;
        }
        self.columns[self.active].selected = None;
        self.columns[self.active].scroll_offset = 0;
        self.active -= 1;
        self.columns.truncate(self.active + 2);
        true
    }

    /// Back to the initial state: only the root column, nothing selected.
    pub fn clear_selection(&mut self) -> bool {
        let had = self.columns.iter().any(|c| c.selected.is_some());
        self.columns.truncate(1);
        self.columns[0].selected = None;
        self.active = 0;
        had
    }

    /// Selects the child of the focused column whose path is `path`.
    pub fn select_path<E: Enumerate>(
        &mut self,
        source: &BrowserSource<E>,
        path: &Path,
    ) -> bool {
        let children = source.children(self.columns[self.active].node.as_ref());
        match children.iter().position(|e| e.path == path) {
            Some(row) => self.select_row(source, self.active, row),
            None => false,
        }
    }

    /// Jumps to the best fuzzy match for `query` among the focused column's names.
    pub fn type_select<E: Enumerate>(
        &mut self,
        source: &BrowserSource<E>,
        query: &str,
    ) -> bool {
        if query.is_empty() {
            return false;
        }
        let matcher = SkimMatcherV2::default().ignore_case();
        let children = source.children(self.columns[self.active].node.as_ref());
        let mut best: Option<(i64, usize)> = None;
        for (idx, entry) in children.iter().enumerate() {
            if let Some(score) = matcher.fuzzy_match(&entry.name, query)
                && best.is_none_or(|(s, _)| score > s)
            {
                best = Some((score, idx));
            }
        }
        match best {
            Some((_, row)) => self.select_row(source, self.active, row),
            None => false,
        }
    }
}

/// Adjust scroll offset and compute visible range
pub fn adjust_scroll_and_slice(
    selected_idx: Option<usize>,
    scroll_offset: &mut usize,
    max_lines: usize,
    data_len: usize,
) -> (usize, usize) {
    if let Some(selected_idx) = selected_idx {
        if selected_idx < *scroll_offset {
            *scroll_offset = selected_idx;
        } else if selected_idx >= *scroll_offset + max_lines {
            *scroll_offset = selected_idx.saturating_sub(max_lines).saturating_add(1);
        }
    }
    *scroll_offset = (*scroll_offset).min(data_len.saturating_sub(1));
    let end_idx = (*scroll_offset + max_lines).min(data_len);
    (*scroll_offset, end_idx)
}
