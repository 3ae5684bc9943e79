use std::{
    cmp::Ordering,
    path::{Path, PathBuf},
};

use super::{
    entry::Entry,
    filter::FilterPolicy,
    lister::{DirectoryLister, Enumerate, FsEnumerator},
};

/// Lazy tree over the filesystem: filtered, sorted children on demand.
///
/// A `None` node stands for the root directory.
pub struct BrowserSource<E = FsEnumerator> {
    root: PathBuf,
    lister: DirectoryLister<E>,
    filter: FilterPolicy,
}

impl BrowserSource<FsEnumerator> {
    pub fn new(
        root: PathBuf,
        filter: FilterPolicy,
    ) -> Self {
        Self::with_lister(root, DirectoryLister::new(), filter)
    }
}

impl<E: Enumerate> BrowserSource<E> {
    pub fn with_lister(
        root: PathBuf,
        lister: DirectoryLister<E>,
        filter: FilterPolicy,
    ) -> Self {
        BrowserSource {
            root,
            lister,
            filter,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn lister(&self) -> &DirectoryLister<E> {
        &self.lister
    }

    pub fn child_count(
        &self,
        node: Option<&Entry>,
    ) -> usize {
        match self.dir_of(node) {
            Some(dir) => self
                .lister
                .list(dir)
                .iter()
                .filter(|e| self.filter.is_allowed(e))
                .count(),
            None => 0,
        }
    }

    pub fn child(
        &self,
        node: Option<&Entry>,
        index: usize,
    ) -> Option<Entry> {
        self.children(node).into_iter().nth(index)
    }

    pub fn is_leaf(
        &self,
        node: &Entry,
    ) -> bool {
        !node.is_dir
    }

    /// All visible children of `node`, directories first, then by name.
    pub fn children(
        &self,
        node: Option<&Entry>,
    ) -> Vec<Entry> {
        let Some(dir) = self.dir_of(node) else {
            return Vec::new();
        };
        let mut visible: Vec<Entry> = self
            .lister
            .list(dir)
            .iter()
            .filter(|e| self.filter.is_allowed(e))
            .cloned()
            .collect();
        visible.sort_by(compare_entries);
        visible
    }

    fn dir_of<'a>(
        &'a self,
        node: Option<&'a Entry>,
    ) -> Option<&'a Path> {
        match node {
            None => Some(self.root.as_path()),
            Some(e) if e.is_dir => Some(e.path.as_path()),
            Some(_) => None,
        }
    }
}

/// Directories before files, then case-insensitive by name; raw name breaks ties.
pub fn compare_entries(
    a: &Entry,
    b: &Entry,
) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}
