use std::{
    cell::RefCell,
    collections::HashMap,
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::{Result, anyhow};
use ignore::WalkBuilder;
use tracing::debug;

use super::entry::Entry;

/// Source of raw directory children.
pub trait Enumerate {
    fn enumerate(
        &self,
        dir: &Path,
    ) -> Result<Vec<Entry>>;
}

/// Reads a single directory level, skipping hidden entries.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsEnumerator;

impl Enumerate for FsEnumerator {
    fn enumerate(
        &self,
        dir: &Path,
    ) -> Result<Vec<Entry>> {
        if !dir.is_dir() {
            return Err(anyhow!("{} is not a readable directory", dir.display()));
        }
        let walker = WalkBuilder::new(dir)
            .max_depth(Some(1))
            .standard_filters(false)
            .hidden(true)
            .follow_links(false)
            .build();

        let mut entries = Vec::new();
        for entry_result in walker {
            match entry_result {
                Ok(entry) if entry.depth() == 0 => {}
                Ok(entry) => {
                    let path = entry.into_path();
                    // follows symlinks so linked folders stay browsable
                    let is_dir = path.is_dir();
                    entries.push(Entry::new(path, is_dir));
                }
                Err(e) => debug!("skipping entry in {:?}: {}", dir, e),
            }
        }
        Ok(entries)
    }
}

/// Directory enumeration memoized per directory for the lifetime of the lister.
///
/// Entries are never refreshed on their own: a directory that changes after
/// its first listing keeps showing the old children.
pub struct DirectoryLister<E = FsEnumerator> {
    enumerator: E,
    cache: RefCell<HashMap<PathBuf, Rc<[Entry]>>>,
}

impl DirectoryLister<FsEnumerator> {
    pub fn new() -> Self {
        Self::with_enumerator(FsEnumerator)
    }
}

impl Default for DirectoryLister<FsEnumerator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Enumerate> DirectoryLister<E> {
    pub fn with_enumerator(enumerator: E) -> Self {
        DirectoryLister {
            enumerator,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Unfiltered, unsorted children of `dir`; empty when it cannot be read.
    pub fn list(
        &self,
        dir: &Path,
    ) -> Rc<[Entry]> {
        if let Some(hit) = self.cache.borrow().get(dir) {
            return Rc::clone(hit);
        }
        let entries: Rc<[Entry]> = match self.enumerator.enumerate(dir) {
            Ok(entries) => entries.into(),
            Err(e) => {
                debug!("listing failed, showing {:?} as empty: {e:#}", dir);
                Rc::from(Vec::new())
            }
        };
        self.cache
            .borrow_mut()
            .insert(dir.to_path_buf(), Rc::clone(&entries));
        entries
    }

    /// Drops the cached listing for `dir`, e.g. after creating a child in it.
    pub fn invalidate(
        &self,
        dir: &Path,
    ) {
        self.cache.borrow_mut().remove(dir);
    }

    pub fn enumerator(&self) -> &E {
        &self.enumerator
    }
}
