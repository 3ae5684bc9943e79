//! Filesystem side of the picker: entries, cached listing, filtering and the
//! lazy tree the column browser pulls from.

pub mod entry;
pub mod filter;
pub mod lister;
pub mod source;

pub use entry::{ContentType, Entry};
pub use filter::FilterPolicy;
pub use lister::{DirectoryLister, Enumerate, FsEnumerator};
pub use source::{BrowserSource, compare_entries};
