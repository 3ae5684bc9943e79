use super::entry::Entry;
use crate::constants::TEMPLATE_EXTENSIONS;

/// Decides which entries the browser shows.
#[derive(Debug, Clone)]
pub struct FilterPolicy {
    extensions: Vec<String>,
    directories_only: bool,
}

impl FilterPolicy {
    /// Text and markdown templates plus every non-hidden directory.
    pub fn templates() -> Self {
        Self::with_extensions(TEMPLATE_EXTENSIONS.iter().copied())
    }

    pub fn with_extensions<'a>(extensions: impl IntoIterator<Item = &'a str>) -> Self {
        FilterPolicy {
            extensions: extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            directories_only: false,
        }
    }

    /// Non-hidden directories and nothing else.
    pub fn directories() -> Self {
        FilterPolicy {
            extensions: Vec::new(),
            directories_only: true,
        }
    }

    pub fn is_allowed(
        &self,
        entry: &Entry,
    ) -> bool {
        if entry.hidden {
            return false;
        }
        if entry.is_dir {
            return true;
        }
        if self.directories_only {
            return false;
        }
        let typed = entry.content_type.is_some_and(|ct| ct.is_template_like());
        typed || self.extension_allowed(entry.extension.as_deref())
    }

    fn extension_allowed(
        &self,
        extension: Option<&str>,
    ) -> bool {
        extension.is_some_and(|ext| self.extensions.iter().any(|allowed| allowed == ext))
    }
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self::templates()
    }
}
