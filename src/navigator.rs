//! Interactive descent through the secret hierarchy.
//!
//! The hierarchy is discovered one level at a time: list the current folder,
//! let the user narrow the entries with a substring filter, pick one, and
//! either descend (folder) or stop (leaf). The descent is a loop over an
//! accumulated [`NamespacePath`], so arbitrarily deep trees cost no stack.

use std::fmt;

use vault_client::{KvStore, SecretEntry};

use crate::error::AppError;
use crate::prompt::Prompter;

pub const SEPARATOR: char = '/';

/// Cursor into the secret hierarchy, one segment per navigation step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespacePath {
    segments: Vec<String>,
}

impl NamespacePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of folder segments chosen so far
    pub fn folder_depth(&self) -> usize {
        self.segments.iter().filter(|s| is_folder(s)).count()
    }

    /// True once the last chosen segment is a leaf secret
    pub fn is_leaf(&self) -> bool {
        self.segments.last().is_some_and(|s| !is_folder(s))
    }

    /// Path relative to the mount, as used in API URLs
    pub fn as_api_path(&self) -> String {
        self.segments.concat()
    }
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_api_path())
    }
}

pub fn is_folder(entry: &str) -> bool {
    entry.contains(SEPARATOR)
}

/// Entries containing `query` as a case-sensitive substring, in listing order
pub fn filter_entries(entries: &[String], query: &str) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| entry.contains(query))
        .cloned()
        .collect()
}

pub struct Navigator<'a, S: ?Sized, P: ?Sized> {
    store: &'a S,
    prompter: &'a mut P,
    max_depth: Option<usize>,
}

impl<'a, S, P> Navigator<'a, S, P>
where
    S: KvStore + ?Sized,
    P: Prompter + ?Sized,
{
    pub fn new(store: &'a S, prompter: &'a mut P) -> Self {
        Self {
            store,
            prompter,
            max_depth: None,
        }
    }

    /// Refuse to descend into more than `max_depth` nested folders
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Walk from the mount root down to a leaf chosen by the user
    pub async fn resolve_leaf(&mut self) -> Result<NamespacePath, AppError> {
        let mut path = NamespacePath::root();

        loop {
            let api_path = path.as_api_path();
            let entries = self.store.list(&api_path).await?;
            tracing::debug!(path = %api_path, entries = entries.len(), "Listed folder");

            let location = format!("{}/{}", self.store.mount(), api_path);
            self.prompter.show(&location, &entries)?;
            let query = self.prompter.input(
                &format!("Search secret or press Enter to see all > {}", location),
                None,
            )?;

            let candidates = filter_entries(&entries, &query);
            if candidates.is_empty() {
                return Err(AppError::NoMatches {
                    path: api_path,
                    query,
                });
            }

            let index = self.prompter.select("Select Secret", &candidates)?;
            let choice = candidates
                .get(index)
                .cloned()
                .ok_or_else(|| AppError::InvalidInput(format!("no entry at position {}", index)))?;

            path.push(choice);

            if path.is_leaf() {
                return Ok(path);
            }

            if let Some(max) = self.max_depth {
                if path.folder_depth() > max {
                    return Err(AppError::DepthExceeded {
                        path: path.as_api_path(),
                        max,
                    });
                }
            }
        }
    }

    /// [`Navigator::resolve_leaf`], then fetch the chosen secret
    pub async fn read_leaf(&mut self) -> Result<(NamespacePath, SecretEntry), AppError> {
        let path = self.resolve_leaf().await?;
        let entry = self.store.read(&path.as_api_path()).await?;
        Ok((path, entry))
    }
}
