//! Discovery of the files that get a declaration fragment.
//!
//! Recursively scans the entry point's directory. Order is deterministic: the entry
//! point first, then a file-name-sorted directory walk.

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::config::{GeneratorOptions, IGNORED_DIRS};
use crate::error::{DtsError, Result};
use crate::transformer::{dotted_extension, FileKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub kind: FileKind,
    pub is_entry: bool,
}

fn is_ignored_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry.depth() > 0
        && IGNORED_DIRS
            .iter()
            .any(|dir| entry.file_name().to_string_lossy() == *dir)
}

/// `Button.test.ts`, `store.spec.js` and friends.
pub fn is_test_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| {
            let name = name.to_string_lossy();
            name.contains(".test") || name.contains(".spec")
        })
        .unwrap_or(false)
}

/// Every declarable file under `root`, entry point first. `exclude` is never
/// returned, even when it matches the extension list.
pub fn discover_files(
    root: &Path,
    entry: &Path,
    exclude: Option<&Path>,
    options: &GeneratorOptions,
) -> Result<Vec<DiscoveredFile>> {
    let mut files = Vec::new();

    for item in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored_dir(e))
    {
        let item = item.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            DtsError::io(path, io::Error::from(e))
        })?;

        let path = item.path();
        if !item.file_type().is_file() || is_test_file(path) || exclude == Some(path) {
            continue;
        }

        let Some(extension) = dotted_extension(path) else {
            continue;
        };
        if !options.accepts_extension(&extension) {
            continue;
        }
        let Some(kind) = FileKind::from_extension(&extension) else {
            debug!(file = %path.display(), "no transformer for extension {}", extension);
            continue;
        };

        files.push(DiscoveredFile {
            path: path.to_path_buf(),
            kind,
            is_entry: path == entry,
        });
    }

    // Stable: the walk order of everything else is kept.
    files.sort_by_key(|file| !file.is_entry);
    Ok(files)
}
