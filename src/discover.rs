//! Expansion of directory arguments into the source files beneath them.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules"];

/// Expand `paths` into the list of files to patch.
///
/// Files (and paths that do not exist) are kept as given so that a bad path
/// still fails when it is read. Each directory is replaced, in place, by the
/// sorted files beneath it whose extension is in `extensions`.
///
/// A file reached more than once (named twice, or named and also found under
/// a named directory) is only listed at its first position.
pub fn expand_targets<I, P>(paths: I, extensions: &[String]) -> walkdir::Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut targets = Vec::new();
    let mut seen = HashSet::new();
    let mut queue = |file: PathBuf| {
        let key = fs::canonicalize(&file).unwrap_or_else(|_| file.clone());
        if seen.insert(key) {
            targets.push(file);
        } else {
            tracing::debug!(file = %file.display(), "already queued, skipping");
        }
    };

    for path in paths {
        let path = path.as_ref();
        if !path.is_dir() {
            queue(path.to_path_buf());
            continue;
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(path)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry));
        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        tracing::debug!(dir = %path.display(), files = files.len(), "expanded directory");
        files.into_iter().for_each(&mut queue);
    }

    Ok(targets)
}

fn is_skipped(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
}
