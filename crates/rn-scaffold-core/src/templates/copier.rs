//! Template tree copying with exclusion filtering

use crate::error::{IoContext, Result, ScaffoldError};
use crate::templates::manifest::{matches_pattern, MANIFEST_FILE};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Counts of what a copy produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: usize,
    pub directories: usize,
}

/// Exclusion predicate built from manifest patterns, rooted at a template directory
#[derive(Debug, Clone)]
pub struct Exclusions {
    root: PathBuf,
    patterns: Vec<String>,
}

impl Exclusions {
    pub fn new(root: &Path, patterns: Vec<String>) -> Self {
        Self {
            root: root.to_path_buf(),
            patterns,
        }
    }

    /// True if an absolute source path should be skipped along with its subtree
    pub fn is_excluded(&self, path: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return false;
        };
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if relative.is_empty() {
            return false;
        }
        // The template's own manifest is never part of the generated project
        if relative == MANIFEST_FILE {
            return true;
        }
        self.patterns
            .iter()
            .any(|pattern| matches_pattern(&relative, pattern))
    }
}

/// Copy everything under `source` into `destination`, skipping excluded entries.
///
/// Destination directories are created as needed. A failure aborts the copy
/// and leaves whatever was already written in place.
pub fn copy_tree<F>(source: &Path, destination: &Path, exclude: F) -> Result<CopyStats>
where
    F: Fn(&Path) -> bool,
{
    if !source.is_dir() {
        return Err(ScaffoldError::Template(format!(
            "Template directory not found: {}",
            source.display()
        )));
    }
    fs::create_dir_all(destination).io_context("create directory", destination)?;

    let mut stats = CopyStats::default();
    let walker = WalkDir::new(source)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !exclude(entry.path()));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            ScaffoldError::io("walk", &path, e.into())
        })?;
        if entry.depth() == 0 {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| ScaffoldError::Template(format!("Unexpected path {}", entry.path().display())))?;
        let target = destination.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).io_context("create directory", &target)?;
            stats.directories += 1;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
            stats.files += 1;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).io_context("create directory", parent)?;
            }
            fs::copy(entry.path(), &target).io_context("copy", entry.path())?;
            stats.files += 1;
        }
    }

    Ok(stats)
}

#[cfg(unix)]
fn copy_symlink(source: &Path, target: &Path) -> Result<()> {
    let link = fs::read_link(source).io_context("read link", source)?;
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).io_context("create directory", parent)?;
    }
    std::os::unix::fs::symlink(&link, target).io_context("create symlink", target)
}

#[cfg(not(unix))]
fn copy_symlink(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).io_context("create directory", parent)?;
    }
    fs::copy(source, target).io_context("copy", source).map(|_| ())
}
