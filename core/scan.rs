use crate::config::FilterConfig;
use crate::error::{AppError, Result};
use crate::filter::FileFilter;
use globset::{Glob, GlobSet, GlobSetBuilder};
use log;
#[cfg(feature = "serde_support")]
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path};
use walkdir::WalkDir;

/// A path relative to the scan root, always with `/` separators.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde_support", derive(Serialize))]
#[cfg_attr(feature = "serde_support", serde(transparent))]
pub struct CandidatePath(String);

impl CandidatePath {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let normalized = raw.into().replace('\\', "/");
        if normalized.is_empty() {
            return Err(AppError::InvalidPath("empty path".to_string()));
        }
        if normalized.starts_with('/') || Path::new(&normalized).is_absolute() {
            return Err(AppError::InvalidPath(format!(
                "expected a relative path, got '{}'",
                normalized
            )));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final segment of the path.
    pub fn file_name(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// Everything before the final segment, or `""` for top-level files.
    pub fn folder(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for CandidatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CandidatePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CandidatePath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Sorted, duplicate-free set of candidate paths produced by a scan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde_support", derive(Serialize))]
#[cfg_attr(feature = "serde_support", serde(transparent))]
pub struct FileSet {
    paths: Vec<CandidatePath>,
}

impl FileSet {
    pub fn from_paths(paths: impl IntoIterator<Item = CandidatePath>) -> Self {
        let mut paths: Vec<CandidatePath> = paths.into_iter().collect();
        paths.sort();
        paths.dedup();
        Self { paths }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CandidatePath> {
        self.paths.iter()
    }

    pub fn as_slice(&self) -> &[CandidatePath] {
        &self.paths
    }

    /// Builds a new set holding only the paths accepted by `keep`.
    pub fn subset<F>(&self, mut keep: F) -> FileSet
    where
        F: FnMut(&CandidatePath) -> bool,
    {
        FileSet {
            paths: self.paths.iter().filter(|p| keep(p)).cloned().collect(),
        }
    }

    pub fn matching<'a>(&'a self, globs: &'a GlobSet) -> impl Iterator<Item = &'a CandidatePath> {
        self.paths.iter().filter(move |p| globs.is_match(p.as_str()))
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a CandidatePath;
    type IntoIter = std::slice::Iter<'a, CandidatePath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Walks a root directory and collects eligible files.
#[derive(Debug, Clone)]
pub struct Scanner {
    filter: FileFilter,
    excluded_dirs: HashSet<String>,
}

impl Scanner {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            filter: FileFilter::new(config),
            excluded_dirs: config
                .excluded_dirs
                .iter()
                .map(|d| d.to_lowercase())
                .collect(),
        }
    }

    pub fn scan(&self, root: &Path) -> Result<FileSet> {
        log::debug!("Scanning project directory: {}", root.display());
        ensure_traversable(root)?;

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            // Pruned before descent: excluded subtrees are never read.
            .filter_entry(|entry| entry.depth() == 0 || !self.is_excluded_dir_entry(entry));

        let mut accepted = Vec::new();
        for entry_result in walker {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    if e.depth() == 0 {
                        let source = e
                            .into_io_error()
                            .unwrap_or_else(|| io::Error::other("walk failed at root"));
                        return Err(AppError::ScanTraversal {
                            path: root.to_path_buf(),
                            source,
                        });
                    }
                    log::warn!("Error walking directory: {}", e);
                    continue;
                }
            };

            if !is_file_entry(&entry) {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            if !self.filter.is_allowed(&file_name) {
                log::trace!("Excluding file: {}", entry.path().display());
                continue;
            }

            match relative_candidate(entry.path(), root) {
                Some(candidate) => {
                    log::trace!("Including file: {}", candidate);
                    accepted.push(candidate);
                }
                None => log::warn!(
                    "Could not get relative path for: {}",
                    entry.path().display()
                ),
            }
        }

        let file_set = FileSet::from_paths(accepted);
        log::info!("Scan complete. Found {} candidate files.", file_set.len());
        Ok(file_set)
    }

    fn is_excluded_dir_entry(&self, entry: &walkdir::DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        let excluded = self.excluded_dirs.contains(&name);
        if excluded {
            log::trace!("Pruning excluded directory: {}", entry.path().display());
        }
        excluded
    }
}

/// Scans `root` with the given configuration.
pub fn scan(root: &Path, config: &FilterConfig) -> Result<FileSet> {
    Scanner::new(config).scan(root)
}

fn ensure_traversable(root: &Path) -> Result<()> {
    let traversal_error = |source: io::Error| AppError::ScanTraversal {
        path: root.to_path_buf(),
        source,
    };
    let metadata = fs::metadata(root).map_err(traversal_error)?;
    if !metadata.is_dir() {
        return Err(traversal_error(io::Error::other("not a directory")));
    }
    fs::read_dir(root).map_err(traversal_error)?;
    Ok(())
}

// Symlinks are not followed. A link counts as a file unless it resolves to a
// directory, so dangling links stay candidates and fail later at read time.
fn is_file_entry(entry: &walkdir::DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return true;
    }
    file_type.is_symlink() && !entry.path().is_dir()
}

fn relative_candidate(path: &Path, root: &Path) -> Option<CandidatePath> {
    let relative = pathdiff::diff_paths(path, root)?;
    let segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    CandidatePath::new(segments.join("/")).ok()
}

/// Builds a glob set for picking candidate paths. A trailing `/` selects the
/// whole directory.
pub fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern_str in patterns {
        let mut processed_pattern = pattern_str.trim().to_string();
        if processed_pattern.ends_with('/') && processed_pattern.len() > 1 {
            processed_pattern.push_str("**");
        }
        match Glob::new(&processed_pattern) {
            Ok(glob) => {
                log::trace!(
                    "Adding glob pattern: {} (processed as {})",
                    pattern_str,
                    processed_pattern
                );
                builder.add(glob);
            }
            Err(e) => {
                log::error!("Invalid glob pattern \"{}\": {}", pattern_str, e);
                return Err(AppError::Glob(format!(
                    "Invalid glob pattern \"{}\" (processed as \"{}\"): {}",
                    pattern_str, processed_pattern, e
                )));
            }
        }
    }
    builder.build().map_err(|e| {
        log::error!("Error building glob set: {}", e);
        AppError::Glob(e.to_string())
    })
}
