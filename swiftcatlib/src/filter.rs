//! Swift source discovery with directory exclusion.
//!
//! This module walks a project tree and yields `.swift` files, pruning
//! build output, dependency caches, VCS metadata and Xcode project bundles
//! before they are descended into.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::SwiftcatError;
use crate::Result;

/// File name suffix of the sources that get collected.
pub const SOURCE_EXTENSION: &str = ".swift";

/// Directories whose name ends with this suffix are Xcode project bundles.
pub const PROJECT_BUNDLE_SUFFIX: &str = ".xcodeproj";

/// Directory basenames that are always pruned.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    ".git",
    ".build",
    "build",
    "DerivedData",
    "Pods",
    "Carthage",
    ".swiftpm",
    ".xcworkspace",
];

/// Set of directory basenames that are never descended into.
///
/// Always contains [`DEFAULT_EXCLUDES`]; user additions are matched by exact
/// name, and names containing glob metacharacters are also matched as
/// patterns against the basename.
#[derive(Debug, Clone)]
pub struct ExcludeSet {
    names: BTreeSet<String>,
    patterns: Vec<Pattern>,
}

impl Default for ExcludeSet {
    fn default() -> Self {
        Self {
            names: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
            patterns: Vec::new(),
        }
    }
}

impl ExcludeSet {
    /// Create the default exclusion set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory name (or basename glob) to exclude.
    pub fn exclude(mut self, name: &str) -> Result<Self> {
        if name.contains(['*', '?', '[']) {
            let pat = Pattern::new(name).map_err(|e| SwiftcatError::InvalidGlob {
                pattern: name.to_string(),
                message: e.to_string(),
            })?;
            self.patterns.push(pat);
        }
        self.names.insert(name.to_string());
        Ok(self)
    }

    /// Add multiple directory names to exclude.
    pub fn exclude_many<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self> {
        for name in names {
            self = self.exclude(name.as_ref())?;
        }
        Ok(self)
    }

    /// Check whether a directory with this basename must be pruned.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.names.contains(name)
            || name.ends_with(PROJECT_BUNDLE_SUFFIX)
            || self.patterns.iter().any(|p| p.matches(name))
    }
}

/// Check whether a file name carries the Swift extension.
pub fn is_source_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(SOURCE_EXTENSION))
        .unwrap_or(false)
}

/// Lazy depth-first walk over the Swift sources below a root.
///
/// Excluded directories are skipped before their contents are read. The
/// root itself is never pruned, and a root that is not a directory yields
/// nothing. Paths come out in filesystem order; use
/// [`discover_files`] for a sorted list.
pub struct SourceWalker {
    entries: walkdir::IntoIter,
    excludes: ExcludeSet,
}

impl SourceWalker {
    pub fn new(root: impl AsRef<Path>, excludes: ExcludeSet) -> Self {
        Self {
            entries: WalkDir::new(root).follow_links(false).into_iter(),
            excludes,
        }
    }
}

impl Iterator for SourceWalker {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };

            if entry.file_type().is_dir() {
                let name = entry.file_name().to_string_lossy();
                if entry.depth() > 0 && self.excludes.is_excluded(&name) {
                    debug!(path = %entry.path().display(), "pruning excluded directory");
                    self.entries.skip_current_dir();
                }
                continue;
            }

            if entry.depth() == 0 {
                continue;
            }

            let path = entry.path();
            if is_source_file(path) && path.is_file() {
                return Some(Ok(entry.into_path()));
            }
        }
    }
}

/// Discover Swift source files below `root`, sorted by full path.
pub fn discover_files(root: impl AsRef<Path>, excludes: &ExcludeSet) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();

    if !root.exists() {
        return Err(SwiftcatError::PathNotFound(root.to_path_buf()));
    }

    let mut files = SourceWalker::new(root, excludes.clone()).collect::<Result<Vec<_>>>()?;

    // Sort for deterministic output
    files.sort();

    Ok(files)
}
