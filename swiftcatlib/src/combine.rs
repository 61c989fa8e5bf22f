//! Combining discovered sources into a single output file.
//!
//! This module provides the main entry points: [`combine_sources`] runs the
//! whole walk, sort, strip and write pipeline, and [`write_combined`] does the
//! concatenation into any writer.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::SwiftcatError;
use crate::filter::{discover_files, ExcludeSet};
use crate::header::split_header;
use crate::Result;

/// Default name of the combined output file.
pub const DEFAULT_OUTPUT: &str = "combined_swift_no_headers.txt";

/// Options for a combine run.
#[derive(Debug, Clone)]
pub struct CombineOptions {
    /// Directory to walk
    pub root: PathBuf,
    /// File to create or overwrite
    pub output: PathBuf,
    /// Directories to prune
    pub excludes: ExcludeSet,
    /// Whether to write a `// ===== FILE: ... =====` line before each file
    pub separators: bool,
}

impl Default for CombineOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            output: PathBuf::from(DEFAULT_OUTPUT),
            excludes: ExcludeSet::default(),
            separators: true,
        }
    }
}

impl CombineOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directory to walk.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Set the output file.
    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Set the exclusion set.
    pub fn exclude(mut self, excludes: ExcludeSet) -> Self {
        self.excludes = excludes;
        self
    }

    /// Enable or disable per-file separator lines.
    pub fn separators(mut self, enabled: bool) -> Self {
        self.separators = enabled;
        self
    }
}

/// Summary of a combine run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombineResult {
    /// Absolute path of the written file
    pub output: PathBuf,
    /// Number of source files written
    pub files: usize,
    /// Number of files that had a header removed
    pub headers_stripped: usize,
    /// Number of files that were not valid UTF-8
    pub lossy_files: usize,
}

/// Build the separator line written before a file.
pub fn separator_line(relative: &Path) -> String {
    format!("\n// ===== FILE: {} =====\n", relative.display())
}

/// Convert a path to a path relative to the walk root.
fn make_relative<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

/// Translate `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_newlines(text: String) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    }
}

/// Read a file as text, replacing invalid UTF-8 instead of failing.
///
/// Line endings are normalized to `\n`. Returns the text and whether
/// replacement was needed.
fn read_source(path: &Path) -> Result<(String, bool)> {
    let bytes = fs::read(path).map_err(|source| SwiftcatError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let (text, lossy) = match String::from_utf8(bytes) {
        Ok(text) => (text, false),
        Err(e) => {
            warn!(path = %path.display(), "file is not valid UTF-8, decoding lossily");
            (String::from_utf8_lossy(e.as_bytes()).into_owned(), true)
        }
    };

    Ok((normalize_newlines(text), lossy))
}

/// Write the stripped contents of `files` into `out`.
///
/// Files are written in the order given. Each body has its trailing
/// whitespace trimmed and ends with exactly one newline. Separator lines use
/// the path relative to `root`.
pub fn write_combined<W: Write>(
    out: &mut W,
    root: &Path,
    files: &[PathBuf],
    separators: bool,
) -> Result<CombineResult> {
    let mut result = CombineResult::default();

    for path in files {
        let (text, lossy) = read_source(path)?;
        if lossy {
            result.lossy_files += 1;
        }

        let (header, body) = split_header(&text);
        if let Some(header) = header {
            debug!(
                path = %path.display(),
                kind = ?header.kind,
                lines = header.lines,
                "stripped header"
            );
            result.headers_stripped += 1;
        }

        if separators {
            out.write_all(separator_line(make_relative(path, root)).as_bytes())?;
        }
        out.write_all(body.trim_end().as_bytes())?;
        out.write_all(b"\n")?;

        result.files += 1;
    }

    Ok(result)
}

/// Collect every Swift file under the root into the output file.
///
/// This is the main entry point. It:
/// 1. Resolves the root and output to absolute paths
/// 2. Discovers sources, pruning excluded directories, sorted by path
/// 3. Creates the output's parent directories
/// 4. Writes each file with its header stripped
///
/// # Example
///
/// ```rust,ignore
/// use swiftcatlib::{combine_sources, CombineOptions, ExcludeSet};
///
/// let excludes = ExcludeSet::new().exclude("Generated")?;
/// let result = combine_sources(
///     &CombineOptions::new()
///         .root("MyApp")
///         .output("out/all.txt")
///         .exclude(excludes),
/// )?;
/// println!("{} files", result.files);
/// ```
pub fn combine_sources(options: &CombineOptions) -> Result<CombineResult> {
    if !options.root.exists() {
        return Err(SwiftcatError::PathNotFound(options.root.clone()));
    }
    let root = fs::canonicalize(&options.root)?;
    let output = std::path::absolute(&options.output)?;

    let files = discover_files(&root, &options.excludes)?;
    debug!(root = %root.display(), count = files.len(), "discovered sources");

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|source| SwiftcatError::FileWrite {
            path: output.clone(),
            source,
        })?;
    }

    let file = File::create(&output).map_err(|source| SwiftcatError::FileWrite {
        path: output.clone(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    let mut result = write_combined(&mut writer, &root, &files, options.separators)?;
    writer.flush().map_err(|source| SwiftcatError::FileWrite {
        path: output.clone(),
        source,
    })?;

    result.output = output;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_swift_file(path: &Path, content: &[u8]) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn create_simple_project(root: &Path) {
        create_swift_file(
            &root.join("Sources/App/main.swift"),
            b"//\n//  main.swift\n//  App\n//\n//  Created by Jane on 1/2/24.\n//\n\nprint(\"hi\")\n\n\n",
        );
        create_swift_file(
            &root.join("Sources/App/Models/User.swift"),
            b"/* Created by Jane */\nstruct User {}\n",
        );
        create_swift_file(&root.join("Package.swift"), b"import PackageDescription\n");
        create_swift_file(&root.join("Pods/Lib/Lib.swift"), b"// vendored\n");
        create_swift_file(&root.join("App.xcodeproj/X.swift"), b"// bundle\n");
    }

    #[test]
    fn test_write_combined_with_separators() {
        let temp = tempdir().unwrap();
        create_simple_project(temp.path());
        let files = discover_files(temp.path(), &ExcludeSet::new()).unwrap();

        let mut out = Vec::new();
        let result = write_combined(&mut out, temp.path(), &files, true).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert_eq!(result.files, 3);
        assert_eq!(result.headers_stripped, 2);
        assert_eq!(
            out,
            "\n// ===== FILE: Package.swift =====\nimport PackageDescription\n\
             \n// ===== FILE: Sources/App/Models/User.swift =====\nstruct User {}\n\
             \n// ===== FILE: Sources/App/main.swift =====\nprint(\"hi\")\n"
        );
    }

    #[test]
    fn test_write_combined_without_separators() {
        let temp = tempdir().unwrap();
        create_simple_project(temp.path());
        let files = discover_files(temp.path(), &ExcludeSet::new()).unwrap();

        let mut out = Vec::new();
        write_combined(&mut out, temp.path(), &files, false).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(!out.contains("// ===== FILE:"));
        assert_eq!(out, "import PackageDescription\nstruct User {}\nprint(\"hi\")\n");
    }

    #[test]
    fn test_empty_body_still_gets_newline() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("Empty.swift");
        create_swift_file(&file, b"// Created by X\n");

        let mut out = Vec::new();
        write_combined(&mut out, temp.path(), &[file], false).unwrap();

        assert_eq!(out, b"\n");
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("Latin1.swift");
        create_swift_file(&file, b"let s = \"caf\xe9\"\n");

        let mut out = Vec::new();
        let result = write_combined(&mut out, temp.path(), &[file], false).unwrap();

        assert_eq!(result.lossy_files, 1);
        assert_eq!(String::from_utf8(out).unwrap(), "let s = \"caf\u{fffd}\"\n");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("Gone.swift");

        let mut out = Vec::new();
        let result = write_combined(&mut out, temp.path(), &[file], true);

        assert!(matches!(result, Err(SwiftcatError::FileRead { .. })));
    }

    #[test]
    fn test_combine_sources_creates_parents() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("project");
        create_simple_project(&root);
        let output = temp.path().join("out/nested/all.txt");

        let options = CombineOptions::new().root(&root).output(&output);
        let result = combine_sources(&options).unwrap();

        assert_eq!(result.files, 3);
        assert!(result.output.is_absolute());
        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains("// ===== FILE: Package.swift ====="));
        assert!(!written.contains("vendored"));
        assert!(!written.contains("bundle"));
    }

    #[test]
    fn test_combine_sources_is_idempotent() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("project");
        create_simple_project(&root);
        let output = temp.path().join("all.txt");
        let options = CombineOptions::new().root(&root).output(&output);

        combine_sources(&options).unwrap();
        let first = fs::read(&output).unwrap();
        combine_sources(&options).unwrap();
        let second = fs::read(&output).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_combine_sources_with_user_exclude() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("project");
        create_simple_project(&root);
        let output = temp.path().join("all.txt");

        let excludes = ExcludeSet::new().exclude("Models").unwrap();
        let options = CombineOptions::new()
            .root(&root)
            .output(&output)
            .exclude(excludes);
        let result = combine_sources(&options).unwrap();

        assert_eq!(result.files, 2);
        assert!(!fs::read_to_string(&output).unwrap().contains("User"));
    }

    #[test]
    fn test_combine_sources_missing_root() {
        let temp = tempdir().unwrap();
        let options = CombineOptions::new()
            .root(temp.path().join("missing"))
            .output(temp.path().join("all.txt"));

        let result = combine_sources(&options);

        assert!(matches!(result, Err(SwiftcatError::PathNotFound(_))));
        assert!(!temp.path().join("all.txt").exists());
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\rc\n".to_string()), "a\nb\nc\n");
        assert_eq!(normalize_newlines("a\nb".to_string()), "a\nb");
    }

    #[test]
    fn test_crlf_and_cr_only_sources() {
        let temp = tempdir().unwrap();
        let crlf = temp.path().join("A.swift");
        let cr = temp.path().join("B.swift");
        create_swift_file(
            &crlf,
            b"//\r\n//  A.swift\r\n//  Created by X\r\n//\r\n\r\nimport UIKit\r\nclass A {}\r\n",
        );
        create_swift_file(&cr, b"// B.swift\r// Created by X\rimport UIKit\rclass B {}\r");

        let mut out = Vec::new();
        let result = write_combined(&mut out, temp.path(), &[crlf, cr], false).unwrap();

        assert_eq!(result.headers_stripped, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "import UIKit\nclass A {}\nimport UIKit\nclass B {}\n"
        );
    }

    #[test]
    fn test_root_file_yields_empty_output() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("Only.swift");
        create_swift_file(&file, b"let x = 1\n");
        let output = temp.path().join("all.txt");

        let options = CombineOptions::new().root(&file).output(&output);
        let result = combine_sources(&options).unwrap();

        assert_eq!(result.files, 0);
        assert_eq!(fs::read(&output).unwrap(), b"");
    }
}
