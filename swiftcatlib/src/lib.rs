//! # swiftcatlib
//!
//! Collect the Swift sources of a project into a single text file, with the
//! tool-generated file headers removed.
//!
//! ## Overview
//!
//! The pipeline has three stages, run one after the other:
//!
//! - **Discovery** ([`filter`]): walk the tree depth-first, pruning VCS
//!   metadata, build output, dependency caches and `.xcodeproj` bundles, and
//!   keep every `.swift` file
//! - **Header stripping** ([`header`]): drop a leading BOM and a leading
//!   `/* */` or `//` comment that names the file or says `Created by`
//! - **Combining** ([`combine`]): write each file, sorted by path, with an
//!   optional `// ===== FILE: <path> =====` separator
//!
//! ## Example
//!
//! ```rust
//! use swiftcatlib::{combine_sources, CombineOptions};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::create_dir(dir.path().join("Sources")).unwrap();
//! fs::write(
//!     dir.path().join("Sources/main.swift"),
//!     "//\n//  main.swift\n//  Created by Jane on 1/2/24.\n//\n\nprint(\"hi\")\n",
//! )
//! .unwrap();
//!
//! let out = dir.path().join("combined.txt");
//! let options = CombineOptions::new().root(dir.path()).output(&out);
//! let result = combine_sources(&options).unwrap();
//!
//! assert_eq!(result.files, 1);
//! assert_eq!(
//!     fs::read_to_string(&out).unwrap(),
//!     "\n// ===== FILE: Sources/main.swift =====\nprint(\"hi\")\n"
//! );
//! ```

pub mod combine;
pub mod error;
pub mod filter;
pub mod header;

pub use combine::{
    combine_sources, normalize_newlines, separator_line, write_combined, CombineOptions,
    CombineResult, DEFAULT_OUTPUT,
};
pub use error::SwiftcatError;
pub use filter::{
    discover_files, is_source_file, ExcludeSet, SourceWalker, DEFAULT_EXCLUDES,
    PROJECT_BUNDLE_SUFFIX, SOURCE_EXTENSION,
};
pub use header::{detect_header, split_header, strip_header, Header, HeaderKind};

/// Result type for swiftcatlib operations
pub type Result<T> = std::result::Result<T, SwiftcatError>;
