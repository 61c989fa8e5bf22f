//! Detection and removal of tool-generated file headers.
//!
//! Xcode and similar tools prepend every new file with a comment naming the
//! file and its author:
//!
//! ```text
//! //
//! //  User.swift
//! //  App
//! //
//! //  Created by Jane Doe on 1/2/24.
//! //
//! ```
//!
//! A leading comment counts as such a header when it mentions the Swift
//! extension or the phrase `Created by`. Two shapes are recognized, tried in
//! order:
//!
//! - **Block**: the text (after leading whitespace) opens with `/*` and the
//!   closing `*/` starts within the first [`BLOCK_SEARCH_LIMIT`] characters.
//! - **Line**: a run of `//` lines at the very top, looking at no more than
//!   [`INSPECTED_LINES`] lines, and at most [`MAX_HEADER_LINES`] long.
//!
//! The body that remains is always a suffix of the input, so stripping never
//! allocates.

use crate::filter::SOURCE_EXTENSION;

/// Maximum character offset at which a block comment's `*/` may start.
pub const BLOCK_SEARCH_LIMIT: usize = 4000;

/// Longest `//` run that still counts as a header.
pub const MAX_HEADER_LINES: usize = 15;

/// Number of leading lines examined for a `//` header.
pub const INSPECTED_LINES: usize = 20;

/// Attribution phrase written by Xcode file templates.
pub const ATTRIBUTION: &str = "Created by";

const BOM: char = '\u{feff}';
const BLOCK_OPEN: &str = "/*";
const BLOCK_CLOSE: &str = "*/";
const LINE_COMMENT: &str = "//";

/// Which comment syntax the header was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    /// A `/* ... */` block
    Block,
    /// A run of `//` lines
    Line,
}

/// A detected header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub kind: HeaderKind,
    /// Number of source lines making up the header comment
    pub lines: usize,
    /// Byte offset into the original text where the remaining body starts
    pub body_start: usize,
}

fn mentions_source(comment: &str) -> bool {
    comment.contains(SOURCE_EXTENSION) || comment.contains(ATTRIBUTION)
}

fn skip_newlines(text: &str) -> &str {
    text.trim_start_matches(['\r', '\n'])
}

fn block_header(text: &str) -> Option<Header> {
    let trimmed = text.trim_start();
    if !trimmed.starts_with(BLOCK_OPEN) {
        return None;
    }

    // Only look for the close token inside the window; "*/" starting at
    // character BLOCK_SEARCH_LIMIT still fits.
    let window_end = trimmed
        .char_indices()
        .nth(BLOCK_SEARCH_LIMIT + BLOCK_CLOSE.len())
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    let close = trimmed[..window_end].find(BLOCK_CLOSE)?;

    let block = &trimmed[..close + BLOCK_CLOSE.len()];
    if !mentions_source(block) {
        return None;
    }

    let body = skip_newlines(&trimmed[block.len()..]);
    Some(Header {
        kind: HeaderKind::Block,
        lines: block.lines().count(),
        body_start: text.len() - body.len(),
    })
}

/// Split into lines that keep their terminator, breaking on `\r\n`, a lone
/// `\r` and `\n`.
fn lines_inclusive(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let end = match rest.find(['\r', '\n']) {
            Some(i) if rest[i..].starts_with("\r\n") => i + 2,
            Some(i) => i + 1,
            None => rest.len(),
        };
        let (line, tail) = rest.split_at(end);
        rest = tail;
        Some(line)
    })
}

fn line_header(text: &str) -> Option<Header> {
    let run: Vec<&str> = lines_inclusive(text)
        .take(INSPECTED_LINES)
        .take_while(|line| line.trim_start().starts_with(LINE_COMMENT))
        .collect();

    if run.is_empty() || run.len() > MAX_HEADER_LINES || !mentions_source(&run.concat()) {
        return None;
    }

    let header_len: usize = run.iter().map(|line| line.len()).sum();
    let body = skip_newlines(&text[header_len..]);
    Some(Header {
        kind: HeaderKind::Line,
        lines: run.len(),
        body_start: text.len() - body.len(),
    })
}

/// Detect a generated header at the top of `text`.
///
/// A leading byte-order mark is ignored for detection; the returned
/// `body_start` is relative to `text` as given, BOM included.
pub fn detect_header(text: &str) -> Option<Header> {
    let bom_len = if text.starts_with(BOM) {
        BOM.len_utf8()
    } else {
        0
    };
    let content = &text[bom_len..];

    block_header(content)
        .or_else(|| line_header(content))
        .map(|header| Header {
            body_start: header.body_start + bom_len,
            ..header
        })
}

/// Split `text` into its detected header, if any, and the remaining body.
///
/// The body never includes a leading BOM, whether or not a header was found.
pub fn split_header(text: &str) -> (Option<Header>, &str) {
    match detect_header(text) {
        Some(header) => (Some(header), &text[header.body_start..]),
        None => (None, text.strip_prefix(BOM).unwrap_or(text)),
    }
}

/// Remove a leading BOM and generated header from `text`.
///
/// Returns the text unchanged (apart from the BOM) when no header is found.
///
/// # Example
///
/// ```rust
/// use swiftcatlib::strip_header;
///
/// let source = "/* Created by X on date */\nfunc f() {}\n";
/// assert_eq!(strip_header(source), "func f() {}\n");
/// ```
pub fn strip_header(text: &str) -> &str {
    split_header(text).1
}
