//! Sample cleaning and rejection ahead of structural parsing.
//!
//! License banners and author attributions add no signal and leak corpus
//! provenance into training data, so they are stripped first.  Two
//! malformed shapes the source parser cannot recover from are rejected
//! outright: multiple top-level classes, and field declarations appearing
//! after other members.

use std::sync::LazyLock;

use regex::Regex;

use crate::split::java::{java_tree, top_level_class};

static AUTHOR_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(?://|/\*+|\*+)[^\n]*@author[^\n]*\n?").unwrap());

/// Clean one source listing, or reject it with `None`.
///
/// Applied in order: strip the leading license block, strip author
/// comments, then reject listings whose class body declares fields after a
/// non-field member.  Running the function on its own output is a no-op.
pub fn preprocess(source: &str) -> Option<String> {
    let cleaned = strip_license_block(source);
    let cleaned = AUTHOR_LINE_RE.replace_all(&cleaned, "").into_owned();
    if has_fields_after_members(&cleaned) {
        return None;
    }
    Some(cleaned)
}

/// True when either representation declares more than one top-level class.
/// Alignment assumes exactly one class per sample.
pub fn has_multiple_classes(java_source: &str, jasm_code: &str) -> bool {
    let assembly_classes = jasm_code
        .lines()
        .filter(|line| line.trim_start().starts_with(".class"))
        .count();
    if assembly_classes > 1 {
        return true;
    }

    match java_tree(java_source) {
        Some(tree) => {
            let root = tree.root_node();
            let mut cursor = root.walk();
            root.children(&mut cursor)
                .filter(|child| child.kind() == "class_declaration")
                .count()
                > 1
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// License stripping
// ---------------------------------------------------------------------------

/// Delete every comment that starts before the first `class`/`import`
/// keyword appearing outside a comment, then drop the blank prefix this
/// leaves behind.
fn strip_license_block(source: &str) -> String {
    let spans = comment_spans(source);
    let cut = match first_code_keyword(source, &spans) {
        Some(position) => position,
        None => return source.to_string(),
    };

    let mut output = String::with_capacity(source.len());
    let mut copied_to = 0;
    for &(start, end) in &spans {
        if start >= cut {
            break;
        }
        output.push_str(&source[copied_to..start]);
        copied_to = end;
    }
    output.push_str(&source[copied_to..]);

    output.trim_start().to_string()
}

/// Byte ranges of block and line comments, skipping string and character
/// literals so quoted `//` sequences are not mistaken for comments.
fn comment_spans(source: &str) -> Vec<(usize, usize)> {
    let bytes = source.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let start = i;
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                spans.push((start, i));
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let start = i;
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i = (i + 2).min(bytes.len());
                spans.push((start, i));
            }
            quote @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    spans
}

/// Position of the first `class` or `import` keyword outside any comment.
fn first_code_keyword(source: &str, spans: &[(usize, usize)]) -> Option<usize> {
    let mut earliest: Option<usize> = None;
    for keyword in ["class", "import"] {
        for (position, _) in source.match_indices(keyword) {
            if inside_span(spans, position) || !is_keyword_at(source, position, keyword) {
                continue;
            }
            earliest = Some(earliest.map_or(position, |found| found.min(position)));
            break;
        }
    }
    earliest
}

fn inside_span(spans: &[(usize, usize)], position: usize) -> bool {
    spans
        .iter()
        .any(|&(start, end)| position >= start && position < end)
}

/// A match counts as the keyword only on identifier boundaries, so
/// `Baz.class` and `classify` do not anchor the license cut.
fn is_keyword_at(source: &str, position: usize, keyword: &str) -> bool {
    let bytes = source.as_bytes();
    if position > 0 {
        let before = bytes[position - 1];
        if before.is_ascii_alphanumeric() || before == b'_' || before == b'$' || before == b'.' {
            return false;
        }
    }
    match bytes.get(position + keyword.len()) {
        Some(&after) => after.is_ascii_whitespace(),
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Shape rejection
// ---------------------------------------------------------------------------

/// True when a field declaration follows a non-field member in the
/// top-level class body.  The header/static-field separation downstream
/// assumes fields are declared contiguously at the top.
fn has_fields_after_members(source: &str) -> bool {
    let tree = match java_tree(source) {
        Some(tree) => tree,
        None => return true,
    };
    let class = match top_level_class(tree.root_node()) {
        Some(class) => class,
        None => return true,
    };
    let body = match class.child_by_field_name("body") {
        Some(body) => body,
        None => return true,
    };

    let mut seen_non_field = false;
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        match child.kind() {
            "field_declaration" => {
                if seen_non_field {
                    return true;
                }
            }
            "line_comment" | "block_comment" | "{" | "}" | ";" => {}
            _ => seen_non_field = true,
        }
    }
    false
}
