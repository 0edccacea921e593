//! Reassembly of ordered source fragments into one class.
//!
//! Exactly inverse-compatible with the extraction in
//! [`crate::split::java`]: fragments arrive unindented, and the header
//! fragment is a complete class body whose final character is its closing
//! brace.  No brace-balance validation happens here; a malformed fragment
//! surfaces as a compile failure downstream.

use crate::models::{INIT, STATIC_OPEN};

const INDENT: &str = "    ";

/// Concatenate `fragments` into one class, with `fragments[0]` as the
/// header.  A single fragment is returned unchanged.  An empty slice is a
/// caller error (alignment always emits a header pair) and yields an empty
/// string.
pub fn merge_java_methods(fragments: &[String]) -> String {
    let (header, rest) = match fragments {
        [] => return String::new(),
        [only] => return only.clone(),
        [header, rest @ ..] => (header, rest),
    };

    let class_name = header_class_name(header);

    // Strip the header's closing brace to reopen the class body.
    let reopened = header.trim_end();
    let reopened = reopened.strip_suffix('}').unwrap_or(reopened);

    let mut merged = String::from(reopened);
    merged.push('\n');
    for fragment in rest {
        let prepared = prepare_fragment(fragment, class_name.as_deref());
        if prepared.trim().is_empty() {
            continue;
        }
        merged.push_str(&indent_block(prepared.trim_matches('\n')));
        merged.push_str("\n\n");
    }

    let mut closed = merged.trim_end().to_string();
    closed.push_str("\n}\n");
    closed
}

/// Normalize one generated fragment before insertion: unwrap the synthetic
/// static-initializer markers back to the wrapped declarations, and rewrite
/// any literal `<init>` token to the class name.
fn prepare_fragment(fragment: &str, class_name: Option<&str>) -> String {
    let unwrapped = match unwrap_static_block(fragment) {
        Some(inner) => inner,
        None => fragment.to_string(),
    };
    match class_name {
        Some(name) => unwrapped.replace(INIT, name),
        None => unwrapped,
    }
}

/// Content between the static-initializer open marker and the final
/// closing brace, or `None` when the fragment is not a static block.
fn unwrap_static_block(fragment: &str) -> Option<String> {
    let after_marker = fragment.split(STATIC_OPEN).nth(1)?;
    let (inner, _) = after_marker.rsplit_once('}')?;
    Some(inner.trim_matches('\n').to_string())
}

/// Class name from a header fragment: the token following the `class`
/// keyword, trimmed of an adjoining opening brace.
fn header_class_name(header: &str) -> Option<String> {
    let after_keyword = header.split("class ").nth(1)?;
    after_keyword
        .split_whitespace()
        .next()
        .map(|token| token.trim_end_matches('{').to_string())
        .filter(|name| !name.is_empty())
}

fn indent_block(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{INDENT}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_fragment_unchanged() {
        let fragments = vec!["public class Solo {\n    int x;\n}".to_string()];
        assert_eq!(merge_java_methods(&fragments), fragments[0]);
    }

    #[test]
    fn test_empty_input_yields_empty_class_text() {
        assert_eq!(merge_java_methods(&[]), "");
    }

    #[test]
    fn test_header_reopened_and_closed() {
        let fragments = vec![
            "public class Pair {\nint a;\n}".to_string(),
            "public int first() {\n    return a;\n}".to_string(),
        ];
        let merged = merge_java_methods(&fragments);
        assert_eq!(
            merged,
            "public class Pair {\nint a;\n\n    public int first() {\n        return a;\n    }\n}\n"
        );
    }

    #[test]
    fn test_methods_indented_one_unit() {
        let fragments = vec![
            "public class Two {\n}".to_string(),
            "public void a() {\n}".to_string(),
            "public void b() {\n}".to_string(),
        ];
        let merged = merge_java_methods(&fragments);
        assert!(merged.contains("\n    public void a() {"));
        assert!(merged.contains("\n    public void b() {"));
        assert!(merged.ends_with("\n}\n"));
    }

    #[test]
    fn test_init_rewritten_to_class_name() {
        let fragments = vec![
            "public class Widget {\n}".to_string(),
            "public <init>() {\n}".to_string(),
        ];
        let merged = merge_java_methods(&fragments);
        assert!(merged.contains("public Widget() {"));
        assert!(!merged.contains("<init>"));
    }

    #[test]
    fn test_static_block_unwrapped() {
        let fragments = vec![
            "public class Counter {\n}".to_string(),
            "public void tick() {\n}".to_string(),
            "<|static|> {\nstatic int count = 0;\n}".to_string(),
        ];
        let merged = merge_java_methods(&fragments);
        assert!(merged.contains("\n    static int count = 0;"));
        assert!(!merged.contains("<|static|>"));
    }

    #[test]
    fn test_empty_fragment_skipped() {
        let fragments = vec![
            "public class Plain {\n}".to_string(),
            String::new(),
            "public int get() {\n    return 1;\n}".to_string(),
        ];
        let merged = merge_java_methods(&fragments);
        assert!(merged.contains("public int get()"));
        assert!(!merged.contains("\n\n\n\n"));
    }
}
