//! Structural parsing of Java source via a tree-sitter syntax tree.
//!
//! The walk visits the immediate children of the top-level class body in
//! document order and sorts each into one of three buckets: methods and
//! constructors (with their attached Javadoc), static field declarations,
//! and everything else (the header).  Extracted fragments are re-based to
//! the start of their first line and dedented, so the reassembler in
//! [`crate::split::merge`] can apply one uniform indentation unit.

use tree_sitter::{Node, Tree};

// ---------------------------------------------------------------------------
// Extracted types
// ---------------------------------------------------------------------------

/// One method or constructor slice of a source listing.
#[derive(Clone, Debug)]
pub struct SourceMethod {
    /// Simple method name; constructors yield the class name.
    pub name: String,
    pub text: String,
}

/// One parsed source listing: the non-method header, static field
/// declarations pulled out for the static initializer, and the method
/// inventory in document order.
#[derive(Clone, Debug)]
pub struct JavaClass {
    pub header: String,
    pub static_fields: Vec<String>,
    pub methods: Vec<SourceMethod>,
}

// ---------------------------------------------------------------------------
// Tree construction
// ---------------------------------------------------------------------------

/// Parse Java source into a tree-sitter tree.  `None` signals a parser
/// setup or parse failure; callers reject the sample.
pub(crate) fn java_tree(source: &str) -> Option<Tree> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_java::LANGUAGE.into())
        .ok()?;
    parser.parse(source.as_bytes(), None)
}

/// First top-level class declaration of a parsed file.
pub(crate) fn top_level_class(root: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = root.walk();
    let found = root
        .children(&mut cursor)
        .find(|child| child.kind() == "class_declaration");
    found
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse one Java class into header, static fields, and methods.
///
/// Returns `None` when no top-level class declaration (or class body) is
/// found.  Multi-class files and out-of-order field declarations are
/// rejected upstream by [`crate::split::preprocess`].
pub fn parse_java(source: &str) -> Option<JavaClass> {
    let tree = java_tree(source)?;
    let root = tree.root_node();

    let mut header_parts: Vec<String> = Vec::new();
    let mut static_fields: Vec<String> = Vec::new();
    let mut methods: Vec<SourceMethod> = Vec::new();

    // Package and import declarations precede the class declaration at the
    // program level; both belong to the header.
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "package_declaration" | "import_declaration" => {
                header_parts.push(node_text(source, child).to_string());
            }
            "class_declaration" => break,
            _ => {}
        }
    }

    let class = top_level_class(root)?;
    let body = class.child_by_field_name("body")?;

    // The declaration itself, through the body's opening brace.
    let declaration_start = line_start(source, class.start_byte());
    header_parts.push(source[declaration_start..=body.start_byte()].to_string());

    let mut cursor = body.walk();
    let children: Vec<Node> = body.children(&mut cursor).collect();
    for (index, child) in children.iter().enumerate() {
        match child.kind() {
            "{" => {}
            "method_declaration" | "constructor_declaration" => {
                let name = declared_name(source, *child)?;
                let previous = index.checked_sub(1).map(|i| children[i]);
                let text = method_slice(source, *child, previous);
                methods.push(SourceMethod { name, text });
            }
            "field_declaration" if is_static_field(source, *child) => {
                static_fields.push(rebased_dedented(source, *child));
            }
            "block_comment" if attaches_to_method(&children, index) => {
                // Consumed by the following method as its documentation.
            }
            _ => header_parts.push(rebased_dedented(source, *child)),
        }
    }

    Some(JavaClass {
        header: header_parts.join("\n"),
        static_fields,
        methods,
    })
}

// ---------------------------------------------------------------------------
// Slice helpers
// ---------------------------------------------------------------------------

fn node_text<'src>(source: &'src str, node: Node) -> &'src str {
    &source[node.start_byte()..node.end_byte()]
}

/// Byte offset of the start of the line containing `position`.
fn line_start(source: &str, position: usize) -> usize {
    source[..position].rfind('\n').map(|p| p + 1).unwrap_or(0)
}

/// Node text re-based backward to the start of its first line, then
/// stripped of that line's indentation on every line.
fn rebased_dedented(source: &str, node: Node) -> String {
    let start = line_start(source, node.start_byte());
    dedent(&source[start..node.end_byte()])
}

/// A method slice: the node's span, or the span beginning at an
/// immediately preceding block comment (Javadoc travels with the method it
/// documents), re-based to the line start and dedented.
fn method_slice(source: &str, node: Node, previous: Option<Node>) -> String {
    let span_start = match previous {
        Some(sibling) if sibling.kind() == "block_comment" => sibling.start_byte(),
        _ => node.start_byte(),
    };
    let start = line_start(source, span_start);
    dedent(&source[start..node.end_byte()])
}

/// Remove the first line's leading indentation from every line.
fn dedent(text: &str) -> String {
    let indent = text.len() - text.trim_start_matches([' ', '\t']).len();
    text.lines()
        .map(|line| line.get(indent..).unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Simple name from a declaration: the final whitespace-delimited token
/// before the argument list's opening parenthesis.  Constructors yield the
/// class name by construction.
fn declared_name(source: &str, node: Node) -> Option<String> {
    let text = node_text(source, node);
    let before_args = text.split('(').next()?;
    before_args
        .split_whitespace()
        .last()
        .map(|token| token.to_string())
}

fn is_static_field(source: &str, node: Node) -> bool {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "modifiers" {
            return node_text(source, child)
                .split_whitespace()
                .any(|token| token == "static");
        }
    }
    false
}

/// A block comment attaches to the member that immediately follows it when
/// that member is a method or constructor.
fn attaches_to_method(children: &[Node], index: usize) -> bool {
    matches!(
        children.get(index + 1).map(|node| node.kind()),
        Some("method_declaration") | Some("constructor_declaration")
    )
}
