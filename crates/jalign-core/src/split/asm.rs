//! Structural parsing of jasm assembly listings.
//!
//! The format is line-oriented and self-delimiting via literal `.method` /
//! `.end method` markers, so a small substring scanner is enough; no grammar
//! is involved.  Callers only see the [`AsmMethod`]/[`JasmClass`] contract.

use crate::models::{
    CLINIT, LINE_TABLE_END, LINE_TABLE_START, METHOD_END, METHOD_SIGNATURE, METHOD_START,
};

// ---------------------------------------------------------------------------
// Extracted types
// ---------------------------------------------------------------------------

/// A contiguous method block of an assembly listing, from its `.method`
/// declaration line through `.end method` inclusive.
#[derive(Clone, Debug)]
pub struct AsmMethod {
    /// Name token from the declaration line; `<init>` for constructors,
    /// `<clinit>` for static initializers.  Overloads share a name.
    pub name: String,
    pub text: String,
}

/// One parsed assembly listing: the non-method header plus the method
/// inventory in declaration order.
#[derive(Clone, Debug)]
pub struct JasmClass {
    pub header: String,
    pub methods: Vec<AsmMethod>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse an assembly listing into its header and method inventory.
///
/// Synthetic and bridge methods are excluded.  An empty method inventory is
/// not an error here; callers reject samples with nothing to align.
pub fn parse_jasm(text: &str) -> JasmClass {
    let methods = extract_methods(text);
    let header = extract_header(text, &methods);
    JasmClass { header, methods }
}

fn extract_methods(text: &str) -> Vec<AsmMethod> {
    let mut methods = Vec::new();
    for chunk in text.split(METHOD_START).skip(1) {
        let declaration = chunk.lines().next().unwrap_or("");
        if declaration.contains("synthetic") || declaration.contains("bridge") {
            continue;
        }
        // Truncate at the method-end marker; a malformed block without one
        // simply runs to the end of the listing.
        let body = chunk.split(METHOD_END).next().unwrap_or(chunk);
        let method = strip_line_table(&format!("{METHOD_START}{body}{METHOD_END}"));
        let name = method_name(&method);
        methods.push(AsmMethod { name, text: method });
    }
    methods
}

/// Remove the `.linenumbertable` .. `.end linenumbertable` sub-block.
/// Line numbers are compiled-output noise with no semantic content.
fn strip_line_table(method: &str) -> String {
    match (method.find(LINE_TABLE_START), method.find(LINE_TABLE_END)) {
        (Some(start), Some(end)) if start < end => {
            format!("{}{}", &method[..start], &method[end + LINE_TABLE_END.len()..])
        }
        _ => method.to_string(),
    }
}

/// Derive the method name from a method block's declaration line: the last
/// whitespace-delimited token before the ` : ` descriptor separator.
pub fn method_name(method_text: &str) -> String {
    let declaration = method_text.lines().next().unwrap_or("");
    let before_descriptor = declaration.split(" : ").next().unwrap_or(declaration);
    before_descriptor
        .split_whitespace()
        .last()
        .unwrap_or("")
        .to_string()
}

/// Build the assembly header: the leading blank-line-separated block, one
/// `.method_signature` line per retained method, and the full `<clinit>`
/// block when present (static initialization is semantically part of the
/// header, not a callable method).
fn extract_header(text: &str, methods: &[AsmMethod]) -> String {
    let mut header = text.split("\n\n").next().unwrap_or("").to_string();

    for method in methods {
        let declaration = method.text.lines().next().unwrap_or("");
        header.push('\n');
        header.push_str(&declaration.replacen(METHOD_START, METHOD_SIGNATURE, 1));
    }

    for method in methods {
        if method.name == CLINIT {
            header.push('\n');
            header.push_str(&method.text);
        }
    }

    header
}

/// Class name declared by an assembly header: the final token of its
/// `.class` directive line.
pub fn class_name_of(header: &str) -> Option<String> {
    header
        .lines()
        .find(|line| line.trim_start().starts_with(".class"))
        .and_then(|line| line.trim().split_whitespace().last())
        .map(|name| name.to_string())
}
