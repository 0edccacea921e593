//! Name-keyed alignment of assembly methods to source methods.
//!
//! Matching is greedy, first-match, FIFO-per-name, with the source-side
//! document order authoritative.  Overloads reordered between the two
//! representations can therefore mis-pair; that behavior is documented and
//! deliberately preserved, not corrected with signature-aware matching.

use tracing::{debug, warn};

use crate::models::{CLINIT, HEADER_END, INIT, STATIC_CLOSE, STATIC_OPEN};
use crate::split::asm::JasmClass;
use crate::split::java::JavaClass;

/// One aligned (assembly fragment, source fragment) pair.
#[derive(Clone, Debug)]
pub struct AlignedPair {
    pub jasm: String,
    pub java: String,
}

/// The aligned fragment sequence for one class, plus the assembly methods
/// that found no source counterpart and no synthesized fallback.
#[derive(Clone, Debug)]
pub struct Alignment {
    /// Header pair first, then one pair per constructor, method, or static
    /// initializer.
    pub pairs: Vec<AlignedPair>,
    /// Names of assembly methods dropped from the output.  Kept observable
    /// so callers can count what greedy matching leaves behind.
    pub unmatched: Vec<String>,
}

/// Align the two method inventories of one class.
///
/// Source methods are consumed in document order; each takes the first
/// remaining assembly method with the same name (`<init>` compares as the
/// class name).  Leftover assembly constructors pair with an empty source
/// fragment; a leftover `<clinit>` pairs with a synthesized block wrapping
/// the class's static field declarations.  The header pair is always
/// emitted at index 0.
pub fn align(class_name: &str, jasm: &JasmClass, java: &JavaClass) -> Alignment {
    let mut remaining: Vec<(String, usize)> = jasm
        .methods
        .iter()
        .enumerate()
        .map(|(index, method)| (comparison_name(&method.name, class_name), index))
        .collect();

    let mut pairs = Vec::with_capacity(java.methods.len() + 2);
    pairs.push(AlignedPair {
        jasm: format!("{}\n{}", jasm.header, HEADER_END),
        java: java.header.clone(),
    });

    for method in &java.methods {
        match remaining.iter().position(|(name, _)| *name == method.name) {
            Some(position) => {
                let (_, index) = remaining.remove(position);
                pairs.push(AlignedPair {
                    jasm: jasm.methods[index].text.clone(),
                    java: method.text.clone(),
                });
            }
            None => {
                debug!(method = %method.name, "source method has no assembly counterpart");
            }
        }
    }

    let mut unmatched = Vec::new();
    for (_, index) in remaining {
        let leftover = &jasm.methods[index];
        if leftover.name == INIT {
            // Constructor present in bytecode but absent from the source
            // text, typically the implicit default constructor.
            pairs.push(AlignedPair {
                jasm: leftover.text.clone(),
                java: String::new(),
            });
        } else if leftover.name == CLINIT {
            pairs.push(AlignedPair {
                jasm: leftover.text.clone(),
                java: static_block(&java.static_fields),
            });
        } else {
            warn!(method = %leftover.name, "assembly method has no source counterpart");
            unmatched.push(leftover.name.clone());
        }
    }

    Alignment { pairs, unmatched }
}

/// Name used for matching: constructors compare as the class name, the way
/// source-side constructor declarations already read.
fn comparison_name(asm_name: &str, class_name: &str) -> String {
    if asm_name == INIT {
        class_name.to_string()
    } else {
        asm_name.to_string()
    }
}

/// Synthesized source-side stand-in for a `<clinit>` block: the static
/// field declarations wrapped in the static-initializer markers.
fn static_block(static_fields: &[String]) -> String {
    format!(
        "{STATIC_OPEN}\n{}\n{STATIC_CLOSE}",
        static_fields.join("\n")
    )
}
