//! Shared typed records and corpus-facing marker constants.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Load-bearing delimiters
// ---------------------------------------------------------------------------
//
// These literals appear inside persisted corpora and model inputs/outputs.
// Changing any of them breaks interoperability with existing data, so they
// are defined once here and imported everywhere else.

/// Opens a method block in a jasm listing.
pub const METHOD_START: &str = ".method";

/// Closes a method block in a jasm listing.
pub const METHOD_END: &str = ".end method";

/// Opens the compiler-emitted line-number table inside a method body.
pub const LINE_TABLE_START: &str = ".linenumbertable";

/// Closes the line-number table.
pub const LINE_TABLE_END: &str = ".end linenumbertable";

/// Rewritten form of [`METHOD_START`] used for the per-method signature
/// lines appended to an assembly header, so the header cannot be mistaken
/// for a live method start.
pub const METHOD_SIGNATURE: &str = ".method_signature";

/// Appended to an assembly header fragment to delimit it from method
/// fragments in an aligned sequence.
pub const HEADER_END: &str = ".end header";

/// Opens the synthesized source-side block standing in for a `<clinit>`
/// static initializer.
pub const STATIC_OPEN: &str = "<|static|> {";

/// Closes the synthesized static-initializer block.
pub const STATIC_CLOSE: &str = "}";

/// JVM-internal name of a constructor.
pub const INIT: &str = "<init>";

/// JVM-internal name of a static initializer.
pub const CLINIT: &str = "<clinit>";

// ---------------------------------------------------------------------------
// Persisted records (JSON Lines, one record per line)
// ---------------------------------------------------------------------------

/// One unit of work: a single Java class with its source, its assembly
/// listing, and the externally generated unit tests that score it.
///
/// Field names are part of the interchange format and must stay stable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassSample {
    pub class_name: String,
    pub java_source: String,
    pub jasm_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_test: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_scaffold: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_idx: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

/// One aligned fragment pair persisted as a training example.
///
/// The jasm/java field names deliberately match [`ClassSample`] so fragment
/// corpora and whole-class corpora can be consumed by the same loaders.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FragmentRecord {
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_idx: Option<i64>,
    pub jasm_code: String,
    pub java_source: String,
}
