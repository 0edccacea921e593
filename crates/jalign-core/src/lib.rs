//! jalign core library — method-level alignment and splitting for a
//! Java-bytecode neural decompiler harness.
//!
//! The crate takes paired (Java source, jasm assembly) class samples and
//! decomposes each into aligned per-method fragments for training data
//! construction, plus the inverse operation that reassembles generated
//! source fragments into one compilable class.  External tools (javac,
//! Krakatau, EvoSuite, third-party decompilers) are driven through narrow
//! subprocess contracts in [`tools`]; the core in [`split`] is pure.

pub mod dataset;
pub mod errors;
pub mod models;
pub mod split;
pub mod tools;
