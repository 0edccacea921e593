//! Dataset plumbing: JSON Lines corpora, the data-parallel per-sample
//! split driver, and train/test partitioning.

pub mod jsonl;
pub mod partition;
pub mod pipeline;
