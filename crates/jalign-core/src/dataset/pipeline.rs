//! Per-sample split driver with Rayon-based parallelism.
//!
//! Samples are independent, so the corpus fans out over a worker pool with
//! no shared mutable state; fragment order inside one sample stays
//! deterministic.  A sample failing any stage is skipped and tallied,
//! never raised — throughput over completeness.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{ClassSample, FragmentRecord};
use crate::split::align::align;
use crate::split::asm::{class_name_of, parse_jasm};
use crate::split::java::parse_java;
use crate::split::merge::merge_java_methods;
use crate::split::preprocess::{has_multiple_classes, preprocess};

/// Why one sample was dropped from the corpus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    MultipleClasses,
    Preprocess,
    Parse,
    EmptyAlignment,
}

enum SampleOutcome {
    Fragments {
        records: Vec<FragmentRecord>,
        unmatched: usize,
    },
    Rejected(RejectReason),
}

/// Aggregate counters for one corpus split run.
#[derive(Clone, Copy, Debug, Default)]
pub struct SplitStats {
    pub samples_seen: usize,
    pub samples_kept: usize,
    pub rejected_multiple_classes: usize,
    pub rejected_preprocess: usize,
    pub rejected_parse: usize,
    pub rejected_empty_alignment: usize,
    /// Assembly methods with no source counterpart, summed over kept
    /// samples.
    pub unmatched_methods: usize,
}

/// Split one sample into aligned fragment records, or reject it.
fn split_sample(sample: &ClassSample) -> SampleOutcome {
    if has_multiple_classes(&sample.java_source, &sample.jasm_code) {
        return SampleOutcome::Rejected(RejectReason::MultipleClasses);
    }

    let java_source = match preprocess(&sample.java_source) {
        Some(cleaned) => cleaned,
        None => return SampleOutcome::Rejected(RejectReason::Preprocess),
    };

    let jasm = parse_jasm(&sample.jasm_code);
    let java = match parse_java(&java_source) {
        Some(class) => class,
        None => return SampleOutcome::Rejected(RejectReason::Parse),
    };

    // Trust the sample's own class name; derive it from the assembly
    // header when the record carries none.
    let class_name = if sample.class_name.is_empty() {
        match class_name_of(&jasm.header) {
            Some(name) => name,
            None => return SampleOutcome::Rejected(RejectReason::Parse),
        }
    } else {
        sample.class_name.clone()
    };

    let alignment = align(&class_name, &jasm, &java);
    if alignment.pairs.len() <= 1 {
        // Header-only: nothing to train or generate on.
        return SampleOutcome::Rejected(RejectReason::EmptyAlignment);
    }

    let records = alignment
        .pairs
        .into_iter()
        .map(|pair| FragmentRecord {
            class_name: class_name.clone(),
            class_idx: sample.class_idx.or(sample.id),
            jasm_code: pair.jasm,
            java_source: pair.java,
        })
        .collect();

    SampleOutcome::Fragments {
        records,
        unmatched: alignment.unmatched.len(),
    }
}

/// Split a whole corpus into aligned fragment records.
///
/// Samples are processed on a dedicated pool of `workers` threads (with a
/// sequential fallback if the pool cannot be built); output preserves the
/// input sample order.
pub fn split_corpus(samples: &[ClassSample], workers: usize) -> (Vec<FragmentRecord>, SplitStats) {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build();

    let outcomes: Vec<SampleOutcome> = match pool {
        Ok(pool) => pool.install(|| samples.par_iter().map(split_sample).collect()),
        Err(_) => samples.iter().map(split_sample).collect(),
    };

    let mut stats = SplitStats {
        samples_seen: samples.len(),
        ..SplitStats::default()
    };
    let mut fragments = Vec::new();
    for (sample, outcome) in samples.iter().zip(outcomes) {
        match outcome {
            SampleOutcome::Fragments { records, unmatched } => {
                stats.samples_kept += 1;
                stats.unmatched_methods += unmatched;
                fragments.extend(records);
            }
            SampleOutcome::Rejected(reason) => {
                debug!(class = %sample.class_name, ?reason, "sample rejected");
                match reason {
                    RejectReason::MultipleClasses => stats.rejected_multiple_classes += 1,
                    RejectReason::Preprocess => stats.rejected_preprocess += 1,
                    RejectReason::Parse => stats.rejected_parse += 1,
                    RejectReason::EmptyAlignment => stats.rejected_empty_alignment += 1,
                }
            }
        }
    }

    info!(
        seen = stats.samples_seen,
        kept = stats.samples_kept,
        unmatched = stats.unmatched_methods,
        "corpus split finished"
    );
    (fragments, stats)
}

// ---------------------------------------------------------------------------
// Reassembly over fragment corpora
// ---------------------------------------------------------------------------

/// One class rebuilt from generated source fragments.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReassembledClass {
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_idx: Option<i64>,
    pub java_source: String,
}

/// Merge a fragment corpus back into classes.  Consecutive records sharing
/// a class name and index form one group, matching the order `split_corpus`
/// emits; the group's source fragments are handed to the reassembler.
pub fn reassemble_corpus(records: &[FragmentRecord]) -> Vec<ReassembledClass> {
    let mut classes = Vec::new();
    let mut group: Vec<String> = Vec::new();
    let mut current: Option<(String, Option<i64>)> = None;

    for record in records {
        let key = (record.class_name.clone(), record.class_idx);
        if current.as_ref() != Some(&key) {
            if let Some((class_name, class_idx)) = current.take() {
                classes.push(ReassembledClass {
                    class_name,
                    class_idx,
                    java_source: merge_java_methods(&group),
                });
            }
            group.clear();
            current = Some(key);
        }
        group.push(record.java_source.clone());
    }
    if let Some((class_name, class_idx)) = current {
        classes.push(ReassembledClass {
            class_name,
            class_idx,
            java_source: merge_java_methods(&group),
        });
    }
    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(class_name: &str, java_source: &str, jasm_code: &str) -> ClassSample {
        ClassSample {
            class_name: class_name.to_string(),
            java_source: java_source.to_string(),
            jasm_code: jasm_code.to_string(),
            java_test: None,
            java_scaffold: None,
            class_idx: Some(0),
            id: None,
        }
    }

    const POINT_SOURCE: &str = "\
/* Licensed under something. */
public class Point {
    int x;
    int y;

    public Point(int x, int y) {
        this.x = x;
        this.y = y;
    }

    public int getX() {
        return x;
    }

    public int getY() {
        return y;
    }
}
";

    const POINT_JASM: &str = "\
.version 52 0
.class public super Point
.super java/lang/Object
.field x I
.field y I

.method public <init> : (II)V
    .code stack 2 locals 3
L0:     aload_0
L1:     invokespecial Method java/lang/Object <init> ()V
        .linenumbertable
            L0 5
        .end linenumbertable
    .end code
.end method

.method public getX : ()I
    .code stack 1 locals 1
L0:     iload_1
L1:     ireturn
    .end code
.end method

.method public getY : ()I
    .code stack 1 locals 1
L0:     iload_2
L1:     ireturn
    .end code
.end method
.end class
";

    #[test]
    fn test_split_corpus_keeps_well_formed_sample() {
        let samples = vec![sample("Point", POINT_SOURCE, POINT_JASM)];
        let (fragments, stats) = split_corpus(&samples, 2);

        assert_eq!(stats.samples_seen, 1);
        assert_eq!(stats.samples_kept, 1);
        assert_eq!(stats.unmatched_methods, 0);
        // Header + constructor + two getters.
        assert_eq!(fragments.len(), 4);
        assert!(fragments[0].jasm_code.ends_with(".end header"));
        assert_eq!(fragments[1].class_name, "Point");
    }

    #[test]
    fn test_split_corpus_rejects_multi_class_sample() {
        let samples = vec![sample(
            "Two",
            "public class Two {}\nclass Other {}\n",
            ".class public super Two\n",
        )];
        let (fragments, stats) = split_corpus(&samples, 1);
        assert!(fragments.is_empty());
        assert_eq!(stats.rejected_multiple_classes, 1);
        assert_eq!(stats.samples_kept, 0);
    }

    #[test]
    fn test_split_corpus_rejects_header_only_sample() {
        let samples = vec![sample(
            "Empty",
            "public class Empty {\n    int x;\n}\n",
            ".version 52 0\n.class public super Empty\n.super java/lang/Object\n",
        )];
        let (fragments, stats) = split_corpus(&samples, 1);
        assert!(fragments.is_empty());
        assert_eq!(stats.rejected_empty_alignment, 1);
    }

    #[test]
    fn test_class_name_derived_from_assembly_header() {
        let samples = vec![sample("", POINT_SOURCE, POINT_JASM)];
        let (fragments, stats) = split_corpus(&samples, 1);
        assert_eq!(stats.samples_kept, 1);
        assert_eq!(fragments[0].class_name, "Point");
    }

    fn normalize(text: &str) -> Vec<String> {
        text.lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    }

    #[test]
    fn test_roundtrip_recovers_source_modulo_whitespace() {
        let samples = vec![sample("Point", POINT_SOURCE, POINT_JASM)];
        let (fragments, _) = split_corpus(&samples, 1);

        let classes = reassemble_corpus(&fragments);
        assert_eq!(classes.len(), 1);

        let expected = preprocess(POINT_SOURCE).unwrap();
        assert_eq!(normalize(&classes[0].java_source), normalize(&expected));
    }

    #[test]
    fn test_reassemble_groups_consecutive_records() {
        let records = vec![
            FragmentRecord {
                class_name: "A".to_string(),
                class_idx: Some(0),
                jasm_code: String::new(),
                java_source: "public class A {\n}".to_string(),
            },
            FragmentRecord {
                class_name: "A".to_string(),
                class_idx: Some(0),
                jasm_code: String::new(),
                java_source: "public void run() {\n}".to_string(),
            },
            FragmentRecord {
                class_name: "B".to_string(),
                class_idx: Some(1),
                jasm_code: String::new(),
                java_source: "public class B {\n}".to_string(),
            },
        ];
        let classes = reassemble_corpus(&records);
        assert_eq!(classes.len(), 2);
        assert!(classes[0].java_source.contains("public void run()"));
        assert_eq!(classes[1].class_name, "B");
    }
}
