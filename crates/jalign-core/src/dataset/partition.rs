//! Seeded train/test partitioning of a class corpus.

use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use crate::errors::{JalignError, JalignResult};
use crate::models::ClassSample;

use super::jsonl::{read_records, write_records};

#[derive(Clone, Copy, Debug)]
pub struct PartitionConfig {
    /// Fraction of samples assigned to the training set.
    pub train_percentage: f64,
    pub seed: u64,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            train_percentage: 0.85,
            seed: 0,
        }
    }
}

/// Shuffle samples with a seeded generator and split them at the
/// configured ratio.  The same seed always yields the same partition.
pub fn partition(
    mut samples: Vec<ClassSample>,
    config: PartitionConfig,
) -> (Vec<ClassSample>, Vec<ClassSample>) {
    let mut rng = StdRng::seed_from_u64(config.seed);
    samples.shuffle(&mut rng);

    let cut = (samples.len() as f64 * config.train_percentage) as usize;
    let test = samples.split_off(cut.min(samples.len()));
    (samples, test)
}

/// Merge every JSON Lines file in `input_dir`, partition the result, and
/// write `train.json` / `test.json` into `output_dir`.
pub fn partition_dir(
    input_dir: &Path,
    output_dir: &Path,
    config: PartitionConfig,
) -> JalignResult<(usize, usize)> {
    let mut samples: Vec<ClassSample> = Vec::new();
    let mut entries: Vec<_> = std::fs::read_dir(input_dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    entries.sort();

    for path in entries {
        samples.extend(read_records::<ClassSample>(&path)?);
    }
    if samples.is_empty() {
        return Err(JalignError::Dataset(format!(
            "no samples found under {}",
            input_dir.display()
        )));
    }

    std::fs::create_dir_all(output_dir)?;
    let (train, test) = partition(samples, config);
    write_records(&output_dir.join("train.json"), &train)?;
    write_records(&output_dir.join("test.json"), &test)?;

    info!(train = train.len(), test = test.len(), "partition written");
    Ok((train.len(), test.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(count: usize) -> Vec<ClassSample> {
        (0..count)
            .map(|index| ClassSample {
                class_name: format!("C{index}"),
                java_source: String::new(),
                jasm_code: String::new(),
                java_test: None,
                java_scaffold: None,
                class_idx: Some(index as i64),
                id: None,
            })
            .collect()
    }

    #[test]
    fn test_partition_ratio() {
        let (train, test) = partition(samples(100), PartitionConfig::default());
        assert_eq!(train.len(), 85);
        assert_eq!(test.len(), 15);
    }

    #[test]
    fn test_partition_deterministic_per_seed() {
        let config = PartitionConfig {
            train_percentage: 0.5,
            seed: 42,
        };
        let (train_a, _) = partition(samples(20), config);
        let (train_b, _) = partition(samples(20), config);
        let names_a: Vec<_> = train_a.iter().map(|s| s.class_name.clone()).collect();
        let names_b: Vec<_> = train_b.iter().map(|s| s.class_name.clone()).collect();
        assert_eq!(names_a, names_b);
    }

    #[test]
    fn test_partition_covers_all_samples_once() {
        let (train, test) = partition(samples(30), PartitionConfig::default());
        let mut indices: Vec<i64> = train
            .iter()
            .chain(test.iter())
            .map(|s| s.class_idx.unwrap())
            .collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..30).collect::<Vec<i64>>());
    }

    #[test]
    fn test_partition_dir_writes_both_files() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_records(&input.path().join("0.json"), &samples(10)).unwrap();

        let (train, test) =
            partition_dir(input.path(), output.path(), PartitionConfig::default()).unwrap();
        assert_eq!(train + test, 10);
        assert!(output.path().join("train.json").is_file());
        assert!(output.path().join("test.json").is_file());
    }

    #[test]
    fn test_partition_dir_empty_input_is_an_error() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        assert!(partition_dir(input.path(), output.path(), PartitionConfig::default()).is_err());
    }
}
