//! jalign command-line interface.
//!
//! `split` turns a class corpus into aligned per-method fragment records,
//! `reassemble` merges fragment records back into whole classes, and
//! `partition` shuffles a corpus into train/test files.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use jalign_core::dataset::jsonl::{read_records, write_records};
use jalign_core::dataset::partition::{partition_dir, PartitionConfig};
use jalign_core::dataset::pipeline::{reassemble_corpus, split_corpus};
use jalign_core::errors::JalignResult;
use jalign_core::models::{ClassSample, FragmentRecord};

#[derive(Parser)]
#[command(name = "jalign")]
#[command(about = "Method-level alignment and splitting for jasm/Java class corpora")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split a class corpus into aligned fragment records.
    Split {
        /// Input class corpus (JSON Lines).
        #[arg(long)]
        input_file: PathBuf,
        /// Output fragment corpus (JSON Lines).
        #[arg(long)]
        output_file: PathBuf,
        /// Worker threads for the per-sample fan-out.
        #[arg(long, default_value_t = 4)]
        workers: usize,
    },
    /// Merge fragment records back into whole classes.
    Reassemble {
        /// Input fragment corpus (JSON Lines).
        #[arg(long)]
        input_file: PathBuf,
        /// Output class corpus (JSON Lines).
        #[arg(long)]
        output_file: PathBuf,
    },
    /// Shuffle a corpus directory into train.json / test.json.
    Partition {
        /// Directory of JSON Lines corpus files.
        #[arg(long)]
        input_dir: PathBuf,
        /// Directory receiving train.json and test.json.
        #[arg(long)]
        output_dir: PathBuf,
        /// Fraction of samples assigned to the training set.
        #[arg(long, default_value_t = 0.85)]
        train_percentage: f64,
        /// Shuffle seed.
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> JalignResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Split {
            input_file,
            output_file,
            workers,
        } => {
            let samples: Vec<ClassSample> = read_records(&input_file)?;
            let (fragments, stats) = split_corpus(&samples, workers);
            write_records(&output_file, &fragments)?;
            info!(
                seen = stats.samples_seen,
                kept = stats.samples_kept,
                multi_class = stats.rejected_multiple_classes,
                preprocess = stats.rejected_preprocess,
                parse = stats.rejected_parse,
                empty = stats.rejected_empty_alignment,
                unmatched_methods = stats.unmatched_methods,
                fragments = fragments.len(),
                "split written to {}",
                output_file.display()
            );
        }
        Command::Reassemble {
            input_file,
            output_file,
        } => {
            let fragments: Vec<FragmentRecord> = read_records(&input_file)?;
            let classes = reassemble_corpus(&fragments);
            write_records(&output_file, &classes)?;
            info!(
                fragments = fragments.len(),
                classes = classes.len(),
                "reassembly written to {}",
                output_file.display()
            );
        }
        Command::Partition {
            input_dir,
            output_dir,
            train_percentage,
            seed,
        } => {
            let config = PartitionConfig {
                train_percentage,
                seed,
            };
            let (train, test) = partition_dir(&input_dir, &output_dir, config)?;
            info!(train, test, "partition written to {}", output_dir.display());
        }
    }
    Ok(())
}
