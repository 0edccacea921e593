//! JSON Lines reading and writing for corpus records.
//!
//! One record per line.  Reading is tolerant: a line that fails to parse is
//! logged and skipped, never fatal, so one corrupt record cannot take down
//! a dataset build.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::errors::JalignResult;

/// Read every parseable record from a JSON Lines file.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> JalignResult<Vec<T>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (line_index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(record) => records.push(record),
            Err(error) => {
                warn!(
                    line = line_index + 1,
                    path = %path.display(),
                    "skipping unparseable record: {error}"
                );
            }
        }
    }
    Ok(records)
}

/// Write records to a JSON Lines file, one per line, replacing any
/// existing file.
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> JalignResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClassSample;

    fn sample(name: &str) -> ClassSample {
        ClassSample {
            class_name: name.to_string(),
            java_source: format!("public class {name} {{}}"),
            jasm_code: format!(".class public super {name}"),
            java_test: None,
            java_scaffold: None,
            class_idx: None,
            id: None,
        }
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        let records = vec![sample("A"), sample("B")];

        write_records(&path, &records).unwrap();
        let loaded: Vec<ClassSample> = read_records(&path).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].class_name, "A");
        assert_eq!(loaded[1].class_name, "B");
    }

    #[test]
    fn test_bad_lines_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        let good = serde_json::to_string(&sample("Good")).unwrap();
        std::fs::write(&path, format!("{good}\nnot json at all\n\n{good}\n")).unwrap();

        let loaded: Vec<ClassSample> = read_records(&path).unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(read_records::<ClassSample>(&path).is_err());
    }
}
