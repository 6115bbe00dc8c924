//! Memory log — append-only JSONL storage for remembered facts.
//!
//! One file per assistant identity. Facts are loaded in insertion order;
//! malformed lines are skipped without failing the read, so one corrupt
//! record never takes the rest of the memory with it.

use ember_core::error::StoreError;
use ember_core::turn::Fact;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

/// The durable fact store for one assistant identity.
pub struct MemoryLog {
    path: PathBuf,
}

impl MemoryLog {
    /// Create a memory log backed by the given JSONL file.
    ///
    /// The file is created on the first `add`; `load` before that returns
    /// an empty sequence.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every well-formed fact in file order.
    pub fn load(&self) -> Result<Vec<String>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Storage(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };

        let facts = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str::<Fact>(line) {
                Ok(fact) => Some(fact.fact),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed memory record");
                    None
                }
            })
            .collect();

        Ok(facts)
    }

    /// Append one fact stamped with the current time.
    pub fn add(&self, text: &str) -> Result<(), StoreError> {
        let fact = Fact::new(text);
        let record = serde_json::to_string(&fact)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        crate::append_line(&self.path, &record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn load_before_any_add_returns_empty() {
        let dir = tempdir().unwrap();
        let log = MemoryLog::new(dir.path().join("memory.jsonl"));
        assert_eq!(log.load().unwrap(), Vec::<String>::new());
    }

    #[test]
    fn fact_roundtrip_exactly_once() {
        let dir = tempdir().unwrap();
        let log = MemoryLog::new(dir.path().join("memory.jsonl"));

        log.add("likes espresso").unwrap();

        let facts = log.load().unwrap();
        assert_eq!(facts, vec!["likes espresso".to_string()]);
    }

    #[test]
    fn facts_load_in_insertion_order() {
        let dir = tempdir().unwrap();
        let log = MemoryLog::new(dir.path().join("memory.jsonl"));

        log.add("first").unwrap();
        log.add("second").unwrap();
        log.add("third").unwrap();

        assert_eq!(log.load().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn corrupted_line_does_not_drop_neighbors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.jsonl");
        let log = MemoryLog::new(&path);

        log.add("before the damage").unwrap();
        {
            let mut file = std::fs::OpenOptions::new()
                .append(true)
                .open(&path)
                .unwrap();
            writeln!(file, "this is not json").unwrap();
        }
        log.add("after the damage").unwrap();

        let facts = log.load().unwrap();
        assert_eq!(facts, vec!["before the damage", "after the damage"]);
    }

    #[test]
    fn add_never_truncates_existing_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.jsonl");
        let log = MemoryLog::new(&path);

        log.add("keep me").unwrap();
        let len_after_first = std::fs::metadata(&path).unwrap().len();

        log.add("and me").unwrap();
        let len_after_second = std::fs::metadata(&path).unwrap().len();

        assert!(len_after_second > len_after_first);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("keep me"));
    }

    #[test]
    fn add_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let log = MemoryLog::new(dir.path().join("navi").join("memory.jsonl"));
        log.add("nested").unwrap();
        assert_eq!(log.load().unwrap(), vec!["nested"]);
    }

    #[test]
    fn blank_lines_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.jsonl");
        let log = MemoryLog::new(&path);

        log.add("one").unwrap();
        {
            let mut file = std::fs::OpenOptions::new()
                .append(true)
                .open(&path)
                .unwrap();
            writeln!(file).unwrap();
            writeln!(file, "   ").unwrap();
        }
        log.add("two").unwrap();

        assert_eq!(log.load().unwrap(), vec!["one", "two"]);
    }
}
