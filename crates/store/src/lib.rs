//! Append-only persistence for the ember companion.
//!
//! Two logs, both JSONL (one self-contained JSON record per line):
//! - the **transcript log**: one file per session, every conversation turn
//! - the **memory log**: one file per assistant identity, every remembered fact
//!
//! Neither log is ever truncated or rewritten. Readers parse strictly
//! line-by-line; a malformed line never blocks the lines after it.

pub mod memory;
pub mod transcript;

pub use memory::MemoryLog;
pub use transcript::{SessionHandle, TranscriptLog};

use ember_core::error::StoreError;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Append one serialized record plus a newline to a JSONL file.
///
/// Creates the parent directory and the file on first use. The file is only
/// ever opened in append mode.
pub(crate) fn append_line(path: &Path, record: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| StoreError::Storage(format!("failed to create {}: {e}", parent.display())))?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StoreError::Storage(format!("failed to open {}: {e}", path.display())))?;

    file.write_all(record.as_bytes())
        .and_then(|_| file.write_all(b"\n"))
        .map_err(|e| StoreError::Storage(format!("failed to append to {}: {e}", path.display())))
}
