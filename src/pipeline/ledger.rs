//! Durable already-seen ledger.
//!
//! One `message_id|account` line per accepted post, append-only. The
//! file is bulk-loaded at startup and every acceptance appends exactly
//! one line before the notification is dispatched, so a crash can cost
//! a notification but never produce a duplicate. Keys are never
//! removed.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Append-only membership set over `(message_id, account)` pairs.
#[derive(Debug)]
pub struct DedupLedger {
    path: PathBuf,
    keys: Vec<String>,
    index: HashSet<String>,
}

fn dedup_key(message_id: &str, account: &str) -> String {
    format!("{}|{}", message_id, account)
}

impl DedupLedger {
    /// Load the ledger from disk.
    ///
    /// Lines starting with `#` are comments. A missing file is
    /// non-fatal: it is logged and the ledger starts empty.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let mut keys = Vec::new();
        let mut index = HashSet::new();

        match File::open(&path) {
            Ok(file) => {
                for line in BufReader::new(file).lines() {
                    let Ok(line) = line else { continue };
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if index.insert(line.to_string()) {
                        keys.push(line.to_string());
                    }
                }
                log::info!("Loaded {} seen posts from {}", keys.len(), path.display());
            }
            Err(e) => {
                log::error!("Seen-posts file {} not readable ({}), starting empty", path.display(), e);
            }
        }

        Self { path, keys, index }
    }

    pub fn contains(&self, message_id: &str, account: &str) -> bool {
        self.index.contains(&dedup_key(message_id, account))
    }

    /// Record a newly accepted key: append one line to the backing file
    /// and flush before returning, then add it to the in-memory set.
    ///
    /// The in-memory set is updated even when the disk append fails, so
    /// a broken disk degrades to in-process dedup rather than duplicate
    /// notifications within one run.
    pub fn record(&mut self, message_id: &str, account: &str) -> io::Result<()> {
        let key = dedup_key(message_id, account);
        if self.index.insert(key.clone()) {
            self.keys.push(key.clone());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", key)?;
        file.flush()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = DedupLedger::load(dir.path().join("absent.txt"));
        assert!(ledger.is_empty());
        assert!(!ledger.contains("1", "alice"));
    }

    #[test]
    fn test_load_skips_comments_and_blanks() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# seen posts").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "999|alice").unwrap();
        writeln!(file, "1000|bob").unwrap();
        file.flush().unwrap();

        let ledger = DedupLedger::load(file.path());
        assert_eq!(ledger.len(), 2);
        assert!(ledger.contains("999", "alice"));
        assert!(ledger.contains("1000", "bob"));
        assert!(!ledger.contains("999", "bob"));
    }

    #[test]
    fn test_record_appends_and_persists() {
        let file = NamedTempFile::new().unwrap();

        let mut ledger = DedupLedger::load(file.path());
        ledger.record("999", "alice").unwrap();
        assert!(ledger.contains("999", "alice"));

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents, "999|alice\n");

        // A fresh load (simulated restart) still knows the key
        let reloaded = DedupLedger::load(file.path());
        assert!(reloaded.contains("999", "alice"));
    }

    #[test]
    fn test_record_is_append_only() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1|alice").unwrap();
        file.flush().unwrap();

        let mut ledger = DedupLedger::load(file.path());
        ledger.record("2", "bob").unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents, "1|alice\n2|bob\n");
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_record_survives_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = DedupLedger::load(dir.path().join("missing").join("l.txt"));

        // Parent directory does not exist so the append fails, but the
        // in-memory set must still dedup for the rest of the run.
        assert!(ledger.record("999", "alice").is_err());
        assert!(ledger.contains("999", "alice"));
    }
}
