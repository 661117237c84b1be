//! Static permitted-account set.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Immutable set of account names allowed to trigger notifications.
///
/// Loaded once at startup from a newline-delimited file; entries are
/// trimmed and lowercased so membership checks match the normalized
/// account names produced by the link parser.
#[derive(Debug, Clone)]
pub struct Allowlist {
    accounts: HashSet<String>,
}

impl Allowlist {
    /// Load the allow-list. A missing file is non-fatal: it is logged
    /// as an error and the list starts empty (nothing gets through).
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mut accounts = HashSet::new();

        match File::open(path) {
            Ok(file) => {
                for line in BufReader::new(file).lines() {
                    let Ok(line) = line else { continue };
                    let account = line.trim().to_lowercase();
                    if !account.is_empty() {
                        accounts.insert(account);
                    }
                }
                log::info!("Loaded {} allowed accounts from {}", accounts.len(), path.display());
            }
            Err(e) => {
                log::error!("Allow-list file {} not readable ({}), no accounts allowed", path.display(), e);
            }
        }

        Self { accounts }
    }

    pub fn contains(&self, account: &str) -> bool {
        self.accounts.contains(account)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
