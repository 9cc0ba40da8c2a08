//! Ledger of already-downloaded profile image URLs.
//!
//! Stored as one SHA-256 hex digest per line in `downloaded_images.txt`
//! inside the avatar directory, so repeated ingestion runs skip network
//! fetches for URLs they already pulled.

use crate::error::Result;
use ring::digest::{digest, SHA256};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const LEDGER_FILE: &str = "downloaded_images.txt";

/// Hash a URL into the ledger's line format.
#[must_use]
pub fn url_digest(url: &str) -> String {
    let hash = digest(&SHA256, url.as_bytes());
    hash.as_ref().iter().map(|b| format!("{b:02x}")).collect()
}

#[derive(Debug)]
pub struct DownloadLedger {
    path: PathBuf,
    entries: HashSet<String>,
}

impl DownloadLedger {
    /// Load the ledger from the avatar directory, starting empty when
    /// the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing ledger file cannot be read.
    pub fn load(avatar_dir: &Path) -> Result<Self> {
        let path = avatar_dir.join(LEDGER_FILE);
        let entries = if path.exists() {
            fs::read_to_string(&path)?
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect()
        } else {
            HashSet::new()
        };
        debug!("Loaded {} download ledger entries", entries.len());
        Ok(Self { path, entries })
    }

    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains(&url_digest(url))
    }

    /// Record a URL as downloaded. Returns true when it was new.
    pub fn record(&mut self, url: &str) -> bool {
        self.entries.insert(url_digest(url))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Persist the ledger back to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let mut lines: Vec<&str> = self.entries.iter().map(String::as_str).collect();
        lines.sort_unstable();
        let mut body = lines.join("\n");
        if !body.is_empty() {
            body.push('\n');
        }
        fs::write(&self.path, body)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn digest_is_stable_hex() {
        let a = url_digest("https://example.com/a.jpg");
        let b = url_digest("https://example.com/a.jpg");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn record_then_contains() {
        let dir = TempDir::new().unwrap();
        let mut ledger = DownloadLedger::load(dir.path()).unwrap();

        assert!(!ledger.contains("https://example.com/x.png"));
        assert!(ledger.record("https://example.com/x.png"));
        assert!(!ledger.record("https://example.com/x.png"));
        assert!(ledger.contains("https://example.com/x.png"));
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut ledger = DownloadLedger::load(dir.path()).unwrap();
        ledger.record("https://example.com/1.jpg");
        ledger.record("https://example.com/2.jpg");
        ledger.save().unwrap();

        let reloaded = DownloadLedger::load(dir.path()).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains("https://example.com/1.jpg"));
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let ledger = DownloadLedger::load(dir.path()).unwrap();
        assert!(ledger.is_empty());
    }
}
