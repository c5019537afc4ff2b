//! Subscription persistence.
//!
//! One file per subscription in a single directory. A record's name is the
//! padded base64url SHA-1 of its exact bytes, so saving the same body twice
//! lands on the same file and nothing is ever deduplicated beyond that.
//!
//! # Storage structure
//!
//! ```text
//! subscribes/
//!     2jmj7l5rSw0yVb_vlWAYkK_YBwk=.json    # verbatim POST /subscribe body
//!     ...
//! ```
//!
//! There is no index and no locking: every enumeration lists the directory
//! as it currently stands, and concurrent writers of the same bytes race on
//! the same file.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::URL_SAFE as BASE64URL, Engine};
use sha1::{Digest, Sha1};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::RECORD_EXTENSION;
use crate::notifications::Subscription;

/// Content-derived identity of a stored record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    /// Digest `raw` into its record identity.
    pub fn for_content(raw: &[u8]) -> Self {
        Self(BASE64URL.encode(Sha1::digest(raw)))
    }

    /// The encoded digest, as used for the file stem.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn file_name(&self) -> String {
        format!("{}.{RECORD_EXTENSION}", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A subscription read back from disk.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredSubscription {
    /// File the record came from.
    pub path: PathBuf,
    /// Parsed subscription.
    pub subscription: Subscription,
}

/// Directory-backed subscription store.
#[derive(Clone, Debug)]
pub struct SubscriptionStore {
    dir: PathBuf,
}

impl SubscriptionStore {
    /// Open the store at `dir`, creating the directory if it is missing.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create subscription directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Directory holding the records.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `raw` verbatim under its content digest.
    ///
    /// Overwrites any record with the same digest.
    pub fn save(&self, raw: &[u8]) -> Result<RecordId> {
        let id = RecordId::for_content(raw);
        let path = self.dir.join(id.file_name());
        fs::write(&path, raw)
            .with_context(|| format!("Failed to write subscription file {}", path.display()))?;
        log::debug!("Saved subscription record {id}");
        Ok(id)
    }

    /// Enumerate every record, parsing each one only when it is reached.
    ///
    /// Only regular `.json` files directly inside the directory are visited,
    /// in lexical file-name order. A record that cannot be read or parsed
    /// yields an `Err` item; the caller decides whether to keep going.
    pub fn load_all(&self) -> Result<Records> {
        let paths = self.record_paths()?;
        Ok(Records {
            paths: paths.into_iter(),
        })
    }

    /// Number of records currently on disk.
    pub fn count(&self) -> Result<usize> {
        Ok(self.record_paths()?.len())
    }

    fn record_paths(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.dir).with_context(|| {
            format!("Failed to list subscription directory {}", self.dir.display())
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.context("Failed to read subscription directory entry")?.path();
            let is_record = path
                .extension()
                .is_some_and(|ext| ext == RECORD_EXTENSION);
            if is_record && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

/// Lazy iterator over stored records, returned by [`SubscriptionStore::load_all`].
#[derive(Debug)]
pub struct Records {
    paths: std::vec::IntoIter<PathBuf>,
}

impl Iterator for Records {
    type Item = Result<StoredSubscription>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.paths.next()?;
        Some(read_record(path))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.paths.size_hint()
    }
}

fn read_record(path: PathBuf) -> Result<StoredSubscription> {
    let content = fs::read(&path)
        .with_context(|| format!("Failed to read subscription file {}", path.display()))?;
    let subscription: Subscription = serde_json::from_slice(&content)
        .with_context(|| format!("Malformed subscription file {}", path.display()))?;
    Ok(StoredSubscription { path, subscription })
}
