//! The per-run deal snapshot and its JSON file store.
//!
//! A snapshot is written once at the end of a fetch run and read by every
//! downstream renderer. Key order on disk is fixed by field order:
//! `fetch_timestamp`, `total_deals`, `source`, `note`, `products`.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::deal::Deal;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to parse snapshot {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("snapshot declares {declared} deals but contains {actual}")]
    Inconsistent { declared: usize, actual: usize },
}

/// One timestamped, ordered collection of deals produced by a single run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealSnapshot {
    #[serde(with = "timestamp")]
    pub fetch_timestamp: DateTime<Utc>,
    pub total_deals: usize,
    /// Provenance tag, e.g. `"catalog_api"` or `"web_scraper"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub products: Vec<Deal>,
}

impl DealSnapshot {
    /// Builds a snapshot stamped with the current time.
    #[must_use]
    pub fn new(products: Vec<Deal>, source: Option<String>) -> Self {
        Self {
            fetch_timestamp: Utc::now(),
            total_deals: products.len(),
            source,
            note: None,
            products,
        }
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Writes `snapshot` to `path` as pretty-printed UTF-8 JSON.
///
/// The file is written next to its destination first and renamed into place
/// so readers never observe a half-written snapshot.
///
/// # Errors
///
/// Returns [`SnapshotError::Serialize`] or [`SnapshotError::Io`].
pub fn save_snapshot(path: &Path, snapshot: &DealSnapshot) -> Result<(), SnapshotError> {
    let json = serde_json::to_string_pretty(snapshot).map_err(SnapshotError::Serialize)?;

    let io_err = |source| SnapshotError::Io {
        path: path.display().to_string(),
        source,
    };

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = std::path::PathBuf::from(tmp_name);

    std::fs::write(&tmp_path, json).map_err(io_err)?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(io_err(e));
    }

    tracing::debug!(path = %path.display(), deals = snapshot.total_deals, "snapshot saved");
    Ok(())
}

/// Reads a snapshot from `path`.
///
/// # Errors
///
/// Returns [`SnapshotError::Io`] if the file cannot be read,
/// [`SnapshotError::Parse`] if it is not a valid snapshot, and
/// [`SnapshotError::Inconsistent`] if `total_deals` does not match the number
/// of products.
pub fn load_snapshot(path: &Path) -> Result<DealSnapshot, SnapshotError> {
    let content = std::fs::read_to_string(path).map_err(|e| SnapshotError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let snapshot: DealSnapshot =
        serde_json::from_str(&content).map_err(|e| SnapshotError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;

    if snapshot.total_deals != snapshot.products.len() {
        return Err(SnapshotError::Inconsistent {
            declared: snapshot.total_deals,
            actual: snapshot.products.len(),
        });
    }

    Ok(snapshot)
}

/// RFC 3339 on write; on read also accepts offset-less ISO-8601 timestamps
/// (read as UTC), which older snapshot producers emitted.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}
