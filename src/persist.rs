// =============================================================================
// Snapshot persistence - timestamped JSON artifacts
// =============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{SnapshotError, SnapshotResult};
use crate::snapshot::model::MarketSnapshot;

/// Writes snapshots to a directory as pretty-printed JSON files.
///
/// The directory is created on first save. File names embed the lowercased
/// symbol and the snapshot's own capture timestamp, so re-running the tool
/// never overwrites an earlier capture.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist one snapshot, returning the path it was written to.
    pub fn save(&self, snapshot: &MarketSnapshot) -> SnapshotResult<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            SnapshotError::Persistence(format!(
                "failed to create {}: {e}",
                self.dir.display()
            ))
        })?;

        let filename = format!(
            "{}_{}.json",
            snapshot.symbol.to_lowercase(),
            snapshot.timestamp.format("%Y%m%d_%H%M%S")
        );
        let path = self.dir.join(filename);

        let body = serde_json::to_string_pretty(snapshot).map_err(|e| {
            SnapshotError::Persistence(format!("failed to serialise snapshot: {e}"))
        })?;

        fs::write(&path, body).map_err(|e| {
            SnapshotError::Persistence(format!("failed to write {}: {e}", path.display()))
        })?;

        info!(path = %path.display(), "snapshot saved");
        Ok(path)
    }

    /// Read a previously saved snapshot back from disk.
    pub fn load(&self, path: &Path) -> SnapshotResult<MarketSnapshot> {
        debug!(path = %path.display(), "loading snapshot");

        let body = fs::read_to_string(path).map_err(|e| {
            SnapshotError::Persistence(format!("failed to read {}: {e}", path.display()))
        })?;

        serde_json::from_str(&body).map_err(|e| {
            SnapshotError::Persistence(format!("failed to parse {}: {e}", path.display()))
        })
    }
}
