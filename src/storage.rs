use crate::errors::{Result, StatsError};
use crate::models::Snapshot;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, warn};

pub async fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let bytes = fs::read(path).await?;
    let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
    info!(
        path = %path.display(),
        logs = snapshot.logs.len(),
        categories = snapshot.categories.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

/// Like [`read_snapshot`], but a missing or unreadable file yields an empty
/// snapshot so the report still renders.
pub async fn load_snapshot(path: &Path) -> Snapshot {
    match read_snapshot(path).await {
        Ok(snapshot) => snapshot,
        Err(StatsError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "snapshot not found, starting empty");
            Snapshot::default()
        }
        Err(err) => {
            error!("{err}");
            Snapshot::default()
        }
    }
}
