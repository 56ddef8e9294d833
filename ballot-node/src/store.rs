//! File-backed snapshot storage.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use ballot_shared_types::BallotSnapshot;

/// Reads the snapshot at `path`; a missing file is a fresh ballot.
pub fn load_snapshot(path: &Path) -> Result<BallotSnapshot> {
    if !path.exists() {
        return Ok(BallotSnapshot::default());
    }
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("failed to parse {}", path.display()))
}

/// Writes the snapshot through a temporary file so a crash never leaves a
/// half-written state file behind.
pub fn save_snapshot(path: &Path, snapshot: &BallotSnapshot) -> Result<()> {
    let json = serde_json::to_vec_pretty(snapshot).context("failed to encode snapshot")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}
