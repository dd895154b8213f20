#![deny(warnings)]

//! Snapshot persistence: save and load a complete `WorldState`.
//!
//! JSON is the human-readable default; bincode is the compact alternative.
//! Loaded worlds are checked with [`sim_core::validate_world`] before they
//! are handed back.

use sim_core::{validate_world, ValidationError, WorldState};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while saving or loading a snapshot.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),
    /// Snapshot decoded but breaks a world invariant.
    #[error("invalid snapshot: {0}")]
    Invalid(#[from] ValidationError),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SnapshotFormat {
    #[default]
    Json,
    Bincode,
}

impl SnapshotFormat {
    /// `.bin` and `.bincode` files are bincode; everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("bin" | "bincode") => SnapshotFormat::Bincode,
            _ => SnapshotFormat::Json,
        }
    }
}

/// Returns the default location for local saves.
pub fn default_save_path() -> PathBuf {
    PathBuf::from("./saves/savegame.json")
}

/// Serializes a world. JSON output is pretty-printed.
pub fn encode(world: &WorldState, format: SnapshotFormat) -> Result<Vec<u8>, PersistenceError> {
    let bytes = match format {
        SnapshotFormat::Json => serde_json::to_vec_pretty(world)?,
        SnapshotFormat::Bincode => bincode::serialize(world)?,
    };
    Ok(bytes)
}

/// Deserializes a world and runs [`validate_world`] on it, so structurally
/// broken snapshots fail with [`PersistenceError::Invalid`].
pub fn decode(bytes: &[u8], format: SnapshotFormat) -> Result<WorldState, PersistenceError> {
    let world: WorldState = match format {
        SnapshotFormat::Json => serde_json::from_slice(bytes)?,
        SnapshotFormat::Bincode => bincode::deserialize(bytes)?,
    };
    validate_world(&world)?;
    Ok(world)
}

/// Writes the snapshot, creating parent directories as needed.
pub fn save_snapshot(
    world: &WorldState,
    path: &Path,
    format: SnapshotFormat,
) -> Result<(), PersistenceError> {
    let bytes = encode(world, format)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    info!(path = %path.display(), ?format, turn = world.turn(), "snapshot saved");
    Ok(())
}

pub fn load_snapshot(path: &Path, format: SnapshotFormat) -> Result<WorldState, PersistenceError> {
    let bytes = fs::read(path)?;
    let world = decode(&bytes, format)?;
    info!(path = %path.display(), ?format, turn = world.turn(), "snapshot loaded");
    Ok(world)
}
