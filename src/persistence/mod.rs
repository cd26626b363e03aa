//! Save/load persistence
//!
//! Features:
//! - Versioned JSON envelope around an engine [`Snapshot`]
//! - Unknown versions are rejected rather than guessed at
//! - File saves go through a temp file and rename

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SimError;
use crate::sim::{GameState, Snapshot};
use crate::tuning::Tuning;

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("malformed save: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported save version {found} (expected {})", SAVE_VERSION)]
    UnsupportedVersion { found: u32 },
    #[error("save does not describe a valid game: {0}")]
    InvalidSnapshot(#[from] SimError),
    #[error("save file I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// On-disk save format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveEnvelope {
    pub version: u32,
    /// Simulation clock when the save was taken
    pub saved_at_time: f64,
    pub snapshot: Snapshot,
}

impl SaveEnvelope {
    pub fn capture(state: &GameState) -> Self {
        Self {
            version: SAVE_VERSION,
            saved_at_time: state.time,
            snapshot: state.snapshot(),
        }
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        // Check the version before committing to the snapshot layout
        #[derive(Deserialize)]
        struct Header {
            version: u32,
        }
        let header: Header = serde_json::from_str(json)?;
        if header.version != SAVE_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: header.version,
            });
        }
        Ok(serde_json::from_str(json)?)
    }

    /// Rebuild the engine this envelope was captured from
    pub fn into_state(self, tuning: Tuning) -> Result<GameState, PersistenceError> {
        Ok(GameState::restore(self.snapshot, tuning)?)
    }
}

/// Write a save next to `path` and move it into place
pub fn save_to_path(state: &GameState, path: &Path) -> Result<(), PersistenceError> {
    let json = SaveEnvelope::capture(state).to_json()?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    log::info!("Saved wave {} to {}", state.director.wave, path.display());
    Ok(())
}

pub fn load_from_path(path: &Path, tuning: Tuning) -> Result<GameState, PersistenceError> {
    let json = fs::read_to_string(path)?;
    let state = SaveEnvelope::from_json(&json)?.into_state(tuning)?;
    log::info!("Loaded save from {}", path.display());
    Ok(state)
}
