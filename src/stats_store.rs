#![cfg(feature = "std")]

//! Player totals on disk: a bincode list of `(name, wins, losses)`.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::directory::{PlayerDirectory, PlayerRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredPlayer {
    name: String,
    wins: u32,
    losses: u32,
}

/// Load a directory from `path`. A missing file yields an empty directory;
/// presence flags always start cleared.
pub fn load(path: &Path, capacity: usize) -> anyhow::Result<PlayerDirectory> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("no stats file at {}, starting fresh", path.display());
            return Ok(PlayerDirectory::new(capacity));
        }
        Err(e) => {
            return Err(e).with_context(|| format!("cannot read stats file {}", path.display()))
        }
    };
    let stored: Vec<StoredPlayer> = bincode::deserialize(&bytes)
        .with_context(|| format!("corrupt stats file {}", path.display()))?;
    log::info!("loaded {} player records from {}", stored.len(), path.display());
    Ok(PlayerDirectory::from_records(
        stored
            .into_iter()
            .map(|p| PlayerRecord::with_totals(&p.name, p.wins, p.losses)),
        capacity,
    ))
}

/// Write every record's totals to `path`, replacing the file.
pub fn save(path: &Path, directory: &PlayerDirectory) -> anyhow::Result<()> {
    let stored: Vec<StoredPlayer> = directory
        .records()
        .map(|r| StoredPlayer {
            name: r.name.clone(),
            wins: r.wins,
            losses: r.losses,
        })
        .collect();
    let bytes = bincode::serialize(&stored)?;
    fs::write(path, bytes)
        .with_context(|| format!("cannot write stats file {}", path.display()))?;
    log::info!("saved {} player records to {}", stored.len(), path.display());
    Ok(())
}
