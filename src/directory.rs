//! Registered players, their win/loss record and presence flags.

use crate::config::{valid_name, MAX_PLAYERS};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerRecord {
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub online: bool,
    pub in_match: bool,
    pub current_match: Option<String>,
}

impl PlayerRecord {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            wins: 0,
            losses: 0,
            online: false,
            in_match: false,
            current_match: None,
        }
    }

    /// Restore a record from stored totals; presence flags start cleared.
    pub fn with_totals(name: &str, wins: u32, losses: u32) -> Self {
        Self {
            wins,
            losses,
            ..Self::new(name)
        }
    }

    /// Totals come from the stats file, so the sum is taken in `u64`.
    pub fn games_played(&self) -> u64 {
        u64::from(self.wins) + u64::from(self.losses)
    }

    /// Percentage of games won, 0.0 before the first game.
    pub fn win_rate(&self) -> f32 {
        match self.games_played() {
            0 => 0.0,
            total => self.wins as f32 * 100.0 / total as f32,
        }
    }
}

/// Result of a successful login.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Login {
    Registered,
    Returning { wins: u32, losses: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DirectoryError {
    InvalidName,
    AlreadyOnline,
    Full,
    UnknownPlayer,
}

impl core::fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DirectoryError::InvalidName => write!(f, "invalid player name"),
            DirectoryError::AlreadyOnline => write!(f, "player is already online"),
            DirectoryError::Full => write!(f, "player limit reached"),
            DirectoryError::UnknownPlayer => write!(f, "no such player"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PlayerDirectory {
    records: BTreeMap<String, PlayerRecord>,
    capacity: usize,
}

impl Default for PlayerDirectory {
    fn default() -> Self {
        Self::new(MAX_PLAYERS)
    }
}

impl PlayerDirectory {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: BTreeMap::new(),
            capacity,
        }
    }

    /// Build a directory from stored records. Presence flags are reset and
    /// records beyond `capacity` are dropped.
    pub fn from_records<I>(records: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = PlayerRecord>,
    {
        let mut directory = Self::new(capacity);
        for mut record in records {
            if directory.records.len() >= capacity {
                log::warn!("player directory full, dropping stored record for {}", record.name);
                break;
            }
            record.online = false;
            record.in_match = false;
            record.current_match = None;
            directory.records.insert(record.name.clone(), record);
        }
        directory
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, name: &str) -> Option<&PlayerRecord> {
        self.records.get(name)
    }

    pub fn records(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.records.values()
    }

    /// Log a player in, registering the name on first sight.
    pub fn login(&mut self, name: &str) -> Result<Login, DirectoryError> {
        if !valid_name(name) {
            return Err(DirectoryError::InvalidName);
        }
        if let Some(record) = self.records.get_mut(name) {
            if record.online {
                return Err(DirectoryError::AlreadyOnline);
            }
            record.online = true;
            record.in_match = false;
            record.current_match = None;
            return Ok(Login::Returning {
                wins: record.wins,
                losses: record.losses,
            });
        }
        if self.records.len() >= self.capacity {
            return Err(DirectoryError::Full);
        }
        let mut record = PlayerRecord::new(name);
        record.online = true;
        self.records.insert(name.to_string(), record);
        Ok(Login::Registered)
    }

    /// Mark a player offline and out of any match.
    pub fn logout(&mut self, name: &str) -> Result<(), DirectoryError> {
        let record = self
            .records
            .get_mut(name)
            .ok_or(DirectoryError::UnknownPlayer)?;
        record.online = false;
        record.in_match = false;
        record.current_match = None;
        Ok(())
    }

    /// Bind a player to a match. Unknown names are ignored.
    pub fn enter_match(&mut self, name: &str, match_name: &str) {
        if let Some(record) = self.records.get_mut(name) {
            record.in_match = true;
            record.current_match = Some(match_name.to_string());
        }
    }

    pub fn leave_match(&mut self, name: &str) {
        if let Some(record) = self.records.get_mut(name) {
            record.in_match = false;
            record.current_match = None;
        }
    }

    /// Book a finished match: winner +1 win, loser +1 loss, both leave the
    /// match.
    pub fn record_result(&mut self, winner: &str, loser: &str) {
        if let Some(record) = self.records.get_mut(winner) {
            record.wins = record.wins.saturating_add(1);
        }
        if let Some(record) = self.records.get_mut(loser) {
            record.losses = record.losses.saturating_add(1);
        }
        self.leave_match(winner);
        self.leave_match(loser);
    }
}
