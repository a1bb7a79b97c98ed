//! Bounded table of named matches.
//!
//! Matches live in creation order and are looked up through a name index.
//! Every match ever created counts against the capacity; retiring a match
//! frees its name but not its slot.

use crate::config::{valid_name, MAX_MATCHES};
use crate::directory::PlayerDirectory;
use crate::game::{Match, Phase, Seat};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Position of a match in the registry.
pub type MatchId = usize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    InvalidName,
    AlreadyExists,
    CapacityExceeded,
    NotFound,
    NotJoinable,
}

impl core::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RegistryError::InvalidName => write!(f, "invalid match name"),
            RegistryError::AlreadyExists => write!(f, "a match with this name already exists"),
            RegistryError::CapacityExceeded => write!(f, "match table is full"),
            RegistryError::NotFound => write!(f, "no such match"),
            RegistryError::NotJoinable => write!(f, "match cannot be joined"),
        }
    }
}

/// Successful join: the seat taken, who sits opposite, and the new phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Joined {
    pub seat: Seat,
    pub opponent: String,
    pub phase: Phase,
}

#[derive(Clone, Debug)]
pub struct MatchRegistry {
    matches: Vec<Match>,
    index: BTreeMap<String, MatchId>,
    capacity: usize,
}

impl Default for MatchRegistry {
    fn default() -> Self {
        Self::new(MAX_MATCHES)
    }
}

impl MatchRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            matches: Vec::new(),
            index: BTreeMap::new(),
            capacity,
        }
    }

    /// Number of slots used, retired matches included.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.matches.len() >= self.capacity
    }

    /// Open a new match in `WaitingForPlayer` with `creator` in the first
    /// seat, and mark the creator as in a match.
    pub fn create(
        &mut self,
        name: &str,
        creator: &str,
        players: &mut PlayerDirectory,
    ) -> Result<MatchId, RegistryError> {
        if !valid_name(name) {
            return Err(RegistryError::InvalidName);
        }
        if self.is_full() {
            return Err(RegistryError::CapacityExceeded);
        }
        if self.index.contains_key(name) {
            return Err(RegistryError::AlreadyExists);
        }
        let id = self.matches.len();
        self.matches.push(Match::new(name, creator));
        self.index.insert(name.to_string(), id);
        players.enter_match(creator, name);
        log::info!("match {} created by {}", name, creator);
        Ok(id)
    }

    /// Look up an active match by name.
    pub fn find(&self, name: &str) -> Option<MatchId> {
        self.index
            .get(name)
            .copied()
            .filter(|&id| self.matches[id].is_active())
    }

    pub fn get(&self, id: MatchId) -> Option<&Match> {
        self.matches.get(id)
    }

    pub fn get_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.get_mut(id)
    }

    pub fn by_name(&self, name: &str) -> Option<&Match> {
        self.find(name).and_then(|id| self.matches.get(id))
    }

    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut Match> {
        let id = self.find(name)?;
        self.matches.get_mut(id)
    }

    /// Join `player` into the named match. See [`Match::admit`] for who may
    /// join when.
    pub fn join(
        &mut self,
        name: &str,
        player: &str,
        players: &mut PlayerDirectory,
    ) -> Result<Joined, RegistryError> {
        let game = self.by_name_mut(name).ok_or(RegistryError::NotFound)?;
        let seat = game.admit(player).ok_or(RegistryError::NotJoinable)?;
        players.enter_match(player, name);
        if seat == Seat::Second {
            log::info!("{} joined match {}", player, name);
        }
        Ok(Joined {
            seat,
            opponent: game.opponent_of(seat).to_string(),
            phase: game.phase(),
        })
    }

    /// Active matches waiting for a second player, excluding those created
    /// by `player`, in creation order.
    pub fn joinable<'a>(&'a self, player: &'a str) -> impl Iterator<Item = &'a Match> + 'a {
        self.matches.iter().filter(move |game| {
            game.is_active()
                && game.phase() == Phase::WaitingForPlayer
                && game.creator() != player
        })
    }

    /// Retire every still-waiting match `player` created. Returns how many
    /// were retired.
    pub fn abandon_waiting(&mut self, player: &str) -> usize {
        let mut retired = 0;
        for game in self.matches.iter_mut() {
            if game.is_active() && game.phase() == Phase::WaitingForPlayer && game.creator() == player
            {
                game.retire();
                self.index.remove(game.name());
                log::info!("match {} abandoned by {}", game.name(), player);
                retired += 1;
            }
        }
        retired
    }

    pub fn iter(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter()
    }
}
