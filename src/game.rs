//! Per-match lifecycle and turn rules.

use crate::board::Board;
use crate::common::{BoardError, ShotOutcome};
use crate::directory::PlayerDirectory;
use crate::ship::Orientation;
use alloc::string::{String, ToString};

/// Which side of a match a player occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Seat {
    /// The match creator.
    First,
    Second,
}

impl Seat {
    pub fn opponent(self) -> Seat {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }

    /// 1 or 2.
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

/// Lifecycle of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    WaitingForPlayer,
    PlacingShips,
    Turn(Seat),
    GameOver { winner: Seat },
}

impl Phase {
    /// Wire code of the phase (0 waiting .. 4 over).
    pub fn code(self) -> u8 {
        match self {
            Phase::WaitingForPlayer => 0,
            Phase::PlacingShips => 1,
            Phase::Turn(Seat::First) => 2,
            Phase::Turn(Seat::Second) => 3,
            Phase::GameOver { .. } => 4,
        }
    }

    pub fn is_over(self) -> bool {
        matches!(self, Phase::GameOver { .. })
    }
}

/// Rejections from the turn engine. None of them change match state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnError {
    NotParticipant,
    NotPlacementPhase,
    FleetIncomplete,
    NotYourTurn,
    NotInProgress,
    Board(BoardError),
}

impl From<BoardError> for TurnError {
    fn from(err: BoardError) -> Self {
        TurnError::Board(err)
    }
}

impl core::fmt::Display for TurnError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TurnError::NotParticipant => write!(f, "player is not part of this match"),
            TurnError::NotPlacementPhase => write!(f, "match is not in the placement phase"),
            TurnError::FleetIncomplete => write!(f, "fleet is not complete"),
            TurnError::NotYourTurn => write!(f, "it is the opponent's turn"),
            TurnError::NotInProgress => write!(f, "match is not in progress"),
            TurnError::Board(e) => write!(f, "{}", e),
        }
    }
}

/// Result of a successful ship placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub placed: usize,
    pub fleet_complete: bool,
}

/// Result of declaring a fleet ready.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Readiness {
    /// The opponent is still placing ships.
    AwaitingOpponent,
    /// Both fleets are complete and the first turn has begun.
    Started,
}

/// Result of an accepted shot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Volley {
    pub outcome: ShotOutcome,
    pub phase: Phase,
}

#[derive(Clone, Debug)]
pub struct Match {
    name: String,
    players: [Option<String>; 2],
    boards: [Board; 2],
    phase: Phase,
    active: bool,
}

impl Match {
    pub fn new(name: &str, creator: &str) -> Self {
        Self {
            name: name.to_string(),
            players: [Some(creator.to_string()), None],
            boards: [Board::new(), Board::new()],
            phase: Phase::WaitingForPlayer,
            active: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn retire(&mut self) {
        self.active = false;
    }

    pub fn creator(&self) -> &str {
        self.players[0].as_deref().unwrap_or_default()
    }

    pub fn player(&self, seat: Seat) -> Option<&str> {
        self.players[seat.index()].as_deref()
    }

    pub fn seat_of(&self, player: &str) -> Option<Seat> {
        [Seat::First, Seat::Second]
            .into_iter()
            .find(|&seat| self.player(seat) == Some(player))
    }

    /// Name of the player across the table from `seat`, empty if unbound.
    pub fn opponent_of(&self, seat: Seat) -> &str {
        self.player(seat.opponent()).unwrap_or_default()
    }

    pub fn board(&self, seat: Seat) -> &Board {
        &self.boards[seat.index()]
    }

    pub fn winner(&self) -> Option<Seat> {
        match self.phase {
            Phase::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    /// Bind `player` into the second seat and start placement.
    ///
    /// The creator asking again once placement has begun is accepted without
    /// changes. Anyone else needs the match to still be waiting, and the
    /// creator cannot fill their own second seat.
    pub fn admit(&mut self, player: &str) -> Option<Seat> {
        if self.phase == Phase::PlacingShips && self.creator() == player {
            return Some(Seat::First);
        }
        if self.phase != Phase::WaitingForPlayer || self.creator() == player {
            return None;
        }
        self.players[1] = Some(player.to_string());
        self.boards[1].clear();
        self.phase = Phase::PlacingShips;
        Some(Seat::Second)
    }

    fn participant(&self, player: &str) -> Result<Seat, TurnError> {
        self.seat_of(player).ok_or(TurnError::NotParticipant)
    }

    pub fn place_ship(
        &mut self,
        player: &str,
        x: i32,
        y: i32,
        length: usize,
        orientation: Orientation,
    ) -> Result<Placement, TurnError> {
        let seat = self.participant(player)?;
        if self.phase != Phase::PlacingShips {
            return Err(TurnError::NotPlacementPhase);
        }
        let board = &mut self.boards[seat.index()];
        board.place_ship(x, y, length, orientation)?;
        Ok(Placement {
            placed: board.placed_count(),
            fleet_complete: board.all_ships_placed(),
        })
    }

    /// Declare `player`'s fleet ready. Whoever completes the pair starts the
    /// battle, and the creator always shoots first.
    pub fn declare_ready(&mut self, player: &str) -> Result<Readiness, TurnError> {
        let seat = self.participant(player)?;
        if self.phase != Phase::PlacingShips {
            return Err(TurnError::NotPlacementPhase);
        }
        if !self.boards[seat.index()].all_ships_placed() {
            return Err(TurnError::FleetIncomplete);
        }
        if self.boards[seat.opponent().index()].all_ships_placed() {
            self.phase = Phase::Turn(Seat::First);
            log::info!("match {} started", self.name);
            Ok(Readiness::Started)
        } else {
            Ok(Readiness::AwaitingOpponent)
        }
    }

    /// Fire at the opponent's board. A miss passes the turn, a hit or a sunk
    /// ship keeps it, and sinking the last ship ends the match and books the
    /// result in `players`.
    pub fn fire(
        &mut self,
        player: &str,
        x: i32,
        y: i32,
        players: &mut PlayerDirectory,
    ) -> Result<Volley, TurnError> {
        let seat = self.participant(player)?;
        match self.phase {
            Phase::Turn(current) if current == seat => {}
            Phase::Turn(_) => return Err(TurnError::NotYourTurn),
            _ => return Err(TurnError::NotInProgress),
        }
        let outcome = self.boards[seat.opponent().index()].resolve_shot(x, y)?;
        self.phase = match outcome {
            ShotOutcome::Miss => Phase::Turn(seat.opponent()),
            ShotOutcome::Hit | ShotOutcome::ShipDestroyed => Phase::Turn(seat),
            ShotOutcome::Victory => {
                let defender = self.opponent_of(seat).to_string();
                players.record_result(player, &defender);
                log::info!("match {} won by {}", self.name, player);
                Phase::GameOver { winner: seat }
            }
        };
        Ok(Volley {
            outcome,
            phase: self.phase,
        })
    }
}
