//! Player trait and implementations
//!
//! - AiPlayer: random fleet, probability-based targeting
//! - CliPlayer: interactive command-line player

use crate::{
    ai::TargetView,
    board::Board,
    common::{BoardError, ShotOutcome},
    protocol::BoardSnapshot,
};
use rand::rngs::SmallRng;

/// Decisions a participant makes during a match. Everything else (talking
/// to the server, waiting for the opponent) is handled by the caller.
pub trait Player: Send {
    /// Lay out a complete fleet on `board`.
    fn place_fleet(&mut self, rng: &mut SmallRng, board: &mut Board) -> Result<(), BoardError>;

    /// Choose the next cell to fire at.
    fn select_target(&mut self, rng: &mut SmallRng, view: &TargetView) -> (usize, usize);

    /// Result of the player's own last shot.
    fn handle_shot_result(&mut self, _target: (usize, usize), _outcome: ShotOutcome) {}

    /// Latest picture of both boards.
    fn show_boards(&mut self, _snapshot: &BoardSnapshot) {}

    /// Server text worth showing to a human.
    fn notify(&mut self, _text: &str) {}
}

pub mod ai;
pub use ai::AiPlayer;

#[cfg(feature = "std")]
pub mod cli;
#[cfg(feature = "std")]
pub use cli::CliPlayer;
