use crate::{
    ai::{self, TargetView},
    board::Board,
    common::BoardError,
};
use rand::rngs::SmallRng;

use super::Player;

/// Computer player: random legal fleet, probability-based targeting.
#[derive(Debug, Default)]
pub struct AiPlayer;

impl AiPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Player for AiPlayer {
    fn place_fleet(&mut self, rng: &mut SmallRng, board: &mut Board) -> Result<(), BoardError> {
        board.random_fleet(rng)
    }

    fn select_target(&mut self, rng: &mut SmallRng, view: &TargetView) -> (usize, usize) {
        ai::choose_target(view, rng)
    }
}
