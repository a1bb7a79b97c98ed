//! One player's grid: ship placement under the no-touching rule and shot
//! resolution.

use crate::common::{BoardError, CellState, ShotOutcome};
use crate::config::{fleet_lengths, quota, BOARD_SIZE, FLEET_SIZE, MAX_SHIP_LENGTH};
use crate::ship::{Grid, Orientation, Ship};
use alloc::vec::Vec;
use rand::Rng;

const PLACEMENT_ATTEMPTS: usize = 200;
const LAYOUT_ATTEMPTS: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    ships: [Option<Ship>; FLEET_SIZE],
    placed: usize,
    occupied: Grid,
    hits: Grid,
    misses: Grid,
    destroyed: Grid,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Board {
            ships: [None; FLEET_SIZE],
            placed: 0,
            occupied: Grid::new(),
            hits: Grid::new(),
            misses: Grid::new(),
            destroyed: Grid::new(),
        }
    }

    /// Remove every ship and shot.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Place a ship of `length` anchored at `(x, y)`.
    ///
    /// Checks the per-length quota first, then bounds, then that no cell of
    /// the footprint or its 8-neighbourhood already holds a ship. On any
    /// rejection the board is left untouched.
    pub fn place_ship(
        &mut self,
        x: i32,
        y: i32,
        length: usize,
        orientation: Orientation,
    ) -> Result<(), BoardError> {
        if length == 0 || length > MAX_SHIP_LENGTH {
            return Err(BoardError::InvalidLength(length));
        }
        if self.placed >= FLEET_SIZE || self.count_of_length(length) >= quota(length) {
            return Err(BoardError::QuotaExhausted(length));
        }
        let ship = Ship::new(x, y, length, orientation)?;
        if ship.mask().intersects(&self.occupied.dilate()) {
            return Err(BoardError::TouchesShip);
        }
        self.occupied |= ship.mask();
        self.ships[self.placed] = Some(ship);
        self.placed += 1;
        Ok(())
    }

    /// True if a ship of `length` could be placed at `(x, y)` right now.
    pub fn can_place(&self, x: i32, y: i32, length: usize, orientation: Orientation) -> bool {
        let mut probe = self.clone();
        probe.place_ship(x, y, length, orientation).is_ok()
    }

    pub fn placed_count(&self) -> usize {
        self.placed
    }

    pub fn count_of_length(&self, length: usize) -> usize {
        self.ships().filter(|ship| ship.length() == length).count()
    }

    /// How many more ships of `length` may still be placed.
    pub fn remaining_of_length(&self, length: usize) -> usize {
        quota(length).saturating_sub(self.count_of_length(length))
    }

    /// True once every ship class is placed exactly as often as the fleet
    /// requires.
    pub fn all_ships_placed(&self) -> bool {
        (1..=MAX_SHIP_LENGTH).all(|len| self.count_of_length(len) == quota(len))
    }

    pub fn all_destroyed(&self) -> bool {
        self.placed == FLEET_SIZE && self.ships().all(Ship::is_destroyed)
    }

    pub fn ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter().flatten()
    }

    /// Mask of every cell a ship covers.
    pub fn occupied(&self) -> Grid {
        self.occupied
    }

    /// Resolve a shot at `(x, y)`.
    pub fn resolve_shot(&mut self, x: i32, y: i32) -> Result<ShotOutcome, BoardError> {
        if !in_bounds(x, y) {
            return Err(BoardError::OutOfBounds);
        }
        let (x, y) = (x as usize, y as usize);
        if self.cell(x, y).is_targeted() {
            return Err(BoardError::AlreadyTargeted);
        }
        if !self.occupied.contains(x, y) {
            self.misses.set(x, y)?;
            return Ok(ShotOutcome::Miss);
        }

        self.hits.set(x, y)?;
        let Some(ship) = self
            .ships
            .iter_mut()
            .flatten()
            .find(|ship| ship.occupies(x, y))
        else {
            return Ok(ShotOutcome::Hit);
        };
        ship.register_hit();
        if !ship.is_destroyed() {
            return Ok(ShotOutcome::Hit);
        }
        self.destroyed |= ship.mask();
        if self.all_destroyed() {
            Ok(ShotOutcome::Victory)
        } else {
            Ok(ShotOutcome::ShipDestroyed)
        }
    }

    /// State of the cell at `(x, y)`. Out-of-range cells read as empty.
    pub fn cell(&self, x: usize, y: usize) -> CellState {
        if self.destroyed.contains(x, y) {
            CellState::Destroyed
        } else if self.hits.contains(x, y) {
            CellState::Hit
        } else if self.misses.contains(x, y) {
            CellState::Miss
        } else if self.occupied.contains(x, y) {
            CellState::Ship
        } else {
            CellState::Empty
        }
    }

    /// Row-major copy of every cell. With `hide_ships`, untouched ship cells
    /// read as empty, which is what the opponent gets to see.
    pub fn snapshot(&self, hide_ships: bool) -> Vec<CellState> {
        let mut cells = Vec::with_capacity(BOARD_SIZE * BOARD_SIZE);
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                let cell = match self.cell(x, y) {
                    CellState::Ship if hide_ships => CellState::Empty,
                    other => other,
                };
                cells.push(cell);
            }
        }
        cells
    }

    /// Random origin and orientation where a ship of `length` fits.
    pub fn random_placement<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        length: usize,
    ) -> Result<(i32, i32, Orientation), BoardError> {
        if length == 0 || length > MAX_SHIP_LENGTH {
            return Err(BoardError::InvalidLength(length));
        }
        let blocked = self.occupied.dilate();
        for _ in 0..PLACEMENT_ATTEMPTS {
            let orientation = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let (max_x, max_y) = match orientation {
                Orientation::Horizontal => (BOARD_SIZE - length, BOARD_SIZE - 1),
                Orientation::Vertical => (BOARD_SIZE - 1, BOARD_SIZE - length),
            };
            let x = rng.random_range(0..=max_x) as i32;
            let y = rng.random_range(0..=max_y) as i32;
            let ship = Ship::new(x, y, length, orientation)?;
            if !ship.mask().intersects(&blocked) {
                return Ok((x, y, orientation));
            }
        }
        Err(BoardError::PlacementFailed)
    }

    /// Fill the board with the ships still missing from the fleet, longest
    /// first. Starts over from the current layout when it paints itself into
    /// a corner.
    pub fn random_fleet<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), BoardError> {
        let start = self.clone();
        for _ in 0..LAYOUT_ATTEMPTS {
            if self.try_fill(rng).is_ok() {
                return Ok(());
            }
            *self = start.clone();
        }
        Err(BoardError::PlacementFailed)
    }

    fn try_fill<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), BoardError> {
        let mut wanted = [0usize; MAX_SHIP_LENGTH + 1];
        for len in 1..=MAX_SHIP_LENGTH {
            wanted[len] = self.remaining_of_length(len);
        }
        for len in fleet_lengths() {
            if wanted[len] == 0 {
                continue;
            }
            wanted[len] -= 1;
            let (x, y, orientation) = self.random_placement(rng, len)?;
            self.place_ship(x, y, len, orientation)?;
        }
        Ok(())
    }
}

/// True if `(x, y)` lies on the board.
pub fn in_bounds(x: i32, y: i32) -> bool {
    x >= 0 && y >= 0 && (x as usize) < BOARD_SIZE && (y as usize) < BOARD_SIZE
}
