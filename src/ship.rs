use crate::{
    bitboard::BitBoard,
    common::BoardError,
    config::{BOARD_SIZE, MAX_SHIP_LENGTH},
};

/// Bitboard covering one player's grid.
pub type Grid = BitBoard<u128, BOARD_SIZE>;

/// Ship orientation on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn from_horizontal(horizontal: bool) -> Self {
        if horizontal {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Orientation::Horizontal)
    }
}

/// A placed ship: origin, extent, and how many of its cells have been hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ship {
    x: usize,
    y: usize,
    length: usize,
    orientation: Orientation,
    hits: usize,
    mask: Grid,
}

impl Ship {
    /// Build a ship anchored at `(x, y)`. Fails if any covered cell is off
    /// the board or the length is outside `1..=MAX_SHIP_LENGTH`.
    pub fn new(x: i32, y: i32, length: usize, orientation: Orientation) -> Result<Self, BoardError> {
        if length == 0 || length > MAX_SHIP_LENGTH {
            return Err(BoardError::InvalidLength(length));
        }
        if x < 0 || y < 0 {
            return Err(BoardError::OutOfBounds);
        }
        let (x, y) = (x as usize, y as usize);
        let (end_x, end_y) = match orientation {
            Orientation::Horizontal => (x + length, y + 1),
            Orientation::Vertical => (x + 1, y + length),
        };
        if end_x > BOARD_SIZE || end_y > BOARD_SIZE {
            return Err(BoardError::OutOfBounds);
        }
        let mut mask = Grid::new();
        for k in 0..length {
            let (cx, cy) = match orientation {
                Orientation::Horizontal => (x + k, y),
                Orientation::Vertical => (x, y + k),
            };
            mask.set(cx, cy)?;
        }
        Ok(Self {
            x,
            y,
            length,
            orientation,
            hits: 0,
            mask,
        })
    }

    pub fn origin(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Cells the ship covers.
    pub fn mask(&self) -> Grid {
        self.mask
    }

    pub fn occupies(&self, x: usize, y: usize) -> bool {
        self.mask.contains(x, y)
    }

    /// Record a hit. The count saturates at the ship's length.
    pub fn register_hit(&mut self) {
        if self.hits < self.length {
            self.hits += 1;
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.hits == self.length
    }
}
