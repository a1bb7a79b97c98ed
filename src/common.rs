use crate::bitboard::BitBoardError;

/// State of a single cell as seen on a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    Empty,
    Ship,
    Miss,
    Hit,
    Destroyed,
}

impl CellState {
    /// True once a shot has landed on this cell.
    pub fn is_targeted(self) -> bool {
        matches!(self, CellState::Miss | CellState::Hit | CellState::Destroyed)
    }
}

/// Outcome of a shot that was accepted by a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShotOutcome {
    Miss,
    Hit,
    ShipDestroyed,
    Victory,
}

impl ShotOutcome {
    /// Numeric result code carried on the wire (0 miss .. 3 victory).
    pub fn code(self) -> u8 {
        match self {
            ShotOutcome::Miss => 0,
            ShotOutcome::Hit => 1,
            ShotOutcome::ShipDestroyed => 2,
            ShotOutcome::Victory => 3,
        }
    }

    /// True if the shooter keeps the turn after this outcome.
    pub fn keeps_turn(self) -> bool {
        matches!(self, ShotOutcome::Hit | ShotOutcome::ShipDestroyed)
    }
}

/// Errors returned by board operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Coordinate or ship footprint leaves the board.
    OutOfBounds,
    /// Ship footprint overlaps or touches an existing ship.
    TouchesShip,
    /// Length is not part of the fleet.
    InvalidLength(usize),
    /// All ships of this length are already placed.
    QuotaExhausted(usize),
    /// Cell was already fired upon.
    AlreadyTargeted,
    /// Random layout gave up after too many attempts.
    PlacementFailed,
    BitBoard(BitBoardError),
}

impl From<BitBoardError> for BoardError {
    fn from(err: BitBoardError) -> Self {
        BoardError::BitBoard(err)
    }
}

impl core::fmt::Display for BoardError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BoardError::OutOfBounds => write!(f, "position is outside the board"),
            BoardError::TouchesShip => write!(f, "ship overlaps or touches another ship"),
            BoardError::InvalidLength(len) => write!(f, "no ship of length {} in the fleet", len),
            BoardError::QuotaExhausted(len) => {
                write!(f, "all ships of length {} are already placed", len)
            }
            BoardError::AlreadyTargeted => write!(f, "cell was already targeted"),
            BoardError::PlacementFailed => write!(f, "could not find a valid fleet layout"),
            BoardError::BitBoard(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}
