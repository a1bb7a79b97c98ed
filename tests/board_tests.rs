mod common;

use common::{fleet_board, fleet_cells, FLEET};
use seabattle::{Board, BoardError, CellState, Orientation, ShotOutcome, BOARD_SIZE};

#[test]
fn test_place_and_count() {
    let mut board = Board::new();
    board.place_ship(0, 0, 4, Orientation::Horizontal).unwrap();
    board.place_ship(0, 2, 3, Orientation::Vertical).unwrap();
    assert_eq!(board.placed_count(), 2);
    assert_eq!(board.count_of_length(3), 1);
    assert_eq!(board.remaining_of_length(3), 1);
    assert!(!board.all_ships_placed());
    assert_eq!(board.cell(3, 0), CellState::Ship);
    assert_eq!(board.cell(0, 4), CellState::Ship);
    assert_eq!(board.cell(1, 4), CellState::Empty);
}

#[test]
fn test_full_fleet() {
    let board = fleet_board();
    assert_eq!(board.placed_count(), 10);
    assert!(board.all_ships_placed());
    assert_eq!(board.occupied().count_ones(), 20);
}

#[test]
fn test_out_of_bounds() {
    let mut board = Board::new();
    assert_eq!(
        board.place_ship(8, 0, 3, Orientation::Horizontal),
        Err(BoardError::OutOfBounds)
    );
    assert_eq!(
        board.place_ship(0, 7, 4, Orientation::Vertical),
        Err(BoardError::OutOfBounds)
    );
    assert_eq!(
        board.place_ship(-1, 0, 1, Orientation::Horizontal),
        Err(BoardError::OutOfBounds)
    );
    assert_eq!(board.placed_count(), 0);
}

#[test]
fn test_touching_rejected_in_all_directions() {
    let mut board = Board::new();
    board.place_ship(4, 4, 2, Orientation::Horizontal).unwrap();
    // overlap, side, end, and diagonal contact
    for (x, y) in [(4, 4), (4, 5), (6, 4), (3, 3), (6, 5)] {
        assert_eq!(
            board.place_ship(x, y, 1, Orientation::Horizontal),
            Err(BoardError::TouchesShip),
            "({}, {})",
            x,
            y
        );
    }
    board.place_ship(7, 4, 1, Orientation::Horizontal).unwrap();
    assert_eq!(board.placed_count(), 2);
}

#[test]
fn test_quota_checked_before_position() {
    let mut board = Board::new();
    board.place_ship(0, 0, 4, Orientation::Horizontal).unwrap();
    // a second battleship is refused for its quota even though the spot is off the board
    assert_eq!(
        board.place_ship(9, 9, 4, Orientation::Horizontal),
        Err(BoardError::QuotaExhausted(4))
    );
}

#[test]
fn test_invalid_length() {
    let mut board = Board::new();
    assert_eq!(
        board.place_ship(0, 0, 5, Orientation::Horizontal),
        Err(BoardError::InvalidLength(5))
    );
    assert_eq!(
        board.place_ship(0, 0, 0, Orientation::Horizontal),
        Err(BoardError::InvalidLength(0))
    );
}

#[test]
fn test_shot_outcomes() {
    let mut board = fleet_board();
    assert_eq!(board.resolve_shot(0, 9), Ok(ShotOutcome::Miss));
    assert_eq!(board.cell(0, 9), CellState::Miss);

    assert_eq!(board.resolve_shot(0, 0), Ok(ShotOutcome::Hit));
    assert_eq!(board.cell(0, 0), CellState::Hit);
    assert_eq!(board.resolve_shot(1, 0), Ok(ShotOutcome::Hit));
    assert_eq!(board.resolve_shot(2, 0), Ok(ShotOutcome::Hit));
    assert_eq!(board.resolve_shot(3, 0), Ok(ShotOutcome::ShipDestroyed));
    for x in 0..4 {
        assert_eq!(board.cell(x, 0), CellState::Destroyed);
    }

    assert_eq!(board.resolve_shot(3, 4), Ok(ShotOutcome::ShipDestroyed));
}

#[test]
fn test_repeat_and_out_of_range_shots() {
    let mut board = fleet_board();
    board.resolve_shot(5, 5).unwrap();
    let before = board.clone();
    assert_eq!(board.resolve_shot(5, 5), Err(BoardError::AlreadyTargeted));
    assert_eq!(board.resolve_shot(10, 0), Err(BoardError::OutOfBounds));
    assert_eq!(board.resolve_shot(0, -1), Err(BoardError::OutOfBounds));
    assert_eq!(board, before);
}

#[test]
fn test_victory_on_last_cell() {
    let mut board = fleet_board();
    let cells = fleet_cells();
    let (last, rest) = cells.split_last().unwrap();
    for &(x, y) in rest {
        let outcome = board.resolve_shot(x, y).unwrap();
        assert_ne!(outcome, ShotOutcome::Victory);
    }
    assert!(!board.all_destroyed());
    assert_eq!(board.resolve_shot(last.0, last.1), Ok(ShotOutcome::Victory));
    assert!(board.all_destroyed());
}

#[test]
fn test_snapshot_hides_ships() {
    let mut board = fleet_board();
    board.resolve_shot(0, 0).unwrap();
    board.resolve_shot(0, 9).unwrap();

    let own = board.snapshot(false);
    let hidden = board.snapshot(true);
    assert_eq!(own.len(), BOARD_SIZE * BOARD_SIZE);
    assert_eq!(own[1], CellState::Ship);
    assert_eq!(hidden[1], CellState::Empty);
    assert_eq!(hidden[0], CellState::Hit);
    assert_eq!(hidden[9 * BOARD_SIZE], CellState::Miss);
    assert!(!hidden.contains(&CellState::Ship));
}

#[test]
fn test_random_fleet_completes_partial_board() {
    use rand::{rngs::SmallRng, SeedableRng};

    let mut rng = SmallRng::seed_from_u64(7);
    let mut board = Board::new();
    let (x, y, len) = FLEET[0];
    board.place_ship(x, y, len, Orientation::Horizontal).unwrap();
    board.random_fleet(&mut rng).unwrap();
    assert!(board.all_ships_placed());
    assert_eq!(board.count_of_length(4), 1);
}

#[test]
fn test_clear() {
    let mut board = fleet_board();
    board.resolve_shot(0, 0).unwrap();
    board.clear();
    assert_eq!(board, Board::new());
}
