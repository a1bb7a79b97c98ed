#![allow(dead_code)]

use seabattle::{Board, Dispatcher, Message, Orientation};

/// A complete legal fleet, all horizontal, as `(x, y, length)`. Rows 5..10
/// stay empty so shots there always miss.
pub const FLEET: [(i32, i32, usize); 10] = [
    (0, 0, 4),
    (5, 0, 3),
    (0, 2, 3),
    (4, 2, 2),
    (7, 2, 2),
    (0, 4, 2),
    (3, 4, 1),
    (5, 4, 1),
    (7, 4, 1),
    (9, 4, 1),
];

pub fn place_fleet(board: &mut Board) {
    for (x, y, len) in FLEET {
        board.place_ship(x, y, len, Orientation::Horizontal).unwrap();
    }
}

pub fn fleet_board() -> Board {
    let mut board = Board::new();
    place_fleet(&mut board);
    board
}

/// Every cell the fixture fleet covers, ship by ship.
pub fn fleet_cells() -> Vec<(i32, i32)> {
    FLEET
        .iter()
        .flat_map(|&(x, y, len)| (0..len as i32).map(move |k| (x + k, y)))
        .collect()
}

/// Log in `a` and `b`, have `a` create `game`, `b` join it and both place
/// the fixture fleet and declare ready. The battle is then at `a`'s turn.
pub fn start_match(dispatcher: &mut Dispatcher, a: &str, b: &str, game: &str) {
    assert!(dispatcher.dispatch(Message::login(a)).ok);
    assert!(dispatcher.dispatch(Message::login(b)).ok);
    assert!(dispatcher.dispatch(Message::create_match(a, game)).ok);
    assert!(dispatcher.dispatch(Message::join_match(b, game)).ok);
    for player in [a, b] {
        for (x, y, len) in FLEET {
            let reply = dispatcher.dispatch(Message::place_ship(
                player,
                game,
                x,
                y,
                len,
                Orientation::Horizontal,
            ));
            assert!(reply.ok, "{}", reply.text);
        }
        assert!(dispatcher.dispatch(Message::ships_ready(player, game)).ok);
    }
}
