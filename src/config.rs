//! Game-wide constants and fleet configuration.

/// Width and height of a board.
pub const BOARD_SIZE: usize = 10;

/// Longest ship in the fleet.
pub const MAX_SHIP_LENGTH: usize = 4;

/// Number of ships on a complete board.
pub const FLEET_SIZE: usize = 10;

/// Default bound on the number of matches a server hosts over its lifetime.
pub const MAX_MATCHES: usize = 20;

/// Default bound on the number of registered players.
pub const MAX_PLAYERS: usize = 100;

/// Longest accepted player or match name, in characters.
pub const MAX_NAME_LEN: usize = 63;

/// Segment name used when none is configured.
pub const DEFAULT_SEGMENT_NAME: &str = "sea_battle_mmf";

/// Stats file used when none is configured.
pub const DEFAULT_STATS_FILE: &str = "player_stats.dat";

/// Definition of a ship class in the fleet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShipClass {
    name: &'static str,
    length: usize,
    count: usize,
}

impl ShipClass {
    pub const fn new(name: &'static str, length: usize, count: usize) -> Self {
        Self {
            name,
            length,
            count,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn length(&self) -> usize {
        self.length
    }

    /// How many ships of this class a complete board carries.
    pub const fn count(&self) -> usize {
        self.count
    }
}

/// The fleet every board must field, longest ships first.
pub const FLEET: [ShipClass; 4] = [
    ShipClass::new("Battleship", 4, 1),
    ShipClass::new("Cruiser", 3, 2),
    ShipClass::new("Destroyer", 2, 3),
    ShipClass::new("Submarine", 1, 4),
];

/// Look up the ship class for a given length.
pub fn ship_class(length: usize) -> Option<ShipClass> {
    FLEET.iter().copied().find(|class| class.length == length)
}

/// Required number of ships of `length`; zero for lengths outside the fleet.
pub fn quota(length: usize) -> usize {
    ship_class(length).map_or(0, |class| class.count)
}

/// Lengths of every ship in the fleet, longest first.
pub fn fleet_lengths() -> [usize; FLEET_SIZE] {
    let mut lengths = [0usize; FLEET_SIZE];
    let mut i = 0;
    for class in FLEET.iter() {
        for _ in 0..class.count {
            lengths[i] = class.length;
            i += 1;
        }
    }
    lengths
}

/// True if `name` is an acceptable player or match name.
pub fn valid_name(name: &str) -> bool {
    let len = name.chars().count();
    len >= 1 && len <= MAX_NAME_LEN
}
