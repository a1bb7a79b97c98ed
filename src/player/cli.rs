#![cfg(feature = "std")]

use std::io::{self, BufRead, Write};

use crate::{
    ai::{self, TargetView},
    board::Board,
    common::{BoardError, ShotOutcome},
    config::{BOARD_SIZE, FLEET, FLEET_SIZE},
    protocol::BoardSnapshot,
    ship::Orientation,
    ui,
};
use rand::rngs::SmallRng;

use super::Player;

/// Human player reading placements and targets from standard input.
#[derive(Debug, Default)]
pub struct CliPlayer;

impl CliPlayer {
    pub fn new() -> Self {
        Self
    }
}

/// Read one trimmed line. `None` on end of input or a read error.
pub fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

/// Parse `"x y"` with both coordinates in `0..BOARD_SIZE`.
pub fn parse_target(input: &str) -> Result<(usize, usize), String> {
    let mut parts = input.split_whitespace();
    let (Some(x), Some(y)) = (parts.next(), parts.next()) else {
        return Err("enter two numbers: x y".to_string());
    };
    let x: usize = x.parse().map_err(|_| format!("'{}' is not a number", x))?;
    let y: usize = y.parse().map_err(|_| format!("'{}' is not a number", y))?;
    if x >= BOARD_SIZE || y >= BOARD_SIZE {
        return Err(format!("coordinates must be between 0 and {}", BOARD_SIZE - 1));
    }
    Ok((x, y))
}

/// Parse `"x y [h|v]"`; orientation defaults to horizontal.
pub fn parse_placement(input: &str) -> Result<(i32, i32, Orientation), String> {
    let (x, y) = parse_target(input)?;
    let orientation = match input.split_whitespace().nth(2) {
        None => Orientation::Horizontal,
        Some(o) if o.eq_ignore_ascii_case("h") => Orientation::Horizontal,
        Some(o) if o.eq_ignore_ascii_case("v") => Orientation::Vertical,
        Some(o) => return Err(format!("invalid orientation '{}', use h or v", o)),
    };
    Ok((x as i32, y as i32, orientation))
}

impl Player for CliPlayer {
    fn place_fleet(&mut self, rng: &mut SmallRng, board: &mut Board) -> Result<(), BoardError> {
        println!("\nShip placement: enter 'x y h' or 'x y v', ENTER for random, 'auto' for the rest.");
        let mut number = 0;
        for class in FLEET.iter() {
            for _ in 0..class.count() {
                number += 1;
                loop {
                    print!("\n{}", ui::render_board(&board.snapshot(false)));
                    let prompt = format!(
                        "Ship {}/{}: {} (length {}) > ",
                        number,
                        FLEET_SIZE,
                        class.name(),
                        class.length()
                    );
                    let line = read_line(&prompt).unwrap_or_else(|| "auto".to_string());
                    if line.eq_ignore_ascii_case("auto") {
                        return board.random_fleet(rng);
                    }
                    let (x, y, orientation) = if line.is_empty() {
                        board.random_placement(rng, class.length())?
                    } else {
                        match parse_placement(&line) {
                            Ok(placement) => placement,
                            Err(e) => {
                                println!("Error: {}", e);
                                continue;
                            }
                        }
                    };
                    match board.place_ship(x, y, class.length(), orientation) {
                        Ok(()) => break,
                        Err(e) => println!("Cannot place ship there: {}", e),
                    }
                }
            }
        }
        println!("\nAll ships placed.");
        Ok(())
    }

    fn select_target(&mut self, rng: &mut SmallRng, view: &TargetView) -> (usize, usize) {
        let (sx, sy) = ai::choose_target(view, rng);
        loop {
            let prompt = format!("Fire at 'x y' [suggested {} {}] > ", sx, sy);
            let Some(line) = read_line(&prompt) else {
                return (sx, sy);
            };
            if line.is_empty() {
                return (sx, sy);
            }
            match parse_target(&line) {
                Ok((x, y)) if view.is_targeted(x, y) => {
                    println!("You already fired at {} {}.", x, y)
                }
                Ok(target) => return target,
                Err(e) => println!("Error: {}", e),
            }
        }
    }

    fn handle_shot_result(&mut self, target: (usize, usize), outcome: ShotOutcome) {
        let text = match outcome {
            ShotOutcome::Miss => "Miss.",
            ShotOutcome::Hit => "Hit!",
            ShotOutcome::ShipDestroyed => "Ship destroyed!",
            ShotOutcome::Victory => "Victory! All enemy ships destroyed!",
        };
        println!("Shot at {} {}: {}", target.0, target.1, text);
    }

    fn show_boards(&mut self, snapshot: &BoardSnapshot) {
        println!("\n{}", ui::render_side_by_side(&snapshot.own, &snapshot.target));
    }

    fn notify(&mut self, text: &str) {
        println!("{}", text);
    }
}
