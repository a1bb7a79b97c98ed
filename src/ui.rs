//! Text rendering of boards.

use crate::common::CellState;
use crate::config::BOARD_SIZE;
use alloc::string::String;
use core::fmt::Write;

const GAP: &str = "     ";

pub fn cell_symbol(cell: CellState) -> char {
    match cell {
        CellState::Empty => '.',
        CellState::Ship => 'S',
        CellState::Miss => 'o',
        CellState::Hit => 'X',
        CellState::Destroyed => '#',
    }
}

fn header(out: &mut String) {
    out.push_str("  ");
    for x in 0..BOARD_SIZE {
        let _ = write!(out, " {}", x);
    }
}

fn row(out: &mut String, cells: &[CellState], y: usize) {
    let _ = write!(out, "{:2}", y);
    for x in 0..BOARD_SIZE {
        let cell = cells.get(y * BOARD_SIZE + x).copied().unwrap_or(CellState::Empty);
        let _ = write!(out, " {}", cell_symbol(cell));
    }
}

/// Render one row-major board with column and row labels.
pub fn render_board(cells: &[CellState]) -> String {
    let mut out = String::new();
    header(&mut out);
    out.push('\n');
    for y in 0..BOARD_SIZE {
        row(&mut out, cells, y);
        out.push('\n');
    }
    out
}

/// Render the player's own board and the target board next to each other.
pub fn render_side_by_side(own: &[CellState], target: &[CellState]) -> String {
    let mut out = String::new();
    let width = 2 + BOARD_SIZE * 2;
    let _ = writeln!(out, "{:<width$}{}{}", "Your fleet", GAP, "Enemy waters", width = width);
    header(&mut out);
    out.push_str(GAP);
    header(&mut out);
    out.push('\n');
    for y in 0..BOARD_SIZE {
        row(&mut out, own, y);
        out.push_str(GAP);
        row(&mut out, target, y);
        out.push('\n');
    }
    out.push_str("Legend: S ship  X hit  # destroyed  o miss  . water\n");
    out
}
