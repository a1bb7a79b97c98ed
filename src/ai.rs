// Probability-based targeting against an opponent board.
// Works on fixed-size arrays only, so it stays usable without std.

use crate::{
    common::CellState,
    config::{fleet_lengths, BOARD_SIZE, FLEET_SIZE},
    ship::{Grid, Orientation},
};
use rand::Rng;

const GRID_SIZE: usize = BOARD_SIZE;

/// Placements covering more unresolved hits get exponentially more weight so
/// that cells next to a wounded ship dominate the distribution.
const HIT_BIAS: f64 = 10.0;

/// What a shooter knows about the opponent's board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TargetView {
    /// Hit cells of ships that are still afloat.
    pub hits: Grid,
    pub misses: Grid,
    /// Cells of sunk ships.
    pub destroyed: Grid,
}

impl TargetView {
    /// Build a view from a row-major list of cells with ships hidden.
    pub fn from_cells(cells: &[CellState]) -> Self {
        let mut view = Self::default();
        for (idx, cell) in cells.iter().enumerate().take(GRID_SIZE * GRID_SIZE) {
            let (x, y) = (idx % GRID_SIZE, idx / GRID_SIZE);
            let grid = match cell {
                CellState::Hit => &mut view.hits,
                CellState::Miss => &mut view.misses,
                CellState::Destroyed => &mut view.destroyed,
                CellState::Empty | CellState::Ship => continue,
            };
            let _ = grid.set(x, y);
        }
        view
    }

    pub fn is_targeted(&self, x: usize, y: usize) -> bool {
        (self.hits | self.misses | self.destroyed).contains(x, y)
    }

    /// Cells that cannot hold an unsunk ship: misses, sunk ships, and the
    /// ring around every sunk ship.
    pub fn blocked(&self) -> Grid {
        self.misses | self.destroyed.dilate()
    }

    /// Lengths of the ships still afloat, zero-padded.
    ///
    /// Ships never touch, so each connected group of destroyed cells is
    /// exactly one sunk ship and its size is that ship's length.
    pub fn remaining_lengths(&self) -> [usize; FLEET_SIZE] {
        let mut remaining = fleet_lengths();
        let mut seen = Grid::new();
        for (x, y) in self.destroyed.iter_set_bits() {
            if seen.contains(x, y) {
                continue;
            }
            let size = self.flood(x, y, &mut seen);
            if let Some(slot) = remaining.iter_mut().find(|len| **len == size) {
                *slot = 0;
            }
        }
        remaining
    }

    fn flood(&self, x: usize, y: usize, seen: &mut Grid) -> usize {
        let mut stack = [(0usize, 0usize); GRID_SIZE * GRID_SIZE];
        let mut top = 0;
        let mut size = 0;
        stack[top] = (x, y);
        top += 1;
        let _ = seen.set(x, y);
        while top > 0 {
            top -= 1;
            let (cx, cy) = stack[top];
            size += 1;
            let neighbours = [
                (cx.wrapping_sub(1), cy),
                (cx + 1, cy),
                (cx, cy.wrapping_sub(1)),
                (cx, cy + 1),
            ];
            for (nx, ny) in neighbours {
                if self.destroyed.contains(nx, ny) && !seen.contains(nx, ny) {
                    let _ = seen.set(nx, ny);
                    stack[top] = (nx, ny);
                    top += 1;
                }
            }
        }
        size
    }
}

/// Relative likelihood, per cell, that an unsunk ship segment sits there.
/// Targeted cells score zero; rows are `y`, columns `x`.
pub fn calc_pdf(view: &TargetView) -> [[f64; GRID_SIZE]; GRID_SIZE] {
    let mut matrix = [[0.0f64; GRID_SIZE]; GRID_SIZE];
    let blocked = view.blocked();

    for len in view.remaining_lengths() {
        if len == 0 {
            continue;
        }
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            let (max_x, max_y) = match orientation {
                Orientation::Horizontal => (GRID_SIZE - len + 1, GRID_SIZE),
                Orientation::Vertical => (GRID_SIZE, GRID_SIZE - len + 1),
            };
            for y in 0..max_y {
                for x in 0..max_x {
                    let cells = (0..len).map(|k| match orientation {
                        Orientation::Horizontal => (x + k, y),
                        Orientation::Vertical => (x, y + k),
                    });
                    if cells.clone().any(|(cx, cy)| blocked.contains(cx, cy)) {
                        continue;
                    }
                    let n_hits = cells
                        .clone()
                        .filter(|&(cx, cy)| view.hits.contains(cx, cy))
                        .count();
                    let weight = libm::pow(HIT_BIAS, n_hits as f64);
                    for (cx, cy) in cells {
                        if !view.is_targeted(cx, cy) {
                            matrix[cy][cx] += weight;
                        }
                    }
                }
            }
        }
    }

    normalize(matrix)
}

fn normalize(mut matrix: [[f64; GRID_SIZE]; GRID_SIZE]) -> [[f64; GRID_SIZE]; GRID_SIZE] {
    let total: f64 = matrix.iter().flatten().sum();
    if total == 0.0 {
        return matrix;
    }
    for row in matrix.iter_mut() {
        for v in row.iter_mut() {
            *v /= total;
        }
    }
    matrix
}

/// Pick one of the most likely cells, breaking ties at random. Falls back to
/// any untargeted cell when the distribution is empty.
pub fn best_target<R: Rng + ?Sized>(
    pdf: &[[f64; GRID_SIZE]; GRID_SIZE],
    view: &TargetView,
    rng: &mut R,
) -> (usize, usize) {
    let best = pdf.iter().flatten().copied().fold(0.0f64, f64::max);
    let mut candidates = [(0usize, 0usize); GRID_SIZE * GRID_SIZE];
    let mut count = 0;
    for y in 0..GRID_SIZE {
        for x in 0..GRID_SIZE {
            let eligible = if best > 0.0 {
                pdf[y][x] >= best
            } else {
                !view.is_targeted(x, y)
            };
            if eligible {
                candidates[count] = (x, y);
                count += 1;
            }
        }
    }
    if count == 0 {
        return (GRID_SIZE - 1, GRID_SIZE - 1);
    }
    candidates[rng.random_range(0..count)]
}

/// Calculate the distribution and choose a target in one step.
pub fn choose_target<R: Rng + ?Sized>(view: &TargetView, rng: &mut R) -> (usize, usize) {
    let pdf = calc_pdf(view);
    best_target(&pdf, view, rng)
}
