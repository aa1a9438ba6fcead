use std::collections::HashMap;

use rand::Rng;

use super::state::{Board, Coord, Move, Score, Shift, Tile};

/// Slide/merge tiles in the given direction. No randomness.
///
/// The algorithm is only written for the leftward direction; the other
/// three are reduced to it by relabeling coordinates before and after.
pub fn shift(board: &Board, direction: Move) -> Shift {
    let mut next = board.clone();
    let (score_delta, slid) = match direction {
        Move::Left => shift_left(&mut next),
        Move::Up => {
            transpose(&mut next);
            let outcome = shift_left(&mut next);
            transpose(&mut next);
            outcome
        }
        Move::Right => {
            transpose(&mut next);
            reflect(&mut next);
            transpose(&mut next);
            let outcome = shift_left(&mut next);
            transpose(&mut next);
            reflect(&mut next);
            transpose(&mut next);
            outcome
        }
        Move::Down => {
            reflect(&mut next);
            transpose(&mut next);
            let outcome = shift_left(&mut next);
            transpose(&mut next);
            reflect(&mut next);
            outcome
        }
    };
    Shift {
        board: next,
        score_delta,
        slid,
    }
}

fn shift_left(board: &mut Board) -> (Score, bool) {
    let score_delta = merge_left(board);
    let slid = pack_left(board);
    (score_delta, slid)
}

/// Merge pass: each occupied cell looks at the nearest occupied cell to its
/// right, merging only if the values are equal. Returns the score delta.
fn merge_left(board: &mut Board) -> Score {
    let size = board.size;
    let mut delta: Score = 0;
    for row in 0..size {
        for col in 0..size {
            let here = Coord::new(col, row);
            let value = match board.tiles.get(&here) {
                Some(&value) => value,
                None => continue,
            };
            for probe in col + 1..size {
                let right = Coord::new(probe, row);
                let other = match board.tiles.get(&right) {
                    Some(&other) => other,
                    None => continue,
                };
                if other == value {
                    board.tiles.insert(here, value * 2);
                    board.tiles.remove(&right);
                    delta += Score::from(value) * 2;
                }
                // the nearest occupied cell decides; never merge past a mismatch
                break;
            }
        }
    }
    delta
}

/// Compaction pass: every empty cell pulls the nearest tile from its right.
/// Returns true if anything slid.
fn pack_left(board: &mut Board) -> bool {
    let size = board.size;
    let mut slid = false;
    for row in 0..size {
        for col in 0..size {
            let target = Coord::new(col, row);
            if board.tiles.contains_key(&target) {
                continue;
            }
            for probe in col + 1..size {
                let source = Coord::new(probe, row);
                if let Some(value) = board.tiles.remove(&source) {
                    board.tiles.insert(target, value);
                    slid = true;
                    break;
                }
            }
        }
    }
    slid
}

/// Relabel every cell across the main diagonal: `(x, y)` becomes `(y, x)`.
pub(crate) fn transpose(board: &mut Board) {
    let relabeled: HashMap<Coord, Tile> = board
        .tiles
        .drain()
        .map(|(at, value)| (Coord::new(at.y, at.x), value))
        .collect();
    board.tiles = relabeled;
}

/// Relabel every cell vertically: row `y` becomes `size - y - 1`.
pub(crate) fn reflect(board: &mut Board) {
    let size = board.size;
    let relabeled: HashMap<Coord, Tile> = board
        .tiles
        .drain()
        .map(|(at, value)| (Coord::new(at.x, size - at.y - 1), value))
        .collect();
    board.tiles = relabeled;
}

/// True iff no free cell remains and no cell has an equal right or bottom
/// neighbor (neighbors outside the grid never match).
pub fn is_game_over(board: &Board) -> bool {
    if !free_fields(board).is_empty() {
        return false;
    }
    let size = board.size;
    for row in 0..size {
        for col in 0..size {
            let here = board.get(Coord::new(col, row));
            let right = board.get(Coord::new(col + 1, row));
            let below = board.get(Coord::new(col, row + 1));
            if here == right || here == below {
                return false;
            }
        }
    }
    true
}

/// All coordinates not present as keys, scanned row-major.
pub fn free_fields(board: &Board) -> Vec<Coord> {
    let mut free = Vec::new();
    for row in 0..board.size {
        for col in 0..board.size {
            let at = Coord::new(col, row);
            if !board.tiles.contains_key(&at) {
                free.push(at);
            }
        }
    }
    free
}

/// Insert a random 2 (90%) or 4 (10%) tile into a uniformly chosen free
/// cell. No-op on a full board.
pub fn spawn_random_tile<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) {
    let free = free_fields(board);
    if free.is_empty() {
        return;
    }
    let at = free[rng.gen_range(0..free.len())];
    let value = random_tile_value(rng);
    board.tiles.insert(at, value);
}

pub(crate) fn random_tile_value<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    if rng.gen_range(0..10) < 9 { 2 } else { 4 }
}
