//! Engine module: sparse variable-size 2048 board and the shift/merge ops.
//!
//! - `Board` owns the tile map for one grid size and exposes safe methods.
//! - Free functions mirror the methods when convenient (e.g., `shift`).
//! - The algorithms live in `ops`, written once for the leftward direction
//!   and reused for the other three via coordinate relabelings.

mod ops;
pub mod state;

pub use state::{Board, Coord, Move, Shift, BOARD_SIZES, DEFAULT_BOARD_SIZE};

pub use ops::{free_fields, is_game_over, shift, spawn_random_tile};
