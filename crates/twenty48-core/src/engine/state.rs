use rand::Rng;
use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;

use super::ops;
use serde::{Deserialize, Serialize};

// Internal type aliases for the sparse representation
pub(crate) type Tile = u32;
pub(crate) type Score = u64;

/// Board sizes the engine keeps live state for.
pub const BOARD_SIZES: RangeInclusive<u8> = 3..=5;

/// Size selected when no persisted choice exists.
pub const DEFAULT_BOARD_SIZE: u8 = 4;

/// A grid position: column `x`, row `y`, both 0-indexed from the top-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

impl Coord {
    #[inline]
    pub const fn new(x: u8, y: u8) -> Self {
        Coord { x, y }
    }
}

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All four directions, in a fixed order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];
}

/// Sparse 2048 board: occupied cells keyed by coordinate.
///
/// Keys present in the map are tiles (powers of two >= 2); absent keys are
/// free cells. One representation serves every supported size; the board
/// carries its own edge length.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    pub(crate) size: u8,
    pub(crate) tiles: HashMap<Coord, Tile>,
}

impl Board {
    /// Construct an empty board of the given size.
    ///
    /// ```
    /// use twenty48_core::engine::Board;
    /// let board = Board::empty(4);
    /// assert_eq!(board.free_fields().len(), 16);
    /// ```
    pub fn empty(size: u8) -> Self {
        assert!(BOARD_SIZES.contains(&size), "unsupported board size {size}");
        Board {
            size,
            tiles: HashMap::new(),
        }
    }

    /// Build a board from explicit tiles. Mostly useful in tests and tools.
    pub fn from_tiles<I>(size: u8, tiles: I) -> Self
    where
        I: IntoIterator<Item = (Coord, Tile)>,
    {
        let mut board = Board::empty(size);
        for (at, value) in tiles {
            board.set(at, value);
        }
        board
    }

    /// Edge length of the grid.
    #[inline]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// The tile value at `at`, or `None` for a free cell.
    #[inline]
    pub fn get(&self, at: Coord) -> Option<Tile> {
        self.tiles.get(&at).copied()
    }

    /// Place a tile, replacing anything already in the cell.
    pub fn set(&mut self, at: Coord, value: Tile) {
        assert!(
            at.x < self.size && at.y < self.size,
            "coordinate ({}, {}) outside the {size}x{size} grid",
            at.x,
            at.y,
            size = self.size
        );
        assert!(
            value >= 2 && value.is_power_of_two(),
            "tile value {value} is not a power of two >= 2"
        );
        self.tiles.insert(at, value);
    }

    /// Number of occupied cells.
    #[inline]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Iterate over occupied cells, for drawing or serializing.
    pub fn tiles(&self) -> impl Iterator<Item = (Coord, Tile)> + '_ {
        self.tiles.iter().map(|(&at, &value)| (at, value))
    }

    /// Return the outcome of sliding/merging tiles in `direction` (no random spawn).
    ///
    /// ```
    /// use twenty48_core::engine::{Board, Coord, Move};
    ///
    /// let board = Board::from_tiles(4, [(Coord::new(0, 0), 2), (Coord::new(3, 0), 2)]);
    /// let shift = board.shift(Move::Left);
    /// assert_eq!(shift.board.get(Coord::new(0, 0)), Some(4));
    /// assert_eq!(shift.score_delta, 4);
    /// ```
    #[inline]
    pub fn shift(&self, direction: Move) -> Shift {
        ops::shift(self, direction)
    }

    /// Insert a random 2 (90%) or 4 (10%) tile into a random free cell, using the provided RNG.
    /// Does nothing on a full board; callers check for free cells first.
    ///
    /// Deterministic example using a seeded RNG:
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use twenty48_core::engine::Board;
    ///
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let mut board = Board::empty(4);
    /// board.spawn_random_tile(&mut rng);
    /// board.spawn_random_tile(&mut rng);
    /// assert_eq!(board.tile_count(), 2);
    /// ```
    #[inline]
    pub fn spawn_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        ops::spawn_random_tile(self, rng)
    }

    /// True when no free cell remains and no equal tiles touch.
    ///
    /// ```
    /// use twenty48_core::engine::Board;
    /// assert!(!Board::empty(3).is_game_over());
    /// ```
    #[inline]
    pub fn is_game_over(&self) -> bool {
        ops::is_game_over(self)
    }

    /// All free cells, in row-major order.
    #[inline]
    pub fn free_fields(&self) -> Vec<Coord> {
        ops::free_fields(self)
    }

    /// The highest tile value on the board, or 0 when empty.
    pub fn highest_tile(&self) -> Tile {
        self.tiles.values().copied().max().unwrap_or(0)
    }
}

/// Outcome of sliding/merging in one direction, before any random spawn.
#[derive(Clone, Debug)]
pub struct Shift {
    /// The board after the merge and compaction passes.
    pub board: Board,
    /// Points earned by merges: the sum of the doubled values produced.
    pub score_delta: Score,
    /// True if the compaction pass relocated any tile.
    pub slid: bool,
}

impl Shift {
    /// True if the move changed the board at all (a merge or a slide).
    #[inline]
    pub fn changed(&self) -> bool {
        self.score_delta > 0 || self.slid
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cells: Vec<(Coord, Tile)> = self.tiles().collect();
        cells.sort();
        f.debug_struct("Board")
            .field("size", &self.size)
            .field("tiles", &cells)
            .finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size {
            if y > 0 {
                writeln!(f, "{}", "-".repeat(self.size as usize * 8 - 1))?;
            }
            for x in 0..self.size {
                if x > 0 {
                    write!(f, "|")?;
                }
                match self.get(Coord::new(x, y)) {
                    Some(value) => write!(f, "{value:^7}")?,
                    None => write!(f, "       ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
