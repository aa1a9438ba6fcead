//! The running game: one board per supported size, an active-size selector,
//! and the save choreography around them.

use std::collections::HashMap;

use anyhow::{Context, Result};
use log::warn;
use rand::Rng;

use crate::engine::{Board, Move, BOARD_SIZES, DEFAULT_BOARD_SIZE};
use crate::snapshot::{self, Snapshot};
use crate::store::StateStore;

/// Live state for one board size.
#[derive(Clone, Debug)]
struct SizeState {
    board: Board,
    score: u64,
    highscore: u64,
    game_over: bool,
}

/// A multi-size game session bound to a store.
///
/// Every supported size keeps its own `(board, score, high score)` triple
/// loaded, so switching sizes never loses progress. Mutations that change
/// anything persist the full state synchronously before returning, which
/// keeps the stored state in mutation order.
pub struct GameSession<S> {
    store: S,
    active: u8,
    states: HashMap<u8, SizeState>,
}

impl<S: StateStore> GameSession<S> {
    /// Open a session, loading every supported size from the store.
    ///
    /// A size without a stored board, or whose records fail to decode,
    /// starts fresh with two spawned tiles (the corrupt data is discarded
    /// with a warning). Scores and high scores load independently and
    /// default to 0; game-over flags are recomputed, never loaded. If any
    /// size had to start fresh, the completed state is saved back once so
    /// the store matches what the player sees.
    ///
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use twenty48_core::session::GameSession;
    /// use twenty48_core::store::MemoryStore;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let session = GameSession::load(MemoryStore::new(), &mut rng).unwrap();
    /// assert_eq!(session.board_size(), 4);
    /// assert_eq!(session.board().tile_count(), 2);
    /// ```
    pub fn load<R: Rng + ?Sized>(store: S, rng: &mut R) -> Result<Self> {
        let mut states = HashMap::new();
        let mut needs_save = false;
        for size in BOARD_SIZES {
            let board = match store.load_board(size)? {
                Some(records) => match snapshot::decode_board(size, &records) {
                    Ok(board) => Some(board),
                    Err(err) => {
                        warn!("discarding stored {size}x{size} board: {err:#}");
                        None
                    }
                },
                None => None,
            };
            let board = match board {
                Some(board) => board,
                None => {
                    needs_save = true;
                    fresh_board(size, rng)
                }
            };
            let score = store.load_score(size)?.unwrap_or(0);
            let highscore = store.load_highscore(size)?.unwrap_or(0);
            let game_over = board.is_game_over();
            states.insert(
                size,
                SizeState {
                    board,
                    score,
                    highscore,
                    game_over,
                },
            );
        }

        let active = match store.load_board_size()? {
            Some(size) if BOARD_SIZES.contains(&size) => size,
            Some(size) => {
                warn!("stored board size {size} is unsupported, using {DEFAULT_BOARD_SIZE}");
                DEFAULT_BOARD_SIZE
            }
            None => DEFAULT_BOARD_SIZE,
        };

        let mut session = GameSession {
            store,
            active,
            states,
        };
        if needs_save {
            session.save()?;
        }
        Ok(session)
    }

    /// The currently selected board size.
    pub fn board_size(&self) -> u8 {
        self.active
    }

    /// The active board, for drawing.
    pub fn board(&self) -> &Board {
        &self.state().board
    }

    pub fn score(&self) -> u64 {
        self.state().score
    }

    pub fn highscore(&self) -> u64 {
        self.state().highscore
    }

    pub fn is_game_over(&self) -> bool {
        self.state().game_over
    }

    /// The board kept for `size`, whether or not it is active.
    pub fn board_for(&self, size: u8) -> &Board {
        &self.state_for(size).board
    }

    pub fn score_for(&self, size: u8) -> u64 {
        self.state_for(size).score
    }

    pub fn highscore_for(&self, size: u8) -> u64 {
        self.state_for(size).highscore
    }

    pub fn game_over_for(&self, size: u8) -> bool {
        self.state_for(size).game_over
    }

    /// The store this session saves through.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply one directional move to the active board.
    ///
    /// On an effective move (any merge or slide) this adds the merge delta
    /// to the score, raises the high score if passed, spawns one random
    /// tile, refreshes the game-over flag, and saves. A move that changes
    /// nothing does none of that and returns `false`.
    pub fn make_move<R: Rng + ?Sized>(&mut self, direction: Move, rng: &mut R) -> Result<bool> {
        let state = self.state_mut();
        let shift = state.board.shift(direction);
        if !shift.changed() {
            return Ok(false);
        }
        state.board = shift.board;
        state.score += shift.score_delta;
        if state.score > state.highscore {
            state.highscore = state.score;
        }
        state.board.spawn_random_tile(rng);
        state.game_over = state.board.is_game_over();
        self.save()?;
        Ok(true)
    }

    /// Start the active size over: score to 0, fresh board with two tiles.
    /// The high score survives.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let size = self.active;
        let state = self.state_mut();
        state.board = fresh_board(size, rng);
        state.score = 0;
        state.game_over = false;
        self.save()
    }

    /// Switch which size is live. Every other size keeps its state, so
    /// switching back resumes that game. Persists the new selection.
    pub fn select_board_size(&mut self, size: u8) -> Result<()> {
        assert!(BOARD_SIZES.contains(&size), "unsupported board size {size}");
        if size == self.active {
            return Ok(());
        }
        self.active = size;
        self.save()
    }

    /// Serialize everything the store persists.
    pub fn snapshot(&self) -> Snapshot {
        let mut boards = Vec::new();
        let mut scores = Vec::new();
        let mut highscores = Vec::new();
        for size in BOARD_SIZES {
            let state = self.states.get(&size).expect("every supported size is loaded");
            boards.push((size, snapshot::encode_board(&state.board)));
            scores.push((size, state.score));
            highscores.push((size, state.highscore));
        }
        Snapshot {
            board_size: self.active,
            boards,
            scores,
            highscores,
        }
    }

    fn state(&self) -> &SizeState {
        self.states.get(&self.active).expect("every supported size is loaded")
    }

    fn state_mut(&mut self) -> &mut SizeState {
        self.states
            .get_mut(&self.active)
            .expect("every supported size is loaded")
    }

    fn state_for(&self, size: u8) -> &SizeState {
        assert!(BOARD_SIZES.contains(&size), "unsupported board size {size}");
        self.states.get(&size).expect("every supported size is loaded")
    }

    fn save(&mut self) -> Result<()> {
        let snapshot = self.snapshot();
        self.store.save(&snapshot).context("failed to save game state")
    }
}

fn fresh_board<R: Rng + ?Sized>(size: u8, rng: &mut R) -> Board {
    let mut board = Board::empty(size);
    board.spawn_random_tile(rng);
    board.spawn_random_tile(rng);
    board
}
