//! Core rules and persistence plumbing for a 2048-style sliding-tile game
//! on 3x3 through 5x5 boards.
//!
//! [`engine`] holds the pure board mechanics (shift, spawn, game-over),
//! [`session`] runs one game per supported size behind a single active
//! selector, [`snapshot`] is the text codec stores speak, and [`store`]
//! defines the persistence seam plus an in-memory implementation.
//!
//! All randomness is injected; callers pick the [`rand::Rng`].
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use twenty48_core::engine::Move;
//! use twenty48_core::session::GameSession;
//! use twenty48_core::store::MemoryStore;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut session = GameSession::load(MemoryStore::new(), &mut rng).unwrap();
//! assert_eq!(session.board().tile_count(), 2);
//!
//! session.make_move(Move::Left, &mut rng).unwrap();
//! assert!(session.highscore() >= session.score());
//! ```

pub mod engine;
pub mod session;
pub mod snapshot;
pub mod store;
