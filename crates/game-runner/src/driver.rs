use anyhow::Result;
use log::debug;
use rand::Rng;
use twenty48_core::engine::Move;
use twenty48_core::session::GameSession;
use twenty48_core::store::StateStore;

/// Summary for a completed random-play run.
#[derive(Debug, Clone, Copy)]
pub struct PlayReport {
    pub effective_moves: u64,
    pub score: u64,
    pub highscore: u64,
    pub highest_tile: u32,
    pub game_over: bool,
}

/// Drive the active board with uniformly random moves until the game is
/// over, or until `max_moves` effective moves have been applied. Moves
/// that change nothing are retried with a new random direction and do
/// not count against the cap.
pub fn play_random<S, R>(
    session: &mut GameSession<S>,
    rng: &mut R,
    max_moves: Option<u64>,
) -> Result<PlayReport>
where
    S: StateStore,
    R: Rng + ?Sized,
{
    let mut effective = 0u64;
    while !session.is_game_over() {
        if max_moves.is_some_and(|cap| effective >= cap) {
            break;
        }
        let direction = Move::ALL[rng.gen_range(0..Move::ALL.len())];
        if session.make_move(direction, rng)? {
            effective += 1;
            if effective % 100 == 0 {
                debug!("{} effective moves, score {}", effective, session.score());
            }
        }
    }
    Ok(PlayReport {
        effective_moves: effective,
        score: session.score(),
        highscore: session.highscore(),
        highest_tile: session.board().highest_tile(),
        game_over: session.is_game_over(),
    })
}
