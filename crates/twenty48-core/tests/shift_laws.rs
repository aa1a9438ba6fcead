use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use twenty48_core::engine::{Board, Move, BOARD_SIZES};

fn random_board<R: Rng + ?Sized>(size: u8, spawns: usize, rng: &mut R) -> Board {
    let mut board = Board::empty(size);
    for _ in 0..spawns {
        board.spawn_random_tile(rng);
    }
    board
}

/// A board whose tiles are pairwise distinct powers of two, so no shift
/// can ever merge anything.
fn distinct_board<R: Rng + ?Sized>(size: u8, tiles: usize, rng: &mut R) -> Board {
    let mut board = Board::empty(size);
    for i in 0..tiles {
        let mut free = board.free_fields();
        let at = free.remove(rng.gen_range(0..free.len()));
        board.set(at, 1 << (i + 1));
    }
    board
}

fn tile_sum(board: &Board) -> u64 {
    board.tiles().map(|(_, value)| u64::from(value)).sum()
}

#[test]
fn shift_conserves_the_tile_sum() {
    for seed in 0..8 {
        let mut rng = StdRng::seed_from_u64(seed);
        for size in BOARD_SIZES {
            let board = random_board(size, usize::from(size) * 2, &mut rng);
            for direction in Move::ALL {
                let shift = board.shift(direction);
                assert_eq!(tile_sum(&shift.board), tile_sum(&board));
                // every merge doubles a tile worth at least 2
                assert_eq!(shift.score_delta % 4, 0);
            }
        }
    }
}

#[test]
fn merges_are_the_only_way_to_lose_tiles() {
    for seed in 0..8 {
        let mut rng = StdRng::seed_from_u64(seed);
        for size in BOARD_SIZES {
            let board = random_board(size, usize::from(size) * 2, &mut rng);
            for direction in Move::ALL {
                let shift = board.shift(direction);
                if shift.score_delta == 0 {
                    assert_eq!(shift.board.tile_count(), board.tile_count());
                } else {
                    assert!(shift.board.tile_count() < board.tile_count());
                }
            }
        }
    }
}

#[test]
fn packing_distinct_tiles_never_scores() {
    for seed in 0..8 {
        let mut rng = StdRng::seed_from_u64(seed);
        for size in BOARD_SIZES {
            let board = distinct_board(size, usize::from(size) + 2, &mut rng);
            for direction in Move::ALL {
                let shift = board.shift(direction);
                assert_eq!(shift.score_delta, 0);
                assert_eq!(shift.board.tile_count(), board.tile_count());
                // once packed against an edge, the same shift is a no-op
                let again = shift.board.shift(direction);
                assert!(!again.changed());
                assert_eq!(again.board, shift.board);
            }
            // without merges, packing up first cannot change where packing
            // down puts things
            let up_then_down = board.shift(Move::Up).board.shift(Move::Down);
            assert_eq!(up_then_down.board, board.shift(Move::Down).board);
        }
    }
}

#[test]
fn free_fields_complement_the_occupied_cells() {
    for seed in 0..4 {
        let mut rng = StdRng::seed_from_u64(seed);
        for size in BOARD_SIZES {
            let board = random_board(size, usize::from(size) * 3, &mut rng);
            let free = board.free_fields();
            let cells = usize::from(size) * usize::from(size);
            assert_eq!(free.len() + board.tile_count(), cells);
            for at in &free {
                assert_eq!(board.get(*at), None);
            }
        }
    }
}
