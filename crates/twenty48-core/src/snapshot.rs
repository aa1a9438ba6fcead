//! Serialized save-state: `"x,y,value"` tile records plus per-size scores.
//!
//! The store collaborator moves these values around without interpreting
//! them; everything about the format is decided here. Encoding sorts
//! records by coordinate so equal boards always serialize identically.

use anyhow::{bail, Context, Result};

use crate::engine::{Board, Coord};

/// The full persisted state in serialized form: the active size plus the
/// record list, score, and high score for every supported size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub board_size: u8,
    pub boards: Vec<(u8, Vec<String>)>,
    pub scores: Vec<(u8, u64)>,
    pub highscores: Vec<(u8, u64)>,
}

/// Encode one tile as a `"x,y,value"` record.
pub fn encode_record(at: Coord, value: u32) -> String {
    format!("{},{},{}", at.x, at.y, value)
}

/// Decode a `"x,y,value"` record into a coordinate and tile value.
pub fn decode_record(record: &str) -> Result<(Coord, u32)> {
    let fields: Vec<&str> = record.split(',').collect();
    if fields.len() != 3 {
        bail!("expected 3 comma-separated fields, got {}", fields.len());
    }
    let x: u8 = fields[0]
        .parse()
        .with_context(|| format!("bad column {:?}", fields[0]))?;
    let y: u8 = fields[1]
        .parse()
        .with_context(|| format!("bad row {:?}", fields[1]))?;
    let value: u32 = fields[2]
        .parse()
        .with_context(|| format!("bad tile value {:?}", fields[2]))?;
    Ok((Coord::new(x, y), value))
}

/// Serialize a board to records, sorted by coordinate for stable output.
pub fn encode_board(board: &Board) -> Vec<String> {
    let mut cells: Vec<(Coord, u32)> = board.tiles().collect();
    cells.sort();
    cells
        .into_iter()
        .map(|(at, value)| encode_record(at, value))
        .collect()
}

/// Rebuild a board of the given size from stored records.
///
/// Rejects anything a healthy save can never contain: malformed records,
/// coordinates outside the grid, values that are not powers of two >= 2,
/// and duplicate coordinates.
pub fn decode_board(size: u8, records: &[String]) -> Result<Board> {
    let mut board = Board::empty(size);
    for record in records {
        let (at, value) =
            decode_record(record).with_context(|| format!("bad tile record {record:?}"))?;
        if at.x >= size || at.y >= size {
            bail!("tile record {record:?} is outside the {size}x{size} grid");
        }
        if value < 2 || !value.is_power_of_two() {
            bail!("tile value {value} is not a power of two >= 2");
        }
        if board.get(at).is_some() {
            bail!("duplicate tile record for ({}, {})", at.x, at.y);
        }
        board.set(at, value);
    }
    Ok(board)
}
