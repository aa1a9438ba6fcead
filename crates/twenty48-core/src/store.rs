//! Store contract between the session and whatever holds saved games.

use anyhow::Result;

use crate::snapshot::Snapshot;

/// Key-value collaborator that persists the game between sessions.
///
/// Implementations only move serialized values around; the formats are
/// decided by the snapshot codec. `save` replaces the whole stored state
/// and must land calls in call order, so a later load always sees the
/// newest completed mutation.
pub trait StateStore {
    /// The stored active board size, if one was ever saved.
    fn load_board_size(&self) -> Result<Option<u8>>;

    /// The stored tile records for one size, or `None` if never saved.
    fn load_board(&self, size: u8) -> Result<Option<Vec<String>>>;

    fn load_score(&self, size: u8) -> Result<Option<u64>>;

    fn load_highscore(&self, size: u8) -> Result<Option<u64>>;

    /// Replace the stored state with `snapshot`.
    fn save(&mut self, snapshot: &Snapshot) -> Result<()>;
}

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: Option<Snapshot>,
    saves: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot, as if it had been saved earlier.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        MemoryStore {
            snapshot: Some(snapshot),
            saves: 0,
        }
    }

    /// Number of `save` calls accepted so far.
    pub fn save_count(&self) -> u64 {
        self.saves
    }

    /// The most recently saved snapshot, if any.
    pub fn last_snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }
}

impl StateStore for MemoryStore {
    fn load_board_size(&self) -> Result<Option<u8>> {
        Ok(self.snapshot.as_ref().map(|s| s.board_size))
    }

    fn load_board(&self, size: u8) -> Result<Option<Vec<String>>> {
        Ok(self.snapshot.as_ref().and_then(|s| {
            s.boards
                .iter()
                .find(|entry| entry.0 == size)
                .map(|entry| entry.1.clone())
        }))
    }

    fn load_score(&self, size: u8) -> Result<Option<u64>> {
        Ok(self
            .snapshot
            .as_ref()
            .and_then(|s| s.scores.iter().find(|entry| entry.0 == size).map(|entry| entry.1)))
    }

    fn load_highscore(&self, size: u8) -> Result<Option<u64>> {
        Ok(self.snapshot.as_ref().and_then(|s| {
            s.highscores
                .iter()
                .find(|entry| entry.0 == size)
                .map(|entry| entry.1)
        }))
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.snapshot = Some(snapshot.clone());
        self.saves += 1;
        Ok(())
    }
}
